//! Pending votes awaiting a batch.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, warn};

use crate::{
    config::Election,
    error::PoolError,
    nullifier::NullifierSet,
    registry::VoterRegistry,
    vote::Vote,
};

/// Collects submitted votes and hands them out in batches of exactly k.
///
/// Every vote is pre-validated on submission, so a batch drawn from the
/// pool only fails to prove if the nullifier set moves underneath it.
#[derive(Debug)]
pub struct VotePool<'election> {
    election: &'election Election,
    registry: &'election VoterRegistry,
    pending: VecDeque<Vote>,
    seen: BTreeSet<[u8; 32]>,
    open: bool,
}

impl<'election> VotePool<'election> {
    /// An open, empty pool.
    #[must_use]
    pub const fn new(election: &'election Election, registry: &'election VoterRegistry) -> Self {
        Self {
            election,
            registry,
            pending: VecDeque::new(),
            seen: BTreeSet::new(),
            open: true,
        }
    }

    /// Queue a vote.
    ///
    /// `spent` is the aggregator's current nullifier set. A vote whose
    /// nullifier this pool has already admitted is a
    /// [`PoolError::Duplicate`], even if its selection differs.
    pub fn submit(&mut self, vote: Vote, spent: &NullifierSet) -> Result<(), PoolError> {
        if !self.open {
            return Err(PoolError::Closed);
        }
        let nf: [u8; 32] = vote.nullifier().into();
        if self.seen.contains(&nf) {
            warn!("duplicate vote rejected");
            return Err(PoolError::Duplicate);
        }
        if let Err(err) = vote.validate(self.election, self.registry, spent) {
            warn!(%err, "vote rejected");
            return Err(err.into());
        }
        self.seen.insert(nf);
        self.pending.push_back(vote);
        debug!(pending = self.pending.len(), "vote queued");
        Ok(())
    }

    /// The next full batch, oldest votes first, or `None` if fewer than k
    /// votes are pending.
    pub fn next_batch(&mut self) -> Option<Vec<Vote>> {
        let size = self.election.batch_size();
        if self.pending.len() < size {
            return None;
        }
        Some(self.pending.drain(..size).collect())
    }

    /// Return votes to the front of the queue, e.g. after a rebase.
    ///
    /// They keep their relative order and precede everything pending. The
    /// pool accepts them even when closed; they were admitted earlier.
    pub fn requeue(&mut self, votes: Vec<Vote>) {
        for vote in votes.into_iter().rev() {
            self.seen.insert(vote.nullifier().into());
            self.pending.push_front(vote);
        }
    }

    /// Stop accepting votes. Pending votes can still be drained.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether [`submit`](Self::submit) still accepts votes.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Number of pending votes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no votes are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
