//! The vote aggregator.
//!
//! Turns fixed-size batches of signed votes into a linear chain of
//! [`AggregateCertificate`]s. The aggregator owns the mutable nullifier set
//! and borrows the frozen election and registry.
//!
//! Construction is atomic: witnesses are built against a scratch copy of
//! the nullifier set, and the copy replaces the live set only once the proof
//! exists. Any failure leaves the aggregator exactly as it was.
//!
//! The aggregator may run ahead of the ledger. If the ledger settles a state
//! other than the one the aggregator assumed, [`Aggregator::rebase`] drops
//! the speculative tail and hands back its votes.

use mock_pcd::{Application, Params, Verifier};
use tracing::{debug, info, warn};

use crate::{
    certificate::AggregateCertificate,
    circuit::{BaseCase, BatchWitness, Next, VoteApp, VoteWitness},
    config::Election,
    error::{AggregateError, VoteError},
    map::AuthenticatedMap,
    nullifier::{Nullifier, NullifierSet},
    registry::VoterRegistry,
    transition::{BatchTransition, ElectionState, Tally},
    vote::Vote,
};

/// One proven batch and what it consumed.
#[derive(Clone, Debug)]
struct Link {
    certificate: AggregateCertificate,
    votes: Vec<Vote>,
    nullifiers: Vec<Nullifier>,
}

/// Builds and chains batch certificates for one election.
#[derive(Clone, Debug)]
pub struct Aggregator<'election> {
    election: &'election Election,
    registry: &'election VoterRegistry,
    app: Application,
    base: BaseCase,
    next: Next,
    nullifiers: NullifierSet,
    chain: Vec<Link>,
}

impl<'election> Aggregator<'election> {
    /// An aggregator at genesis.
    pub fn new(
        election: &'election Election,
        registry: &'election VoterRegistry,
        params: &Params,
    ) -> Result<Self, AggregateError> {
        let app = VoteApp::build(params)?;
        let (base, next) = VoteApp::steps(election);
        Ok(Self {
            election,
            registry,
            app,
            base,
            next,
            nullifiers: NullifierSet::new(),
            chain: Vec::new(),
        })
    }

    /// A verifier for the certificates this aggregator produces.
    #[must_use]
    pub fn verifier(&self) -> Verifier {
        self.app.verifier()
    }

    /// The last certificate built, if any.
    #[must_use]
    pub fn head(&self) -> Option<&AggregateCertificate> {
        self.chain.last().map(|link| &link.certificate)
    }

    /// Every certificate built, oldest first.
    pub fn certificates(&self) -> impl Iterator<Item = &AggregateCertificate> {
        self.chain.iter().map(|link| &link.certificate)
    }

    /// The state after the head, or genesis.
    #[must_use]
    pub fn state(&self) -> ElectionState {
        self.head().map_or_else(
            || ElectionState::genesis(self.election.candidate_count()),
            |head| head.transition().after.clone(),
        )
    }

    /// The live nullifier set.
    #[must_use]
    pub const fn nullifiers(&self) -> &NullifierSet {
        &self.nullifiers
    }

    /// Pre-batch validation of one vote against the head state.
    pub fn validate(&self, vote: &Vote) -> Result<(), VoteError> {
        vote.validate(self.election, self.registry, &self.nullifiers)
    }

    /// The honest transition for `votes` applied to the head state.
    ///
    /// Mutates nothing.
    pub fn prepare(&self, votes: &[Vote]) -> Result<BatchTransition, AggregateError> {
        let (_witnesses, scratch) = self.witness_votes(votes)?;
        let before = self.state();
        let tally = before
            .tally
            .checked_add(&increment(self.election.candidate_count(), votes)?)?;
        Ok(BatchTransition {
            election: self.election.id(),
            voter_root: self.registry.root(),
            after: ElectionState {
                nullifier_root: scratch.root(),
                tally,
            },
            before,
        })
    }

    /// Prove the first batch of the chain.
    ///
    /// `transition` must start from genesis; the aggregator must not have
    /// spent any nullifier yet.
    pub fn base_case(
        &mut self,
        transition: BatchTransition,
        votes: &[Vote],
    ) -> Result<AggregateCertificate, AggregateError> {
        if transition.before != ElectionState::genesis(self.election.candidate_count()) {
            return Err(AggregateError::NotGenesis);
        }
        if self.nullifiers.root() != AuthenticatedMap::empty_root() {
            return Err(AggregateError::Detached);
        }
        let (witnesses, scratch) = self.witness_votes(votes)?;
        let (pcd, spent) = self.app.seed(
            &self.base,
            BatchWitness {
                transition,
                votes: witnesses,
            },
        )?;
        Ok(self.commit(AggregateCertificate::new(pcd), votes, spent, scratch))
    }

    /// Prove a batch continuing `prior`.
    ///
    /// `prior` must be the aggregator's head (or a certificate with the same
    /// after-state), and `transition` must continue it exactly.
    pub fn next(
        &mut self,
        transition: BatchTransition,
        prior: &AggregateCertificate,
        votes: &[Vote],
    ) -> Result<AggregateCertificate, AggregateError> {
        if !transition.follows(prior.transition()) {
            return Err(AggregateError::ChainMismatch);
        }
        if transition.before.nullifier_root != self.nullifiers.root() {
            return Err(AggregateError::Detached);
        }
        let (witnesses, scratch) = self.witness_votes(votes)?;
        let (pcd, spent) = self.app.fuse(
            &self.next,
            BatchWitness {
                transition,
                votes: witnesses,
            },
            prior.pcd(),
        )?;
        Ok(self.commit(AggregateCertificate::new(pcd), votes, spent, scratch))
    }

    /// Prepare and prove `votes` on top of the head.
    pub fn prove_batch(&mut self, votes: &[Vote]) -> Result<AggregateCertificate, AggregateError> {
        let transition = self.prepare(votes)?;
        match self.head().cloned() {
            None => self.base_case(transition, votes),
            Some(prior) => self.next(transition, &prior, votes),
        }
    }

    /// Realign with the state the ledger actually settled.
    ///
    /// Certificates after the one ending in `accepted` are discarded and the
    /// nullifier set is rebuilt from the ones that remain. Returns the votes
    /// of the discarded certificates, oldest first, so they can be batched
    /// again. If `accepted` is not on this chain at all, nothing changes.
    pub fn rebase(&mut self, accepted: &ElectionState) -> Result<Vec<Vote>, AggregateError> {
        let keep = if *accepted == ElectionState::genesis(self.election.candidate_count()) {
            0
        } else {
            self.chain
                .iter()
                .position(|link| link.certificate.transition().after == *accepted)
                .map(|index| index + 1)
                .ok_or(AggregateError::Detached)?
        };

        if keep == self.chain.len() {
            return Ok(Vec::new());
        }

        let mut nullifiers = NullifierSet::new();
        for link in self.chain.iter().take(keep) {
            for nf in &link.nullifiers {
                nullifiers
                    .spend(*nf)
                    .map_err(|_err| AggregateError::Detached)?;
            }
        }
        let discarded = self.chain.split_off(keep);
        self.nullifiers = nullifiers;

        warn!(
            discarded = discarded.len(),
            kept = self.chain.len(),
            "rebased onto settled state, speculative certificates dropped"
        );
        Ok(discarded.into_iter().flat_map(|link| link.votes).collect())
    }

    /// Witnesses for `votes` in order, against a scratch copy of the
    /// nullifier set that ends with every vote spent.
    fn witness_votes(
        &self,
        votes: &[Vote],
    ) -> Result<(Vec<VoteWitness>, NullifierSet), AggregateError> {
        if votes.len() != self.election.batch_size() {
            return Err(AggregateError::BatchSize {
                expected: self.election.batch_size(),
                actual: votes.len(),
            });
        }

        let mut scratch = self.nullifiers.clone();
        let mut witnesses = Vec::with_capacity(votes.len());
        for (index, vote) in votes.iter().enumerate() {
            let reject = |source| AggregateError::Vote { index, source };
            vote.validate(self.election, self.registry, &scratch)
                .map_err(|source| {
                    warn!(index, %source, "vote rejected");
                    reject(source)
                })?;
            let record = *self
                .registry
                .get(&vote.voter)
                .ok_or_else(|| reject(VoteError::Eligibility))?;
            let nf = vote.nullifier();
            let witness = VoteWitness {
                vote: *vote,
                record,
                eligibility: self.registry.witness(&vote.voter),
                nullifier: scratch.witness(nf),
            };
            scratch.spend(nf).map_err(reject)?;
            debug!(index, candidate = vote.candidate, "vote witnessed");
            witnesses.push(witness);
        }
        Ok((witnesses, scratch))
    }

    fn commit(
        &mut self,
        certificate: AggregateCertificate,
        votes: &[Vote],
        nullifiers: Vec<Nullifier>,
        scratch: NullifierSet,
    ) -> AggregateCertificate {
        self.nullifiers = scratch;
        self.chain.push(Link {
            certificate: certificate.clone(),
            votes: votes.to_vec(),
            nullifiers,
        });
        let after = &certificate.transition().after;
        info!(
            height = self.chain.len(),
            base = certificate.is_base(),
            tally = ?&*after.tally,
            "certificate emitted"
        );
        certificate
    }
}

/// Sum of per-candidate selections in `votes`.
fn increment(candidates: usize, votes: &[Vote]) -> Result<Tally, AggregateError> {
    let mut tally = Tally::zero(candidates);
    for vote in votes {
        tally.increment(vote.position())?;
    }
    Ok(tally)
}
