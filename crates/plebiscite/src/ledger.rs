//! The settlement ledger.
//!
//! The ledger is the authoritative, minimal state of an election: which
//! election, which registry, the current tally and the current nullifier
//! root. It never sees votes. It only moves when handed a certificate whose
//! before-state is exactly the settled state, so certificates are applied
//! strictly head-to-tail. Two certificates built on the same predecessor
//! are mutually exclusive: whichever arrives first wins and the other is
//! stale forever.
//!
//! Storage is behind [`StateStore`] so the state can live wherever the
//! deployment commits it; [`MemoryStore`] keeps it in process.

use mock_pcd::Verifier;
use tracing::{info, warn};

use crate::{
    certificate::Verifiable,
    config::{Election, VotingPeriod},
    error::SettlementError,
    primitives::{ElectionId, Root},
    transition::{BatchTransition, ElectionState, Tally},
};

/// The persistent state of one election.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettlementState {
    /// The election this ledger settles.
    pub election: ElectionId,
    /// The frozen `voterDataRoot`.
    pub voter_root: Root,
    /// Settled tally and nullifier root.
    pub current: ElectionState,
}

impl SettlementState {
    /// Zero tally and empty nullifier root.
    #[must_use]
    pub fn genesis(election: &Election, voter_root: Root) -> Self {
        Self {
            election: election.id(),
            voter_root,
            current: ElectionState::genesis(election.candidate_count()),
        }
    }
}

/// Where settled state lives.
///
/// `commit` replaces the whole state at once; a ledger never writes a
/// partial update.
pub trait StateStore {
    /// The currently committed state.
    fn load(&self) -> &SettlementState;

    /// Atomically replace the committed state.
    fn commit(&mut self, state: SettlementState);
}

/// In-process [`StateStore`].
///
/// Counts commits, standing in for the height at which a chain would have
/// recorded each settlement.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    state: SettlementState,
    sequence: u64,
}

impl MemoryStore {
    /// A store holding `state` with no commits yet.
    #[must_use]
    pub const fn new(state: SettlementState) -> Self {
        Self { state, sequence: 0 }
    }

    /// Number of commits so far.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> &SettlementState {
        &self.state
    }

    fn commit(&mut self, state: SettlementState) {
        self.state = state;
        self.sequence += 1;
    }
}

/// Whether a challenged certificate agrees with the settled state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispute {
    /// The certificate ends where the ledger is.
    Consistent,
    /// The certificate is valid but ends somewhere else.
    Diverges {
        /// What the ledger holds.
        settled: ElectionState,
        /// What the certificate proves.
        claimed: ElectionState,
    },
}

/// Accepts certificates in strict order and advances the settled state.
#[derive(Clone, Debug)]
pub struct SettlementLedger<S = MemoryStore> {
    store: S,
    verifier: Verifier,
    period: VotingPeriod,
}

impl SettlementLedger<MemoryStore> {
    /// An in-memory ledger at genesis for `election`.
    #[must_use]
    pub fn new(election: &Election, voter_root: Root, verifier: Verifier) -> Self {
        Self::with_store(
            MemoryStore::new(SettlementState::genesis(election, voter_root)),
            verifier,
            election.period(),
        )
    }
}

impl<S: StateStore> SettlementLedger<S> {
    /// A ledger over an existing store.
    pub const fn with_store(store: S, verifier: Verifier, period: VotingPeriod) -> Self {
        Self {
            store,
            verifier,
            period,
        }
    }

    /// The settled state.
    #[must_use]
    pub fn state(&self) -> &SettlementState {
        self.store.load()
    }

    /// The settled tally.
    #[must_use]
    pub fn tally(&self) -> &Tally {
        &self.store.load().current.tally
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Settle one certificate.
    ///
    /// In order: the certificate must start from the settled state, name
    /// this election and registry, and verify. Only then is the after-state
    /// committed. Any failure leaves the ledger untouched.
    pub fn verify_batch<C>(&mut self, certificate: &C) -> Result<(), SettlementError>
    where
        C: Verifiable<Statement = BatchTransition>,
    {
        let transition = certificate.statement();
        let settled = self.store.load();

        if transition.before != settled.current {
            warn!("stale certificate rejected");
            return Err(SettlementError::StaleState);
        }
        check_binding(settled, transition)?;
        if !certificate.verify(&self.verifier) {
            warn!("certificate proof rejected");
            return Err(SettlementError::InvalidCertificate);
        }

        let next = SettlementState {
            current: transition.after.clone(),
            ..settled.clone()
        };
        self.store.commit(next);
        info!(tally = ?&*transition.after.tally, "batch settled");
        Ok(())
    }

    /// Settle one certificate at sequence height `height`.
    ///
    /// Refuses with [`SettlementError::VotingOpen`] before the election
    /// window's last height, then behaves as
    /// [`verify_batch`](Self::verify_batch).
    pub fn settle<C>(&mut self, certificate: &C, height: u32) -> Result<(), SettlementError>
    where
        C: Verifiable<Statement = BatchTransition>,
    {
        let closes = self.period.election.end;
        if height < closes {
            warn!(height, closes, "settlement before voting closed");
            return Err(SettlementError::VotingOpen { height, closes });
        }
        self.verify_batch(certificate)
    }

    /// Compare a certificate against the settled state during the
    /// challenge window.
    ///
    /// `height` is the external sequence counter. The certificate must name
    /// this election and registry and verify. The ledger is never modified.
    pub fn challenge<C>(&self, certificate: &C, height: u32) -> Result<Dispute, SettlementError>
    where
        C: Verifiable<Statement = BatchTransition>,
    {
        let window = self.period.challenge;
        if !window.contains(height) {
            return Err(SettlementError::OutsideWindow { height, window });
        }
        let transition = certificate.statement();
        let settled = self.store.load();
        check_binding(settled, transition)?;
        if !certificate.verify(&self.verifier) {
            return Err(SettlementError::InvalidCertificate);
        }

        if transition.after == settled.current {
            Ok(Dispute::Consistent)
        } else {
            warn!(height, "challenge diverges from settled state");
            Ok(Dispute::Diverges {
                settled: settled.current.clone(),
                claimed: transition.after.clone(),
            })
        }
    }
}

fn check_binding(
    settled: &SettlementState,
    transition: &BatchTransition,
) -> Result<(), SettlementError> {
    if transition.election != settled.election {
        return Err(SettlementError::ElectionMismatch);
    }
    if transition.voter_root != settled.voter_root {
        return Err(SettlementError::VoterRootMismatch);
    }
    Ok(())
}
