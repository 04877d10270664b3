//! The batch state-transition contract.
//!
//! A [`BatchTransition`] is the public statement of one batch: which
//! election, which registry, and the [`ElectionState`] before and after the
//! batch's votes are applied. It is what a certificate attests to and what
//! the ledger compares against its settled state.

use core::ops::Deref;

use crate::{
    error::AggregateError,
    map::AuthenticatedMap,
    primitives::{ElectionId, Root},
};

/// Per-candidate vote counts, indexed by candidate id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally(Vec<u64>);

impl Tally {
    /// All-zero tally over `candidates` candidates.
    #[must_use]
    pub fn zero(candidates: usize) -> Self {
        Self(vec![0; candidates])
    }

    /// Whether every count is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    /// Add one vote for `candidate`.
    pub(crate) fn increment(&mut self, candidate: usize) -> Result<(), AggregateError> {
        let count = self.0.get_mut(candidate).ok_or(AggregateError::TallyMismatch)?;
        *count = count.checked_add(1).ok_or(AggregateError::Overflow)?;
        Ok(())
    }

    /// Element-wise sum; the lengths must agree.
    pub fn checked_add(&self, other: &Self) -> Result<Self, AggregateError> {
        if self.len() != other.len() {
            return Err(AggregateError::TallyMismatch);
        }
        self.iter()
            .zip(other.iter())
            .map(|(&lhs, &rhs)| lhs.checked_add(rhs).ok_or(AggregateError::Overflow))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Deref for Tally {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

impl From<Vec<u64>> for Tally {
    fn from(counts: Vec<u64>) -> Self {
        Self(counts)
    }
}

impl From<Tally> for Vec<u64> {
    fn from(tally: Tally) -> Self {
        tally.0
    }
}

/// The mutable part of an election: who has voted and how it stands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElectionState {
    /// Root of the nullifier set.
    pub nullifier_root: Root,
    /// Per-candidate counts.
    pub tally: Tally,
}

impl ElectionState {
    /// Before any vote: zero tally and the empty nullifier root.
    #[must_use]
    pub fn genesis(candidates: usize) -> Self {
        Self {
            nullifier_root: AuthenticatedMap::empty_root(),
            tally: Tally::zero(candidates),
        }
    }

    /// Whether this is a genesis state (of any width).
    #[must_use]
    pub fn is_genesis(&self) -> bool {
        self.nullifier_root == AuthenticatedMap::empty_root() && self.tally.is_zero()
    }
}

/// Public statement of one batch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchTransition {
    /// Election the batch belongs to.
    pub election: ElectionId,
    /// Frozen `voterDataRoot` eligibility was checked against.
    pub voter_root: Root,
    /// State the batch starts from.
    pub before: ElectionState,
    /// State after the batch's votes.
    pub after: ElectionState,
}

impl BatchTransition {
    /// Whether the batch starts from genesis.
    #[must_use]
    pub fn is_genesis(&self) -> bool {
        self.before.is_genesis()
    }

    /// Whether `self` continues directly from `prior`: same election and
    /// registry, and `self.before == prior.after`.
    #[must_use]
    pub fn follows(&self, prior: &Self) -> bool {
        self.election == prior.election
            && self.voter_root == prior.voter_root
            && self.before == prior.after
    }
}

#[cfg(test)]
mod tests {
    use ff::Field as _;
    use pasta_curves::Fp;

    use super::*;

    #[test]
    fn tally_arithmetic() {
        let mut tally = Tally::zero(3);
        assert!(tally.is_zero());
        tally.increment(1).unwrap();
        tally.increment(1).unwrap();
        assert_eq!(&*tally, &[0, 2, 0]);
        assert_eq!(tally.increment(3), Err(AggregateError::TallyMismatch));

        let sum = tally.checked_add(&Tally::from(vec![1, 1, 1])).unwrap();
        assert_eq!(&*sum, &[1, 3, 1]);
        assert_eq!(
            tally.checked_add(&Tally::zero(2)),
            Err(AggregateError::TallyMismatch)
        );

        let mut full = Tally::from(vec![u64::MAX]);
        assert_eq!(full.increment(0), Err(AggregateError::Overflow));
    }

    #[test]
    fn chaining() {
        let genesis = ElectionState::genesis(2);
        assert!(genesis.is_genesis());
        let middle = ElectionState {
            nullifier_root: Root::from(Fp::ONE),
            tally: Tally::from(vec![1, 0]),
        };
        let first = BatchTransition {
            election: ElectionId::from(1u64),
            voter_root: Root::from(Fp::ZERO),
            before: genesis,
            after: middle.clone(),
        };
        let last = ElectionState {
            nullifier_root: Root::from(Fp::from(2u64)),
            tally: Tally::from(vec![1, 1]),
        };
        let second = BatchTransition {
            before: middle,
            after: last,
            ..first.clone()
        };
        assert!(first.is_genesis());
        assert!(!second.is_genesis());
        assert!(second.follows(&first));
        assert!(!first.follows(&second));

        let elsewhere = BatchTransition {
            election: ElectionId::from(2u64),
            ..second
        };
        assert!(!elsewhere.follows(&first));
    }
}
