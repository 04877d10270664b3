//! Nullifiers and the nullifier set.
//!
//! $$\mathsf{nf} = H(\text{"Plebiscite\_Nullf"},\; \mathsf{pk} \| \mathsf{electionId})$$
//!
//! One nullifier per voter per election. The [`NullifierSet`] stores each
//! spent nullifier as the flag value 1; an unspent nullifier is an absent
//! (zero) leaf. The set only grows.

use ff::{Field as _, PrimeField as _};
use pasta_curves::Fp;

use crate::{
    constants::Domain,
    error::VoteError,
    keys::public::VoterKey,
    map::{AuthenticatedMap, Witness},
    primitives::{ElectionId, Root},
};

/// A voter's one-time tag in one election.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nullifier(Fp);

impl Nullifier {
    /// Derive the nullifier of `voter` in `election`.
    #[must_use]
    pub fn derive(voter: &VoterKey, election: ElectionId) -> Self {
        Self(voter.hash_with(Domain::NULLIFIER, &[election.into()]))
    }
}

impl From<Nullifier> for Fp {
    fn from(nf: Nullifier) -> Self {
        nf.0
    }
}

impl From<Nullifier> for [u8; 32] {
    fn from(nf: Nullifier) -> Self {
        nf.0.to_repr()
    }
}

/// Monotone set of spent nullifiers.
#[derive(Clone, Debug, Default)]
pub struct NullifierSet {
    map: AuthenticatedMap,
}

impl NullifierSet {
    /// An empty set, rooted at [`AuthenticatedMap::empty_root`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current nullifier root.
    #[must_use]
    pub fn root(&self) -> Root {
        self.map.root()
    }

    /// Whether `nf` has been spent.
    #[must_use]
    pub fn is_spent(&self, nf: Nullifier) -> bool {
        !bool::from(self.map.get(nf.0).is_zero())
    }

    /// Witness for `nf` against the current root.
    ///
    /// For an unspent nullifier, `witness.compute_root(Fp::ONE)` is the root
    /// after spending it.
    #[must_use]
    pub fn witness(&self, nf: Nullifier) -> Witness {
        self.map.witness(nf.0)
    }

    /// Mark `nf` spent. Fails without change if it already was.
    pub fn spend(&mut self, nf: Nullifier) -> Result<(), VoteError> {
        if self.is_spent(nf) {
            return Err(VoteError::Replay);
        }
        self.map.set(nf.0, Fp::ONE);
        Ok(())
    }

    /// Number of spent nullifiers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing has been spent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::private::VoterSigningKey;

    /// Nullifiers are per voter and per election.
    #[test]
    fn derivation_binds_voter_and_election() {
        let alice = VoterSigningKey::from_seed([1u8; 32]).public();
        let bob = VoterSigningKey::from_seed([2u8; 32]).public();
        let first = ElectionId::from(1u64);
        let second = ElectionId::from(2u64);

        assert_eq!(Nullifier::derive(&alice, first), Nullifier::derive(&alice, first));
        assert_ne!(Nullifier::derive(&alice, first), Nullifier::derive(&bob, first));
        assert_ne!(Nullifier::derive(&alice, first), Nullifier::derive(&alice, second));
    }

    /// Spending is one-shot, and the unspent witness predicts the new root.
    #[test]
    fn spend_once() {
        let alice = VoterSigningKey::from_seed([1u8; 32]).public();
        let nf = Nullifier::derive(&alice, ElectionId::from(1u64));
        let mut set = NullifierSet::new();
        assert_eq!(set.root(), AuthenticatedMap::empty_root());

        let witness = set.witness(nf);
        assert!(witness.verify(set.root(), Fp::ZERO));
        let predicted = witness.compute_root(Fp::ONE);

        set.spend(nf).unwrap();
        assert!(set.is_spent(nf));
        assert_eq!(set.root(), predicted);
        assert_eq!(set.len(), 1);

        let root = set.root();
        assert_eq!(set.spend(nf), Err(VoteError::Replay));
        assert_eq!(set.root(), root);
    }
}
