#![expect(
    clippy::field_scoped_visibility_modifiers,
    reason = "implement key relationships within submodule"
)]

//! Public (verification) keys.

use pasta_curves::Fp;
use reddsa::orchard::SpendAuth;

use super::signature::BallotSignature;
use crate::{constants::Domain, registry::VoterIndex};

/// A voter's public key `pk = [sk]G`.
///
/// Verifies ballot signatures, and is the preimage of both the voter's
/// registry index and their per-election nullifier.
#[derive(Clone, Copy, Debug)]
pub struct VoterKey(pub(super) reddsa::VerificationKey<SpendAuth>);

impl VoterKey {
    /// Verify a ballot signature.
    pub fn verify(&self, msg: &[u8], sig: &BallotSignature) -> Result<(), reddsa::Error> {
        self.0.verify(msg, &sig.0)
    }

    /// Registry index: $H(\text{"Plebiscite\_Voter"},\; \mathsf{pk})$.
    #[must_use]
    pub fn index(&self) -> VoterIndex {
        VoterIndex::from(self.hash_with(Domain::VOTER_INDEX, &[]))
    }

    /// The 32-byte compressed encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.into()
    }

    /// Hash the key together with further field elements under `domain`.
    pub(crate) fn hash_with(&self, domain: Domain, others: &[[u8; 32]]) -> Fp {
        let mut inputs = Vec::with_capacity(others.len() + 1);
        inputs.push(self.to_bytes());
        inputs.extend_from_slice(others);
        domain.hash(&inputs)
    }
}

#[expect(
    clippy::missing_trait_methods,
    reason = "default ne/assert impls are correct"
)]
impl PartialEq for VoterKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

#[expect(
    clippy::missing_trait_methods,
    reason = "default assert_receiver_is_total_eq is correct"
)]
impl Eq for VoterKey {}

impl From<VoterKey> for [u8; 32] {
    fn from(pk: VoterKey) -> Self {
        pk.0.into()
    }
}

impl TryFrom<[u8; 32]> for VoterKey {
    type Error = reddsa::Error;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        reddsa::VerificationKey::<SpendAuth>::try_from(bytes).map(Self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VoterKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
#[expect(clippy::missing_trait_methods, reason = "serde default is sufficient")]
impl<'de> serde::Deserialize<'de> for VoterKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: [u8; 32] = serde::Deserialize::deserialize(deserializer)?;
        Self::try_from(bytes).map_err(|_err| serde::de::Error::custom("invalid voter key"))
    }
}
