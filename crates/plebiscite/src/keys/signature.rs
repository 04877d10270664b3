//! Signature types that bridge private (sign) and public (verify) keys.

use reddsa::orchard::SpendAuth;

/// A ballot signature (RedPallas over SpendAuth).
///
/// Covers exactly the ballot sighash; see
/// [`ballot_sighash`](crate::vote::ballot_sighash).
#[derive(Clone, Copy, Debug)]
pub struct BallotSignature(pub reddsa::Signature<SpendAuth>);

impl From<[u8; 64]> for BallotSignature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(reddsa::Signature::<SpendAuth>::from(bytes))
    }
}

impl From<BallotSignature> for [u8; 64] {
    fn from(sig: BallotSignature) -> [u8; 64] {
        <[u8; 64]>::from(sig.0)
    }
}

#[expect(
    clippy::missing_trait_methods,
    reason = "default ne/assert impls are correct"
)]
impl PartialEq for BallotSignature {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 64]>::from(*self) == <[u8; 64]>::from(*other)
    }
}

#[expect(
    clippy::missing_trait_methods,
    reason = "default assert_receiver_is_total_eq is correct"
)]
impl Eq for BallotSignature {}

#[cfg(feature = "serde")]
impl serde::Serialize for BallotSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: [u8; 64] = (*self).into();
        serializer.serialize_bytes(&bytes)
    }
}

#[cfg(feature = "serde")]
#[expect(clippy::missing_trait_methods, reason = "serde default is sufficient")]
impl<'de> serde::Deserialize<'de> for BallotSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        <[u8; 64]>::try_from(bytes.as_slice())
            .map(Self::from)
            .map_err(|_err| serde::de::Error::invalid_length(bytes.len(), &"64 bytes"))
    }
}
