use crate::header::Header;

/// Size of a serialized proof in bytes.
pub const PROOF_SIZE: usize = 64;

/// A constant-size proof.
///
/// The size does not depend on how many steps were fused to produce it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proof(pub(crate) [u8; PROOF_SIZE]);

impl From<[u8; PROOF_SIZE]> for Proof {
    fn from(bytes: [u8; PROOF_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Proof> for [u8; PROOF_SIZE] {
    fn from(proof: Proof) -> Self {
        proof.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Proof {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

#[cfg(feature = "serde")]
#[expect(clippy::missing_trait_methods, reason = "serde default is sufficient")]
impl<'de> serde::Deserialize<'de> for Proof {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        <[u8; PROOF_SIZE]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_err| serde::de::Error::invalid_length(bytes.len(), &"64 bytes"))
    }
}

/// Proof-carrying data: a header and the proof attesting to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pcd<H: Header> {
    /// Proof over `data`.
    pub proof: Proof,
    /// The public header.
    pub data: H,
}
