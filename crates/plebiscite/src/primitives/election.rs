use ff::PrimeField as _;
use pasta_curves::Fp;

/// Identifies one election.
///
/// Unique per election: every vote signature and every nullifier binds the
/// id, so a ballot or nullifier from one election is meaningless in another.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "[u8; 32]", try_from = "[u8; 32]"))]
pub struct ElectionId(Fp);

impl From<Fp> for ElectionId {
    fn from(fp: Fp) -> Self {
        Self(fp)
    }
}

impl From<u64> for ElectionId {
    fn from(id: u64) -> Self {
        Self(Fp::from(id))
    }
}

impl From<ElectionId> for Fp {
    fn from(id: ElectionId) -> Self {
        id.0
    }
}

impl From<ElectionId> for [u8; 32] {
    fn from(id: ElectionId) -> Self {
        id.0.to_repr()
    }
}

impl TryFrom<[u8; 32]> for ElectionId {
    type Error = &'static str;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        Option::from(Fp::from_repr(bytes))
            .map(Self)
            .ok_or("invalid field element")
    }
}
