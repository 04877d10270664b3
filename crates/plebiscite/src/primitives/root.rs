use ff::PrimeField as _;
use pasta_curves::Fp;

/// Root digest of an [`AuthenticatedMap`](crate::map::AuthenticatedMap).
///
/// Used both as the frozen `voterDataRoot` and as the running nullifier
/// root. A root commits to every leaf of its map: any witness recomputed
/// from a claimed leaf value must reproduce it exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "[u8; 32]", try_from = "[u8; 32]"))]
pub struct Root(Fp);

impl From<Fp> for Root {
    fn from(fp: Fp) -> Self {
        Self(fp)
    }
}

impl From<Root> for Fp {
    fn from(root: Root) -> Self {
        root.0
    }
}

impl From<Root> for [u8; 32] {
    fn from(root: Root) -> Self {
        root.0.to_repr()
    }
}

impl TryFrom<[u8; 32]> for Root {
    type Error = &'static str;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        Option::from(Fp::from_repr(bytes))
            .map(Self)
            .ok_or("invalid field element")
    }
}
