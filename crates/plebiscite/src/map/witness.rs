use pasta_curves::Fp;

use super::{node_digest, path};
use crate::{constants::MAP_DEPTH, primitives::Root};

/// Authentication path for a single key of an
/// [`AuthenticatedMap`](super::AuthenticatedMap).
///
/// Sibling digests are ordered from the leaf upward. The same witness proves
/// membership (a nonzero value) or absence (zero), and can predict the root
/// after that one leaf changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness {
    key: Fp,
    siblings: Vec<Fp>,
}

impl Witness {
    pub(super) const fn new(key: Fp, siblings: Vec<Fp>) -> Self {
        Self { key, siblings }
    }

    /// The key this witness opens.
    #[must_use]
    pub const fn key(&self) -> Fp {
        self.key
    }

    /// Fold `value` up the path.
    #[must_use]
    pub fn compute_root(&self, value: Fp) -> Root {
        let directions = path(self.key);
        let digest = self
            .siblings
            .iter()
            .zip(directions.iter().rev())
            .fold(value, |current, (&sibling, &right)| {
                if right {
                    node_digest(sibling, current)
                } else {
                    node_digest(current, sibling)
                }
            });
        Root::from(digest)
    }

    /// Whether the leaf at [`key`](Self::key) holds `value` under `root`.
    #[must_use]
    pub fn verify(&self, root: Root, value: Fp) -> bool {
        self.siblings.len() == MAP_DEPTH && self.compute_root(value) == root
    }
}
