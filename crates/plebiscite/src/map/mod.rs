//! Sparse authenticated map.
//!
//! A binary Merkle trie over the full $\mathbb{F}_p$ key space: each key's
//! 255-bit little-endian representation, read from the most significant bit
//! down, is its path from the root to a leaf. Absent keys hold the zero
//! value.
//!
//! ## Representation
//!
//! Only the paths of keys that were ever [`set`](AuthenticatedMap::set) to a
//! nonzero value are materialized; every other subtree is the canonical
//! empty subtree, whose digest at height $h$ is
//!
//! $$E_0 = 0, \qquad E_{h+1} = H(E_h \| E_h)$$
//!
//! with $H$ = BLAKE2b-512 under `"Plebiscite_Node_"`, reduced to
//! $\mathbb{F}_p$. Leaf digests are the leaf values themselves. Clearing a
//! leaf prunes its branch, so two maps with the same contents have the same
//! shape as well as the same root.
//!
//! The same type backs the frozen voter registry and the monotone nullifier
//! set; the policies live in [`registry`](crate::registry) and
//! [`nullifier`](crate::nullifier).

mod witness;

use std::sync::OnceLock;

use bitvec::{order::Lsb0, view::BitView as _};
use ff::{Field as _, PrimeField as _};
use pasta_curves::Fp;

pub use witness::Witness;

use crate::{
    constants::{Domain, MAP_DEPTH},
    primitives::Root,
};

/// Interior node digest: $H(\text{left} \| \text{right})$.
pub(crate) fn node_digest(left: Fp, right: Fp) -> Fp {
    Domain::NODE.hash(&[left.to_repr(), right.to_repr()])
}

/// Digest of the canonical empty subtree of `height`.
///
/// Height 0 is the empty leaf, height [`MAP_DEPTH`] the root of the empty
/// map.
fn empty_digest(height: usize) -> Fp {
    static EMPTY: OnceLock<Vec<Fp>> = OnceLock::new();
    let digests = EMPTY.get_or_init(|| {
        let mut digests = Vec::with_capacity(MAP_DEPTH + 1);
        let mut current = Fp::ZERO;
        digests.push(current);
        for _ in 0..MAP_DEPTH {
            current = node_digest(current, current);
            digests.push(current);
        }
        digests
    });
    #[expect(clippy::expect_used, reason = "heights never exceed MAP_DEPTH")]
    digests
        .get(height)
        .copied()
        .expect("height is within the map depth")
}

/// Directions from the root to the leaf of `key`: `true` is right.
fn path(key: Fp) -> Vec<bool> {
    let repr = key.to_repr();
    let bits = repr.view_bits::<Lsb0>();
    bits.iter().by_vals().take(MAP_DEPTH).rev().collect()
}

/// A subtree. Its height is implied by the number of directions left to
/// walk beneath it.
#[derive(Clone, Debug, Default)]
enum Node {
    #[default]
    Empty,
    Leaf(Fp),
    Branch(Box<Branch>),
}

#[derive(Clone, Debug, Default)]
struct Branch {
    digest: Fp,
    left: Node,
    right: Node,
}

impl Branch {
    const fn child(&self, right: bool) -> &Node {
        if right { &self.right } else { &self.left }
    }

    const fn child_mut(&mut self, right: bool) -> &mut Node {
        if right { &mut self.right } else { &mut self.left }
    }
}

impl Node {
    fn digest(&self, height: usize) -> Fp {
        match self {
            Self::Empty => empty_digest(height),
            Self::Leaf(value) => *value,
            Self::Branch(branch) => branch.digest,
        }
    }

    fn get(&self, directions: &[bool]) -> Fp {
        match (self, directions.split_first()) {
            (Self::Leaf(value), None) => *value,
            (Self::Branch(branch), Some((&right, below))) => branch.child(right).get(below),
            (Self::Empty, _) | (Self::Leaf(_), Some(_)) | (Self::Branch(_), None) => Fp::ZERO,
        }
    }

    /// Returns the previous leaf value.
    fn set(&mut self, directions: &[bool], value: Fp) -> Fp {
        let Some((&right, below)) = directions.split_first() else {
            let previous = self.digest(0);
            *self = if value.is_zero().into() {
                Self::Empty
            } else {
                Self::Leaf(value)
            };
            return previous;
        };

        let mut branch = match core::mem::take(self) {
            Self::Branch(branch) => branch,
            Self::Empty | Self::Leaf(_) => Box::default(),
        };
        let previous = branch.child_mut(right).set(below, value);

        if matches!((&branch.left, &branch.right), (Self::Empty, Self::Empty)) {
            // Pruned back to the canonical empty subtree.
            return previous;
        }
        let height = below.len();
        branch.digest = node_digest(branch.left.digest(height), branch.right.digest(height));
        *self = Self::Branch(branch);
        previous
    }

    /// Appends sibling digests, leaf first.
    fn witness(&self, directions: &[bool], siblings: &mut Vec<Fp>) {
        let Some((&right, below)) = directions.split_first() else {
            return;
        };
        match self {
            Self::Branch(branch) => {
                branch.child(right).witness(below, siblings);
                siblings.push(branch.child(!right).digest(below.len()));
            }
            Self::Empty | Self::Leaf(_) => {
                siblings.extend((0..directions.len()).map(empty_digest));
            }
        }
    }
}

/// Tamper-evident key-value store with membership and absence witnesses.
#[derive(Clone, Debug, Default)]
pub struct AuthenticatedMap {
    root: Node,
    /// Number of nonzero leaves.
    len: usize,
}

impl AuthenticatedMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root of a map with no nonzero leaves.
    #[must_use]
    pub fn empty_root() -> Root {
        Root::from(empty_digest(MAP_DEPTH))
    }

    /// The current commitment to every leaf.
    #[must_use]
    pub fn root(&self) -> Root {
        Root::from(self.root.digest(MAP_DEPTH))
    }

    /// Number of keys holding a nonzero value.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether every leaf is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The value at `key`, zero when absent.
    #[must_use]
    pub fn get(&self, key: Fp) -> Fp {
        self.root.get(&path(key))
    }

    /// Set the leaf at `key` to `value` and recompute the root.
    ///
    /// Returns the previous value. Setting zero removes the key.
    pub fn set(&mut self, key: Fp, value: Fp) -> Fp {
        let previous = self.root.set(&path(key), value);
        match (bool::from(previous.is_zero()), bool::from(value.is_zero())) {
            (true, false) => self.len += 1,
            (false, true) => self.len -= 1,
            (true, true) | (false, false) => {}
        }
        previous
    }

    /// A witness for the leaf at `key` against the current root.
    ///
    /// Valid for membership (nonzero leaf) and absence (zero leaf) alike.
    #[must_use]
    pub fn witness(&self, key: Fp) -> Witness {
        let mut siblings = Vec::with_capacity(MAP_DEPTH);
        self.root.witness(&path(key), &mut siblings);
        Witness::new(key, siblings)
    }
}
