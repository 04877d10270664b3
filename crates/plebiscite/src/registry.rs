//! The voter registry.
//!
//! Built once with a [`RegistryBuilder`] and frozen before voting opens.
//! Voters are indexed by $H(\mathsf{pk})$ in an [`AuthenticatedMap`]; each
//! leaf commits to the voter's [`VoterRecord`]. The frozen root is the
//! constant `voterDataRoot` that every ballot signs and every certificate
//! carries.

use std::collections::BTreeMap;

use ff::PrimeField as _;
use pasta_curves::Fp;
use tracing::debug;

use crate::{
    constants::Domain,
    error::RegistryError,
    keys::public::VoterKey,
    map::{AuthenticatedMap, Witness},
    primitives::Root,
};

/// A voter's registry key: $H(\text{"Plebiscite\_Voter"},\; \mathsf{pk})$.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoterIndex(Fp);

impl From<Fp> for VoterIndex {
    fn from(fp: Fp) -> Self {
        Self(fp)
    }
}

impl From<VoterIndex> for Fp {
    fn from(index: VoterIndex) -> Self {
        index.0
    }
}

/// What the registry stores about one voter.
///
/// The weight is committed to but not applied to tallies: every vote counts
/// once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoterRecord {
    /// The voter's public key.
    pub key: VoterKey,
    /// Voting weight, default 1.
    pub weight: u64,
}

impl VoterRecord {
    /// A record with weight 1.
    #[must_use]
    pub const fn new(key: VoterKey) -> Self {
        Self { key, weight: 1 }
    }

    /// A record with an explicit weight.
    #[must_use]
    pub const fn weighted(key: VoterKey, weight: u64) -> Self {
        Self { key, weight }
    }

    /// Registry key of this record.
    #[must_use]
    pub fn index(&self) -> VoterIndex {
        self.key.index()
    }

    /// Leaf value: $H(\text{"Plebiscite\_Recrd"},\; \mathsf{pk} \| \mathsf{weight})$.
    ///
    /// Never zero except with negligible probability, so a registered voter
    /// is always distinguishable from an absent one.
    #[must_use]
    pub fn leaf(&self) -> Fp {
        self.key
            .hash_with(Domain::RECORD, &[Fp::from(self.weight).to_repr()])
    }
}

/// Collects voter records before the registry is frozen.
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    map: AuthenticatedMap,
    records: BTreeMap<[u8; 32], VoterRecord>,
}

impl RegistryBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one voter. Keys must be unique.
    pub fn insert(&mut self, record: VoterRecord) -> Result<(), RegistryError> {
        let bytes = record.key.to_bytes();
        if self.records.contains_key(&bytes) {
            return Err(RegistryError::DuplicateVoter);
        }
        self.map.set(record.index().into(), record.leaf());
        self.records.insert(bytes, record);
        Ok(())
    }

    /// Register one voter, builder-style.
    pub fn with(mut self, record: VoterRecord) -> Result<Self, RegistryError> {
        self.insert(record)?;
        Ok(self)
    }

    /// Freeze the registry. Its root is fixed from here on.
    #[must_use]
    pub fn freeze(self) -> VoterRegistry {
        let registry = VoterRegistry {
            map: self.map,
            records: self.records,
        };
        debug!(voters = registry.len(), root = ?registry.root(), "voter registry frozen");
        registry
    }
}

/// The frozen voter registry.
///
/// Read-only: there is no way to add or remove voters once frozen.
#[derive(Clone, Debug)]
pub struct VoterRegistry {
    map: AuthenticatedMap,
    records: BTreeMap<[u8; 32], VoterRecord>,
}

impl VoterRegistry {
    /// Register every key with weight 1 and freeze.
    pub fn from_keys(keys: impl IntoIterator<Item = VoterKey>) -> Result<Self, RegistryError> {
        keys.into_iter()
            .try_fold(RegistryBuilder::new(), |builder, key| {
                builder.with(VoterRecord::new(key))
            })
            .map(RegistryBuilder::freeze)
    }

    /// The constant `voterDataRoot`.
    #[must_use]
    pub fn root(&self) -> Root {
        self.map.root()
    }

    /// The record registered for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &VoterKey) -> Option<&VoterRecord> {
        self.records.get(&key.to_bytes())
    }

    /// Every registered record, in public-key byte order.
    ///
    /// This is the published form of the registry: a voter finds their own
    /// record here and checks it against [`root`](Self::root) with
    /// [`witness`](Self::witness).
    pub fn records(&self) -> impl Iterator<Item = &VoterRecord> {
        self.records.values()
    }

    /// Eligibility witness for `key` against [`root`](Self::root).
    #[must_use]
    pub fn witness(&self, key: &VoterKey) -> Witness {
        self.map.witness(key.index().into())
    }

    /// Number of registered voters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no voter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
