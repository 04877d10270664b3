//! # plebiscite
//!
//! Batched vote aggregation with recursive proofs.
//!
//! Voters sign a selection against a frozen registry root. An untrusted
//! aggregator collects signed votes, proves them in fixed-size batches, and
//! chains each batch proof onto the previous one, so a single constant-size
//! certificate attests to every vote counted so far. A settlement ledger
//! accepts certificates strictly in order and holds only the tally and the
//! nullifier root.
//!
//! - **Eligibility**: voters are leaves of a [`VoterRegistry`] whose root is
//!   fixed before voting starts
//! - **Replay protection**: each voter has one [`Nullifier`] per election;
//!   spent nullifiers live in a [`NullifierSet`]
//! - **Recursion**: [`Aggregator::base_case`] starts the chain from genesis,
//!   [`Aggregator::next`] extends it
//! - **Settlement**: [`SettlementLedger::verify_batch`] only accepts a
//!   certificate whose before-state is the settled state
//!
//! ## Flow
//!
//! ```text
//! Vote ──submit──▶ VotePool ──next_batch──▶ Aggregator ──prove_batch──▶ AggregateCertificate
//!                                                                          │
//!                                              SettlementLedger ◀──verify_batch
//! ```
//!
//! ## Nomenclature
//!
//! N is the number of candidates, k the number of votes per batch.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::pub_use, reason = "exporting items for consumers")]

pub mod aggregator;
pub mod certificate;
pub mod circuit;
pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod map;
pub mod nullifier;
pub mod pool;
pub mod registry;
pub mod transition;
pub mod vote;

mod primitives;

#[cfg(test)]
mod fixtures;

pub use aggregator::Aggregator;
pub use certificate::{AggregateCertificate, Verifiable};
pub use config::{Election, ElectionConfig, VotingPeriod, Window};
pub use error::{AggregateError, ConfigError, PoolError, RegistryError, SettlementError, VoteError};
pub use ledger::{Dispute, MemoryStore, SettlementLedger, SettlementState, StateStore};
pub use map::{AuthenticatedMap, Witness};
pub use nullifier::{Nullifier, NullifierSet};
pub use pool::VotePool;
pub use primitives::{ElectionId, Root};
pub use registry::{RegistryBuilder, VoterIndex, VoterRecord, VoterRegistry};
pub use transition::{BatchTransition, ElectionState, Tally};
pub use vote::Vote;
