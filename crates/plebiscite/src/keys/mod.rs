//! ## Voter Keys
//!
//! Every registered voter holds one RedPallas keypair over the `SpendAuth`
//! group. There is no derivation hierarchy and no per-vote randomization:
//! the same key signs the voter's ballot in any election, and the public
//! key is the voter's identity in the registry and in nullifier derivation.
//!
//! ```mermaid
//! flowchart TB
//!     seed["seed (32 bytes)"]
//!     sk[VoterSigningKey]
//!     pk[VoterKey]
//!     idx["VoterIndex H(pk)"]
//!     nf["Nullifier H(pk || electionId)"]
//!     sig[BallotSignature]
//!     seed -- from_seed --> sk
//!     sk -- public --> pk
//!     pk --> idx & nf
//!     sk -- "sign(sighash)" --> sig
//! ```
//!
//! ### Private keys ([`private`])
//!
//! - `sk`: signs ballots
//!
//! ### Public keys ([`public`])
//!
//! - `pk`: verifies ballots, indexes the registry, seeds the nullifier

pub mod private;
pub mod public;

mod signature;

// Re-exports: public API surface.
pub use signature::BallotSignature;
