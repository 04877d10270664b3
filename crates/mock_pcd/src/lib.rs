//! # mock_pcd
//!
//! A BLAKE2b-based mock of a proof-carrying data (PCD) proof system.
//!
//! A PCD application is a set of registered [`Step`]s. Each step consumes a
//! private witness and (optionally) the [`Header`] of one prior proof, checks
//! its constraints natively, and produces an output header. The application
//! then attaches a constant-size [`Proof`] to the output header:
//!
//! - [`Application::seed`] runs a step with no predecessor.
//! - [`Application::fuse`] verifies the predecessor's proof first, then runs
//!   the step against its header. The result attests to both.
//! - [`Verifier::verify`] checks a proof against a header in constant time,
//!   regardless of how many steps precede it.
//!
//! ## Mock soundness
//!
//! A real PCD system binds the proof to the circuit by argument of knowledge.
//! This mock instead keys a BLAKE2b MAC with a secret held by the
//! [`Application`]: the only way to obtain a valid proof is to run a
//! registered step whose constraints were satisfied. The [`Verifier`] shares
//! the key, so it is only suitable for tests and demos in a single trust
//! domain.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::pub_use, reason = "exporting items for consumers")]

mod application;
mod header;
mod proof;
mod step;

pub use application::{Application, ApplicationBuilder, Params, Verifier};
pub use header::{Header, Suffix};
pub use proof::{PROOF_SIZE, Pcd, Proof};
pub use step::{Index, Step};

/// Errors raised while building or fusing proofs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PcdError {
    /// A step's constraints were not satisfied by its witness.
    #[error("step {step} unsatisfied: {reason}")]
    Unsatisfied {
        /// Index of the failing step.
        step: u32,
        /// What the step rejected.
        reason: &'static str,
    },

    /// A predecessor proof did not verify against its header.
    #[error("predecessor proof does not verify")]
    InvalidProof,

    /// The step was never registered with the application.
    #[error("step {0} is not registered")]
    UnregisteredStep(u32),

    /// Two registered steps share an index.
    #[error("step {0} registered twice")]
    DuplicateStep(u32),
}

/// Result alias for PCD operations.
pub type Result<T> = core::result::Result<T, PcdError>;
