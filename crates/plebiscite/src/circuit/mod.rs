//! Vote aggregation steps for the PCD proving system.
//!
//! Batches of votes fold into a single linear PCD chain:
//!
//! - **[`BaseCase`]** (Index 0): the first batch, starting from genesis
//! - **[`Next`]** (Index 1): every later batch, continuing a prior proof
//!
//! ## PCD Chain
//!
//! ```text
//!  BaseCase ──> Next ──> Next ──> ... ──> Next     <-- head certificate
//!  (batch_0)   (batch_1) (batch_2)        (batch_n)
//! ```
//!
//! Each proof attests to its own
//! [`BatchTransition`](crate::transition::BatchTransition) and, through
//! [`Application::fuse`](mock_pcd::Application::fuse), to the proof before
//! it. Proof size does not grow with the chain.
//!
//! ## Header: [`BatchTransition`](crate::transition::BatchTransition)
//!
//! | Field            | Elements | Description |
//! |------------------|----------|-------------|
//! | `election`       | 1        | election id |
//! | `voter_root`     | 1        | frozen registry root |
//! | `before.nullifier_root`, `after.nullifier_root` | 2 | nullifier set roots |
//! | `before.tally`   | 1 + N    | length-prefixed counts before the batch |
//! | `after.tally`    | 1 + N    | length-prefixed counts after the batch |
//!
//! ## Constraints (per vote)
//!
//! 1. Signature over `(candidate, election, voter_root)`
//! 2. Eligibility: registry witness opens $H(\mathsf{pk})$ to the voter's
//!    record leaf under `voter_root`
//! 3. Election id matches the header
//! 4. Candidate id below N
//! 5. Nullifier witness opens $\mathsf{nf}$ to zero under the running root;
//!    the running root becomes the same witness folded over 1
//!
//! After all votes: `after.tally = before.tally + increment` and
//! `after.nullifier_root` is the final running root.

use mock_pcd::{Application, ApplicationBuilder, Params, PcdError};

use crate::config::Election;

mod header;
mod step;
mod witnesses;

pub use witnesses::{BatchWitness, VoteWitness};

pub(crate) use step::{BaseCase, Next, Shape};

/// Builds the vote aggregation PCD application.
#[derive(Debug)]
pub struct VoteApp;

impl VoteApp {
    /// Registers [`BaseCase`] (0) and [`Next`] (1).
    pub fn build(params: &Params) -> Result<Application, PcdError> {
        Ok(ApplicationBuilder::new()
            .register::<BaseCase>()?
            .register::<Next>()?
            .finalize(params))
    }

    /// The step pair for `election`.
    pub(crate) fn steps(election: &Election) -> (BaseCase, Next) {
        let shape = Shape::of(election);
        (BaseCase { shape }, Next { shape })
    }
}
