//! Error types.
//!
//! Vote-level failures ([`VoteError`]) are cheap to detect and are meant to
//! be caught before a vote reaches a batch. Batch construction failures
//! ([`AggregateError`]) abort the whole attempt and leave the aggregator
//! untouched. Settlement failures ([`SettlementError`]) reject the
//! certificate with no state change.

use mock_pcd::PcdError;
use thiserror::Error;

use crate::config::Window;

/// Why a single vote is unacceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum VoteError {
    /// The voter is not in the registry, or the vote was signed against a
    /// different registry root.
    #[error("voter is not eligible under the frozen registry root")]
    Eligibility,

    /// The ballot signature does not cover this vote.
    #[error("ballot signature does not verify")]
    Signature,

    /// The voter's nullifier is already spent.
    #[error("voter has already voted in this election")]
    Replay,

    /// The vote names another election.
    #[error("vote targets a different election")]
    ElectionMismatch,

    /// The candidate id is not below the candidate count.
    #[error("candidate {candidate} out of range for {candidates} candidates")]
    CandidateOutOfRange {
        /// The selected candidate id.
        candidate: u32,
        /// Number of candidates in the election.
        candidates: usize,
    },
}

/// Errors building the voter registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The same public key was registered twice.
    #[error("voter registered twice")]
    DuplicateVoter,
}

/// Why the vote pool refused a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool no longer accepts votes.
    #[error("pool is closed")]
    Closed,

    /// A vote with the same nullifier is already pending.
    #[error("a vote from this voter is already pending")]
    Duplicate,

    /// The vote failed pre-batch validation.
    #[error("invalid vote: {0}")]
    Invalid(#[from] VoteError),
}

/// Why a batch could not be proven.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A vote in the batch failed its checks.
    #[error("vote {index} rejected: {source}")]
    Vote {
        /// Position of the vote within the batch.
        index: usize,
        /// What was wrong with it.
        source: VoteError,
    },

    /// The transition does not continue from the prior certificate.
    #[error("transition does not continue from the prior certificate")]
    ChainMismatch,

    /// A base case must start from zero tally and the empty nullifier root.
    #[error("base case does not start from genesis")]
    NotGenesis,

    /// The transition does not start from the aggregator's current state.
    #[error("transition does not start from the aggregator's head")]
    Detached,

    /// The claimed after-tally is not the before-tally plus the batch.
    #[error("after-tally does not match the votes")]
    TallyMismatch,

    /// The claimed after-root is not the root after spending the batch.
    #[error("after nullifier root does not match the votes")]
    NullifierRootMismatch,

    /// The batch does not hold exactly the configured number of votes.
    #[error("batch holds {actual} votes, expected {expected}")]
    BatchSize {
        /// Configured batch size.
        expected: usize,
        /// Votes supplied.
        actual: usize,
    },

    /// A candidate count exceeded `u64::MAX`.
    #[error("tally overflow")]
    Overflow,

    /// The proof system refused the step.
    #[error("proof system: {0}")]
    Proof(#[from] PcdError),
}

/// Why the ledger rejected a certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The certificate's before-state is not the settled state.
    #[error("certificate does not start from the settled state")]
    StaleState,

    /// The certificate is for another election.
    #[error("certificate is for a different election")]
    ElectionMismatch,

    /// The certificate was built against another voter registry.
    #[error("certificate uses a different voter registry")]
    VoterRootMismatch,

    /// The proof does not verify.
    #[error("certificate proof does not verify")]
    InvalidCertificate,

    /// Voting has not closed yet at this height.
    #[error("voting still open at height {height}, closes at {closes}")]
    VotingOpen {
        /// Height supplied by the caller.
        height: u32,
        /// Last height of the election window.
        closes: u32,
    },

    /// The sequence height is outside the permitted window.
    #[error("height {height} outside window {window}")]
    OutsideWindow {
        /// Height supplied by the caller.
        height: u32,
        /// The window it had to fall in.
        window: Window,
    },
}

/// Invalid election configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An election needs at least one candidate.
    #[error("election has no candidates")]
    NoCandidates,

    /// Batches must hold at least one vote.
    #[error("batch size must be nonzero")]
    ZeroBatchSize,

    /// A window ends before it starts.
    #[error("window {0} ends before it starts")]
    InvertedWindow(Window),

    /// Challenges may only open once voting has closed.
    #[error("challenge window {challenge} opens before voting window {election} closes")]
    ChallengeOverlapsElection {
        /// Voting window.
        election: Window,
        /// Challenge window.
        challenge: Window,
    },

    /// More candidates than a candidate id can address.
    #[error("{0} candidates exceed the addressable range")]
    TooManyCandidates(usize),
}
