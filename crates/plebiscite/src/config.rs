//! Election configuration.
//!
//! An [`ElectionConfig`] is plain data (deserializable with the `serde`
//! feature). [`ElectionConfig::open`] validates it once and freezes it into
//! an [`Election`], which the pool, aggregator and ledger share by
//! reference.

use core::fmt;

use tracing::info;

use crate::{constants::DEFAULT_BATCH_SIZE, error::ConfigError, primitives::ElectionId};

/// Inclusive interval `start..=end` over an external monotonic sequence
/// counter (e.g. block height).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    /// First height inside the window.
    pub start: u32,
    /// Last height inside the window.
    pub end: u32,
}

impl Window {
    /// Whether `height` lies in the window.
    #[must_use]
    pub const fn contains(&self, height: u32) -> bool {
        self.start <= height && height <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// When votes are accepted and when settled results may be challenged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VotingPeriod {
    /// Votes are accepted while the counter is in this window.
    pub election: Window,
    /// Certificates may be challenged while the counter is in this window.
    pub challenge: Window,
}

impl Default for VotingPeriod {
    fn default() -> Self {
        Self {
            election: Window { start: 0, end: 10 },
            challenge: Window { start: 10, end: 15 },
        }
    }
}

#[cfg(feature = "serde")]
const fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Unvalidated election parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElectionConfig {
    /// Unique election id.
    pub id: u64,
    /// Human-readable title.
    pub title: String,
    /// Candidate names; candidate ids index this list.
    pub candidates: Vec<String>,
    /// Votes per batch.
    #[cfg_attr(feature = "serde", serde(default = "default_batch_size"))]
    pub batch_size: usize,
    /// Voting and challenge windows.
    #[cfg_attr(feature = "serde", serde(default))]
    pub period: VotingPeriod,
}

impl ElectionConfig {
    /// A configuration with the default batch size and period.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            id,
            title: title.into(),
            candidates,
            batch_size: DEFAULT_BATCH_SIZE,
            period: VotingPeriod::default(),
        }
    }

    /// Check the configuration without consuming it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        if u32::try_from(self.candidates.len()).is_err() {
            return Err(ConfigError::TooManyCandidates(self.candidates.len()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        let VotingPeriod {
            election,
            challenge,
        } = self.period;
        for window in [election, challenge] {
            if window.start > window.end {
                return Err(ConfigError::InvertedWindow(window));
            }
        }
        if challenge.start < election.end {
            return Err(ConfigError::ChallengeOverlapsElection {
                election,
                challenge,
            });
        }
        Ok(())
    }

    /// Validate and freeze into an [`Election`].
    pub fn open(self) -> Result<Election, ConfigError> {
        self.validate()?;
        info!(
            id = self.id,
            title = %self.title,
            candidates = self.candidates.len(),
            batch_size = self.batch_size,
            "election opened"
        );
        Ok(Election {
            id: ElectionId::from(self.id),
            title: self.title,
            candidates: self.candidates,
            batch_size: self.batch_size,
            period: self.period,
        })
    }
}

/// A validated, immutable election.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Election {
    id: ElectionId,
    title: String,
    candidates: Vec<String>,
    batch_size: usize,
    period: VotingPeriod,
}

impl Election {
    /// The election id bound into every vote and nullifier.
    #[must_use]
    pub const fn id(&self) -> ElectionId {
        self.id
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Candidate names in id order.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// N, the length of every tally.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// k, the number of votes in every batch.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Voting and challenge windows.
    #[must_use]
    pub const fn period(&self) -> VotingPeriod {
        self.period
    }
}
