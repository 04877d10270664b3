//! Aggregate certificates.
//!
//! A certificate is proof-carrying data over a [`BatchTransition`]: the
//! public transition plus a constant-size proof that some chain of valid
//! batches leads from genesis to its `after` state.

use mock_pcd::{Pcd, Proof, Verifier};

use crate::transition::BatchTransition;

/// Something whose public statement can be checked by a proof verifier.
///
/// Implemented by [`AggregateCertificate`]; the ledger and the aggregator's
/// recursive step rely only on this capability.
pub trait Verifiable {
    /// The public statement the proof attests to.
    type Statement;

    /// The attested statement.
    fn statement(&self) -> &Self::Statement;

    /// Whether the proof verifies against [`statement`](Self::statement).
    fn verify(&self, verifier: &Verifier) -> bool;
}

/// A proven [`BatchTransition`].
///
/// Either a base certificate (its transition starts from genesis) or a
/// chained one. Both have the same size regardless of how many batches
/// precede them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateCertificate {
    pcd: Pcd<BatchTransition>,
}

impl AggregateCertificate {
    pub(crate) const fn new(pcd: Pcd<BatchTransition>) -> Self {
        Self { pcd }
    }

    /// The attested transition.
    #[must_use]
    pub const fn transition(&self) -> &BatchTransition {
        &self.pcd.data
    }

    /// The constant-size proof.
    #[must_use]
    pub const fn proof(&self) -> Proof {
        self.pcd.proof
    }

    /// Whether this certificate starts the chain.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.pcd.data.is_genesis()
    }

    pub(crate) const fn pcd(&self) -> &Pcd<BatchTransition> {
        &self.pcd
    }

    /// Reassemble a certificate from a transition and a proof, e.g. after
    /// transport. Nothing is checked until it is verified.
    #[must_use]
    pub const fn from_parts(transition: BatchTransition, proof: Proof) -> Self {
        Self {
            pcd: Pcd {
                proof,
                data: transition,
            },
        }
    }
}

impl Verifiable for AggregateCertificate {
    type Statement = BatchTransition;

    fn statement(&self) -> &BatchTransition {
        self.transition()
    }

    fn verify(&self, verifier: &Verifier) -> bool {
        verifier.verify(&self.pcd)
    }
}
