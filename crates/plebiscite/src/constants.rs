//! Protocol-wide domain separators and sizes.
//!
//! All BLAKE2b personalizations are exactly 16 bytes (the BLAKE2b personal
//! field width). Every hash into $\mathbb{F}_p$ is BLAKE2b-512 reduced with
//! `FromUniformBytes`, so outputs are unbiased.

use ff::FromUniformBytes as _;
use pasta_curves::Fp;

/// BLAKE2b-512 personalization for interior nodes of the authenticated map.
pub const NODE_PERSONALIZATION: &[u8; 16] = b"Plebiscite_Node_";

/// BLAKE2b-512 personalization for nullifier derivation.
///
/// $$\mathsf{nf} = \text{ToBase}(\text{BLAKE2b-512}(\text{"Plebiscite\_Nullf"},\;
///   \mathsf{pk} \| \mathsf{electionId}))$$
pub const NULLIFIER_PERSONALIZATION: &[u8; 16] = b"Plebiscite_Nullf";

/// BLAKE2b-512 personalization for the voter registry index
/// ($H(\mathsf{pk})$).
pub const VOTER_INDEX_PERSONALIZATION: &[u8; 16] = b"Plebiscite_Voter";

/// BLAKE2b-512 personalization for the registry leaf committing to a voter
/// record.
pub const RECORD_PERSONALIZATION: &[u8; 16] = b"Plebiscite_Recrd";

/// BLAKE2b-512 personalization for the ballot signing message.
///
/// A voter signs exactly `(candidateId, electionId, voterDataRoot)`:
///
/// $$\text{msg} = \text{BLAKE2b-512}(\text{"Plebiscite\_Ballt"},\;
///   \mathsf{candidateId} \| \mathsf{electionId} \| \mathsf{voterDataRoot})$$
pub const BALLOT_PERSONALIZATION: &[u8; 16] = b"Plebiscite_Ballt";

/// BLAKE2b-512 personalization for deterministic voter key generation.
pub const KEYGEN_PERSONALIZATION: &[u8; 16] = b"Plebiscite_KeyGn";

/// Number of key bits, and therefore the depth of the authenticated map.
pub const MAP_DEPTH: usize = 255;

/// Votes per batch when the configuration does not say otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// A hash domain into $\mathbb{F}_p$.
///
/// Inputs are fixed 32-byte encodings absorbed in order, so distinct
/// tuples never collide by concatenation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Domain {
    personalization: &'static [u8; 16],
}

impl Domain {
    /// Interior map nodes: `H(left || right)`.
    pub(crate) const NODE: Self = Self {
        personalization: NODE_PERSONALIZATION,
    };
    /// `H(pk || electionId)`.
    pub(crate) const NULLIFIER: Self = Self {
        personalization: NULLIFIER_PERSONALIZATION,
    };
    /// `H(pk)`.
    pub(crate) const VOTER_INDEX: Self = Self {
        personalization: VOTER_INDEX_PERSONALIZATION,
    };
    /// `H(pk || weight)`.
    pub(crate) const RECORD: Self = Self {
        personalization: RECORD_PERSONALIZATION,
    };

    /// Hash `inputs` into the base field.
    pub(crate) fn hash(self, inputs: &[[u8; 32]]) -> Fp {
        let mut state = blake2b_simd::Params::new()
            .hash_length(64)
            .personal(self.personalization)
            .to_state();
        for input in inputs {
            state.update(input);
        }
        Fp::from_uniform_bytes(state.finalize().as_array())
    }
}
