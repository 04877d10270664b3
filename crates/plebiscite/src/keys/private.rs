//! Private (signing) keys.

use ff::{Field as _, FromUniformBytes as _, PrimeField as _};
use pasta_curves::Fq;
use rand::{CryptoRng, RngCore};
use reddsa::orchard::SpendAuth;

use super::{public::VoterKey, signature::BallotSignature};
use crate::constants::KEYGEN_PERSONALIZATION;

/// A voter's ballot signing key.
#[derive(Clone, Copy, Debug)]
pub struct VoterSigningKey(reddsa::SigningKey<SpendAuth>);

impl VoterSigningKey {
    /// Sample a fresh key.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        Self(reddsa::SigningKey::new(rng))
    }

    /// Derive a key deterministically from 32 bytes of entropy.
    ///
    /// $\mathsf{sk} = \text{ToScalar}(\text{BLAKE2b-512}(\text{"Plebiscite\_KeyGn"},
    /// \text{seed}))$, reduced to $\mathbb{F}_q$ via `from_uniform_bytes`.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let hash = blake2b_simd::Params::new()
            .hash_length(64)
            .personal(KEYGEN_PERSONALIZATION)
            .hash(&seed);
        let scalar = Fq::from_uniform_bytes(hash.as_array());

        assert!(!bool::from(scalar.is_zero()), "sk should not be zero");
        #[expect(clippy::expect_used, reason = "nonzero scalar")]
        Self(
            reddsa::SigningKey::<SpendAuth>::try_from(scalar.to_repr())
                .expect("nonzero scalar is a valid signing key"),
        )
    }

    /// The voter's public key: `pk = [sk]G`.
    #[must_use]
    pub fn public(&self) -> VoterKey {
        // reddsa::VerificationKey::from(&signing_key) performs [sk]G
        // (scalar-times-basepoint), not a trivial type conversion.
        VoterKey(reddsa::VerificationKey::from(&self.0))
    }

    /// Sign `msg` with this key.
    pub fn sign(&self, rng: &mut (impl RngCore + CryptoRng), msg: &[u8]) -> BallotSignature {
        BallotSignature(self.0.sign(rng, msg))
    }
}
