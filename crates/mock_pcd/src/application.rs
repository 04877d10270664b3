use ff::PrimeField as _;
use rand_core::{CryptoRng, RngCore};

use crate::{
    PcdError,
    header::Header,
    proof::{Pcd, Proof},
    step::{Index, Step},
};

/// BLAKE2b-512 personalization for the proof MAC.
const PROOF_PERSONALIZATION: &[u8; 16] = b"mock_pcd__Proof_";

/// Public parameters of the mock proof system.
///
/// For the mock these are a secret MAC key shared by prover and verifier.
#[derive(Clone, Debug)]
pub struct Params {
    key: [u8; 32],
}

impl Params {
    /// Sample fresh parameters.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        Self { key }
    }

    /// Deterministic parameters for reproducible tests.
    #[must_use]
    pub const fn from_seed(key: [u8; 32]) -> Self {
        Self { key }
    }
}

/// Collects the steps of an application before it is finalized.
#[derive(Clone, Debug, Default)]
pub struct ApplicationBuilder {
    steps: Vec<Index>,
}

impl ApplicationBuilder {
    /// Start an empty application.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Register step `S`. Indices must be unique.
    pub fn register<S: Step>(mut self) -> crate::Result<Self> {
        if self.steps.contains(&S::INDEX) {
            return Err(PcdError::DuplicateStep(S::INDEX.value()));
        }
        self.steps.push(S::INDEX);
        Ok(self)
    }

    /// Bind the registered steps to `params`.
    #[must_use]
    pub fn finalize(self, params: &Params) -> Application {
        Application {
            steps: self.steps,
            verifier: Verifier {
                key: params.key,
            },
        }
    }
}

/// A finalized PCD application: proves registered steps.
#[derive(Clone, Debug)]
pub struct Application {
    steps: Vec<Index>,
    verifier: Verifier,
}

impl Application {
    /// Run a step with no predecessor and prove its output header.
    pub fn seed<S>(
        &self,
        step: &S,
        witness: S::Witness,
    ) -> Result<(Pcd<S::Output>, S::Aux), S::Error>
    where
        S: Step<Left = ()>,
    {
        self.ensure_registered::<S>()?;
        let (data, aux) = step.witness(witness, &())?;
        let proof = self.verifier.prove(&data);
        Ok((Pcd { proof, data }, aux))
    }

    /// Verify `left`, run a step against its header, and prove the output.
    ///
    /// The resulting proof attests to the output header and, transitively,
    /// to every proof before it.
    pub fn fuse<S: Step>(
        &self,
        step: &S,
        witness: S::Witness,
        left: &Pcd<S::Left>,
    ) -> Result<(Pcd<S::Output>, S::Aux), S::Error> {
        self.ensure_registered::<S>()?;
        if !self.verifier.verify(left) {
            return Err(PcdError::InvalidProof.into());
        }
        let (data, aux) = step.witness(witness, &left.data)?;
        let proof = self.verifier.prove(&data);
        Ok((Pcd { proof, data }, aux))
    }

    /// Verify proof-carrying data produced by this application.
    #[must_use]
    pub fn verify<H: Header>(&self, pcd: &Pcd<H>) -> bool {
        self.verifier.verify(pcd)
    }

    /// A standalone verifier for this application's proofs.
    #[must_use]
    pub fn verifier(&self) -> Verifier {
        self.verifier.clone()
    }

    fn ensure_registered<S: Step>(&self) -> crate::Result<()> {
        if self.steps.contains(&S::INDEX) {
            Ok(())
        } else {
            Err(PcdError::UnregisteredStep(S::INDEX.value()))
        }
    }
}

/// Verifies proofs in constant time regardless of chain length.
#[derive(Clone, Debug)]
pub struct Verifier {
    key: [u8; 32],
}

impl Verifier {
    /// Check `pcd.proof` against `pcd.data`.
    #[must_use]
    pub fn verify<H: Header>(&self, pcd: &Pcd<H>) -> bool {
        self.prove(&pcd.data) == pcd.proof
    }

    /// `BLAKE2b-512(key, "mock_pcd__Proof_", suffix || len || encode(header))`
    fn prove<H: Header>(&self, header: &H) -> Proof {
        let elements = header.encode();
        let len = u64::try_from(elements.len()).unwrap_or(u64::MAX);

        let mut state = blake2b_simd::Params::new()
            .hash_length(64)
            .key(&self.key)
            .personal(PROOF_PERSONALIZATION)
            .to_state();
        state.update(&H::SUFFIX.value().to_le_bytes());
        state.update(&len.to_le_bytes());
        for element in &elements {
            state.update(&element.to_repr());
        }
        Proof(*state.finalize().as_array())
    }
}

#[cfg(test)]
mod tests {
    use pasta_curves::Fp;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::header::Suffix;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Counter(u64);

    impl Header for Counter {
        const SUFFIX: Suffix = Suffix::new(7);

        fn encode(&self) -> Vec<Fp> {
            vec![Fp::from(self.0)]
        }
    }

    struct Start;

    impl Step for Start {
        const INDEX: Index = Index::new(0);
        type Witness = u64;
        type Aux = ();
        type Left = ();
        type Output = Counter;
        type Error = PcdError;

        fn witness(&self, witness: u64, _left: &()) -> Result<(Counter, ()), PcdError> {
            Ok((Counter(witness), ()))
        }
    }

    struct Increment;

    impl Step for Increment {
        const INDEX: Index = Index::new(1);
        type Witness = u64;
        type Aux = u64;
        type Left = Counter;
        type Output = Counter;
        type Error = PcdError;

        fn witness(&self, witness: u64, left: &Counter) -> Result<(Counter, u64), PcdError> {
            if witness == 0 {
                return Err(PcdError::Unsatisfied {
                    step: 1,
                    reason: "increment must be nonzero",
                });
            }
            Ok((Counter(left.0 + witness), left.0))
        }
    }

    fn app() -> Application {
        ApplicationBuilder::new()
            .register::<Start>()
            .unwrap()
            .register::<Increment>()
            .unwrap()
            .finalize(&Params::from_seed([0x11; 32]))
    }

    /// A chain of fused proofs verifies at every link and the proof size
    /// does not grow.
    #[test]
    fn seed_then_fuse_chain_verifies() {
        let app = app();
        let (mut pcd, ()) = app.seed(&Start, 5).unwrap();
        assert!(app.verify(&pcd));

        for step in 1u64..=4 {
            let (next, previous) = app.fuse(&Increment, step, &pcd).unwrap();
            assert_eq!(previous, pcd.data.0);
            assert!(app.verify(&next));
            pcd = next;
        }
        assert_eq!(pcd.data, Counter(15));
    }

    /// Changing the header after proving invalidates the proof.
    #[test]
    fn tampered_header_fails() {
        let app = app();
        let (mut pcd, ()) = app.seed(&Start, 5).unwrap();
        pcd.data = Counter(6);
        assert!(!app.verify(&pcd));
    }

    /// Fusing onto a forged predecessor is refused before the step runs.
    #[test]
    fn fuse_rejects_forged_left() {
        let app = app();
        let forged = Pcd {
            proof: Proof::from([0u8; 64]),
            data: Counter(100),
        };
        assert_eq!(
            app.fuse(&Increment, 1, &forged).unwrap_err(),
            PcdError::InvalidProof
        );
    }

    /// An unsatisfied step produces no proof.
    #[test]
    fn unsatisfied_step_produces_nothing() {
        let app = app();
        let (pcd, ()) = app.seed(&Start, 5).unwrap();
        assert!(matches!(
            app.fuse(&Increment, 0, &pcd),
            Err(PcdError::Unsatisfied { step: 1, .. })
        ));
    }

    /// Proofs from one parameter set do not verify under another.
    #[test]
    fn params_are_bound() {
        let mut rng = StdRng::seed_from_u64(0);
        let other = ApplicationBuilder::new()
            .register::<Start>()
            .unwrap()
            .finalize(&Params::random(&mut rng));
        let (pcd, ()) = app().seed(&Start, 5).unwrap();
        assert!(!other.verify(&pcd));
        assert!(app().verifier().verify(&pcd));
    }

    #[test]
    fn unregistered_and_duplicate_steps() {
        let only_start = ApplicationBuilder::new()
            .register::<Start>()
            .unwrap()
            .finalize(&Params::from_seed([0; 32]));
        let (pcd, ()) = only_start.seed(&Start, 1).unwrap();
        assert_eq!(
            only_start.fuse(&Increment, 1, &pcd).unwrap_err(),
            PcdError::UnregisteredStep(1)
        );

        let dup = ApplicationBuilder::new()
            .register::<Start>()
            .unwrap()
            .register::<Start>();
        assert_eq!(dup.unwrap_err(), PcdError::DuplicateStep(0));
    }
}
