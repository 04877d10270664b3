use crate::{PcdError, header::Header};

/// Position of a step within an application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Index(u32);

impl Index {
    /// Create a step index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw index value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// One kind of transition in a PCD application.
///
/// A step checks its constraints natively over a private witness and the
/// header of its predecessor (`()` for seed steps), and returns the output
/// header it attests to together with auxiliary prover-side data.
///
/// Constraint failures are reported through [`Step::Error`]; the application
/// never attaches a proof to a header whose step failed.
pub trait Step {
    /// Step index, unique within an application.
    const INDEX: Index;

    /// Private witness consumed by the step.
    type Witness;
    /// Prover-side data returned alongside the proof.
    type Aux;
    /// Header of the predecessor proof, `()` for seed steps.
    type Left: Header;
    /// Header this step attests to.
    type Output: Header;
    /// Constraint failure, or a failure of the underlying application.
    type Error: From<PcdError>;

    /// Check the constraints and compute the output header.
    fn witness(
        &self,
        witness: Self::Witness,
        left: &Self::Left,
    ) -> Result<(Self::Output, Self::Aux), Self::Error>;
}
