use pasta_curves::Fp;

/// Distinguishes header types that share an application.
///
/// Folded into every proof so that a proof for one header type never
/// verifies against another, even when the encodings coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Suffix(u32);

impl Suffix {
    /// Create a suffix.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw suffix value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Succinct public state carried through the PCD chain.
///
/// A header is the public input of a step: the verifier only ever sees
/// headers, never witnesses.
pub trait Header: Clone {
    /// Header type tag.
    const SUFFIX: Suffix;

    /// Encode the header as field elements, in a fixed order.
    fn encode(&self) -> Vec<Fp>;
}

/// The empty header, used as the predecessor of seed steps.
impl Header for () {
    const SUFFIX: Suffix = Suffix::new(u32::MAX);

    fn encode(&self) -> Vec<Fp> {
        Vec::new()
    }
}
