use mock_pcd::{Header, Suffix};
use pasta_curves::Fp;

use crate::transition::BatchTransition;

impl Header for BatchTransition {
    const SUFFIX: Suffix = Suffix::new(0);

    /// `(election, voter_root, nf_before, nf_after, N, tally_before, N, tally_after)`
    ///
    /// Each tally is length-prefixed so no two transitions share an
    /// encoding.
    fn encode(&self) -> Vec<Fp> {
        let mut elements = Vec::with_capacity(6 + self.before.tally.len() + self.after.tally.len());
        elements.push(self.election.into());
        elements.push(self.voter_root.into());
        elements.push(self.before.nullifier_root.into());
        elements.push(self.after.nullifier_root.into());
        for tally in [&self.before.tally, &self.after.tally] {
            elements.push(Fp::from(u64::try_from(tally.len()).unwrap_or(u64::MAX)));
            elements.extend(tally.iter().copied().map(Fp::from));
        }
        elements
    }
}
