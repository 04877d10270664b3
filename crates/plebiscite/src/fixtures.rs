//! Shared test fixtures.

use mock_pcd::Params;
use rand::{CryptoRng, RngCore};

use crate::{
    aggregator::Aggregator,
    config::{Election, ElectionConfig},
    keys::private::VoterSigningKey,
    registry::VoterRegistry,
    vote::Vote,
};

pub(crate) struct Fixture {
    pub(crate) election: Election,
    pub(crate) registry: VoterRegistry,
    pub(crate) voters: Vec<VoterSigningKey>,
    pub(crate) params: Params,
}

impl Fixture {
    /// Election 123456 with `candidates` candidates, batches of
    /// `batch_size`, and `voters` registered voters seeded `1..=voters`.
    pub(crate) fn new(candidates: usize, batch_size: usize, voters: u8) -> Self {
        let mut config = ElectionConfig::new(
            123_456,
            "fixture",
            (0..candidates).map(|idx| format!("candidate {idx}")).collect(),
        );
        config.batch_size = batch_size;
        let election = config.open().unwrap();
        let voters: Vec<_> = (1..=voters)
            .map(|seed| VoterSigningKey::from_seed([seed; 32]))
            .collect();
        let registry = VoterRegistry::from_keys(voters.iter().map(VoterSigningKey::public)).unwrap();
        Self {
            election,
            registry,
            voters,
            params: Params::from_seed([0x5a; 32]),
        }
    }

    /// A valid vote by voter `voter` (zero-based) for `candidate`.
    pub(crate) fn vote(&self, voter: usize, candidate: u32, rng: &mut (impl RngCore + CryptoRng)) -> Vote {
        Vote::construct(
            &self.voters[voter],
            self.election.id(),
            candidate,
            self.registry.root(),
            rng,
        )
    }

    pub(crate) fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.election, &self.registry, &self.params).unwrap()
    }
}
