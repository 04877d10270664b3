//! Signed votes.

use ff::PrimeField as _;
use pasta_curves::Fp;
use rand::{CryptoRng, RngCore};

use crate::{
    config::Election,
    constants::BALLOT_PERSONALIZATION,
    error::VoteError,
    keys::{BallotSignature, private::VoterSigningKey, public::VoterKey},
    nullifier::{Nullifier, NullifierSet},
    primitives::{ElectionId, Root},
    registry::VoterRegistry,
};

/// A voter's signed selection of one candidate.
///
/// ## Fields
///
/// - `voter`: the voter's public key
/// - `election`: the election voted in
/// - `candidate`: index into the election's candidate list
/// - `voter_root`: the registry root the voter signed against
/// - `sig`: signature over exactly `(candidate, election, voter_root)`
///
/// The aggregator learns the selection; only double voting is hidden behind
/// the nullifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vote {
    /// Voter public key $\mathsf{pk}$.
    pub voter: VoterKey,

    /// Target election id.
    pub election: ElectionId,

    /// Selected candidate, in `[0, N)`.
    pub candidate: u32,

    /// The frozen `voterDataRoot`.
    pub voter_root: Root,

    /// RedPallas signature over
    /// $H(\text{"Plebiscite\_Ballt"},\; \mathsf{candidate} \| \mathsf{electionId} \| \mathsf{voterDataRoot})$.
    pub sig: BallotSignature,
}

/// A BLAKE2b-512 hash of the ballot signing message.
#[derive(Clone, Copy, Debug)]
pub struct SigHash([u8; 64]);

impl AsRef<[u8]> for SigHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[expect(clippy::from_over_into, reason = "restrict conversion")]
impl Into<[u8; 64]> for SigHash {
    fn into(self) -> [u8; 64] {
        self.0
    }
}

/// Compute the ballot signing/verification message.
///
/// $$\text{msg} = H(\text{"Plebiscite\_Ballt"},\;
///   \mathsf{candidate} \| \mathsf{electionId} \| \mathsf{voterDataRoot})$$
///
/// Each item is absorbed as a 32-byte little-endian field element. Binding
/// the election id prevents cross-election replay; binding the registry
/// root pins the electorate the voter agreed to.
#[must_use]
pub fn ballot_sighash(candidate: u32, election: ElectionId, voter_root: Root) -> SigHash {
    let mut state = blake2b_simd::Params::new()
        .hash_length(64)
        .personal(BALLOT_PERSONALIZATION)
        .to_state();
    state.update(&Fp::from(u64::from(candidate)).to_repr());
    let election_bytes: [u8; 32] = election.into();
    state.update(&election_bytes);
    let root_bytes: [u8; 32] = voter_root.into();
    state.update(&root_bytes);
    SigHash(*state.finalize().as_array())
}

impl Vote {
    /// Sign a vote for `candidate`.
    pub fn construct<R: RngCore + CryptoRng>(
        sk: &VoterSigningKey,
        election: ElectionId,
        candidate: u32,
        voter_root: Root,
        rng: &mut R,
    ) -> Self {
        let sighash = ballot_sighash(candidate, election, voter_root);
        Self {
            voter: sk.public(),
            election,
            candidate,
            voter_root,
            sig: sk.sign(rng, sighash.as_ref()),
        }
    }

    /// The message this vote's signature must cover.
    /// See [`ballot_sighash`] for more details.
    #[must_use]
    pub fn sighash(&self) -> SigHash {
        ballot_sighash(self.candidate, self.election, self.voter_root)
    }

    /// Check the signature over `(candidate, election, voter_root)`.
    pub fn verify(&self) -> Result<(), VoteError> {
        self.voter
            .verify(self.sighash().as_ref(), &self.sig)
            .map_err(|_err| VoteError::Signature)
    }

    /// The voter's nullifier in this vote's election.
    #[must_use]
    pub fn nullifier(&self) -> Nullifier {
        Nullifier::derive(&self.voter, self.election)
    }

    /// Candidate id as a tally position.
    pub(crate) fn position(&self) -> usize {
        // u32 always fits usize on supported targets.
        usize::try_from(self.candidate).unwrap_or(usize::MAX)
    }

    /// Pre-batch validation against the frozen registry and the current
    /// nullifier set.
    ///
    /// Checks, in order: election id, candidate range, eligibility
    /// (registered voter, signed against the frozen root), signature, and
    /// that the nullifier is unspent. Everything a batch would reject is
    /// caught here without proving anything.
    pub fn validate(
        &self,
        election: &Election,
        registry: &VoterRegistry,
        nullifiers: &NullifierSet,
    ) -> Result<(), VoteError> {
        if self.election != election.id() {
            return Err(VoteError::ElectionMismatch);
        }
        if self.position() >= election.candidate_count() {
            return Err(VoteError::CandidateOutOfRange {
                candidate: self.candidate,
                candidates: election.candidate_count(),
            });
        }
        if self.voter_root != registry.root() || registry.get(&self.voter).is_none() {
            return Err(VoteError::Eligibility);
        }
        self.verify()?;
        if nullifiers.is_spent(self.nullifier()) {
            return Err(VoteError::Replay);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::config::ElectionConfig;

    struct Fixture {
        election: Election,
        registry: VoterRegistry,
        voters: Vec<VoterSigningKey>,
    }

    fn fixture() -> Fixture {
        let election = ElectionConfig::new(
            123_456,
            "fixture",
            (0..4).map(|idx| format!("c{idx}")).collect(),
        )
        .open()
        .unwrap();
        let voters: Vec<_> = (1u8..=3)
            .map(|seed| VoterSigningKey::from_seed([seed; 32]))
            .collect();
        let registry = VoterRegistry::from_keys(voters.iter().map(VoterSigningKey::public)).unwrap();
        Fixture {
            election,
            registry,
            voters,
        }
    }

    /// A vote's signature must verify against its own voter key.
    #[test]
    fn vote_sig_round_trip() {
        let mut rng = StdRng::seed_from_u64(0);
        let fx = fixture();
        let vote = Vote::construct(&fx.voters[0], fx.election.id(), 2, fx.registry.root(), &mut rng);
        vote.verify().unwrap();
        vote.validate(&fx.election, &fx.registry, &NullifierSet::new())
            .unwrap();
    }

    /// Changing the candidate after signing breaks the signature.
    #[test]
    fn tampered_candidate() {
        let mut rng = StdRng::seed_from_u64(0);
        let fx = fixture();
        let mut vote =
            Vote::construct(&fx.voters[0], fx.election.id(), 2, fx.registry.root(), &mut rng);
        vote.candidate = 3;
        assert_eq!(vote.verify(), Err(VoteError::Signature));
        assert_eq!(
            vote.validate(&fx.election, &fx.registry, &NullifierSet::new()),
            Err(VoteError::Signature)
        );
    }

    #[test]
    fn rejections() {
        let mut rng = StdRng::seed_from_u64(0);
        let fx = fixture();
        let root = fx.registry.root();
        let fresh = NullifierSet::new();

        let other_election = Vote::construct(&fx.voters[0], ElectionId::from(1u64), 0, root, &mut rng);
        assert_eq!(
            other_election.validate(&fx.election, &fx.registry, &fresh),
            Err(VoteError::ElectionMismatch)
        );

        let out_of_range = Vote::construct(&fx.voters[0], fx.election.id(), 4, root, &mut rng);
        assert_eq!(
            out_of_range.validate(&fx.election, &fx.registry, &fresh),
            Err(VoteError::CandidateOutOfRange {
                candidate: 4,
                candidates: 4
            })
        );

        let stranger = VoterSigningKey::from_seed([9u8; 32]);
        let ineligible = Vote::construct(&stranger, fx.election.id(), 0, root, &mut rng);
        assert_eq!(
            ineligible.validate(&fx.election, &fx.registry, &fresh),
            Err(VoteError::Eligibility)
        );

        let wrong_root = Vote::construct(
            &fx.voters[0],
            fx.election.id(),
            0,
            Root::from(Fp::from(5u64)),
            &mut rng,
        );
        assert_eq!(
            wrong_root.validate(&fx.election, &fx.registry, &fresh),
            Err(VoteError::Eligibility)
        );

        let vote = Vote::construct(&fx.voters[1], fx.election.id(), 1, root, &mut rng);
        let mut spent = NullifierSet::new();
        spent.spend(vote.nullifier()).unwrap();
        assert_eq!(
            vote.validate(&fx.election, &fx.registry, &spent),
            Err(VoteError::Replay)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        let fx = fixture();
        let vote = Vote::construct(&fx.voters[2], fx.election.id(), 3, fx.registry.root(), &mut rng);

        let json = serde_json::to_string(&vote).unwrap();
        let decoded: Vote = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, vote);
        decoded.verify().unwrap();
    }
}
