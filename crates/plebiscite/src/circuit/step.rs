// ═══════════════════════════════════════════════════════════════════════
// Base Case  (Index 0) and Next  (Index 1)
// ═══════════════════════════════════════════════════════════════════════

use ff::Field as _;
use mock_pcd::{Index, Step};
use pasta_curves::Fp;
use tracing::debug;

use super::witnesses::{BatchWitness, VoteWitness};
use crate::{
    config::Election,
    error::{AggregateError, VoteError},
    nullifier::Nullifier,
    primitives::Root,
    transition::{BatchTransition, ElectionState, Tally},
};

/// The dimensions every batch of one election shares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Shape {
    /// N, the tally width.
    pub candidates: usize,
    /// k, votes per batch.
    pub batch_size: usize,
}

impl Shape {
    pub(crate) fn of(election: &Election) -> Self {
        Self {
            candidates: election.candidate_count(),
            batch_size: election.batch_size(),
        }
    }
}

/// First step of the chain: one batch applied to the genesis state.
///
/// Given a [`BatchWitness`], the step:
///
/// 1. **Genesis**: `before` is the zero tally over N candidates and the empty
///    nullifier root.
/// 2. **Votes**: every per-vote constraint (see [`check_batch`]).
/// 3. **Tally**: `after.tally = before.tally + increment`.
/// 4. **Nullifiers**: `after.nullifier_root` is the running root after the
///    last vote.
///
/// Returns the spent nullifiers as auxiliary data, so the prover can update
/// its nullifier set only once the proof exists.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BaseCase {
    pub shape: Shape,
}

impl Step for BaseCase {
    const INDEX: Index = Index::new(0);

    type Witness = BatchWitness;
    type Aux = Vec<Nullifier>;
    type Left = ();
    type Output = BatchTransition;
    type Error = AggregateError;

    fn witness(
        &self,
        witness: BatchWitness,
        _left: &(),
    ) -> Result<(BatchTransition, Vec<Nullifier>), AggregateError> {
        if witness.transition.before != ElectionState::genesis(self.shape.candidates) {
            return Err(AggregateError::NotGenesis);
        }
        let spent = check_batch(self.shape, &witness.transition, &witness.votes)?;
        debug!(votes = spent.len(), "base case satisfied");
        Ok((witness.transition, spent))
    }
}

/// Every later step: one batch continuing the prior proof's transition.
///
/// The prior proof is verified by the proof system before this step runs.
/// The step then checks that the new transition continues the prior one
/// exactly (same election and registry, `before == prior.after`) and repeats
/// every [`BaseCase`] check except genesis.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Next {
    pub shape: Shape,
}

impl Step for Next {
    const INDEX: Index = Index::new(1);

    type Witness = BatchWitness;
    type Aux = Vec<Nullifier>;
    type Left = BatchTransition;
    type Output = BatchTransition;
    type Error = AggregateError;

    fn witness(
        &self,
        witness: BatchWitness,
        left: &BatchTransition,
    ) -> Result<(BatchTransition, Vec<Nullifier>), AggregateError> {
        if !witness.transition.follows(left) {
            return Err(AggregateError::ChainMismatch);
        }
        let spent = check_batch(self.shape, &witness.transition, &witness.votes)?;
        debug!(votes = spent.len(), "next step satisfied");
        Ok((witness.transition, spent))
    }
}

/// The constraints shared by both steps.
///
/// Walks the votes in order, threading the nullifier root
/// $\mathsf{root}_0 \to \dots \to \mathsf{root}_k$ and summing selections
/// into an increment vector, then checks the claimed after-state.
fn check_batch(
    shape: Shape,
    transition: &BatchTransition,
    votes: &[VoteWitness],
) -> Result<Vec<Nullifier>, AggregateError> {
    if votes.len() != shape.batch_size {
        return Err(AggregateError::BatchSize {
            expected: shape.batch_size,
            actual: votes.len(),
        });
    }
    if transition.before.tally.len() != shape.candidates {
        return Err(AggregateError::TallyMismatch);
    }

    let mut running = transition.before.nullifier_root;
    let mut increment = Tally::zero(shape.candidates);
    let mut spent = Vec::with_capacity(votes.len());

    for (index, witness) in votes.iter().enumerate() {
        let (nf, next_root) = check_vote(shape, transition, running, witness)
            .map_err(|source| AggregateError::Vote { index, source })?;
        increment.increment(witness.vote.position())?;
        running = next_root;
        spent.push(nf);
    }

    if transition.after.tally != transition.before.tally.checked_add(&increment)? {
        return Err(AggregateError::TallyMismatch);
    }
    if transition.after.nullifier_root != running {
        return Err(AggregateError::NullifierRootMismatch);
    }
    Ok(spent)
}

/// Per-vote constraints. Returns the vote's nullifier and the nullifier
/// root after spending it.
fn check_vote(
    shape: Shape,
    transition: &BatchTransition,
    running: Root,
    witness: &VoteWitness,
) -> Result<(Nullifier, Root), VoteError> {
    let vote = &witness.vote;

    // 1. signature
    vote.verify()?;

    // 2. eligibility
    let eligible = vote.voter_root == transition.voter_root
        && witness.record.key == vote.voter
        && witness.eligibility.key() == Fp::from(vote.voter.index())
        && witness
            .eligibility
            .verify(transition.voter_root, witness.record.leaf());
    if !eligible {
        return Err(VoteError::Eligibility);
    }

    // 3. election
    if vote.election != transition.election {
        return Err(VoteError::ElectionMismatch);
    }

    // 4. candidate
    if vote.position() >= shape.candidates {
        return Err(VoteError::CandidateOutOfRange {
            candidate: vote.candidate,
            candidates: shape.candidates,
        });
    }

    // 5. nullifier unspent under the running root
    let nf = vote.nullifier();
    if witness.nullifier.key() != Fp::from(nf) || !witness.nullifier.verify(running, Fp::ZERO) {
        return Err(VoteError::Replay);
    }
    Ok((nf, witness.nullifier.compute_root(Fp::ONE)))
}

#[cfg(test)]
mod tests {
    use ff::Field as _;
    use mock_pcd::Application;
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{
        circuit::VoteApp, fixtures::Fixture, map::AuthenticatedMap, nullifier::NullifierSet,
        primitives::ElectionId, vote::Vote,
    };

    fn app(fx: &Fixture) -> (Application, BaseCase, Next) {
        let (base, next) = VoteApp::steps(&fx.election);
        (VoteApp::build(&fx.params).unwrap(), base, next)
    }

    /// Honest witnesses for `votes`, each nullifier witness taken against
    /// `spent` as it stands when that vote is reached.
    fn witness(fx: &Fixture, votes: &[Vote], spent: &mut NullifierSet) -> Vec<VoteWitness> {
        votes
            .iter()
            .map(|vote| {
                let nf = vote.nullifier();
                let witness = VoteWitness {
                    vote: *vote,
                    record: *fx.registry.get(&vote.voter).unwrap(),
                    eligibility: fx.registry.witness(&vote.voter),
                    nullifier: spent.witness(nf),
                };
                spent.spend(nf).unwrap();
                witness
            })
            .collect()
    }

    /// The transition the witnesses claim, starting from `before`.
    fn claim(fx: &Fixture, before: ElectionState, votes: &[VoteWitness]) -> BatchTransition {
        let mut tally = before.tally.clone();
        for witness in votes {
            tally.increment(witness.vote.position()).unwrap();
        }
        let nullifier_root = votes.last().map_or(before.nullifier_root, |witness| {
            witness.nullifier.compute_root(Fp::ONE)
        });
        BatchTransition {
            election: fx.election.id(),
            voter_root: fx.registry.root(),
            before,
            after: ElectionState {
                nullifier_root,
                tally,
            },
        }
    }

    fn rejected(index: usize, source: VoteError) -> AggregateError {
        AggregateError::Vote { index, source }
    }

    #[test]
    fn honest_batch_seeds() {
        let mut rng = StdRng::seed_from_u64(0);
        let fx = Fixture::new(2, 2, 2);
        let (app, base, _next) = app(&fx);
        let votes = [fx.vote(0, 0, &mut rng), fx.vote(1, 1, &mut rng)];

        let witnesses = witness(&fx, &votes, &mut NullifierSet::new());
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let (pcd, spent) = app
            .seed(
                &base,
                BatchWitness {
                    transition: transition.clone(),
                    votes: witnesses,
                },
            )
            .unwrap();

        assert_eq!(pcd.data, transition);
        assert_eq!(spent, vec![votes[0].nullifier(), votes[1].nullifier()]);
        assert!(app.verify(&pcd));
    }

    /// Both nullifier witnesses taken against the empty root: the second no
    /// longer opens under the running root.
    #[test]
    fn stale_nullifier_witness() {
        let mut rng = StdRng::seed_from_u64(1);
        let fx = Fixture::new(2, 2, 2);
        let (app, base, _next) = app(&fx);
        let votes = [fx.vote(0, 0, &mut rng), fx.vote(1, 1, &mut rng)];

        let mut witnesses = witness(&fx, &votes, &mut NullifierSet::new());
        if let Some(second) = witnesses.get_mut(1) {
            second.nullifier = NullifierSet::new().witness(votes[1].nullifier());
        }
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition,
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, rejected(1, VoteError::Replay));
    }

    /// The same voter twice in one batch, each witness honest for its own
    /// position, still collides.
    #[test]
    fn double_vote_in_batch() {
        let mut rng = StdRng::seed_from_u64(2);
        let fx = Fixture::new(2, 2, 1);
        let (app, base, _next) = app(&fx);
        let vote = fx.vote(0, 0, &mut rng);

        let first = witness(&fx, &[vote], &mut NullifierSet::new());
        let mut witnesses = first.clone();
        witnesses.extend(first);
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition,
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, rejected(1, VoteError::Replay));
    }

    /// Eligibility witnesses or records belonging to another voter do not
    /// open the signer's leaf.
    #[test]
    fn forged_eligibility() {
        let mut rng = StdRng::seed_from_u64(3);
        let fx = Fixture::new(2, 1, 2);
        let (app, base, _next) = app(&fx);
        let vote = fx.vote(0, 1, &mut rng);
        let other = fx.voters[1].public();

        let mut witnesses = witness(&fx, &[vote], &mut NullifierSet::new());
        if let Some(first) = witnesses.first_mut() {
            first.eligibility = fx.registry.witness(&other);
        }
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition,
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, rejected(0, VoteError::Eligibility));

        let mut witnesses = witness(&fx, &[vote], &mut NullifierSet::new());
        if let Some(first) = witnesses.first_mut() {
            first.record = *fx.registry.get(&other).unwrap();
            first.eligibility = fx.registry.witness(&other);
        }
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition,
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, rejected(0, VoteError::Eligibility));
    }

    #[test]
    fn tampered_signature() {
        let mut rng = StdRng::seed_from_u64(4);
        let fx = Fixture::new(2, 1, 1);
        let (app, base, _next) = app(&fx);
        let mut vote = fx.vote(0, 0, &mut rng);
        vote.candidate = 1;

        let witnesses = witness(&fx, &[vote], &mut NullifierSet::new());
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition,
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, rejected(0, VoteError::Signature));
    }

    /// A correctly signed vote for another election.
    #[test]
    fn foreign_election() {
        let mut rng = StdRng::seed_from_u64(5);
        let fx = Fixture::new(2, 1, 1);
        let (app, base, _next) = app(&fx);
        let vote = Vote::construct(
            &fx.voters[0],
            ElectionId::from(999u64),
            0,
            fx.registry.root(),
            &mut rng,
        );

        let witnesses = witness(&fx, &[vote], &mut NullifierSet::new());
        let transition = claim(&fx, ElectionState::genesis(2), &witnesses);
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition,
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, rejected(0, VoteError::ElectionMismatch));
    }

    /// `Next` refuses a transition that does not start where its left
    /// header ends, even with a genuine left proof.
    #[test]
    fn next_requires_following() {
        let mut rng = StdRng::seed_from_u64(6);
        let fx = Fixture::new(2, 1, 2);
        let (app, base, next) = app(&fx);
        let mut spent = NullifierSet::new();

        let first = witness(&fx, &[fx.vote(0, 0, &mut rng)], &mut spent);
        let (prior, _) = app
            .seed(
                &base,
                BatchWitness {
                    transition: claim(&fx, ElectionState::genesis(2), &first),
                    votes: first,
                },
            )
            .unwrap();

        let second = witness(&fx, &[fx.vote(1, 1, &mut rng)], &mut spent);
        let detached = claim(&fx, ElectionState::genesis(2), &second);
        let err = app
            .fuse(
                &next,
                BatchWitness {
                    transition: detached,
                    votes: second.clone(),
                },
                &prior,
            )
            .unwrap_err();
        assert_eq!(err, AggregateError::ChainMismatch);

        let following = claim(&fx, prior.data.after.clone(), &second);
        let (pcd, _) = app
            .fuse(
                &next,
                BatchWitness {
                    transition: following,
                    votes: second,
                },
                &prior,
            )
            .unwrap();
        assert_eq!(&*pcd.data.after.tally, &[1, 1]);
    }

    /// `BaseCase` refuses anything but the genesis before-state.
    #[test]
    fn base_case_requires_genesis() {
        let mut rng = StdRng::seed_from_u64(7);
        let fx = Fixture::new(2, 1, 1);
        let (app, base, _next) = app(&fx);

        let witnesses = witness(&fx, &[fx.vote(0, 0, &mut rng)], &mut NullifierSet::new());
        let before = ElectionState {
            nullifier_root: AuthenticatedMap::empty_root(),
            tally: Tally::from(vec![1, 0]),
        };
        let err = app
            .seed(
                &base,
                BatchWitness {
                    transition: claim(&fx, before, &witnesses),
                    votes: witnesses,
                },
            )
            .unwrap_err();
        assert_eq!(err, AggregateError::NotGenesis);
    }
}
