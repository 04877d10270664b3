use crate::{map::Witness, registry::VoterRecord, transition::BatchTransition, vote::Vote};

// =============================================================================
// Step witnesses (prover-side)
// =============================================================================

/// Private witness for one vote in a batch.
///
/// Both map witnesses are taken at the moment the vote is processed: the
/// eligibility witness against the frozen registry root, the nullifier
/// witness against the running nullifier root left by the votes before it.
#[derive(Clone, Debug)]
pub struct VoteWitness {
    /// The signed vote.
    pub vote: Vote,

    /// The voter's registry record; its leaf is what `eligibility` opens.
    pub record: VoterRecord,

    /// Registry witness for $H(\mathsf{pk})$.
    pub eligibility: Witness,

    /// Nullifier set witness for $\mathsf{nf}$, showing it unspent.
    pub nullifier: Witness,
}

/// Private witness for a whole batch: the claimed transition and one
/// [`VoteWitness`] per vote, in batch order.
#[derive(Clone, Debug)]
pub struct BatchWitness {
    /// Public statement the step must establish.
    pub transition: BatchTransition,

    /// Per-vote witnesses.
    pub votes: Vec<VoteWitness>,
}
