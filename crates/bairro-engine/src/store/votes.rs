//! Vote membership per proposal.

use std::collections::{HashMap, HashSet};

use bairro_model::{ProposalId, UserId, VoteToggle};
use tracing::debug;

use super::ProposalStore;
use crate::error::{EngineError, Result};

/// Which members vote for which proposals.
///
/// A member votes at most once per proposal. Every change here is mirrored
/// into the proposal's `votes_count`.
#[derive(Debug, Default)]
pub struct VoteLedger {
    voters: HashMap<ProposalId, HashSet<UserId>>,
}

impl VoteLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `user`'s vote on a proposal.
    ///
    /// Adds the vote if absent, removes it if present. Two calls in a row
    /// leave membership and count where they started. The count never drops
    /// below zero.
    pub fn toggle(
        &mut self,
        proposals: &mut ProposalStore,
        proposal_id: &ProposalId,
        user: Option<&UserId>,
    ) -> Result<VoteToggle> {
        let user = user.ok_or(EngineError::Unauthenticated)?;
        if !proposals.contains(proposal_id) {
            return Err(EngineError::NotFound(proposal_id.clone()));
        }

        let voters = self.voters.entry(proposal_id.clone()).or_default();
        let voted = if voters.remove(user) {
            false
        } else {
            voters.insert(user.clone());
            true
        };
        if voters.is_empty() {
            self.voters.remove(proposal_id);
        }

        let delta = if voted { 1 } else { -1 };
        let new_count = proposals.adjust_vote_count(proposal_id, delta)?;

        debug!(
            proposal_id = %proposal_id,
            user_id = %user,
            voted = voted,
            votes = new_count,
            "Vote toggled"
        );

        Ok(VoteToggle { voted, new_count })
    }

    pub fn has_voted(&self, proposal_id: &ProposalId, user: &UserId) -> bool {
        self.voters
            .get(proposal_id)
            .is_some_and(|voters| voters.contains(user))
    }

    /// Number of members voting for a proposal.
    pub fn count_for(&self, proposal_id: &ProposalId) -> usize {
        self.voters.get(proposal_id).map_or(0, HashSet::len)
    }

    /// Proposals `user` currently votes for.
    pub fn voted_by(&self, user: &UserId) -> Vec<&ProposalId> {
        self.voters
            .iter()
            .filter(|(_, voters)| voters.contains(user))
            .map(|(id, _)| id)
            .collect()
    }
}
