//! Comments per proposal.

use std::collections::HashMap;

use bairro_model::{Comment, CommentId, ProposalId, User, ValidationErrors};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::ProposalStore;
use crate::error::{EngineError, Result};

/// Append-only comment log.
///
/// Comments on a proposal are listed oldest first. Every append bumps the
/// owning proposal's `comments_count`.
#[derive(Debug, Default)]
pub struct CommentStore {
    comments: Vec<Comment>,
    /// Positions in `comments`, by owning proposal
    by_proposal: HashMap<ProposalId, Vec<usize>>,
}

impl CommentStore {
    /// Create an empty comment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment to a proposal.
    ///
    /// Content is trimmed; blank content is rejected before the proposal is
    /// looked up.
    pub fn add(
        &mut self,
        proposals: &mut ProposalStore,
        proposal_id: &ProposalId,
        author: Option<&User>,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        let author = author.ok_or(EngineError::Unauthenticated)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationErrors::single("content", "comment cannot be empty").into());
        }

        proposals.adjust_comment_count(proposal_id, 1)?;

        let comment = Comment {
            id: CommentId::generate(),
            proposal_id: proposal_id.clone(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            content: content.to_string(),
            created_at: now,
        };

        self.by_proposal
            .entry(proposal_id.clone())
            .or_default()
            .push(self.comments.len());
        self.comments.push(comment.clone());

        debug!(
            proposal_id = %proposal_id,
            comment_id = %comment.id,
            author_id = %comment.author_id,
            "Comment added"
        );

        Ok(comment)
    }

    /// Comments on a proposal, oldest first.
    pub fn list_for(&self, proposal_id: &ProposalId) -> Vec<&Comment> {
        self.by_proposal
            .get(proposal_id)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|&i| self.comments.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn count_for(&self, proposal_id: &ProposalId) -> usize {
        self.by_proposal.get(proposal_id).map_or(0, Vec::len)
    }

    /// Total number of comments across all proposals.
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
