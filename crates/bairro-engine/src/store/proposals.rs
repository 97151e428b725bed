//! Canonical proposal collection.

use std::collections::{HashMap, VecDeque};

use bairro_model::{CategoryCatalog, Proposal, ProposalDraft, ProposalId, ProposalStatus, User};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{EngineError, Result};

/// Proposals, newest first.
///
/// Proposals are never removed. Their vote and comment counters change only
/// through the crate-internal adjusters.
#[derive(Debug, Default)]
pub struct ProposalStore {
    /// Proposals by id
    records: HashMap<ProposalId, Proposal>,
    /// Display order, most recent at the front
    order: VecDeque<ProposalId>,
}

impl ProposalStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `draft` and insert it at the head of the collection.
    ///
    /// The author must be signed in. Counters start at zero and the status
    /// at pending.
    pub fn create(
        &mut self,
        draft: &ProposalDraft,
        author: Option<&User>,
        catalog: &CategoryCatalog,
        now: DateTime<Utc>,
    ) -> Result<Proposal> {
        let author = author.ok_or(EngineError::Unauthenticated)?;
        let valid = draft.validate(catalog)?;

        let proposal = Proposal {
            id: ProposalId::generate(),
            title: valid.title,
            description: valid.description,
            address: valid.address,
            category: valid.category,
            coordinate: valid.coordinate,
            status: ProposalStatus::Pending,
            priority: valid.priority,
            votes_count: 0,
            comments_count: 0,
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            created_at: now,
            updated_at: now,
        };

        info!(
            proposal_id = %proposal.id,
            category = %proposal.category,
            author_id = %proposal.author_id,
            "Created proposal"
        );

        self.order.push_front(proposal.id.clone());
        self.records.insert(proposal.id.clone(), proposal.clone());
        Ok(proposal)
    }

    pub fn get(&self, id: &ProposalId) -> Option<&Proposal> {
        self.records.get(id)
    }

    /// Like [`Self::get`], but a missing id is an error.
    pub fn require(&self, id: &ProposalId) -> Result<&Proposal> {
        self.get(id).ok_or_else(|| EngineError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &ProposalId) -> bool {
        self.records.contains_key(id)
    }

    /// All proposals, most recently created first.
    pub fn list(&self) -> Vec<&Proposal> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shift a proposal's vote counter, clamping at zero.
    pub(crate) fn adjust_vote_count(&mut self, id: &ProposalId, delta: i64) -> Result<u32> {
        let proposal = self.get_mut(id)?;
        proposal.votes_count = apply_delta(proposal.votes_count, delta);
        debug!(proposal_id = %id, votes = proposal.votes_count, "Adjusted vote count");
        Ok(proposal.votes_count)
    }

    /// Shift a proposal's comment counter, clamping at zero.
    pub(crate) fn adjust_comment_count(&mut self, id: &ProposalId, delta: i64) -> Result<u32> {
        let proposal = self.get_mut(id)?;
        proposal.comments_count = apply_delta(proposal.comments_count, delta);
        debug!(proposal_id = %id, comments = proposal.comments_count, "Adjusted comment count");
        Ok(proposal.comments_count)
    }

    fn get_mut(&mut self, id: &ProposalId) -> Result<&mut Proposal> {
        self.records
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound(id.clone()))
    }
}

fn apply_delta(count: u32, delta: i64) -> u32 {
    let next = i64::from(count).saturating_add(delta);
    u32::try_from(next.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bairro_model::{Priority, UserId};

    fn author() -> User {
        User {
            id: UserId::new("ana@example.com"),
            name: "ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn draft(title: &str) -> ProposalDraft {
        ProposalDraft::new()
            .title(title)
            .description("Needs fixing")
            .category("infraestrutura")
            .address("Rua Vergueiro, 500")
            .at(-23.57, -46.64)
    }

    #[test]
    fn test_create_sets_defaults() {
        let mut store = ProposalStore::new();
        let now = Utc::now();
        let proposal = store
            .create(&draft("Fix potholes"), Some(&author()), &CategoryCatalog::default(), now)
            .unwrap();

        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.priority, Priority::Medium);
        assert_eq!(proposal.votes_count, 0);
        assert_eq!(proposal.comments_count, 0);
        assert_eq!(proposal.author_name, "ana");
        assert_eq!(proposal.created_at, now);
        assert_eq!(proposal.updated_at, now);
        assert_eq!(store.get(&proposal.id), Some(&proposal));
    }

    #[test]
    fn test_newest_first() {
        let mut store = ProposalStore::new();
        let catalog = CategoryCatalog::default();
        let first = store.create(&draft("First"), Some(&author()), &catalog, Utc::now()).unwrap();
        let second = store.create(&draft("Second"), Some(&author()), &catalog, Utc::now()).unwrap();

        let ids: Vec<_> = store.list().into_iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_create_requires_author() {
        let mut store = ProposalStore::new();
        let err = store
            .create(&draft("Anon"), None, &CategoryCatalog::default(), Utc::now())
            .unwrap_err();
        assert_eq!(err, EngineError::Unauthenticated);
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let mut store = ProposalStore::new();
        let err = store
            .create(
                &draft("Bad").category("nope"),
                Some(&author()),
                &CategoryCatalog::default(),
                Utc::now(),
            )
            .unwrap_err();
        assert!(err.validation().unwrap().message_for("category").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_counters_clamp_at_zero() {
        let mut store = ProposalStore::new();
        let proposal = store
            .create(&draft("Clamp"), Some(&author()), &CategoryCatalog::default(), Utc::now())
            .unwrap();

        assert_eq!(store.adjust_vote_count(&proposal.id, -1).unwrap(), 0);
        assert_eq!(store.adjust_vote_count(&proposal.id, 2).unwrap(), 2);
        assert_eq!(store.adjust_comment_count(&proposal.id, -5).unwrap(), 0);

        let missing = ProposalId::new("missing");
        assert_eq!(
            store.adjust_vote_count(&missing, 1).unwrap_err(),
            EngineError::NotFound(missing)
        );
    }
}
