//! One member's browsing session.
//!
//! A [`Session`] owns every store plus the filter criteria and navigation
//! state. Operations run one at a time through `&mut self`, so a change is
//! visible to every read that follows it.

use bairro_model::{
    Category, CategoryCatalog, CategoryFilter, Comment, Coordinate, FilterCriteria, Proposal,
    ProposalDraft, ProposalId, StatusFilter, User, VoteToggle,
};
use tracing::{debug, info};

use crate::aggregation::{self, DashboardStats};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::filter::{self, Page};
use crate::identity::{IdentityProvider, LocalIdentity};
use crate::navigation::{Intent, NavOutcome, NavigationController, NavigationState, View};
use crate::store::{CommentStore, ProposalStore, VoteLedger};

/// Stores, filters and navigation for a single member.
pub struct Session<I: IdentityProvider = LocalIdentity> {
    config: EngineConfig,
    catalog: CategoryCatalog,
    identity: I,
    clock: Box<dyn Clock>,
    proposals: ProposalStore,
    votes: VoteLedger,
    comments: CommentStore,
    criteria: FilterCriteria,
    navigation: NavigationController,
}

impl<I: IdentityProvider> Session<I> {
    /// Create a session with the default config and catalog.
    pub fn new(identity: I) -> Self {
        Self::build(EngineConfig::default(), identity)
    }

    /// Create a session with `config`, rejecting values the engine cannot
    /// work with.
    pub fn with_config(config: EngineConfig, identity: I) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, identity))
    }

    fn build(config: EngineConfig, identity: I) -> Self {
        let navigation = NavigationController::new(config.navigation.landing_view);
        Self {
            config,
            catalog: CategoryCatalog::default(),
            identity,
            clock: Box::new(SystemClock),
            proposals: ProposalStore::new(),
            votes: VoteLedger::new(),
            comments: CommentStore::new(),
            criteria: FilterCriteria::all(),
            navigation,
        }
    }

    /// Replace the category catalog.
    pub fn with_catalog(mut self, catalog: CategoryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ---- Writes ----

    /// Submit a new proposal as the signed-in member.
    ///
    /// Without a member the login prompt opens and `Unauthenticated` is
    /// returned. On success the session returns to the home view.
    pub fn create_proposal(&mut self, draft: ProposalDraft) -> Result<Proposal> {
        self.guard(Intent::CreateProposal)?;

        let author = self.identity.current_user();
        let proposal = self
            .proposals
            .create(&draft, author.as_ref(), &self.catalog, self.clock.now())?;

        self.navigation
            .dispatch(Intent::Navigate(View::Home), true, &self.proposals);
        Ok(proposal)
    }

    /// Flip the signed-in member's vote on a proposal.
    pub fn toggle_vote(&mut self, proposal_id: &ProposalId) -> Result<VoteToggle> {
        self.guard(Intent::Vote(proposal_id.clone()))?;

        let user = self.identity.current_user();
        self.votes.toggle(
            &mut self.proposals,
            proposal_id,
            user.as_ref().map(|u| &u.id),
        )
    }

    /// Comment on a proposal as the signed-in member.
    pub fn add_comment(&mut self, proposal_id: &ProposalId, content: &str) -> Result<Comment> {
        self.guard(Intent::Comment(proposal_id.clone()))?;

        let author = self.identity.current_user();
        self.comments.add(
            &mut self.proposals,
            proposal_id,
            author.as_ref(),
            content,
            self.clock.now(),
        )
    }

    /// Run a write intent past navigation.
    ///
    /// Only the sign-in refusal is an error here. A missing proposal is left
    /// to the store, which reports it as `NotFound`.
    fn guard(&mut self, intent: Intent) -> Result<()> {
        let authenticated = self.identity.is_authenticated();
        match self.navigation.dispatch(intent, authenticated, &self.proposals) {
            NavOutcome::RedirectedToLogin => Err(EngineError::Unauthenticated),
            _ => Ok(()),
        }
    }

    // ---- Filters ----

    /// Replace the filter criteria.
    ///
    /// A changed category or status sends the session back home unless the
    /// list or map is showing.
    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        let authenticated = self.identity.is_authenticated();
        if criteria.category != self.criteria.category {
            self.navigation
                .dispatch(Intent::CategoryFilterChanged, authenticated, &self.proposals);
        }
        if criteria.status != self.criteria.status {
            self.navigation
                .dispatch(Intent::StatusFilterChanged, authenticated, &self.proposals);
        }
        debug!(
            category = ?criteria.category,
            status = ?criteria.status,
            search = %criteria.search,
            "Filter updated"
        );
        self.criteria = criteria;
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        let criteria = self.criteria.clone().with_category(category);
        self.set_filter(criteria);
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        let criteria = self.criteria.clone().with_status(status);
        self.set_filter(criteria);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let criteria = self.criteria.clone().with_search(search);
        self.set_filter(criteria);
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    // ---- Derived views ----

    /// Proposals matching the current criteria, newest first.
    pub fn filtered_proposals(&self) -> Vec<&Proposal> {
        filter::apply(self.proposals.list(), &self.criteria)
    }

    /// One page of [`Self::filtered_proposals`], 1-based.
    pub fn proposals_page(&self, page: usize) -> Page<&Proposal> {
        filter::paginate(self.filtered_proposals(), page, self.config.listing.page_size)
    }

    /// Proposals near `center`. Uses the configured radius when none is given.
    pub fn nearby(&self, center: &Coordinate, radius_km: Option<f64>) -> Vec<&Proposal> {
        let radius = radius_km.unwrap_or(self.config.listing.nearby_radius_km);
        filter::within_radius(self.proposals.list(), center, radius)
    }

    /// Dashboard statistics over every proposal, ignoring the filter.
    pub fn dashboard_stats(&self) -> DashboardStats {
        aggregation::summarize(
            self.proposals.list(),
            &self.catalog,
            self.config.dashboard.recent_limit,
        )
    }

    // ---- Navigation ----

    pub fn navigate(&mut self, intent: Intent) -> NavOutcome {
        let authenticated = self.identity.is_authenticated();
        self.navigation.dispatch(intent, authenticated, &self.proposals)
    }

    pub fn navigation_state(&self) -> &NavigationState {
        self.navigation.state()
    }

    /// The selected proposal, looked up again on every call.
    pub fn selected_proposal(&self) -> Option<&Proposal> {
        self.navigation
            .state()
            .selected_proposal_id
            .as_ref()
            .and_then(|id| self.proposals.get(id))
    }

    /// Tell navigation that a member has signed in through the provider.
    pub fn complete_authentication(&mut self) -> NavOutcome {
        self.navigate(Intent::Authenticated)
    }

    /// Tell navigation that the member has signed out.
    pub fn end_session(&mut self) -> NavOutcome {
        self.navigate(Intent::LoggedOut)
    }

    // ---- Reads ----

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal> {
        self.proposals.require(id)
    }

    /// Comments on a proposal, oldest first.
    pub fn comments_for(&self, id: &ProposalId) -> Vec<&Comment> {
        self.comments.list_for(id)
    }

    /// Whether the signed-in member votes for a proposal. False when signed out.
    pub fn has_voted(&self, id: &ProposalId) -> bool {
        self.identity
            .current_user()
            .is_some_and(|user| self.votes.has_voted(id, &user.id))
    }

    /// Catalog entry for a proposal's category.
    pub fn category_of(&self, id: &ProposalId) -> Result<&Category> {
        let proposal = self.proposals.require(id)?;
        self.catalog
            .get(&proposal.category)
            .ok_or_else(|| EngineError::UnknownCategory(proposal.category.clone()))
    }

    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }

    pub fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Mutable access to the provider. Call [`Self::complete_authentication`]
    /// or [`Self::end_session`] after changing who is signed in.
    pub fn identity_mut(&mut self) -> &mut I {
        &mut self.identity
    }
}

impl Session<LocalIdentity> {
    /// Sign in with an email and land on the configured view.
    pub fn sign_in(&mut self, email: &str) -> Result<User> {
        let user = self.identity.sign_in(email)?;
        self.complete_authentication();
        Ok(user)
    }

    /// Register a member, sign them in and land on the configured view.
    pub fn register(&mut self, name: &str, email: &str) -> Result<User> {
        let user = self.identity.register(name, email)?;
        self.complete_authentication();
        Ok(user)
    }

    /// Sign out and return home. Returns who was signed in.
    pub fn sign_out(&mut self) -> Option<User> {
        let previous = self.identity.sign_out();
        if previous.is_some() {
            self.end_session();
            info!("Session ended");
        }
        previous
    }
}

impl Default for Session<LocalIdentity> {
    fn default() -> Self {
        Self::new(LocalIdentity::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::identity::Anonymous;
    use crate::navigation::{AuthPrompt, Screen};
    use bairro_model::{Priority, ProposalStatus};
    use chrono::{DateTime, Duration};

    fn lighting() -> ProposalDraft {
        ProposalDraft::new()
            .title("Street Lighting")
            .description("Two broken lamps near the bakery")
            .category("iluminacao")
            .address("Rua Augusta, 100")
            .at(-23.5505, -46.6333)
    }

    fn signed_in() -> Session {
        let mut session = Session::default();
        session.sign_in("ana@example.com").unwrap();
        session
    }

    #[test]
    fn test_create_returns_home() {
        let mut session = signed_in();
        session.navigate(Intent::Navigate(View::Create));
        assert_eq!(session.navigation_state().current_view, View::Create);

        let proposal = session.create_proposal(lighting()).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.priority, Priority::Medium);
        assert_eq!(session.navigation_state().current_view, View::Home);
        assert_eq!(session.filtered_proposals().len(), 1);
    }

    #[test]
    fn test_invalid_draft_keeps_form_open() {
        let mut session = signed_in();
        session.navigate(Intent::Navigate(View::Create));

        let err = session.create_proposal(lighting().title("  ")).unwrap_err();
        assert_eq!(
            err.validation().unwrap().message_for("title"),
            Some("title is required")
        );
        assert_eq!(session.navigation_state().current_view, View::Create);
        assert!(session.proposals().is_empty());
    }

    #[test]
    fn test_anonymous_writes_redirect() {
        let mut session = Session::new(Anonymous);
        assert_eq!(
            session.create_proposal(lighting()).unwrap_err(),
            EngineError::Unauthenticated
        );
        assert_eq!(
            session.navigation_state().screen(),
            Screen::AuthPrompt(AuthPrompt::Login)
        );
    }

    #[test]
    fn test_vote_and_has_voted() {
        let mut session = signed_in();
        let id = session.create_proposal(lighting()).unwrap().id;

        assert!(!session.has_voted(&id));
        session.toggle_vote(&id).unwrap();
        assert!(session.has_voted(&id));
        assert_eq!(session.proposal(&id).unwrap().votes_count, 1);

        session.sign_out();
        assert!(!session.has_voted(&id));
    }

    #[test]
    fn test_vote_unknown_proposal() {
        let mut session = signed_in();
        let missing = ProposalId::new("missing");
        assert_eq!(
            session.toggle_vote(&missing).unwrap_err(),
            EngineError::NotFound(missing)
        );
    }

    #[test]
    fn test_filter_change_from_reports_returns_home() {
        let mut session = signed_in();
        session.navigate(Intent::Navigate(View::Reports));

        session.set_search("lamp");
        assert_eq!(session.navigation_state().current_view, View::Reports);

        session.set_category_filter(CategoryFilter::Only("lazer".to_string()));
        assert_eq!(session.navigation_state().current_view, View::Home);
    }

    #[test]
    fn test_pages_follow_config() {
        let mut config = EngineConfig::default();
        config.listing.page_size = 2;
        let mut session = Session::with_config(config, LocalIdentity::new()).unwrap();
        session.sign_in("ana@example.com").unwrap();
        for n in 0..5 {
            session
                .create_proposal(lighting().title(format!("Lamp {n}")))
                .unwrap();
        }

        let page = session.proposals_page(3);
        assert_eq!(page.pages, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Lamp 0");
    }

    #[test]
    fn test_nearby_uses_configured_radius() {
        let mut session = signed_in();
        session.create_proposal(lighting()).unwrap();
        session
            .create_proposal(lighting().title("Far away").at(-22.9068, -43.1729))
            .unwrap();

        let center = Coordinate::new(-23.5510, -46.6340);
        let near = session.nearby(&center, None);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].title, "Street Lighting");
        assert_eq!(session.nearby(&center, Some(500.0)).len(), 2);
    }

    #[test]
    fn test_clock_stamps_proposals_and_comments() {
        let start = DateTime::from_timestamp(1_736_500_000, 0).unwrap();
        let clock = ManualClock::new(start);
        let mut session = Session::default().with_clock(clock.clone());
        session.sign_in("ana@example.com").unwrap();

        let proposal = session.create_proposal(lighting()).unwrap();
        clock.advance(Duration::minutes(3));
        let comment = session.add_comment(&proposal.id, "Urgente").unwrap();

        assert_eq!(proposal.created_at, start);
        assert_eq!(comment.created_at, start + Duration::minutes(3));
    }

    #[test]
    fn test_category_lookup() {
        let mut session = signed_in();
        let id = session.create_proposal(lighting()).unwrap().id;
        assert_eq!(session.category_of(&id).unwrap().id, "iluminacao");

        let session = Session::default();
        assert!(matches!(
            session.category_of(&ProposalId::new("missing")),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_selected_proposal_resolves_through_store() {
        let mut session = signed_in();
        let id = session.create_proposal(lighting()).unwrap().id;
        assert!(session.selected_proposal().is_none());

        session.navigate(Intent::ViewProposal(id.clone()));
        assert_eq!(session.selected_proposal().map(|p| &p.id), Some(&id));

        session.toggle_vote(&id).unwrap();
        assert_eq!(session.selected_proposal().unwrap().votes_count, 1);
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = EngineConfig::default();
        config.navigation.landing_view = View::Details;
        assert!(matches!(
            Session::with_config(config, LocalIdentity::new()),
            Err(EngineError::ConfigError(_))
        ));

        let mut config = EngineConfig::default();
        config.listing.page_size = 0;
        assert!(Session::with_config(config, LocalIdentity::new()).is_err());
    }

    #[test]
    fn test_filter_change_behind_prompt_returns_home() {
        let mut session = Session::default();
        session.navigate(Intent::Navigate(View::Reports));
        session.navigate(Intent::ShowLogin);

        session.set_category_filter(CategoryFilter::Only("lazer".to_string()));
        session.navigate(Intent::DismissAuth);

        assert_eq!(
            session.criteria().category,
            CategoryFilter::Only("lazer".to_string())
        );
        assert_eq!(session.navigation_state().current_view, View::Home);
    }

    #[test]
    fn test_login_prompt_ignored_when_signed_in() {
        let mut session = signed_in();
        let id = session.create_proposal(lighting()).unwrap().id;

        assert_eq!(session.navigate(Intent::ShowLogin), NavOutcome::Ignored);
        assert_eq!(session.navigate(Intent::Vote(id.clone())), NavOutcome::Applied);
        assert_eq!(session.toggle_vote(&id).unwrap().new_count, 1);
    }

    #[test]
    fn test_sign_out_resets_navigation() {
        let mut session = signed_in();
        session.navigate(Intent::Navigate(View::Settings));

        let previous = session.sign_out().unwrap();
        assert_eq!(previous.email, "ana@example.com");
        assert_eq!(session.navigation_state().current_view, View::Home);
        assert!(session.current_user().is_none());
        assert!(session.sign_out().is_none());
    }
}
