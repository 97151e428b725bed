//! Screen navigation and the sign-in guard.
//!
//! The controller decides which screen is shown and whether an intent may go
//! ahead. Intents that write (create, vote, comment) are refused while nobody
//! is signed in: the login prompt opens and the intent is dropped. After
//! signing in the member lands on the configured landing view; the refused
//! intent is not replayed.

use bairro_model::ProposalId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::ProposalStore;

/// Main screens of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Proposal list
    #[default]
    Home,
    Map,
    /// New-proposal form
    Create,
    /// Dashboard
    Reports,
    /// One proposal with its comments
    Details,
    Settings,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Map => "map",
            Self::Create => "create",
            Self::Reports => "reports",
            Self::Details => "details",
            Self::Settings => "settings",
        }
    }

    /// Views that keep their place when a filter changes.
    fn keeps_filter_changes(&self) -> bool {
        matches!(self, Self::Home | Self::Map)
    }
}

/// Which authentication form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPrompt {
    Login,
    Register,
}

/// What the presentation layer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    View(View),
    AuthPrompt(AuthPrompt),
}

/// Navigation state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NavigationState {
    /// View underneath any open auth prompt
    pub current_view: View,
    /// Open auth prompt, if the member was sent to sign in
    pub auth_prompt: Option<AuthPrompt>,
    /// Selected proposal; resolve through the store before use
    pub selected_proposal_id: Option<ProposalId>,
}

impl NavigationState {
    /// Whether an auth prompt is covering the current view.
    pub fn pending_auth_redirect(&self) -> bool {
        self.auth_prompt.is_some()
    }

    pub fn screen(&self) -> Screen {
        match self.auth_prompt {
            Some(prompt) => Screen::AuthPrompt(prompt),
            None => Screen::View(self.current_view),
        }
    }
}

/// Something the member asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open a main view from the menu
    Navigate(View),
    /// Open a proposal's details
    ViewProposal(ProposalId),
    /// Open a proposal's comment thread
    OpenComments(ProposalId),
    /// Submit the new-proposal form
    CreateProposal,
    /// Vote or unvote a proposal
    Vote(ProposalId),
    /// Post a comment
    Comment(ProposalId),
    CategoryFilterChanged,
    StatusFilterChanged,
    ShowLogin,
    ShowRegister,
    /// Close the auth prompt without signing in
    DismissAuth,
    /// A member just signed in
    Authenticated,
    /// The member signed out
    LoggedOut,
    /// Leave the details view
    Back,
}

impl Intent {
    /// Intents refused while nobody is signed in.
    pub fn requires_authentication(&self) -> bool {
        matches!(
            self,
            Self::Navigate(View::Create)
                | Self::CreateProposal
                | Self::Vote(_)
                | Self::Comment(_)
                | Self::OpenComments(_)
        )
    }

    /// Intents handled while an auth prompt is open.
    ///
    /// Filter changes only move the view underneath the prompt.
    fn passes_auth_prompt(&self) -> bool {
        matches!(
            self,
            Self::ShowLogin
                | Self::ShowRegister
                | Self::DismissAuth
                | Self::Authenticated
                | Self::LoggedOut
                | Self::CategoryFilterChanged
                | Self::StatusFilterChanged
        )
    }
}

/// How the controller handled an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavOutcome {
    /// Accepted; the caller may carry out the action
    Applied,
    /// Refused; the login prompt is open and the intent was dropped
    RedirectedToLogin,
    /// The referenced proposal does not exist; nothing changed
    NotFound(ProposalId),
    /// Meaningless in the current state; nothing changed
    Ignored,
}

/// Navigation state machine. There is no terminal state.
#[derive(Debug, Clone)]
pub struct NavigationController {
    state: NavigationState,
    landing_view: View,
}

impl NavigationController {
    pub fn new(landing_view: View) -> Self {
        Self {
            state: NavigationState::default(),
            landing_view,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Apply an intent.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        authenticated: bool,
        proposals: &ProposalStore,
    ) -> NavOutcome {
        if intent.requires_authentication() && !authenticated {
            warn!(intent = ?intent, "Sign-in required, opening login prompt");
            self.state.auth_prompt = Some(AuthPrompt::Login);
            return NavOutcome::RedirectedToLogin;
        }

        if self.state.pending_auth_redirect() && !intent.passes_auth_prompt() {
            debug!(intent = ?intent, "Ignoring intent while auth prompt is open");
            return NavOutcome::Ignored;
        }

        let outcome = match intent {
            Intent::Navigate(View::Details) => match self.state.selected_proposal_id.clone() {
                Some(id) if proposals.contains(&id) => self.show(View::Details),
                Some(id) => NavOutcome::NotFound(id),
                None => NavOutcome::Ignored,
            },
            Intent::Navigate(view) => self.show(view),
            Intent::ViewProposal(id) | Intent::OpenComments(id) => self.select(id, proposals),
            Intent::CreateProposal => NavOutcome::Applied,
            Intent::Vote(id) | Intent::Comment(id) => {
                if proposals.contains(&id) {
                    NavOutcome::Applied
                } else {
                    NavOutcome::NotFound(id)
                }
            }
            Intent::CategoryFilterChanged | Intent::StatusFilterChanged => {
                if !self.state.current_view.keeps_filter_changes() {
                    self.state.current_view = View::Home;
                }
                NavOutcome::Applied
            }
            Intent::ShowLogin | Intent::ShowRegister if authenticated => NavOutcome::Ignored,
            Intent::ShowLogin => {
                self.state.auth_prompt = Some(AuthPrompt::Login);
                NavOutcome::Applied
            }
            Intent::ShowRegister => {
                self.state.auth_prompt = Some(AuthPrompt::Register);
                NavOutcome::Applied
            }
            Intent::DismissAuth => {
                if self.state.auth_prompt.take().is_some() {
                    NavOutcome::Applied
                } else {
                    NavOutcome::Ignored
                }
            }
            Intent::Authenticated => {
                self.state.auth_prompt = None;
                self.state.current_view = self.landing_view;
                NavOutcome::Applied
            }
            Intent::LoggedOut => {
                self.state = NavigationState::default();
                NavOutcome::Applied
            }
            Intent::Back => {
                if self.state.current_view == View::Details {
                    self.state.current_view = View::Home;
                    self.state.selected_proposal_id = None;
                    NavOutcome::Applied
                } else {
                    NavOutcome::Ignored
                }
            }
        };

        debug!(
            view = self.state.current_view.as_str(),
            auth_prompt = ?self.state.auth_prompt,
            outcome = ?outcome,
            "Navigation updated"
        );
        outcome
    }

    fn show(&mut self, view: View) -> NavOutcome {
        self.state.current_view = view;
        NavOutcome::Applied
    }

    fn select(&mut self, id: ProposalId, proposals: &ProposalStore) -> NavOutcome {
        if !proposals.contains(&id) {
            return NavOutcome::NotFound(id);
        }
        self.state.selected_proposal_id = Some(id);
        self.state.current_view = View::Details;
        NavOutcome::Applied
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(View::Home)
    }
}
