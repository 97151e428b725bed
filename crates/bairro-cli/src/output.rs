//! JSON views printed after a replay.

use bairro_engine::{DashboardStats, NavigationState, Page, Session};
use bairro_model::{FilterCriteria, Proposal, User};
use clap::ValueEnum;
use serde::Serialize;

use crate::script::StepReport;

/// Which view to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputView {
    /// One page of the filtered proposal list
    #[default]
    Filtered,
    /// Dashboard statistics
    Stats,
    /// Navigation state, member and filter
    State,
}

/// Everything printed for a replay.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub steps: &'a [StepReport],
    pub view: ViewOutput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewOutput<'a> {
    Filtered(Page<&'a Proposal>),
    Stats(DashboardStats),
    State {
        navigation: &'a NavigationState,
        user: Option<User>,
        criteria: &'a FilterCriteria,
        selected: Option<&'a Proposal>,
    },
}

impl<'a> ViewOutput<'a> {
    /// Render `view` from the session. `page` only applies to the list.
    pub fn render(session: &'a Session, view: OutputView, page: usize) -> Self {
        match view {
            OutputView::Filtered => Self::Filtered(session.proposals_page(page)),
            OutputView::Stats => Self::Stats(session.dashboard_stats()),
            OutputView::State => Self::State {
                navigation: session.navigation_state(),
                user: session.current_user(),
                criteria: session.criteria(),
                selected: session.selected_proposal(),
            },
        }
    }
}
