//! Session scripts.
//!
//! A script is a YAML list of steps replayed in order against one session.
//! A failing step is reported and the replay carries on, so a script can
//! show the sign-in guard or validation at work.
//!
//! ```yaml
//! steps:
//!   - sign_in: { email: ana@example.com }
//!   - create:
//!       as: lamp
//!       title: Street Lighting
//!       description: Two broken lamps near the bakery
//!       category: iluminacao
//!       address: Rua Augusta, 100
//!       coordinate: { latitude: -23.5505, longitude: -46.6333 }
//!   - vote: { proposal: lamp }
//!   - filter: { search: lighting }
//! ```

use std::collections::HashMap;
use std::path::Path;

use bairro_engine::{EngineError, Intent, LocalIdentity, NavOutcome, Session, View};
use bairro_model::{CategoryFilter, ProposalDraft, ProposalId, StatusFilter, ValidationErrors};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Errors loading a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Cannot read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A parsed session script.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Script {
    /// Steps are written as `- step_name: { .. }` rather than YAML tags
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }
}

/// One scripted action.
///
/// Proposals are referred to by the alias given at creation, or by id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SignIn { email: String },
    Register { name: String, email: String },
    SignOut,
    Create(CreateStep),
    Vote { proposal: String },
    Comment { proposal: String, content: String },
    Filter(FilterStep),
    Navigate { view: View },
    View { proposal: String },
    Back,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignIn { .. } => "sign_in",
            Self::Register { .. } => "register",
            Self::SignOut => "sign_out",
            Self::Create(_) => "create",
            Self::Vote { .. } => "vote",
            Self::Comment { .. } => "comment",
            Self::Filter(_) => "filter",
            Self::Navigate { .. } => "navigate",
            Self::View { .. } => "view",
            Self::Back => "back",
        }
    }
}

/// Proposal form contents plus an optional alias for later steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateStep {
    #[serde(rename = "as", default)]
    pub alias: Option<String>,
    #[serde(flatten)]
    pub draft: ProposalDraft,
}

/// Filter changes; absent parts keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FilterStep {
    /// Catalog id or `all`
    pub category: Option<String>,
    /// Status or `all`
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// 1-based position in the script
    pub index: usize,
    pub step: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Replays scripts against a session.
pub struct Replayer {
    session: Session,
    aliases: HashMap<String, ProposalId>,
}

impl Replayer {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            aliases: HashMap::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Resolve an alias, falling back to treating it as a proposal id.
    pub fn resolve(&self, reference: &str) -> ProposalId {
        self.aliases
            .get(reference)
            .cloned()
            .unwrap_or_else(|| ProposalId::new(reference))
    }

    /// Replay every step, in order.
    pub fn run(&mut self, script: &Script) -> Vec<StepReport> {
        info!(steps = script.steps.len(), "Replaying script");
        script
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let index = i + 1;
                match self.apply(step) {
                    Ok(detail) => {
                        debug!(index, step = step.name(), %detail, "Step applied");
                        StepReport {
                            index,
                            step: step.name(),
                            ok: true,
                            detail,
                        }
                    }
                    Err(e) => {
                        warn!(index, step = step.name(), error = %e, "Step failed");
                        StepReport {
                            index,
                            step: step.name(),
                            ok: false,
                            detail: e.to_string(),
                        }
                    }
                }
            })
            .collect()
    }

    /// Apply a single step.
    pub fn apply(&mut self, step: &Step) -> Result<String, EngineError> {
        match step {
            Step::SignIn { email } => {
                let user = self.session.sign_in(email)?;
                Ok(format!("signed in as {}", user.name))
            }
            Step::Register { name, email } => {
                let user = self.session.register(name, email)?;
                Ok(format!("registered {}", user.name))
            }
            Step::SignOut => Ok(match self.session.sign_out() {
                Some(user) => format!("signed out {}", user.name),
                None => "nobody was signed in".to_string(),
            }),
            Step::Create(create) => {
                let proposal = self.session.create_proposal(create.draft.clone())?;
                if let Some(alias) = &create.alias {
                    self.aliases.insert(alias.clone(), proposal.id.clone());
                }
                Ok(format!("created {}", proposal.id))
            }
            Step::Vote { proposal } => {
                let id = self.resolve(proposal);
                let toggle = self.session.toggle_vote(&id)?;
                let action = if toggle.voted { "voted" } else { "vote removed" };
                Ok(format!("{action}, {} votes", toggle.new_count))
            }
            Step::Comment { proposal, content } => {
                let id = self.resolve(proposal);
                let comment = self.session.add_comment(&id, content)?;
                Ok(format!("comment {}", comment.id))
            }
            Step::Filter(filter) => self.apply_filter(filter),
            Step::Navigate { view } => self.navigate(Intent::Navigate(*view)),
            Step::View { proposal } => {
                let id = self.resolve(proposal);
                self.navigate(Intent::ViewProposal(id))
            }
            Step::Back => self.navigate(Intent::Back),
        }
    }

    fn apply_filter(&mut self, filter: &FilterStep) -> Result<String, EngineError> {
        let mut criteria = self.session.criteria().clone();
        if let Some(category) = &filter.category {
            criteria.category = CategoryFilter::parse(category);
        }
        if let Some(status) = &filter.status {
            criteria.status = StatusFilter::parse(status)
                .map_err(|e| ValidationErrors::single("status", e.to_string()))?;
        }
        if let Some(search) = &filter.search {
            criteria.search = search.clone();
        }
        self.session.set_filter(criteria);
        Ok(format!("{} proposals match", self.session.filtered_proposals().len()))
    }

    fn navigate(&mut self, intent: Intent) -> Result<String, EngineError> {
        match self.session.navigate(intent) {
            NavOutcome::Applied => Ok(format!(
                "showing {}",
                self.session.navigation_state().current_view.as_str()
            )),
            NavOutcome::Ignored => Ok("ignored".to_string()),
            NavOutcome::RedirectedToLogin => Err(EngineError::Unauthenticated),
            NavOutcome::NotFound(id) => Err(EngineError::NotFound(id)),
        }
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(Session::new(LocalIdentity::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bairro_model::{Coordinate, Priority};

    #[test]
    fn test_parse_steps() {
        let script = Script::from_yaml(
            r#"
steps:
  - sign_in: { email: ana@example.com }
  - sign_out
  - create:
      as: bench
      title: New bench
      description: Bench at the square
      category: lazer
      address: Praça da Sé
      coordinate: { latitude: -23.55, longitude: -46.63 }
      priority: low
  - navigate: { view: reports }
  - back
"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[1], Step::SignOut);
        let Step::Create(create) = &script.steps[2] else {
            panic!("expected create step, got {:?}", script.steps[2]);
        };
        assert_eq!(create.alias.as_deref(), Some("bench"));
        assert_eq!(create.draft.category, "lazer");
        assert_eq!(create.draft.coordinate, Some(Coordinate::new(-23.55, -46.63)));
        assert_eq!(create.draft.priority, Some(Priority::Low));
        assert_eq!(script.steps[3], Step::Navigate { view: View::Reports });
    }

    #[test]
    fn test_steps_as_single_key_maps() {
        let script = Script::from_yaml(
"
steps:
  - sign_out
  - back
  - vote: { proposal: lamp }
  - filter:
      status: pending
",
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                Step::SignOut,
                Step::Back,
                Step::Vote {
                    proposal: "lamp".to_string()
                },
                Step::Filter(FilterStep {
                    status: Some("pending".to_string()),
                    ..FilterStep::default()
                }),
            ]
        );
    }

    #[test]
    fn test_empty_script() {
        assert!(Script::from_yaml("steps: []\n").unwrap().steps.is_empty());
        assert!(Script::from_yaml("{}\n").unwrap().steps.is_empty());
    }

    #[test]
    fn test_unknown_step_rejected() {
        let err = Script::from_yaml("steps:\n  - teleport: { to: moon }\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_bad_status_is_step_failure() {
        let mut replayer = Replayer::default();
        let err = replayer
            .apply(&Step::Filter(FilterStep {
                status: Some("archived".to_string()),
                ..FilterStep::default()
            }))
            .unwrap_err();
        assert_eq!(
            err.validation().unwrap().message_for("status"),
            Some("Unknown status: archived")
        );
    }

    #[test]
    fn test_unknown_alias_falls_back_to_id() {
        let replayer = Replayer::default();
        assert_eq!(replayer.resolve("abc"), ProposalId::new("abc"));
    }
}
