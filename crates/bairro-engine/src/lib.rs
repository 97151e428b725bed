//! Meu Bairro proposal engine.
//!
//! The single source of truth for proposals, votes and comments, plus the
//! derived views and navigation rules the presentation layer renders from:
//!
//! - **Stores**: [`ProposalStore`], [`VoteLedger`], [`CommentStore`]; vote and
//!   comment counters on proposals always match the ledger and comment store
//! - **Derived views**: [`filter`] (criteria, paging, proximity) and
//!   [`aggregation`] (dashboard statistics), both pure
//! - **Navigation**: [`NavigationController`], which sends write actions to the
//!   login prompt when nobody is signed in
//! - **Session**: [`Session`] ties everything together for one member's
//!   browsing session
//!
//! # Flow
//!
//! ```text
//! user intent ──► NavigationController (guard)
//!                        │
//!                        ▼
//!     ProposalStore ◄── VoteLedger / CommentStore
//!           │
//!           ▼
//!   filter / aggregation ──► presentation layer
//! ```
//!
//! # Example
//!
//! ```
//! use bairro_engine::{LocalIdentity, Session};
//! use bairro_model::ProposalDraft;
//!
//! let mut session = Session::new(LocalIdentity::new());
//! session.sign_in("ana@example.com").unwrap();
//!
//! let proposal = session
//!     .create_proposal(
//!         ProposalDraft::new()
//!             .title("Street Lighting")
//!             .description("Two broken lamps near the bakery")
//!             .category("iluminacao")
//!             .address("Rua Augusta, 100")
//!             .at(-23.55, -46.63),
//!     )
//!     .unwrap();
//!
//! let vote = session.toggle_vote(&proposal.id).unwrap();
//! assert!(vote.voted);
//! assert_eq!(vote.new_count, 1);
//! ```

pub mod aggregation;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod navigation;
pub mod session;
pub mod store;

// Re-export main types
pub use aggregation::DashboardStats;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use filter::Page;
pub use identity::{Anonymous, IdentityProvider, LocalIdentity};
pub use navigation::{
    AuthPrompt, Intent, NavOutcome, NavigationController, NavigationState, Screen, View,
};
pub use session::Session;
pub use store::{CommentStore, ProposalStore, VoteLedger};
