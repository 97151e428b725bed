//! In-memory stores owned by a session.
//!
//! [`ProposalStore`] owns proposals. [`VoteLedger`] and [`CommentStore`] own
//! votes and comments and are the only callers of the store's counter
//! adjustments, which keeps `votes_count` and `comments_count` equal to what
//! they hold.

mod comments;
mod proposals;
mod votes;

pub use comments::CommentStore;
pub use proposals::ProposalStore;
pub use votes::VoteLedger;
