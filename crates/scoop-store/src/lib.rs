//! Storage layer for Scoop: users, articles, threaded comments and votes.
//!
//! All records live in a single [`ContentStore`] that keeps the relations between
//! them consistent: owners track their articles and comments, articles track their
//! comments, and deleting an article removes its comments along with every
//! reference to them. Deleted records leave a tombstone behind so their ids are
//! never handed out again.

mod article;
mod comment;
mod error;
mod snapshot;
mod store;
mod user;
mod vote;

pub use article::{Article, ArticleChanges, ArticleDetail, NewArticle};
pub use comment::{Comment, NewComment};
pub use error::StoreError;
pub use snapshot::Snapshot;
pub use store::ContentStore;
pub use user::{User, UserEntry, UserProfile};
pub use vote::{Reactable, Vote, VoteSet};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
