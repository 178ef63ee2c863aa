//! User types.

use serde::{Deserialize, Serialize};

use crate::{Article, Comment};

/// A user, identified by a unique and immutable username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique username, also the user's id.
    pub username: String,
    /// Ids of live articles owned by this user, oldest first.
    #[serde(default)]
    pub article_ids: Vec<u64>,
    /// Ids of live comments written by this user, oldest first.
    #[serde(default)]
    pub comment_ids: Vec<u64>,
}

impl User {
    /// Creates a user with no articles or comments.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            article_ids: Vec::new(),
            comment_ids: Vec::new(),
        }
    }
}

/// Outcome of looking up a username that may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEntry {
    /// The username was already taken; this is the stored user.
    Existing(User),
    /// A new user was created.
    Created(User),
}

impl UserEntry {
    /// Returns true if the user was created by this call.
    pub fn is_created(&self) -> bool {
        matches!(self, UserEntry::Created(_))
    }

    /// Returns the user.
    pub fn into_user(self) -> User {
        match self {
            UserEntry::Existing(user) | UserEntry::Created(user) => user,
        }
    }
}

/// A user together with the records their id lists point at.
///
/// Ids that no longer resolve are kept as `None` rather than dropped, so the
/// lists line up with `article_ids` and `comment_ids`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user.
    pub user: User,
    /// Articles resolved from `user.article_ids`.
    pub user_articles: Vec<Option<Article>>,
    /// Comments resolved from `user.comment_ids`.
    pub user_comments: Vec<Option<Comment>>,
}
