//! Comment types.

use serde::{Deserialize, Serialize};

use crate::{Reactable, VoteSet};

/// A comment on an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Sequential identifier, independent from article ids.
    pub id: u64,
    /// Comment text.
    pub body: String,
    /// Username of the author.
    pub username: String,
    /// Id of the article this comment belongs to.
    pub article_id: u64,
    /// Votes cast on this comment.
    #[serde(flatten)]
    pub votes: VoteSet,
}

impl Comment {
    /// Creates a new comment with no votes.
    pub fn new(
        id: u64,
        body: impl Into<String>,
        username: impl Into<String>,
        article_id: u64,
    ) -> Self {
        Self {
            id,
            body: body.into(),
            username: username.into(),
            article_id,
            votes: VoteSet::new(),
        }
    }

    /// Replaces the body unless the new one is empty.
    pub fn update_body(&mut self, body: impl Into<String>) {
        let body = body.into();
        if !body.is_empty() {
            self.body = body;
        }
    }
}

impl Reactable for Comment {
    fn votes_mut(&mut self) -> &mut VoteSet {
        &mut self.votes
    }
}

/// Fields required to create a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewComment {
    pub body: String,
    pub username: String,
    pub article_id: u64,
}

impl NewComment {
    /// Creates the input for a new comment.
    pub fn new(body: impl Into<String>, username: impl Into<String>, article_id: u64) -> Self {
        Self {
            body: body.into(),
            username: username.into(),
            article_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_creation() {
        let comment = Comment::new(1, "Great read", "bob", 4);

        assert_eq!(comment.id, 1);
        assert_eq!(comment.article_id, 4);
        assert_eq!(comment.votes, VoteSet::new());
    }

    #[test]
    fn test_empty_body_is_ignored() {
        let mut comment = Comment::new(1, "Original", "bob", 1);

        comment.update_body("");
        assert_eq!(comment.body, "Original");

        comment.update_body("Edited");
        assert_eq!(comment.body, "Edited");
    }

    #[test]
    fn test_comment_json_shape() {
        let json = serde_json::to_value(Comment::new(2, "hi", "alice", 1)).unwrap();

        assert_eq!(json["articleId"], 1);
        assert_eq!(json["body"], "hi");
        assert!(json["upvotedBy"].is_array());
    }
}
