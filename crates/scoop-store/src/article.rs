//! Article types.

use serde::{Deserialize, Serialize};

use crate::{Comment, Reactable, VoteSet};

/// A shared link with a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Sequential identifier, starting at 1.
    pub id: u64,
    /// Title of the article.
    pub title: String,
    /// Link the article points to.
    pub url: String,
    /// Username of the owner.
    pub username: String,
    /// Ids of live comments on this article, oldest first.
    #[serde(default)]
    pub comment_ids: Vec<u64>,
    /// Votes cast on this article.
    #[serde(flatten)]
    pub votes: VoteSet,
}

impl Article {
    /// Creates a new article with no comments or votes.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            username: username.into(),
            comment_ids: Vec::new(),
            votes: VoteSet::new(),
        }
    }

    /// Applies a partial update. Owner and comments never change.
    pub fn apply(&mut self, changes: ArticleChanges) {
        if let Some(title) = changes.title.filter(|t| !t.is_empty()) {
            self.title = title;
        }
        if let Some(url) = changes.url.filter(|u| !u.is_empty()) {
            self.url = url;
        }
    }
}

impl Reactable for Article {
    fn votes_mut(&mut self) -> &mut VoteSet {
        &mut self.votes
    }
}

/// Fields required to create an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub username: String,
}

impl NewArticle {
    /// Creates the input for a new article.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            username: username.into(),
        }
    }
}

/// Partial update of an article. Absent or empty fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// An article together with its resolved comments.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    /// Comments resolved from `comment_ids`; unresolvable ids stay as `None`.
    pub comments: Vec<Option<Comment>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_creation() {
        let article = Article::new(1, "Rust 2024", "https://example.com", "alice");

        assert_eq!(article.id, 1);
        assert_eq!(article.username, "alice");
        assert!(article.comment_ids.is_empty());
        assert!(article.votes.upvoted_by.is_empty());
    }

    #[test]
    fn test_partial_update_keeps_missing_and_empty_fields() {
        let mut article = Article::new(1, "Old title", "https://old.example", "alice");

        article.apply(ArticleChanges {
            title: Some("New title".to_string()),
            url: Some(String::new()),
        });
        assert_eq!(article.title, "New title");
        assert_eq!(article.url, "https://old.example");

        article.apply(ArticleChanges {
            title: None,
            url: Some("https://new.example".to_string()),
        });
        assert_eq!(article.title, "New title");
        assert_eq!(article.url, "https://new.example");
    }

    #[test]
    fn test_article_json_shape() {
        let mut article = Article::new(3, "T", "U", "alice");
        article.comment_ids.push(7);
        article.react(crate::Vote::Down, "bob");

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["commentIds"][0], 7);
        assert_eq!(json["downvotedBy"][0], "bob");
        assert!(json["upvotedBy"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_detail_flattens_article() {
        let detail = ArticleDetail {
            article: Article::new(1, "T", "U", "alice"),
            comments: vec![None],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["title"], "T");
        assert!(json["comments"][0].is_null());
    }
}
