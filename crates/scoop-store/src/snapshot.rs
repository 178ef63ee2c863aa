//! Whole-store snapshots for persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Article, Comment, Result, User};

/// The complete state of a [`ContentStore`](crate::ContentStore).
///
/// Deleted articles and comments are kept as `null` entries so their ids are
/// remembered. Any key missing from a serialized snapshot falls back to its
/// empty default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Users indexed by username.
    pub users: BTreeMap<String, User>,
    /// Article slots indexed by id; `None` marks a deleted article.
    pub articles: BTreeMap<u64, Option<Article>>,
    /// Next id handed out to an article.
    pub next_article_id: u64,
    /// Comment slots indexed by id; `None` marks a deleted comment.
    pub comments: BTreeMap<u64, Option<Comment>>,
    /// Next id handed out to a comment.
    pub next_comment_id: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            articles: BTreeMap::new(),
            next_article_id: 1,
            comments: BTreeMap::new(),
            next_comment_id: 1,
        }
    }
}

impl Snapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let mut snapshot: Snapshot = serde_json::from_slice(data)?;
        snapshot.normalize();
        Ok(snapshot)
    }

    /// Serializes the snapshot to pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Drops records stored under id `0` and raises both id counters past every
    /// id already present.
    pub fn normalize(&mut self) {
        self.articles.remove(&0);
        self.comments.remove(&0);

        let max_article = self.articles.keys().next_back().copied().unwrap_or(0);
        self.next_article_id = self.next_article_id.max(max_article.saturating_add(1)).max(1);

        let max_comment = self.comments.keys().next_back().copied().unwrap_or(0);
        self.next_comment_id = self.next_comment_id.max(max_comment.saturating_add(1)).max(1);
    }

    /// Number of live (not deleted) articles.
    pub fn live_articles(&self) -> usize {
        self.articles.values().flatten().count()
    }

    /// Number of live (not deleted) comments.
    pub fn live_comments(&self) -> usize {
        self.comments.values().flatten().count()
    }

    pub(crate) fn article(&self, id: u64) -> Option<&Article> {
        self.articles.get(&id).and_then(Option::as_ref)
    }

    pub(crate) fn article_mut(&mut self, id: u64) -> Option<&mut Article> {
        self.articles.get_mut(&id).and_then(Option::as_mut)
    }

    pub(crate) fn comment(&self, id: u64) -> Option<&Comment> {
        self.comments.get(&id).and_then(Option::as_ref)
    }

    pub(crate) fn comment_mut(&mut self, id: u64) -> Option<&mut Comment> {
        self.comments.get_mut(&id).and_then(Option::as_mut)
    }
}
