//! In-memory storage for users, articles and comments.

use parking_lot::RwLock;

use crate::{
    error::StoreError, Article, ArticleChanges, ArticleDetail, Comment, NewArticle, NewComment,
    Reactable, Result, Snapshot, User, UserEntry, UserProfile, Vote,
};

/// In-memory store for users, articles and comments.
///
/// Every table sits behind one lock, so each operation (including cascading
/// deletes) is applied as a whole before the next one starts. Deleted articles
/// and comments are tombstoned: their slot stays, empty, and their id is never
/// reused.
#[derive(Default)]
pub struct ContentStore {
    tables: RwLock<Snapshot>,
}

impl ContentStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store hydrated from a snapshot.
    pub fn from_snapshot(mut snapshot: Snapshot) -> Self {
        snapshot.normalize();
        Self {
            tables: RwLock::new(snapshot),
        }
    }

    /// Returns a copy of the entire store state.
    pub fn snapshot(&self) -> Snapshot {
        self.tables.read().clone()
    }

    /// Replaces the entire store state.
    pub fn restore(&self, mut snapshot: Snapshot) {
        snapshot.normalize();
        *self.tables.write() = snapshot;
    }

    // ==================== Users ====================

    /// Returns the user with this username, creating it first if needed.
    pub fn get_or_create_user(&self, username: &str) -> Result<UserEntry> {
        if username.is_empty() {
            return Err(StoreError::Validation("username is required".to_string()));
        }

        let mut tables = self.tables.write();
        if let Some(user) = tables.users.get(username) {
            return Ok(UserEntry::Existing(user.clone()));
        }

        let user = User::new(username);
        tables.users.insert(username.to_string(), user.clone());
        Ok(UserEntry::Created(user))
    }

    /// Gets a user together with their articles and comments.
    pub fn get_user(&self, username: &str) -> Result<UserProfile> {
        let tables = self.tables.read();
        let user = tables
            .users
            .get(username)
            .ok_or_else(|| StoreError::UserNotFound {
                username: username.to_string(),
            })?;

        Ok(UserProfile {
            user: user.clone(),
            user_articles: user
                .article_ids
                .iter()
                .map(|id| tables.article(*id).cloned())
                .collect(),
            user_comments: user
                .comment_ids
                .iter()
                .map(|id| tables.comment(*id).cloned())
                .collect(),
        })
    }

    // ==================== Articles ====================

    /// Lists live articles, newest first.
    pub fn list_articles(&self) -> Vec<Article> {
        self.tables
            .read()
            .articles
            .values()
            .rev()
            .flatten()
            .cloned()
            .collect()
    }

    /// Gets an article together with its comments.
    pub fn get_article(&self, id: u64) -> Result<ArticleDetail> {
        let tables = self.tables.read();
        let article = tables
            .article(id)
            .ok_or(StoreError::ArticleNotFound { id })?;

        Ok(ArticleDetail {
            article: article.clone(),
            comments: article
                .comment_ids
                .iter()
                .map(|comment_id| tables.comment(*comment_id).cloned())
                .collect(),
        })
    }

    /// Creates a new article owned by an existing user.
    pub fn create_article(&self, new: NewArticle) -> Result<Article> {
        if new.title.is_empty() || new.url.is_empty() || new.username.is_empty() {
            return Err(StoreError::Validation(
                "article requires a title, url and username".to_string(),
            ));
        }

        let mut guard = self.tables.write();
        let tables = &mut *guard;

        let owner = tables
            .users
            .get_mut(&new.username)
            .ok_or_else(|| StoreError::UserNotFound {
                username: new.username.clone(),
            })?;

        let id = tables.next_article_id;
        tables.next_article_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Validation("article ids exhausted".to_string()))?;

        let article = Article::new(id, new.title, new.url, new.username);
        owner.article_ids.push(id);
        tables.articles.insert(id, Some(article.clone()));
        Ok(article)
    }

    /// Updates the title and url of an article.
    pub fn update_article(&self, id: u64, changes: ArticleChanges) -> Result<Article> {
        let mut tables = self.tables.write();
        let article = tables
            .article_mut(id)
            .ok_or(StoreError::ArticleNotFound { id })?;

        article.apply(changes);
        Ok(article.clone())
    }

    /// Deletes an article and every comment on it.
    pub fn delete_article(&self, id: u64) -> Result<()> {
        let mut guard = self.tables.write();
        let tables = &mut *guard;

        let article = tables
            .articles
            .get_mut(&id)
            .and_then(Option::take)
            .ok_or(StoreError::ArticleNotFound { id })?;

        for comment_id in &article.comment_ids {
            let Some(comment) = tables.comments.get_mut(comment_id).and_then(Option::take) else {
                continue;
            };
            if let Some(author) = tables.users.get_mut(&comment.username) {
                author.comment_ids.retain(|c| c != comment_id);
            }
        }

        if let Some(owner) = tables.users.get_mut(&article.username) {
            owner.article_ids.retain(|a| *a != id);
        }
        Ok(())
    }

    /// Records a vote on an article.
    pub fn react_article(&self, id: u64, username: &str, vote: Vote) -> Result<Article> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(username) {
            return Err(StoreError::UserNotFound {
                username: username.to_string(),
            });
        }

        let article = tables
            .article_mut(id)
            .ok_or(StoreError::ArticleNotFound { id })?;
        article.react(vote, username);
        Ok(article.clone())
    }

    /// Upvotes an article.
    pub fn upvote_article(&self, id: u64, username: &str) -> Result<Article> {
        self.react_article(id, username, Vote::Up)
    }

    /// Downvotes an article.
    pub fn downvote_article(&self, id: u64, username: &str) -> Result<Article> {
        self.react_article(id, username, Vote::Down)
    }

    // ==================== Comments ====================

    /// Creates a new comment by an existing user on an existing article.
    pub fn create_comment(&self, new: NewComment) -> Result<Comment> {
        if new.body.is_empty() || new.username.is_empty() || new.article_id == 0 {
            return Err(StoreError::Validation(
                "comment requires a body, username and articleId".to_string(),
            ));
        }

        let mut guard = self.tables.write();
        let tables = &mut *guard;

        if !tables.users.contains_key(&new.username) {
            return Err(StoreError::UserNotFound {
                username: new.username,
            });
        }
        if tables.article(new.article_id).is_none() {
            return Err(StoreError::ArticleNotFound {
                id: new.article_id,
            });
        }

        let id = tables.next_comment_id;
        tables.next_comment_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Validation("comment ids exhausted".to_string()))?;

        let comment = Comment::new(id, new.body, new.username, new.article_id);
        if let Some(author) = tables.users.get_mut(&comment.username) {
            author.comment_ids.push(id);
        }
        if let Some(article) = tables.article_mut(comment.article_id) {
            article.comment_ids.push(id);
        }
        tables.comments.insert(id, Some(comment.clone()));
        Ok(comment)
    }

    /// Updates the body of a comment. An empty body leaves it unchanged.
    pub fn update_comment(&self, id: u64, body: Option<String>) -> Result<Comment> {
        let mut tables = self.tables.write();
        let comment = tables
            .comment_mut(id)
            .ok_or(StoreError::CommentNotFound { id })?;

        if let Some(body) = body {
            comment.update_body(body);
        }
        Ok(comment.clone())
    }

    /// Deletes a comment and removes it from its author and article.
    pub fn delete_comment(&self, id: u64) -> Result<()> {
        let mut guard = self.tables.write();
        let tables = &mut *guard;

        let comment = tables
            .comments
            .get_mut(&id)
            .and_then(Option::take)
            .ok_or(StoreError::CommentNotFound { id })?;

        if let Some(author) = tables.users.get_mut(&comment.username) {
            author.comment_ids.retain(|c| *c != id);
        }
        if let Some(article) = tables.article_mut(comment.article_id) {
            article.comment_ids.retain(|c| *c != id);
        }
        Ok(())
    }

    /// Records a vote on a comment.
    pub fn react_comment(&self, id: u64, username: &str, vote: Vote) -> Result<Comment> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(username) {
            return Err(StoreError::UserNotFound {
                username: username.to_string(),
            });
        }

        let comment = tables
            .comment_mut(id)
            .ok_or(StoreError::CommentNotFound { id })?;
        comment.react(vote, username);
        Ok(comment.clone())
    }

    /// Upvotes a comment.
    pub fn upvote_comment(&self, id: u64, username: &str) -> Result<Comment> {
        self.react_comment(id, username, Vote::Up)
    }

    /// Downvotes a comment.
    pub fn downvote_comment(&self, id: u64, username: &str) -> Result<Comment> {
        self.react_comment(id, username, Vote::Down)
    }
}
