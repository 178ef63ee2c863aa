//! Upvote/downvote bookkeeping shared by articles and comments.

use serde::{Deserialize, Serialize};

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    /// Upvote.
    Up,
    /// Downvote.
    Down,
}

/// The pair of mutually exclusive username lists attached to a reactable record.
///
/// A username appears in at most one of the two lists. Lists keep the order in
/// which votes were first cast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSet {
    /// Users who upvoted.
    #[serde(default)]
    pub upvoted_by: Vec<String>,
    /// Users who downvoted.
    #[serde(default)]
    pub downvoted_by: Vec<String>,
}

impl VoteSet {
    /// Creates an empty vote set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an upvote, withdrawing any downvote by the same user.
    pub fn upvote(&mut self, username: &str) {
        self.downvoted_by.retain(|u| u != username);
        if !self.has_upvoted(username) {
            self.upvoted_by.push(username.to_string());
        }
    }

    /// Records a downvote, withdrawing any upvote by the same user.
    pub fn downvote(&mut self, username: &str) {
        self.upvoted_by.retain(|u| u != username);
        if !self.has_downvoted(username) {
            self.downvoted_by.push(username.to_string());
        }
    }

    /// Records a vote in the given direction.
    pub fn cast(&mut self, vote: Vote, username: &str) {
        match vote {
            Vote::Up => self.upvote(username),
            Vote::Down => self.downvote(username),
        }
    }

    /// Returns true if the user has upvoted.
    pub fn has_upvoted(&self, username: &str) -> bool {
        self.upvoted_by.iter().any(|u| u == username)
    }

    /// Returns true if the user has downvoted.
    pub fn has_downvoted(&self, username: &str) -> bool {
        self.downvoted_by.iter().any(|u| u == username)
    }
}

/// A record that carries a [`VoteSet`].
pub trait Reactable {
    /// Returns the record's votes for mutation.
    fn votes_mut(&mut self) -> &mut VoteSet;

    /// Records a vote on this record.
    fn react(&mut self, vote: Vote, username: &str) {
        self.votes_mut().cast(vote, username);
    }
}
