//! Records supplied by the collaborators.
//!
//! Herald never owns these; it reads them from the VCS backend and the
//! settings store and combines them to decide who hears about what.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{CommentId, PrId, ReviewId, ReviewRequestId, UserId};

/// A pull request: the top-level unit every comment, review and review
/// request hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: PrId,
    pub author: UserId,
    pub name: String,
    pub url: String,
}

/// A comment on a pull request, optionally replying to another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub pr: PrId,
    pub author: UserId,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<CommentId>,
}

/// One user asking another to review a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub id: ReviewRequestId,
    pub pr: PrId,
    pub requester: UserId,
    pub requestee: UserId,
}

/// Verdict attached to a submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Accept,
    RequestChanges,
    Comment,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Accept => write!(f, "ACCEPT"),
            ReviewStatus::RequestChanges => write!(f, "REQUEST_CHANGES"),
            ReviewStatus::Comment => write!(f, "COMMENT"),
        }
    }
}

/// A submitted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub pr: PrId,
    pub reviewer: UserId,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Per-user notification preferences.
///
/// `enabled` is optional in storage; a missing flag means the user has never
/// opted out, so notifications are on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl UserSettings {
    /// Settings for a user with nothing stored.
    pub fn default_for(user: UserId) -> Self {
        Self {
            user,
            enabled: Some(true),
        }
    }

    /// Whether this user accepts notifications. Opt-out model: absent means yes.
    pub fn notifications_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}
