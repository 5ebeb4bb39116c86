//! Code-review lifecycle events that trigger notifications.

use serde::{Deserialize, Serialize};

use crate::ids::{PrId, UserId};
use crate::model::{Comment, Review, ReviewRequest};

/// An event handed to the dispatcher by whatever ingests backend activity
/// (webhook receiver, queue consumer, replay tool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A comment was posted.
    Comment(Comment),
    /// Someone asked someone else for a review.
    ReviewRequest(ReviewRequest),
    /// A review was submitted.
    Review(Review),
}

impl NotificationEvent {
    /// The pull request the event belongs to.
    pub fn pr(&self) -> &PrId {
        match self {
            Self::Comment(c) => &c.pr,
            Self::ReviewRequest(r) => &r.pr,
            Self::Review(r) => &r.pr,
        }
    }

    /// The user whose action produced the event.
    pub fn actor(&self) -> &UserId {
        match self {
            Self::Comment(c) => &c.author,
            Self::ReviewRequest(r) => &r.requester,
            Self::Review(r) => &r.reviewer,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Comment(_) => "comment",
            Self::ReviewRequest(_) => "review_request",
            Self::Review(_) => "review",
        }
    }
}
