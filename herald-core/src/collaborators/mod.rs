//! Collaborator abstractions.
//!
//! The dispatcher talks to three outside systems: the code-review backend,
//! the preference store, and the chat transport. Each one is a trait here so
//! production backends and test doubles plug in the same way. In-memory
//! implementations live in [`memory`].

mod memory;
mod snapshot;

pub use memory::{InMemorySettingsStore, InMemoryVcs, RecordingChatService, SentMessage};
pub use snapshot::VcsSnapshot;

use anyhow::Result;
use async_trait::async_trait;

use crate::ids::{CommentId, PrId, UserId};
use crate::model::{Comment, PullRequest, Review, ReviewRequest, UserSettings};

/// The version-control / code-review backend.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Get a pull request, returning None if it does not exist.
    async fn get_pr(&self, id: &PrId) -> Result<Option<PullRequest>>;

    /// All comments on a pull request.
    async fn comments_for_pr(&self, id: &PrId) -> Result<Vec<Comment>>;

    /// The thread containing `comment`, earliest ancestor first.
    async fn comment_thread(&self, pr: &PrId, comment: &CommentId) -> Result<Vec<Comment>>;

    /// Users mentioned in a body of text.
    async fn mentions(&self, text: &str) -> Result<Vec<UserId>>;

    async fn review_requests_for_pr(&self, id: &PrId) -> Result<Vec<ReviewRequest>>;

    async fn reviews_for_pr(&self, id: &PrId) -> Result<Vec<Review>>;

    async fn create_comment(&self, comment: Comment) -> Result<()>;
}

/// Per-user notification preferences.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Settings for `user`. Never absent: a user with nothing stored gets
    /// default-populated settings. Only storage failures are errors.
    async fn user_settings(&self, user: &UserId) -> Result<UserSettings>;

    async fn set_user_settings(&self, user: &UserId, settings: UserSettings) -> Result<()>;
}

/// Outbound messaging transport.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send_message(&self, to: &UserId, text: &str) -> Result<()>;
}
