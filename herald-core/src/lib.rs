pub mod collaborators;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod format;
pub mod ids;
pub mod mentions;
pub mod model;

pub use collaborators::{
    ChatService, InMemorySettingsStore, InMemoryVcs, RecordingChatService, SentMessage,
    SettingsStore, Vcs, VcsSnapshot,
};
pub use config::{HeraldConfig, ReviewRequestPolicy};
pub use dispatcher::Dispatcher;
pub use error::NotifyError;
pub use event::NotificationEvent;
pub use format::{MessageFormatter, PlainTextFormatter};
pub use ids::{CommentId, PrId, ReviewId, ReviewRequestId, UserId};
pub use model::{Comment, PullRequest, Review, ReviewRequest, ReviewStatus, UserSettings};
