use thiserror::Error;

/// Errors surfaced by the dispatcher.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The caller handed us inconsistent data: a comment that does not belong
    /// to the pull request passed with it, or an event whose pull request does
    /// not exist. Never retried here.
    #[error("internal error: {0}")]
    Internal(String),

    /// A collaborator (VCS, settings store, chat transport) failed.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl NotifyError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

pub type Result<T, E = NotifyError> = std::result::Result<T, E>;
