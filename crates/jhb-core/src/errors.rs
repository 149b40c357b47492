/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the handler set
/// can treat every collaborator failure the same way (propagate to the runner).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("messaging error: {0}")]
    Messaging(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a failed delete-message call, classified at the adapter boundary.
///
/// `NotFound` and `Undeletable` are expected in day-to-day operation (another
/// admin already removed the notification, the bot lacks the permission, the
/// 48h delete window passed). Anything else is a real failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeleteError {
    #[error("message to delete not found")]
    NotFound,

    #[error("message can't be deleted")]
    Undeletable,

    #[error("{0}")]
    Other(String),
}

impl DeleteError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DeleteError::NotFound | DeleteError::Undeletable)
    }
}

impl From<DeleteError> for Error {
    fn from(e: DeleteError) -> Self {
        Error::Messaging(format!("delete message failed: {e}"))
    }
}
