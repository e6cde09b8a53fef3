use async_trait::async_trait;

use crate::domain::{IngestError, MessageError, PushMessage};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("push suspended for token {0}")]
    Rejected(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("state error: {0}")]
    State(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        match e {
            MessageError::MissingField(field) => AppError::MissingField(field),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Rejected(token) => AppError::Rejected(token),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Deliver one message for one token to the outside world.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, token: &str, message: &PushMessage) -> AppResult<()>;
}
