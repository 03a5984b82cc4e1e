use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::Stage;

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Conversation {0} not found")]
    NotFound(Uuid),

    #[error("Cannot {action} while the conversation is in the {stage} stage")]
    InvalidTransition { stage: Stage, action: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No report yet for conversation {0}")]
    ReportNotReady(Uuid),
}

impl From<ConversationError> for AppError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound(_) | ConversationError::ReportNotReady(_) => {
                AppError::NotFound(err.to_string())
            }
            ConversationError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            ConversationError::InvalidInput(msg) => AppError::ValidationError(msg),
        }
    }
}
