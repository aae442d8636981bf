use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("command not recognized: '{input}'")]
    ParseFailure { input: String },
    #[error("color '{color}' is not part of this design (available: {})", available.join(", "))]
    UnknownColor {
        color: String,
        available: Vec<String>,
    },
    #[error("malformed correction: {reason}")]
    InvalidShape { reason: String },
    #[error("interpreter rejected command: {message}")]
    RemoteRejected { message: String },
    #[error("'{kind}' corrections cannot be applied yet")]
    UnsupportedCorrection { kind: &'static str },
    #[error("interpreter unavailable: {source}")]
    InterpreterUnavailable {
        #[source]
        source: anyhow::Error,
    },
    #[error("no correction is awaiting confirmation")]
    NoPendingCorrection,
    #[error("failed to persist design: {source}")]
    PersistenceFailure {
        #[source]
        source: anyhow::Error,
    },
}

impl AssistantError {
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        AssistantError::InvalidShape {
            reason: reason.into(),
        }
    }

    /// Failures the user fixes by rephrasing the command.
    pub fn is_reprompt(&self) -> bool {
        matches!(
            self,
            AssistantError::ParseFailure { .. }
                | AssistantError::InvalidShape { .. }
                | AssistantError::RemoteRejected { .. }
        )
    }
}

impl From<AssistantError> for ApiError {
    fn from(value: AssistantError) -> Self {
        let code = match &value {
            AssistantError::ParseFailure { .. } | AssistantError::RemoteRejected { .. } => {
                ErrorCode::UnrecognizedCommand
            }
            AssistantError::UnknownColor { .. } => ErrorCode::UnknownColor,
            AssistantError::InvalidShape { .. } => ErrorCode::InvalidShape,
            AssistantError::UnsupportedCorrection { .. } => ErrorCode::Unsupported,
            AssistantError::NoPendingCorrection => ErrorCode::Validation,
            AssistantError::PersistenceFailure { .. } => ErrorCode::Persistence,
            AssistantError::InterpreterUnavailable { .. } => ErrorCode::Internal,
        };
        ApiError::new(code, value.to_string())
    }
}
