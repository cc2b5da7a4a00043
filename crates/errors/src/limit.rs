//! Limiter processor error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum LimitError {
    #[error("invalid value for {name}: {value} ({reason})")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("{processor} processor is not initialized")]
    NotInitialized { processor: String },

    #[error("{processor} processor already initialized")]
    AlreadyInitialized { processor: String },

    #[error("{processor} commit failed: {message}")]
    CommitFailed { processor: String, message: String },
}

impl UserFacingError for LimitError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidValue { .. } => Some("Check the value column of the resource_unit row."),
            Self::NotInitialized { .. } => {
                Some("Initialize the resource-unit dispatcher before applying changes.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::CommitFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidValue { .. } => "limit.invalid_value",
            Self::NotInitialized { .. } => "limit.not_initialized",
            Self::AlreadyInitialized { .. } => "limit.already_initialized",
            Self::CommitFailed { .. } => "limit.commit_failed",
        };
        Some(code)
    }
}
