//! Resource-unit dispatch error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Failures raised by the resource-unit dispatcher itself.
///
/// Failures produced by the limiter processors are never wrapped in this
/// type; they travel back to the config-table framework as the processor
/// reported them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchError {
    /// A required field was missing or empty
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Unrecognized statement kind or configuration name
    #[error("not supported: {message}")]
    NotSupported { message: String },

    #[error("{component} already initialized")]
    AlreadyInitialized { component: String },

    #[error("unexpected: {message}")]
    Unexpected { message: String },
}

impl DispatchError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}

impl UserFacingError for DispatchError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { .. } => {
                Some("Every resource_unit row needs a cluster, a tenant, and for replace a name and value.")
            }
            Self::NotSupported { .. } => Some(
                "Only replace/delete statements for resource_max_connections and resource_cpu are accepted.",
            ),
            Self::AlreadyInitialized { .. } | Self::Unexpected { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidArgument { .. } => "dispatch.invalid_argument",
            Self::NotSupported { .. } => "dispatch.not_supported",
            Self::AlreadyInitialized { .. } => "dispatch.already_initialized",
            Self::Unexpected { .. } => "dispatch.unexpected",
        };
        Some(code)
    }
}
