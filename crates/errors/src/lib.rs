#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for rucfg
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so a delegate's failure can be handed
//! back to the config-table framework unchanged.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod dispatch;
pub mod limit;
pub mod table;

// Re-export all error types at the root
pub use config::ConfigError;
pub use dispatch::DispatchError;
pub use limit::LimitError;
pub use table::TableError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("limit error: {0}")]
    Limit(#[from] LimitError),

    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns the dispatch error kind if this is one
    #[must_use]
    pub fn as_dispatch(&self) -> Option<&DispatchError> {
        match self {
            Self::Dispatch(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the limiter error kind if this is one
    #[must_use]
    pub fn as_limit(&self) -> Option<&LimitError> {
        match self {
            Self::Limit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(ConfigError::ParseError {
            message: err.to_string(),
        })
    }
}

/// Result type alias for rucfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Dispatch(err) => err.user_message(),
            Error::Limit(err) => err.user_message(),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Dispatch(err) => err.user_hint(),
            Error::Limit(err) => err.user_hint(),
            Error::Table(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Limit(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Dispatch(err) => err.user_code(),
            Error::Limit(err) => err.user_code(),
            Error::Table(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
        }
    }
}
