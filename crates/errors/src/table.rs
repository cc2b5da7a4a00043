//! Config-table framework error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableError {
    #[error("callback already registered for table {table}")]
    AlreadyRegistered { table: String },

    #[error("no callback registered for table {table}")]
    NotRegistered { table: String },
}

impl UserFacingError for TableError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyRegistered { .. } => {
                Some("Unregister the existing handler before registering a new one.")
            }
            Self::NotRegistered { .. } => Some("Initialize the handler for this table first."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::AlreadyRegistered { .. } => "table.already_registered",
            Self::NotRegistered { .. } => "table.not_registered",
        };
        Some(code)
    }
}
