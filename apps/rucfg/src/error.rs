//! CLI error handling

use std::fmt;

use rucfg_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(rucfg_errors::ConfigError),
    /// Dispatcher, framework or limiter error
    Dispatch(rucfg_errors::Error),
    /// Change file could not be parsed
    InvalidChanges(String),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    fn headline(&self) -> String {
        match self {
            CliError::Config(e) => format!("Configuration error: {}", e.user_message()),
            CliError::Dispatch(e) => e.user_message().into_owned(),
            CliError::InvalidChanges(msg) => format!("Invalid change file: {msg}"),
            CliError::Io(e) => format!("I/O error: {e}"),
        }
    }

    /// Stable error code, if the underlying error has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_code(),
            CliError::Dispatch(e) => e.user_code(),
            CliError::InvalidChanges(_) => Some("cli.invalid_changes"),
            CliError::Io(_) => Some("cli.io"),
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_hint(),
            CliError::Dispatch(e) => e.user_hint(),
            CliError::InvalidChanges(_) | CliError::Io(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            CliError::Config(e) => e.is_retryable(),
            CliError::Dispatch(e) => e.is_retryable(),
            CliError::InvalidChanges(_) | CliError::Io(_) => false,
        }
    }

    /// Machine-readable form written to stderr in `--json` mode
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.headline(),
            "code": self.code(),
            "hint": self.hint(),
            "retryable": self.is_retryable(),
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())?;
        if let Some(code) = self.code() {
            write!(f, "\n  Code: {code}")?;
        }
        if let Some(hint) = self.hint() {
            write!(f, "\n  Hint: {hint}")?;
        }
        if self.is_retryable() {
            write!(f, "\n  Retry: safe to retry this operation.")?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Dispatch(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidChanges(_) => None,
        }
    }
}

impl From<rucfg_errors::ConfigError> for CliError {
    fn from(e: rucfg_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<rucfg_errors::Error> for CliError {
    fn from(e: rucfg_errors::Error) -> Self {
        match e {
            rucfg_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Dispatch(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidChanges(e.to_string())
    }
}
