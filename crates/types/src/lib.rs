#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for rucfg
//!
//! This crate provides the types shared between the config-table framework,
//! the resource-unit dispatcher and the limiter processors: the change
//! notification bundle, the recognized resource names and the tenant/cluster
//! key used to index limiter state.

pub mod params;
pub mod resource;
pub mod unit;

// Re-export commonly used types
pub use params::{ConfigChangeParams, SqlField, SqlFieldResult, StatementKind};
pub use resource::ResourceName;
pub use unit::UnitKey;

use serde::{Deserialize, Serialize};

/// Output format for CLI rendering and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

// Implement clap::ValueEnum for OutputFormat
impl clap::ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Plain, Self::Json]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Plain => clap::builder::PossibleValue::new("plain"),
            Self::Json => clap::builder::PossibleValue::new("json"),
        })
    }
}
