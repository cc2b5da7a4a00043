//! Recognized resource-unit configuration names

use rucfg_errors::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration keys stored in the `name` column of the resource-unit table
///
/// The set is closed: any other wire string is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceName {
    #[serde(rename = "resource_max_connections")]
    ConnectionLimit,
    #[serde(rename = "resource_cpu")]
    CpuQuota,
}

impl ResourceName {
    pub const CONNECTION_LIMIT: &'static str = "resource_max_connections";
    pub const CPU_QUOTA: &'static str = "resource_cpu";

    /// All recognized names
    pub const ALL: [Self; 2] = [Self::ConnectionLimit, Self::CpuQuota];

    /// Wire-level string persisted in the config table
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionLimit => Self::CONNECTION_LIMIT,
            Self::CpuQuota => Self::CPU_QUOTA,
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceName {
    type Err = DispatchError;

    // Exact match: the table stores these keys verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::CONNECTION_LIMIT => Ok(Self::ConnectionLimit),
            Self::CPU_QUOTA => Ok(Self::CpuQuota),
            _ => Err(DispatchError::not_supported(format!(
                "unknown resource name: {s}"
            ))),
        }
    }
}
