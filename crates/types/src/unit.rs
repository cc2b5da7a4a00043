//! Tenant/cluster identity of a resource unit

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the resource unit a limiter entry belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    pub cluster: String,
    pub tenant: String,
}

impl UnitKey {
    #[must_use]
    pub fn new(cluster: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            tenant: tenant.into(),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tenant, self.cluster)
    }
}
