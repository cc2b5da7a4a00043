//! In-memory maximum-connections processor

use crate::processor::ConnectionLimitProcessor;
use crate::staged::StagedTable;
use rucfg_errors::{Error, LimitError};
use rucfg_types::UnitKey;
use tracing::{debug, warn};

/// Tracks `resource_max_connections` per tenant/cluster pair
pub struct ConnTableProcessor {
    limits: StagedTable<u64>,
    max_connections_cap: u64,
}

impl ConnTableProcessor {
    #[must_use]
    pub fn new(max_connections_cap: u64) -> Self {
        Self {
            limits: StagedTable::new(),
            max_connections_cap,
        }
    }

    /// Limit currently in force (staged or committed)
    #[must_use]
    pub fn max_connections(&self, cluster: &str, tenant: &str) -> Option<u64> {
        self.limits.get(&UnitKey::new(cluster, tenant))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Whether replaces are waiting for a commit
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.limits.has_pending()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<(UnitKey, u64)> {
        self.limits.snapshot()
    }

    fn parse_limit(&self, name: &str, value: &str) -> Result<u64, LimitError> {
        let invalid = |reason: String| LimitError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason,
        };
        let limit: u64 = value
            .trim()
            .parse()
            .map_err(|_| invalid("not a non-negative integer".to_string()))?;
        if limit == 0 {
            return Err(invalid("must be positive".to_string()));
        }
        if limit > self.max_connections_cap {
            return Err(invalid(format!("exceeds cap {}", self.max_connections_cap)));
        }
        Ok(limit)
    }
}

impl ConnectionLimitProcessor for ConnTableProcessor {
    fn replace(&self, cluster: &str, tenant: &str, name: &str, value: &str) -> Result<(), Error> {
        let limit = self.parse_limit(name, value).inspect_err(|e| {
            warn!(cluster, tenant, value, error = %e, "rejecting connection limit");
        })?;
        self.limits.stage(UnitKey::new(cluster, tenant), limit);
        debug!(cluster, tenant, limit, "staged connection limit");
        Ok(())
    }

    fn delete(&self, cluster: &str, tenant: &str) -> Result<(), Error> {
        let removed = self.limits.remove(&UnitKey::new(cluster, tenant));
        debug!(cluster, tenant, existed = removed.is_some(), "deleted connection limit");
        Ok(())
    }

    fn commit(&self, is_success: bool) -> Result<(), Error> {
        let resolved = self.limits.commit(is_success);
        debug!(is_success, resolved, "committed connection limits");
        Ok(())
    }
}
