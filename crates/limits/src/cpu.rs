//! In-memory cpu quota processor

use crate::processor::CpuQuotaProcessor;
use crate::staged::StagedTable;
use rucfg_errors::{Error, LimitError};
use rucfg_types::UnitKey;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

const PROCESSOR: &str = "cpu";

/// Tracks `resource_cpu` (cores, may be fractional) per tenant/cluster pair
pub struct CpuTableProcessor {
    quotas: StagedTable<f64>,
    cpu_count: usize,
    initialized: AtomicBool,
}

impl CpuTableProcessor {
    #[must_use]
    pub fn new(cpu_count: usize) -> Self {
        Self {
            quotas: StagedTable::new(),
            cpu_count,
            initialized: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Quota currently in force (staged or committed)
    #[must_use]
    pub fn cpu_quota(&self, cluster: &str, tenant: &str) -> Option<f64> {
        self.quotas.get(&UnitKey::new(cluster, tenant))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.quotas.has_pending()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<(UnitKey, f64)> {
        self.quotas.snapshot()
    }

    fn ensure_initialized(&self) -> Result<(), LimitError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(LimitError::NotInitialized {
                processor: PROCESSOR.to_string(),
            })
        }
    }

    fn parse_quota(&self, name: &str, value: &str) -> Result<f64, LimitError> {
        let invalid = |reason: String| LimitError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason,
        };
        let quota: f64 = value
            .trim()
            .parse()
            .map_err(|_| invalid("not a number".to_string()))?;
        if !quota.is_finite() || quota <= 0.0 {
            return Err(invalid("must be a positive number of cores".to_string()));
        }
        #[allow(clippy::cast_precision_loss)]
        let available = self.cpu_count as f64;
        if quota > available {
            return Err(invalid(format!("exceeds {} available cores", self.cpu_count)));
        }
        Ok(quota)
    }
}

impl CpuQuotaProcessor for CpuTableProcessor {
    fn init(&self) -> Result<(), Error> {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LimitError::AlreadyInitialized {
                processor: PROCESSOR.to_string(),
            }
            .into());
        }
        info!(cpu_count = self.cpu_count, "cpu quota processor initialized");
        Ok(())
    }

    fn replace(&self, cluster: &str, tenant: &str, name: &str, value: &str) -> Result<(), Error> {
        self.ensure_initialized()?;
        let quota = self.parse_quota(name, value).inspect_err(|e| {
            warn!(cluster, tenant, value, error = %e, "rejecting cpu quota");
        })?;
        self.quotas.stage(UnitKey::new(cluster, tenant), quota);
        debug!(cluster, tenant, quota, "staged cpu quota");
        Ok(())
    }

    fn delete(&self, cluster: &str, tenant: &str) -> Result<(), Error> {
        self.ensure_initialized()?;
        let removed = self.quotas.remove(&UnitKey::new(cluster, tenant));
        debug!(cluster, tenant, existed = removed.is_some(), "deleted cpu quota");
        Ok(())
    }

    fn commit(&self, is_success: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        let resolved = self.quotas.commit(is_success);
        debug!(is_success, resolved, "committed cpu quotas");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "resource_cpu";

    #[test]
    fn test_requires_init() {
        let processor = CpuTableProcessor::new(4);
        assert!(matches!(
            processor.replace("c1", "t1", NAME, "1"),
            Err(Error::Limit(LimitError::NotInitialized { .. }))
        ));
        assert!(processor.commit(true).is_err());
        assert!(processor.delete("c1", "t1").is_err());
    }

    #[test]
    fn test_init_twice() {
        let processor = CpuTableProcessor::new(4);
        processor.init().unwrap();
        assert!(matches!(
            processor.init(),
            Err(Error::Limit(LimitError::AlreadyInitialized { .. }))
        ));
        assert!(processor.is_initialized());
    }

    #[test]
    fn test_fractional_quota() {
        let processor = CpuTableProcessor::new(4);
        processor.init().unwrap();
        processor.replace("c1", "t1", NAME, "1.5").unwrap();
        processor.commit(true).unwrap();
        assert_eq!(processor.cpu_quota("c1", "t1"), Some(1.5));
    }

    #[test]
    fn test_quota_bounds() {
        let processor = CpuTableProcessor::new(4);
        processor.init().unwrap();
        for value in ["0", "-2", "4.5", "NaN", "inf", "two"] {
            assert!(
                processor.replace("c1", "t1", NAME, value).is_err(),
                "{value} should be rejected"
            );
        }
        processor.replace("c1", "t1", NAME, "4").unwrap();
    }

    #[test]
    fn test_rollback() {
        let processor = CpuTableProcessor::new(4);
        processor.init().unwrap();
        processor.replace("c1", "t1", NAME, "2").unwrap();
        processor.commit(false).unwrap();
        assert_eq!(processor.cpu_quota("c1", "t1"), None);
    }
}
