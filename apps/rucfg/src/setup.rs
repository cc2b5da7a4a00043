//! Composition root: wires the framework, processors and dispatcher

use crate::changes::ChangeRecord;
use rucfg_config::Config;
use rucfg_errors::{Error, UserFacingError};
use rucfg_limits::{ConnTableProcessor, CpuTableProcessor};
use rucfg_table::ConfigProcessor;
use rucfg_types::StatementKind;
use rucfg_unit::ResourceUnitDispatcher;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of replaying one change record
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub index: usize,
    pub cluster: String,
    pub tenant: String,
    pub kind: StatementKind,
    pub committed: bool,
    pub error: Option<String>,
    pub code: Option<&'static str>,
}

impl RecordOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Limits in force for one tenant/cluster pair
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnitLimits {
    pub cluster: String,
    pub tenant: String,
    pub max_connections: Option<u64>,
    pub cpu: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub outcomes: Vec<RecordOutcome>,
    pub units: Vec<UnitLimits>,
}

/// Process-wide components, constructed once and shared by handle
pub struct SystemSetup {
    table_name: String,
    framework: ConfigProcessor,
    conn: Arc<ConnTableProcessor>,
    cpu: Arc<CpuTableProcessor>,
}

impl SystemSetup {
    /// Build the processors and register the dispatcher with the framework
    pub fn initialize(config: &Config) -> Result<Self, Error> {
        let conn = Arc::new(ConnTableProcessor::new(config.limits.max_connections_cap));
        let cpu = Arc::new(CpuTableProcessor::new(config.cpu_count()));
        let framework = ConfigProcessor::new();

        let dispatcher = Arc::new(
            ResourceUnitDispatcher::new(conn.clone(), cpu.clone())
                .with_table_name(config.general.table_name.clone()),
        );
        dispatcher.init(&framework)?;
        info!(table = %config.general.table_name, "system initialization completed");

        Ok(Self {
            table_name: config.general.table_name.clone(),
            framework,
            conn,
            cpu,
        })
    }

    /// Replay every record; a failing record does not stop the rest
    pub fn apply(&self, records: &[ChangeRecord]) -> ApplyReport {
        let outcomes = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.apply_one(index, record))
            .collect();
        ApplyReport {
            outcomes,
            units: self.units(),
        }
    }

    fn apply_one(&self, index: usize, record: &ChangeRecord) -> RecordOutcome {
        let params = record.to_params();
        let result = self
            .framework
            .apply_with_outcome(&self.table_name, &params, record.commit);
        if let Err(e) = &result {
            warn!(index, cluster = %record.cluster, tenant = %record.tenant, error = %e, "change rejected");
        }
        RecordOutcome {
            index,
            cluster: record.cluster.clone(),
            tenant: record.tenant.clone(),
            kind: record.kind,
            committed: result.is_ok() && record.commit,
            code: result.as_ref().err().and_then(UserFacingError::user_code),
            error: result.err().map(|e| e.user_message().into_owned()),
        }
    }

    /// Current limits merged per tenant/cluster pair
    pub fn units(&self) -> Vec<UnitLimits> {
        let mut units: BTreeMap<_, UnitLimits> = BTreeMap::new();
        for (key, limit) in self.conn.snapshot() {
            let entry = units.entry(key.clone()).or_insert_with(|| UnitLimits {
                cluster: key.cluster,
                tenant: key.tenant,
                ..UnitLimits::default()
            });
            entry.max_connections = Some(limit);
        }
        for (key, quota) in self.cpu.snapshot() {
            let entry = units.entry(key.clone()).or_insert_with(|| UnitLimits {
                cluster: key.cluster,
                tenant: key.tenant,
                ..UnitLimits::default()
            });
            entry.cpu = Some(quota);
        }
        units.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::parse_changes;

    fn setup() -> SystemSetup {
        let mut config = Config::default();
        config.limits.cpu_count = 4;
        SystemSetup::initialize(&config).unwrap()
    }

    #[test]
    fn test_apply_replays_all_records() {
        let records = parse_changes(
            r#"[
                {"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_max_connections"], ["value", "100"]]},
                {"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_cpu"], ["value", "1.5"]]},
                {"cluster": "c1", "tenant": "t2", "kind": "replace",
                 "fields": [["name", "resource_memory"], ["value", "1"]]},
                {"cluster": "c1", "tenant": "t2", "kind": "replace",
                 "fields": [["name", "resource_max_connections"], ["value", "7"]]}
            ]"#,
        )
        .unwrap();

        let report = setup().apply(&records);
        let ok: Vec<_> = report.outcomes.iter().map(RecordOutcome::is_ok).collect();
        assert_eq!(ok, [true, true, false, true]);
        assert_eq!(report.outcomes[2].code, Some("dispatch.not_supported"));

        assert_eq!(report.units.len(), 2);
        assert_eq!(report.units[0].max_connections, Some(100));
        assert_eq!(report.units[0].cpu, Some(1.5));
        assert_eq!(report.units[1].max_connections, Some(7));
    }

    #[test]
    fn test_uncommitted_record_rolls_back() {
        let records = parse_changes(
            r#"[
                {"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_max_connections"], ["value", "100"]]},
                {"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_max_connections"], ["value", "200"]],
                 "commit": false}
            ]"#,
        )
        .unwrap();

        let report = setup().apply(&records);
        assert!(report.outcomes[1].is_ok());
        assert!(!report.outcomes[1].committed);
        assert_eq!(report.units[0].max_connections, Some(100));
    }

    #[test]
    fn test_wildcard_delete_clears_unit() {
        let records = parse_changes(
            r#"[
                {"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_max_connections"], ["value", "100"]]},
                {"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_cpu"], ["value", "2"]]},
                {"cluster": "c1", "tenant": "t1", "kind": "delete", "fields": []}
            ]"#,
        )
        .unwrap();

        let report = setup().apply(&records);
        assert!(report.outcomes.iter().all(RecordOutcome::is_ok));
        assert!(report.units.is_empty());
    }
}
