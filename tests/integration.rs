//! Integration tests for rucfg
//!
//! These tests drive the real processors through the config-table
//! framework, the way the running process does.

use rucfg_config::Config;
use rucfg_errors::{DispatchError, Error, LimitError};
use rucfg_limits::{ConnTableProcessor, CpuTableProcessor};
use rucfg_table::ConfigProcessor;
use rucfg_types::{ConfigChangeParams, StatementKind};
use rucfg_unit::ResourceUnitDispatcher;
use std::sync::Arc;

const TABLE: &str = "resource_unit";
const CONN: &str = "resource_max_connections";
const CPU: &str = "resource_cpu";

// Test utilities module
mod utils {
    use super::*;

    pub struct TestEnvironment {
        pub framework: ConfigProcessor,
        pub conn: Arc<ConnTableProcessor>,
        pub cpu: Arc<CpuTableProcessor>,
        pub dispatcher: Arc<ResourceUnitDispatcher>,
    }

    impl TestEnvironment {
        pub fn new(config: &Config) -> Result<Self, Error> {
            let conn = Arc::new(ConnTableProcessor::new(config.limits.max_connections_cap));
            let cpu = Arc::new(CpuTableProcessor::new(config.cpu_count()));
            let dispatcher = Arc::new(ResourceUnitDispatcher::new(conn.clone(), cpu.clone()));
            let framework = ConfigProcessor::new();
            dispatcher.init(&framework)?;
            Ok(Self {
                framework,
                conn,
                cpu,
                dispatcher,
            })
        }

        pub fn with_defaults() -> Self {
            let mut config = Config::default();
            config.limits.cpu_count = 8;
            Self::new(&config).unwrap()
        }

        pub fn replace(&self, tenant: &str, name: &str, value: &str) -> Result<(), Error> {
            let params = ConfigChangeParams::new("c1", tenant, StatementKind::Replace)
                .with_field("name", name)
                .with_field("value", value);
            self.framework.apply(TABLE, &params)
        }

        pub fn delete(&self, tenant: &str, name: Option<&str>) -> Result<(), Error> {
            let mut params = ConfigChangeParams::new("c1", tenant, StatementKind::Delete);
            if let Some(name) = name {
                params = params.with_field("name", name);
            }
            self.framework.apply(TABLE, &params)
        }
    }
}

use utils::TestEnvironment;

#[test]
fn test_replace_commit_round_trip() {
    let env = TestEnvironment::with_defaults();
    env.replace("t1", CONN, "300").unwrap();
    env.replace("t1", CPU, "2.5").unwrap();

    assert_eq!(env.conn.max_connections("c1", "t1"), Some(300));
    assert_eq!(env.cpu.cpu_quota("c1", "t1"), Some(2.5));
    assert!(!env.conn.has_pending());
    assert!(!env.cpu.has_pending());
}

#[test]
fn test_rejected_replace_leaves_previous_value() {
    let env = TestEnvironment::with_defaults();
    env.replace("t1", CONN, "300").unwrap();

    let err = env.replace("t1", CONN, "lots").unwrap_err();
    assert!(matches!(err, Error::Limit(LimitError::InvalidValue { .. })));
    assert_eq!(env.conn.max_connections("c1", "t1"), Some(300));
}

#[test]
fn test_failed_transaction_rolls_back() {
    let env = TestEnvironment::with_defaults();
    env.replace("t1", CONN, "300").unwrap();

    let params = ConfigChangeParams::new("c1", "t1", StatementKind::Replace)
        .with_field("name", CONN)
        .with_field("value", "900");
    env.framework
        .apply_with_outcome(TABLE, &params, false)
        .unwrap();
    assert_eq!(env.conn.max_connections("c1", "t1"), Some(300));
}

#[test]
fn test_wildcard_delete_removes_both_limits() {
    let env = TestEnvironment::with_defaults();
    env.replace("t1", CONN, "300").unwrap();
    env.replace("t1", CPU, "1").unwrap();
    env.replace("t2", CONN, "50").unwrap();

    env.delete("t1", None).unwrap();
    assert_eq!(env.conn.max_connections("c1", "t1"), None);
    assert_eq!(env.cpu.cpu_quota("c1", "t1"), None);
    assert_eq!(env.conn.max_connections("c1", "t2"), Some(50));
}

#[test]
fn test_named_delete_removes_one_limit() {
    let env = TestEnvironment::with_defaults();
    env.replace("t1", CONN, "300").unwrap();
    env.replace("t1", CPU, "1").unwrap();

    env.delete("t1", Some(CPU)).unwrap();
    assert_eq!(env.conn.max_connections("c1", "t1"), Some(300));
    assert_eq!(env.cpu.cpu_quota("c1", "t1"), None);
}

#[test]
fn test_unsupported_changes_are_rejected() {
    let env = TestEnvironment::with_defaults();
    let err = env.replace("t1", "resource_memory", "1").unwrap_err();
    assert!(matches!(err, Error::Dispatch(DispatchError::NotSupported { .. })));

    let params = ConfigChangeParams::new("c1", "t1", StatementKind::Insert)
        .with_field("name", CONN)
        .with_field("value", "1");
    assert!(env.framework.apply(TABLE, &params).is_err());
    assert!(env.conn.is_empty());
}

#[test]
fn test_dispatcher_init_twice_through_framework() {
    let env = TestEnvironment::with_defaults();
    assert!(env.dispatcher.is_initialized());
    assert!(matches!(
        env.dispatcher.init(&env.framework),
        Err(Error::Dispatch(DispatchError::AlreadyInitialized { .. }))
    ));
    assert!(env.cpu.is_initialized());
}

#[test]
fn test_rows_for_different_tenants_in_parallel() {
    let env = Arc::new(TestEnvironment::with_defaults());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let env = Arc::clone(&env);
            std::thread::spawn(move || {
                let tenant = format!("t{i}");
                env.replace(&tenant, CONN, &(100 + i).to_string()).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(env.conn.len(), 8);
    for i in 0..8 {
        assert_eq!(
            env.conn.max_connections("c1", &format!("t{i}")),
            Some(100 + i)
        );
    }
}

#[test]
fn test_parallel_rollback_leaves_other_rows_alone() {
    let env = Arc::new(TestEnvironment::with_defaults());
    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let env = Arc::clone(&env);
            std::thread::spawn(move || {
                let params = ConfigChangeParams::new("c1", format!("t{i}"), StatementKind::Replace)
                    .with_field("name", CONN)
                    .with_field("value", (100 + i).to_string());
                env.framework
                    .apply_with_outcome(TABLE, &params, i % 2 == 0)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(env.conn.len(), 4);
    for i in 0..8u64 {
        let expected = (i % 2 == 0).then_some(100 + i);
        assert_eq!(env.conn.max_connections("c1", &format!("t{i}")), expected);
    }
    assert!(!env.conn.has_pending());
}

#[tokio::test]
async fn test_environment_from_config_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[limits]\nmax_connections_cap = 10\ncpu_count = 2").unwrap();
    let config = Config::load_from_file(file.path()).await.unwrap();

    let env = TestEnvironment::new(&config).unwrap();
    env.replace("t1", CONN, "10").unwrap();
    assert!(env.replace("t1", CONN, "11").is_err());
    assert!(env.replace("t1", CPU, "3").is_err());
    env.replace("t1", CPU, "2").unwrap();
}
