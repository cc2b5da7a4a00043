//! Routing of resource-unit row changes to the limiter processors

use crate::extract::extract;
use rucfg_config::constants::RESOURCE_UNIT_TABLE;
use rucfg_errors::{DispatchError, Error};
use rucfg_limits::{ConnectionLimitProcessor, CpuQuotaProcessor};
use rucfg_table::{ConfigProcessor, TableHandler};
use rucfg_types::{ConfigChangeParams, ResourceName, StatementKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct InitState {
    cpu_ready: bool,
    registered: bool,
}

/// Dispatcher for the `resource_unit` config table
///
/// Owned by the composition root together with the two processors it
/// drives. It holds no per-change state: `execute` and `commit` each
/// extract the row from the bundle they are given.
pub struct ResourceUnitDispatcher {
    conn: Arc<dyn ConnectionLimitProcessor>,
    cpu: Arc<dyn CpuQuotaProcessor>,
    table_name: String,
    init: Mutex<InitState>,
}

impl ResourceUnitDispatcher {
    #[must_use]
    pub fn new(conn: Arc<dyn ConnectionLimitProcessor>, cpu: Arc<dyn CpuQuotaProcessor>) -> Self {
        Self {
            conn,
            cpu,
            table_name: RESOURCE_UNIT_TABLE.to_string(),
            init: Mutex::new(InitState::default()),
        }
    }

    /// Register under a table name other than `resource_unit`
    #[must_use]
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn init_state(&self) -> MutexGuard<'_, InitState> {
        self.init.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.init_state().registered
    }

    /// Initialize the cpu-quota processor, then register with `framework`
    ///
    /// Registration happens last so a failed processor init never leaves a
    /// stale callback behind. A retry after a failed registration does not
    /// initialize the cpu-quota processor a second time.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::AlreadyInitialized` on a second successful
    /// call, or the cpu-quota init / registration failure.
    pub fn init(self: &Arc<Self>, framework: &ConfigProcessor) -> Result<(), Error> {
        let mut state = self.init_state();
        if state.registered {
            warn!(table = %self.table_name, "init twice");
            return Err(DispatchError::AlreadyInitialized {
                component: "resource unit dispatcher".to_string(),
            }
            .into());
        }

        if !state.cpu_ready {
            self.cpu.init().inspect_err(|e| {
                warn!(error = %e, "init cpu processor failed");
            })?;
            state.cpu_ready = true;
        }

        let handler: Arc<dyn TableHandler> = Arc::<Self>::clone(self);
        framework
            .register_callback(self.table_name.clone(), handler)
            .inspect_err(|e| {
                warn!(table = %self.table_name, error = %e, "register callback failed");
            })?;
        state.registered = true;

        info!(table = %self.table_name, "resource unit dispatcher initialized");
        Ok(())
    }

    /// Validate and apply one row change
    ///
    /// # Errors
    ///
    /// Returns the extraction failure, `DispatchError::NotSupported` for a
    /// statement other than replace/delete, or the delegate's failure
    /// unchanged.
    pub fn execute(&self, params: Option<&ConfigChangeParams>) -> Result<(), Error> {
        let row = extract(params)?;
        debug!(
            cluster = row.cluster,
            tenant = row.tenant,
            name = row.name,
            value = row.value,
            stmt_kind = %row.stmt_kind,
            "execute resource unit config"
        );

        match row.stmt_kind {
            StatementKind::Replace => {
                self.handle_replace_config(row.cluster, row.tenant, row.name, row.value)
            }
            StatementKind::Delete => self.handle_delete_config(row.cluster, row.tenant, row.name),
            other => {
                warn!(stmt_kind = %other, "statement kind not supported");
                Err(DispatchError::not_supported(format!("statement kind {other}")).into())
            }
        }
    }

    /// Finalize or roll back whatever `execute` staged for this row
    ///
    /// Only the statement's `name` matters here. Rows without a recognized
    /// name (including wildcard deletes) have nothing to commit.
    ///
    /// # Errors
    ///
    /// Returns the extraction failure or the connection-limit processor's
    /// commit failure.
    pub fn commit(&self, params: Option<&ConfigChangeParams>, is_success: bool) -> Result<(), Error> {
        let row = extract(params)?;
        debug!(
            cluster = row.cluster,
            tenant = row.tenant,
            name = row.name,
            is_success,
            "commit resource unit config"
        );

        match row.name.parse::<ResourceName>() {
            Ok(ResourceName::ConnectionLimit) => self.conn.commit(is_success).inspect_err(|e| {
                warn!(
                    cluster = row.cluster,
                    tenant = row.tenant,
                    error = %e,
                    "connection limit commit failed"
                );
            }),
            Ok(ResourceName::CpuQuota) => {
                self.commit_cpu_quota_ignoring_failure(is_success);
                Ok(())
            }
            Err(_) => Ok(()),
        }
    }

    // The cpu-quota commit result is not reported to the framework, unlike
    // the connection-limit commit.
    fn commit_cpu_quota_ignoring_failure(&self, is_success: bool) {
        if let Err(e) = self.cpu.commit(is_success) {
            warn!(is_success, error = %e, "cpu quota commit failed, ignoring");
        }
    }

    /// Route a replace to the processor owning `name`
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidArgument` if `name` or `value` is
    /// empty, `DispatchError::NotSupported` for an unknown name, or the
    /// processor's failure.
    pub fn handle_replace_config(
        &self,
        cluster: &str,
        tenant: &str,
        name: &str,
        value: &str,
    ) -> Result<(), Error> {
        if name.is_empty() || value.is_empty() {
            warn!(name, value, "name or value is empty");
            return Err(DispatchError::invalid_argument("name or value is empty").into());
        }

        let resource = name.parse::<ResourceName>().inspect_err(|_| {
            warn!(name, "resource name not supported");
        })?;
        let result = match resource {
            ResourceName::ConnectionLimit => self.conn.replace(cluster, tenant, name, value),
            ResourceName::CpuQuota => self.cpu.replace(cluster, tenant, name, value),
        };
        result.inspect_err(|e| {
            warn!(cluster, tenant, name, value, error = %e, "replace config failed");
        })
    }

    /// Route a delete; an empty `name` deletes every limit of the pair
    ///
    /// A wildcard delete removes the connection limit first and only then
    /// the cpu quota; the first failure stops it.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NotSupported` for an unknown name or the
    /// first processor failure.
    pub fn handle_delete_config(&self, cluster: &str, tenant: &str, name: &str) -> Result<(), Error> {
        if name.is_empty() {
            self.delete_connection_limit(cluster, tenant)?;
            return self.delete_cpu_quota(cluster, tenant);
        }

        let resource = name.parse::<ResourceName>().inspect_err(|_| {
            warn!(name, "resource name not supported");
        })?;
        match resource {
            ResourceName::ConnectionLimit => self.delete_connection_limit(cluster, tenant),
            ResourceName::CpuQuota => self.delete_cpu_quota(cluster, tenant),
        }
    }

    fn delete_connection_limit(&self, cluster: &str, tenant: &str) -> Result<(), Error> {
        self.conn.delete(cluster, tenant).inspect_err(|e| {
            warn!(cluster, tenant, error = %e, "delete connection limit failed");
        })
    }

    fn delete_cpu_quota(&self, cluster: &str, tenant: &str) -> Result<(), Error> {
        self.cpu.delete(cluster, tenant).inspect_err(|e| {
            warn!(cluster, tenant, error = %e, "delete cpu quota failed");
        })
    }
}

impl TableHandler for ResourceUnitDispatcher {
    fn execute(&self, params: &ConfigChangeParams) -> Result<(), Error> {
        ResourceUnitDispatcher::execute(self, Some(params))
    }

    fn commit(&self, params: &ConfigChangeParams, is_success: bool) -> Result<(), Error> {
        ResourceUnitDispatcher::commit(self, Some(params), is_success)
    }
}
