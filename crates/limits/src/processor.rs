//! Interfaces the resource-unit dispatcher drives

use rucfg_errors::Error;

/// Owner of per-tenant maximum connection limits
pub trait ConnectionLimitProcessor: Send + Sync {
    /// Stage a new limit for `(cluster, tenant)`
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an acceptable limit.
    fn replace(&self, cluster: &str, tenant: &str, name: &str, value: &str) -> Result<(), Error>;

    /// Remove the limit for `(cluster, tenant)`; takes effect immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the processor cannot remove the entry.
    fn delete(&self, cluster: &str, tenant: &str) -> Result<(), Error>;

    /// Finalize (`is_success`) or roll back staged replaces
    ///
    /// # Errors
    ///
    /// Returns an error if the staged state cannot be finalized.
    fn commit(&self, is_success: bool) -> Result<(), Error>;
}

/// Owner of per-tenant cpu quotas
pub trait CpuQuotaProcessor: Send + Sync {
    /// One-time setup before any quota can be applied
    ///
    /// # Errors
    ///
    /// Returns an error if called twice or if setup fails.
    fn init(&self) -> Result<(), Error>;

    /// Stage a new quota for `(cluster, tenant)`
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an acceptable quota or the
    /// processor is not initialized.
    fn replace(&self, cluster: &str, tenant: &str, name: &str, value: &str) -> Result<(), Error>;

    /// Remove the quota for `(cluster, tenant)`; takes effect immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the processor is not initialized.
    fn delete(&self, cluster: &str, tenant: &str) -> Result<(), Error>;

    /// Finalize (`is_success`) or roll back staged replaces
    ///
    /// # Errors
    ///
    /// Returns an error if the processor is not initialized.
    fn commit(&self, is_success: bool) -> Result<(), Error>;
}
