//! Composite `tenant#cluster|endpoint` key

use rucfg_config::constants::KEY_BUFFER_CAPACITY;
use rucfg_errors::{DispatchError, Error};
use tracing::warn;

/// Format the key callers use to index resource-unit state by tenant,
/// cluster and virtual endpoint
///
/// # Errors
///
/// Returns `DispatchError::Unexpected` if the key does not fit the fixed
/// key buffer (one slot of which is reserved for the terminator).
pub fn build_key(tenant: &str, cluster: &str, endpoint: &str) -> Result<String, Error> {
    let key = format!("{tenant}#{cluster}|{endpoint}");
    if key.len() >= KEY_BUFFER_CAPACITY {
        warn!(tenant, cluster, endpoint, len = key.len(), "key does not fit buffer");
        return Err(DispatchError::unexpected(format!(
            "key length {} exceeds buffer capacity {KEY_BUFFER_CAPACITY}",
            key.len()
        ))
        .into());
    }
    Ok(key)
}
