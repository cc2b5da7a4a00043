//! Fixed limits and names shared by the dispatcher and its callers
//!
//! These are deliberately not exposed via TOML configuration: the key
//! format and table name are part of the wire contract with the config
//! table.

/// Config table the resource-unit dispatcher registers under
pub const RESOURCE_UNIT_TABLE: &str = "resource_unit";

pub const MAX_TENANT_NAME_LENGTH: usize = 64;
pub const MAX_CLUSTER_NAME_LENGTH: usize = 48;
/// `tenant#cluster`
pub const MAX_TENANT_CLUSTER_NAME_LENGTH: usize =
    MAX_TENANT_NAME_LENGTH + MAX_CLUSTER_NAME_LENGTH + 1;
pub const MAX_IP_ADDR_LENGTH: usize = 64;

/// Capacity of the buffer a `tenant#cluster|endpoint` key is formatted into,
/// including the terminator slot
pub const KEY_BUFFER_CAPACITY: usize = MAX_TENANT_CLUSTER_NAME_LENGTH + MAX_IP_ADDR_LENGTH;
