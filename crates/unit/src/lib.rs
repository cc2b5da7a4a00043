#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Resource-unit config dispatcher for rucfg
//!
//! Receives change notifications for the `resource_unit` config table (one
//! row per cluster/tenant pair) and routes each change to the limiter that
//! enforces it: `resource_max_connections` to the connection-limit
//! processor, `resource_cpu` to the cpu-quota processor. The dispatcher
//! keeps no per-change state; `execute` and `commit` each re-read the row.

pub mod dispatcher;
pub mod extract;
pub mod key;

pub use dispatcher::ResourceUnitDispatcher;
pub use extract::{extract, ExtractedFields};
pub use key::build_key;
pub use rucfg_types::ResourceName;
