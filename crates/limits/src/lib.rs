#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Resource limiter processors for rucfg
//!
//! This crate defines the interfaces the resource-unit dispatcher drives
//! (one per limit kind) and in-memory processors implementing them. Both
//! processors stage replaces until the config-table transaction commits
//! and treat deletes as final.

pub mod conn;
pub mod cpu;
pub mod processor;
pub mod staged;

pub use conn::ConnTableProcessor;
pub use cpu::CpuTableProcessor;
pub use processor::{ConnectionLimitProcessor, CpuQuotaProcessor};
pub use staged::StagedTable;
