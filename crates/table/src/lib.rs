#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Config-table callback framework for rucfg
//!
//! Handlers register under a table name. Each row change is delivered in
//! two phases: `execute` stages the change, then `commit` finalizes it or
//! rolls it back depending on whether the surrounding transaction
//! succeeded. Changes to the same table are delivered one row at a time:
//! a row's commit always runs before the next row's execute.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rucfg_errors::{Error, TableError};
use rucfg_types::ConfigChangeParams;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Callback pair invoked for changes to one config table
pub trait TableHandler: Send + Sync {
    /// Validate and stage a pending change
    ///
    /// # Errors
    ///
    /// Returns an error if the change is rejected; the framework then
    /// commits with `is_success = false`.
    fn execute(&self, params: &ConfigChangeParams) -> Result<(), Error>;

    /// Finalize (`is_success`) or roll back the change staged by `execute`
    ///
    /// # Errors
    ///
    /// Returns an error if finalization failed.
    fn commit(&self, params: &ConfigChangeParams, is_success: bool) -> Result<(), Error>;
}

struct Registration {
    handler: Arc<dyn TableHandler>,
    // Held across one row's execute/commit pair.
    txn: Mutex<()>,
}

/// Registry of table handlers and driver of the execute/commit protocol
#[derive(Default)]
pub struct ConfigProcessor {
    handlers: DashMap<String, Arc<Registration>>,
}

impl ConfigProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback pair for `table`
    ///
    /// # Errors
    ///
    /// Returns `TableError::AlreadyRegistered` if the table already has a
    /// handler; the existing handler is kept.
    pub fn register_callback(
        &self,
        table: impl Into<String>,
        handler: Arc<dyn TableHandler>,
    ) -> Result<(), Error> {
        match self.handlers.entry(table.into()) {
            Entry::Occupied(entry) => {
                warn!(table = %entry.key(), "callback already registered");
                Err(TableError::AlreadyRegistered {
                    table: entry.key().clone(),
                }
                .into())
            }
            Entry::Vacant(entry) => {
                info!(table = %entry.key(), "registered config table callback");
                entry.insert(Arc::new(Registration {
                    handler,
                    txn: Mutex::new(()),
                }));
                Ok(())
            }
        }
    }

    /// Remove the handler for `table`
    ///
    /// # Errors
    ///
    /// Returns `TableError::NotRegistered` if nothing is registered.
    pub fn unregister_callback(&self, table: &str) -> Result<(), Error> {
        self.handlers
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| not_registered(table))
    }

    #[must_use]
    pub fn is_registered(&self, table: &str) -> bool {
        self.handlers.contains_key(table)
    }

    /// Registered table names, sorted
    #[must_use]
    pub fn registered_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        tables.sort();
        tables
    }

    /// Deliver one row change to the handler registered for `table`
    ///
    /// Runs `execute`, then `commit` with `is_success` set to whether
    /// execute succeeded. Concurrent calls for the same table wait for each
    /// other, so a handler never sees two rows staged at once. An execute failure is returned as-is (a failure
    /// of the subsequent rollback is only logged); otherwise the commit
    /// result is returned.
    ///
    /// # Errors
    ///
    /// Returns `TableError::NotRegistered` for an unknown table, or the
    /// handler's execute/commit failure.
    pub fn apply(&self, table: &str, params: &ConfigChangeParams) -> Result<(), Error> {
        self.apply_with_outcome(table, params, true)
    }

    /// Like [`ConfigProcessor::apply`], but the surrounding transaction
    /// outcome is supplied by the caller
    ///
    /// With `txn_success = false` the change is executed and then always
    /// rolled back, as when a later statement of the same transaction fails.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigProcessor::apply`].
    pub fn apply_with_outcome(
        &self,
        table: &str,
        params: &ConfigChangeParams,
        txn_success: bool,
    ) -> Result<(), Error> {
        // Clone the handle out so no shard lock is held across callbacks.
        let registration = self
            .handlers
            .get(table)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| not_registered(table))?;
        let _txn = registration
            .txn
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let handler = &registration.handler;

        let executed = handler.execute(params);
        let is_success = executed.is_ok() && txn_success;
        debug!(table, is_success, "committing config table change");

        let committed = handler.commit(params, is_success);
        match executed {
            Err(err) => {
                if let Err(commit_err) = committed {
                    warn!(table, error = %commit_err, "rollback after failed execute also failed");
                }
                Err(err)
            }
            Ok(()) => committed,
        }
    }
}

fn not_registered(table: &str) -> Error {
    TableError::NotRegistered {
        table: table.to_string(),
    }
    .into()
}
