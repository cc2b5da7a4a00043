//! Live limiter state with an undo log for uncommitted replaces

use dashmap::DashMap;
use rucfg_types::UnitKey;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Per-unit values plus the undo entries of replaces not yet committed
///
/// Readers see staged values immediately. Writers serialize on the undo
/// log, so a rollback restores exactly the values that were overwritten.
///
/// The log is shared by every unit: `commit` resolves all staged replaces,
/// not just those of one row. Callers must finish one row's stage/commit
/// pair before staging the next, as `rucfg_table::ConfigProcessor` does.
pub struct StagedTable<V> {
    live: DashMap<UnitKey, V>,
    pending: Mutex<Vec<(UnitKey, Option<V>)>>,
}

impl<V: Clone> Default for StagedTable<V> {
    fn default() -> Self {
        Self {
            live: DashMap::new(),
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl<V: Clone> StagedTable<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, Vec<(UnitKey, Option<V>)>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `value` and remember what it replaced
    pub fn stage(&self, key: UnitKey, value: V) {
        let mut pending = self.pending();
        let previous = self.live.insert(key.clone(), value);
        pending.push((key, previous));
    }

    /// Remove `key` for good, dropping any staged undo for it
    pub fn remove(&self, key: &UnitKey) -> Option<V> {
        let mut pending = self.pending();
        pending.retain(|(k, _)| k != key);
        self.live.remove(key).map(|(_, v)| v)
    }

    /// Keep (`is_success`) or undo every staged replace; returns how many
    /// staged entries were resolved
    pub fn commit(&self, is_success: bool) -> usize {
        let mut pending = self.pending();
        let resolved = pending.len();
        if is_success {
            pending.clear();
        } else {
            while let Some((key, previous)) = pending.pop() {
                match previous {
                    Some(value) => {
                        self.live.insert(key, value);
                    }
                    None => {
                        self.live.remove(&key);
                    }
                }
            }
        }
        resolved
    }

    #[must_use]
    pub fn get(&self, key: &UnitKey) -> Option<V> {
        self.live.get(key).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending().is_empty()
    }

    /// Current values ordered by key
    #[must_use]
    pub fn snapshot(&self) -> Vec<(UnitKey, V)> {
        let mut entries: Vec<(UnitKey, V)> = self
            .live
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tenant: &str) -> UnitKey {
        UnitKey::new("c1", tenant)
    }

    #[test]
    fn test_commit_keeps_staged_values() {
        let table = StagedTable::new();
        table.stage(key("t1"), 10u64);
        assert!(table.has_pending());
        assert_eq!(table.commit(true), 1);
        assert!(!table.has_pending());
        assert_eq!(table.get(&key("t1")), Some(10));
    }

    #[test]
    fn test_rollback_restores_previous_values() {
        let table = StagedTable::new();
        table.stage(key("t1"), 10u64);
        table.commit(true);

        table.stage(key("t1"), 20);
        table.stage(key("t1"), 30);
        table.stage(key("t2"), 5);
        assert_eq!(table.get(&key("t1")), Some(30));

        assert_eq!(table.commit(false), 3);
        assert_eq!(table.get(&key("t1")), Some(10));
        assert_eq!(table.get(&key("t2")), None);
    }

    #[test]
    fn test_commit_resolves_every_staged_unit() {
        let table = StagedTable::new();
        table.stage(key("t1"), 1u64);
        table.stage(key("t2"), 2);
        assert_eq!(table.commit(false), 2);
        assert!(table.is_empty());
        assert!(!table.has_pending());
    }

    #[test]
    fn test_remove_is_final() {
        let table = StagedTable::new();
        table.stage(key("t1"), 10u64);
        assert_eq!(table.remove(&key("t1")), Some(10));
        assert!(!table.has_pending());

        table.commit(false);
        assert!(table.is_empty());
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let table = StagedTable::new();
        table.stage(key("t2"), 2u64);
        table.stage(key("t1"), 1);
        let tenants: Vec<_> = table
            .snapshot()
            .into_iter()
            .map(|(k, _)| k.tenant)
            .collect();
        assert_eq!(tenants, ["t1", "t2"]);
    }
}
