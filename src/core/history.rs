//! Snapshot-based undo/redo
//!
//! [`HistoryManager`] keeps two stacks of full [`SchemaSnapshot`]s. The past stack
//! holds the states *before* each recorded mutation, so undo restores them in
//! order and redo walks forward again. [`SchemaDocument`] routes every store
//! mutation through one `apply` step, which keeps a mutation and its history
//! entry indivisible.

use std::collections::VecDeque;

use crate::core::error::{Outcome, SchemaError};
use crate::core::ids::EntityId;
use crate::core::schema::{Column, ColumnRef, ForeignKey, SchemaSnapshot, Table};
use crate::core::store::SchemaStore;

/// Default number of undo steps
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded two-stack history
#[derive(Clone, Debug)]
pub struct HistoryManager {
    past: VecDeque<SchemaSnapshot>,
    future: Vec<SchemaSnapshot>,
    limit: usize,
}

impl HistoryManager {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a completed mutation. `before` is the state prior to it.
    ///
    /// No-op mutations (`before == after`) and repeats of the newest past entry
    /// are skipped. Anything recorded discards the redo branch.
    pub fn record(&mut self, before: SchemaSnapshot, after: &SchemaSnapshot) -> bool {
        if &before == after || self.past.back() == Some(&before) {
            return false;
        }
        self.future.clear();
        self.past.push_back(before);
        self.evict_overflow();
        true
    }

    /// Step back: `current` moves to the future stack, the newest past entry is returned
    pub fn undo(&mut self, current: SchemaSnapshot) -> Option<SchemaSnapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward: `current` moves to the past stack, the newest future entry is returned
    pub fn redo(&mut self, current: SchemaSnapshot) -> Option<SchemaSnapshot> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        self.evict_overflow();
        Some(next)
    }

    fn evict_overflow(&mut self) {
        while self.past.len() > self.limit {
            self.past.pop_front();
            tracing::debug!(limit = self.limit, "history full, evicted oldest snapshot");
        }
    }

    /// Empty both stacks
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// Schema store with undo/redo over every structural mutation
#[derive(Clone, Debug, Default)]
pub struct SchemaDocument {
    store: SchemaStore,
    history: HistoryManager,
}

impl SchemaDocument {
    pub fn new(history_limit: usize) -> Self {
        Self {
            store: SchemaStore::new(),
            history: HistoryManager::new(history_limit),
        }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn snapshot(&self) -> SchemaSnapshot {
        self.store.snapshot()
    }

    /// Run one mutation and record it. The closure is the only place the store
    /// is written outside undo/redo.
    fn apply<R>(&mut self, mutation: impl FnOnce(&mut SchemaStore) -> R) -> R {
        let before = self.store.snapshot();
        let result = mutation(&mut self.store);
        if !self.store.matches(&before) {
            let after = self.store.snapshot();
            self.history.record(before, &after);
        }
        result
    }

    /// Replace the whole document without creating history (initial load)
    pub fn load(&mut self, snapshot: SchemaSnapshot) {
        tracing::info!(
            tables = snapshot.tables.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            "schema loaded"
        );
        self.store.restore(snapshot);
        self.history.clear();
    }

    // ========================================================================
    // Mutation API
    // ========================================================================

    pub fn add_table(&mut self, table: Table) -> Result<(), SchemaError> {
        self.apply(|store| store.add_table(table))
    }

    pub fn update_table(&mut self, table: Table) -> Result<Outcome, SchemaError> {
        self.apply(|store| store.update_table(table))
    }

    pub fn delete_table(&mut self, id: &EntityId) -> Outcome {
        self.apply(|store| store.delete_table(id))
    }

    pub fn set_tables(&mut self, tables: Vec<Table>) {
        self.apply(|store| store.set_tables(tables))
    }

    pub fn add_column(&mut self, table_id: &EntityId, column: Column) -> Result<Outcome, SchemaError> {
        self.apply(|store| store.add_column(table_id, column))
    }

    pub fn update_column(&mut self, table_id: &EntityId, column: Column) -> Result<Outcome, SchemaError> {
        self.apply(|store| store.update_column(table_id, column))
    }

    pub fn move_column(&mut self, table_id: &EntityId, from: usize, to: usize) -> Result<Outcome, SchemaError> {
        self.apply(|store| store.move_column(table_id, from, to))
    }

    pub fn delete_column(&mut self, column: &ColumnRef) -> Outcome {
        self.apply(|store| store.delete_column(column))
    }

    pub fn add_foreign_key(&mut self, fk: ForeignKey) -> Result<(), SchemaError> {
        self.apply(|store| store.add_foreign_key(fk))
    }

    pub fn delete_foreign_key(&mut self, id: &EntityId) -> Outcome {
        self.apply(|store| store.delete_foreign_key(id))
    }

    pub fn set_foreign_keys(&mut self, foreign_keys: Vec<ForeignKey>) {
        self.apply(|store| store.set_foreign_keys(foreign_keys))
    }

    // ========================================================================
    // History API
    // ========================================================================

    /// Undo the last mutation. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.store.snapshot()) {
            Some(previous) => {
                self.store.restore(previous);
                true
            }
            None => {
                tracing::debug!("undo: history empty");
                false
            }
        }
    }

    /// Redo the last undone mutation. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.store.snapshot()) {
            Some(next) => {
                self.store.restore(next);
                true
            }
            None => {
                tracing::debug!("redo: nothing to redo");
                false
            }
        }
    }

    /// Forget history, keep data
    pub fn clear_history(&mut self) {
        tracing::info!(past = self.history.past_len(), "history cleared");
        self.history.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undo steps available
    pub fn history_depth(&self) -> usize {
        self.history.past_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Position;

    fn table(n: usize) -> Table {
        Table::new(format!("t{}", n), format!("table_{}", n))
            .with_column(Column::default_primary_key(format!("c{}", n)))
    }

    #[test]
    fn test_round_trip_law() {
        let mut doc = SchemaDocument::default();
        for n in 0..10 {
            doc.add_table(table(n)).unwrap();
        }
        let mut moved = doc.store().table(&"t3".into()).unwrap().clone();
        moved.position = Position::new(50.0, 60.0);
        let _ = doc.update_table(moved);
        let _ = doc.delete_table(&"t5".into());

        let final_state = doc.snapshot();
        let n = doc.history_depth();
        assert_eq!(n, 12);

        for _ in 0..n {
            assert!(doc.undo());
        }
        assert!(doc.snapshot().is_empty());
        for _ in 0..n {
            assert!(doc.redo());
        }
        assert_eq!(doc.snapshot(), final_state);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut doc = SchemaDocument::default();
        for n in 0..DEFAULT_HISTORY_LIMIT {
            doc.add_table(table(n)).unwrap();
        }
        assert_eq!(doc.history_depth(), 50);

        doc.add_table(table(50)).unwrap();
        assert_eq!(doc.history_depth(), 50);

        // The oldest entry (empty schema) was evicted
        while doc.undo() {}
        assert_eq!(doc.snapshot().tables.len(), 1);
        assert_eq!(doc.snapshot().tables[0].id, "t0");
    }

    #[test]
    fn test_redo_respects_capacity() {
        let states: Vec<SchemaSnapshot> = (0..4)
            .map(|n| SchemaSnapshot::new((0..n).map(table).collect(), Vec::new()))
            .collect();
        let mut history = HistoryManager::new(2);
        history.record(states[0].clone(), &states[1]);
        history.record(states[1].clone(), &states[2]);
        assert_eq!(history.past_len(), history.limit());

        // A redo branch while the past stack is already full
        history.future.push(states[3].clone());
        assert_eq!(history.redo(states[2].clone()), Some(states[3].clone()));
        assert_eq!(history.past_len(), 2);

        // The oldest entry was evicted
        assert_eq!(history.undo(states[3].clone()), Some(states[2].clone()));
        assert_eq!(history.undo(states[2].clone()), Some(states[1].clone()));
        assert_eq!(history.undo(states[1].clone()), None);
    }

    #[test]
    fn test_undo_redo_on_empty_stacks() {
        let mut doc = SchemaDocument::default();
        doc.add_table(table(1)).unwrap();
        doc.clear_history();
        let before = doc.snapshot();

        assert!(!doc.undo());
        assert!(!doc.redo());
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_new_mutation_discards_future() {
        let mut doc = SchemaDocument::default();
        doc.add_table(table(1)).unwrap();
        doc.add_table(table(2)).unwrap();
        doc.add_table(table(3)).unwrap();

        doc.undo();
        doc.undo();
        assert_eq!(doc.history().future_len(), 2);

        doc.add_table(table(4)).unwrap();
        assert!(!doc.can_redo());
        assert_eq!(doc.history().future_len(), 0);
    }

    #[test]
    fn test_noop_mutations_do_not_record() {
        let mut doc = SchemaDocument::default();
        doc.add_table(table(1)).unwrap();
        let depth = doc.history_depth();

        let _ = doc.delete_table(&"missing".into());
        let _ = doc.update_table(table(1));
        let _ = doc.delete_foreign_key(&"missing".into());
        assert!(doc.add_table(table(1)).is_err());

        assert_eq!(doc.history_depth(), depth);
    }

    #[test]
    fn test_failed_mutation_keeps_redo_branch() {
        let mut doc = SchemaDocument::default();
        doc.add_table(table(1)).unwrap();
        doc.add_table(table(2)).unwrap();
        doc.undo();

        assert!(doc.add_table(table(1)).is_err());
        assert!(doc.can_redo());
    }

    #[test]
    fn test_load_clears_history() {
        let mut doc = SchemaDocument::default();
        doc.add_table(table(1)).unwrap();
        doc.load(crate::core::schema::create_demo_schema());

        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
        assert_eq!(doc.snapshot().tables.len(), 3);
    }

    #[test]
    fn test_clear_keeps_data() {
        let mut doc = SchemaDocument::default();
        doc.add_table(table(1)).unwrap();
        doc.add_table(table(2)).unwrap();
        doc.undo();

        doc.clear_history();
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
        assert_eq!(doc.snapshot().tables.len(), 1);
    }

    #[test]
    fn test_record_skips_duplicate_of_top() {
        let mut history = HistoryManager::new(5);
        let a = SchemaSnapshot::default();
        let b = SchemaSnapshot::new(vec![table(1)], Vec::new());

        assert!(history.record(a.clone(), &b));
        assert!(!history.record(a.clone(), &b));
        assert!(!history.record(b.clone(), &b));
        assert_eq!(history.past_len(), 1);
    }
}
