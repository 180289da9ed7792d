//! Schema data store
//!
//! Owns the canonical tables and foreign keys. Every mutation is a plain method
//! on [`SchemaStore`]; undo/redo is layered on top by
//! [`SchemaDocument`](crate::core::SchemaDocument), never inside the store.

use crate::core::error::{EntityKind, Outcome, SchemaError};
use crate::core::ids::EntityId;
use crate::core::schema::{Column, ColumnRef, ForeignKey, SchemaSnapshot, Table};

/// Canonical collections of tables and foreign keys
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaStore {
    tables: Vec<Table>,
    foreign_keys: Vec<ForeignKey>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: SchemaSnapshot) -> Self {
        Self {
            tables: snapshot.tables,
            foreign_keys: snapshot.foreign_keys,
        }
    }

    // ========================================================================
    // Read API
    // ========================================================================

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn table(&self, id: &EntityId) -> Option<&Table> {
        self.tables.iter().find(|t| &t.id == id)
    }

    pub fn foreign_key(&self, id: &EntityId) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| &fk.id == id)
    }

    pub fn column(&self, column: &ColumnRef) -> Option<&Column> {
        self.table(&column.table_id)
            .and_then(|t| t.column(&column.column_id))
    }

    pub fn contains_column(&self, column: &ColumnRef) -> bool {
        self.column(column).is_some()
    }

    /// Foreign keys with the table on either side
    pub fn foreign_keys_for_table<'a>(
        &'a self,
        table_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a ForeignKey> + 'a {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.touches_table(table_id))
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SchemaSnapshot {
        SchemaSnapshot::new(self.tables.clone(), self.foreign_keys.clone())
    }

    /// Replace everything with a snapshot
    pub fn restore(&mut self, snapshot: SchemaSnapshot) {
        self.tables = snapshot.tables;
        self.foreign_keys = snapshot.foreign_keys;
    }

    /// Compare against a snapshot without cloning
    pub fn matches(&self, snapshot: &SchemaSnapshot) -> bool {
        self.tables == snapshot.tables && self.foreign_keys == snapshot.foreign_keys
    }

    // ========================================================================
    // Tables
    // ========================================================================

    /// Append a table. Fails with `DuplicateId` instead of overwriting.
    pub fn add_table(&mut self, table: Table) -> Result<(), SchemaError> {
        if self.table(&table.id).is_some() {
            return Err(SchemaError::DuplicateId {
                kind: EntityKind::Table,
                id: table.id,
            });
        }
        table.validate()?;
        tracing::debug!(table = %table.id, name = %table.name, "add table");
        self.tables.push(table);
        Ok(())
    }

    /// Replace the table with the same id wholesale.
    ///
    /// The replacement is validated like a new table. Foreign keys pointing at
    /// columns the replacement no longer has are removed with it.
    pub fn update_table(&mut self, table: Table) -> Result<Outcome, SchemaError> {
        table.validate()?;
        let Some(index) = self.tables.iter().position(|t| t.id == table.id) else {
            tracing::warn!(table = %table.id, "update_table: table not found");
            return Ok(Outcome::NotFound);
        };
        self.tables[index] = table;

        let updated = &self.tables[index];
        let fk_before = self.foreign_keys.len();
        self.foreign_keys.retain(|fk| {
            [fk.source(), fk.target()]
                .iter()
                .all(|end| end.table_id != updated.id || updated.column(&end.column_id).is_some())
        });
        if self.foreign_keys.len() != fk_before {
            tracing::debug!(
                table = %updated.id,
                dropped = fk_before - self.foreign_keys.len(),
                "update_table: removed foreign keys on vanished columns"
            );
        }
        Ok(Outcome::Applied)
    }

    /// Remove a table and every foreign key that references it
    pub fn delete_table(&mut self, id: &EntityId) -> Outcome {
        let before = self.tables.len();
        self.tables.retain(|t| &t.id != id);
        if self.tables.len() == before {
            tracing::warn!(table = %id, "delete_table: table not found");
            return Outcome::NotFound;
        }

        let fk_before = self.foreign_keys.len();
        self.foreign_keys.retain(|fk| !fk.touches_table(id));
        tracing::debug!(
            table = %id,
            cascaded = fk_before - self.foreign_keys.len(),
            "delete table"
        );
        Outcome::Applied
    }

    /// Bulk replace the tables
    pub fn set_tables(&mut self, tables: Vec<Table>) {
        self.tables = tables;
    }

    // ========================================================================
    // Columns
    // ========================================================================

    pub fn add_column(&mut self, table_id: &EntityId, column: Column) -> Result<Outcome, SchemaError> {
        column.validate()?;
        match self.tables.iter_mut().find(|t| &t.id == table_id) {
            Some(table) => {
                table.add_column(column)?;
                Ok(Outcome::Applied)
            }
            None => {
                tracing::warn!(table = %table_id, "add_column: table not found");
                Ok(Outcome::NotFound)
            }
        }
    }

    pub fn update_column(&mut self, table_id: &EntityId, column: Column) -> Result<Outcome, SchemaError> {
        column.validate()?;
        let replaced = self
            .tables
            .iter_mut()
            .find(|t| &t.id == table_id)
            .is_some_and(|table| table.replace_column(column.clone()));
        if replaced {
            Ok(Outcome::Applied)
        } else {
            tracing::warn!(table = %table_id, column = %column.id, "update_column: column not found");
            Ok(Outcome::NotFound)
        }
    }

    /// Reorder a column within its table
    pub fn move_column(&mut self, table_id: &EntityId, from: usize, to: usize) -> Result<Outcome, SchemaError> {
        match self.tables.iter_mut().find(|t| &t.id == table_id) {
            Some(table) => {
                table.move_column(from, to)?;
                Ok(Outcome::Applied)
            }
            None => {
                tracing::warn!(table = %table_id, "move_column: table not found");
                Ok(Outcome::NotFound)
            }
        }
    }

    /// Remove a column and every foreign key that references it
    pub fn delete_column(&mut self, column: &ColumnRef) -> Outcome {
        let removed = self
            .tables
            .iter_mut()
            .find(|t| t.id == column.table_id)
            .and_then(|table| table.remove_column(&column.column_id));
        if removed.is_none() {
            tracing::warn!(
                table = %column.table_id,
                column = %column.column_id,
                "delete_column: column not found"
            );
            return Outcome::NotFound;
        }
        self.foreign_keys.retain(|fk| !fk.touches_column(column));
        Outcome::Applied
    }

    // ========================================================================
    // Foreign keys
    // ========================================================================

    /// Add a foreign key whose both endpoints exist
    pub fn add_foreign_key(&mut self, fk: ForeignKey) -> Result<(), SchemaError> {
        if self.foreign_key(&fk.id).is_some() {
            return Err(SchemaError::DuplicateId {
                kind: EntityKind::ForeignKey,
                id: fk.id,
            });
        }
        for end in [fk.source(), fk.target()] {
            if !self.contains_column(&end) {
                tracing::warn!(fk = %fk.id, table = %end.table_id, column = %end.column_id, "add_foreign_key: dangling reference");
                return Err(SchemaError::InvalidReference {
                    fk: fk.id,
                    table: end.table_id,
                    column: end.column_id,
                });
            }
        }
        tracing::debug!(fk = %fk.id, "add foreign key");
        self.foreign_keys.push(fk);
        Ok(())
    }

    pub fn delete_foreign_key(&mut self, id: &EntityId) -> Outcome {
        let before = self.foreign_keys.len();
        self.foreign_keys.retain(|fk| &fk.id != id);
        if self.foreign_keys.len() == before {
            tracing::warn!(fk = %id, "delete_foreign_key: foreign key not found");
            Outcome::NotFound
        } else {
            Outcome::Applied
        }
    }

    /// Bulk replace the foreign keys
    pub fn set_foreign_keys(&mut self, foreign_keys: Vec<ForeignKey>) {
        self.foreign_keys = foreign_keys;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{SqlDataType, create_demo_schema};

    fn demo_store() -> SchemaStore {
        SchemaStore::from_snapshot(create_demo_schema())
    }

    #[test]
    fn test_add_table_rejects_duplicate_id() {
        let mut store = SchemaStore::new();
        store.add_table(Table::new("t1", "users")).unwrap();

        let err = store.add_table(Table::new("t1", "other")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateId {
                kind: EntityKind::Table,
                id: EntityId::from("t1"),
            }
        );
        assert_eq!(store.tables().len(), 1);
        assert_eq!(store.tables()[0].name, "users");
    }

    #[test]
    fn test_add_table_numeric_id_collides_with_string_id() {
        let mut store = SchemaStore::new();
        store.add_table(Table::new(7u64, "a")).unwrap();
        assert!(store.add_table(Table::new("7", "b")).is_err());
    }

    #[test]
    fn test_add_table_validates_columns() {
        let mut store = SchemaStore::new();
        let table = Table::new("t", "t").with_column(Column::new("c", "name", SqlDataType::Varchar));
        assert!(matches!(
            store.add_table(table),
            Err(SchemaError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_update_table_replaces_wholesale() {
        let mut store = demo_store();
        let mut users = store.table(&"users".into()).unwrap().clone();
        users.position.x = 999.0;
        users.columns.truncate(1);

        assert_eq!(store.update_table(users.clone()), Ok(Outcome::Applied));
        assert_eq!(store.table(&"users".into()), Some(&users));
        assert_eq!(store.foreign_keys().len(), 2);
    }

    #[test]
    fn test_update_table_rejects_nullable_primary_key() {
        let mut store = demo_store();
        let before = store.snapshot();
        let mut users = store.table(&"users".into()).unwrap().clone();
        users.columns[0].nullable = true;

        assert!(matches!(
            store.update_table(users),
            Err(SchemaError::InvalidColumn { .. })
        ));
        assert!(store.matches(&before));
    }

    #[test]
    fn test_update_table_rejects_repeated_column_id() {
        let mut store = demo_store();
        let before = store.snapshot();
        let mut users = store.table(&"users".into()).unwrap().clone();
        let email = users.columns[1].clone();
        users.columns.push(email);

        assert_eq!(
            store.update_table(users),
            Err(SchemaError::DuplicateId {
                kind: EntityKind::Column,
                id: EntityId::from("users_email"),
            })
        );
        assert!(store.matches(&before));
    }

    #[test]
    fn test_update_table_drops_foreign_keys_on_removed_columns() {
        let mut store = demo_store();
        let mut posts = store.table(&"posts".into()).unwrap().clone();
        posts.columns.retain(|c| c.id != "posts_user_id");

        assert_eq!(store.update_table(posts), Ok(Outcome::Applied));
        let ids: Vec<_> = store.foreign_keys().iter().map(|fk| fk.id.as_str()).collect();
        assert_eq!(ids, ["fk_comments_posts"]);
    }

    #[test]
    fn test_move_column() {
        let mut store = demo_store();
        assert_eq!(store.move_column(&"posts".into(), 3, 0), Ok(Outcome::Applied));
        assert_eq!(store.table(&"posts".into()).unwrap().columns[0].name, "body");

        assert!(store.move_column(&"posts".into(), 0, 9).is_err());
        assert_eq!(store.move_column(&"ghost".into(), 0, 1), Ok(Outcome::NotFound));
    }

    #[test]
    fn test_update_missing_table_is_noop() {
        let mut store = demo_store();
        let before = store.snapshot();
        assert_eq!(store.update_table(Table::new("ghost", "ghost")), Ok(Outcome::NotFound));
        assert!(store.matches(&before));
    }

    #[test]
    fn test_delete_table_cascades_foreign_keys() {
        let mut store = demo_store();
        assert_eq!(store.foreign_keys().len(), 2);

        assert_eq!(store.delete_table(&"posts".into()), Outcome::Applied);

        assert!(store.table(&"posts".into()).is_none());
        assert!(
            store
                .foreign_keys()
                .iter()
                .all(|fk| fk.source_table_id != "posts" && fk.target_table_id != "posts")
        );
        assert!(store.foreign_keys().is_empty());
    }

    #[test]
    fn test_delete_every_table_cascades() {
        for table in create_demo_schema().tables {
            let mut store = demo_store();
            let _ = store.delete_table(&table.id);
            assert!(store.table(&table.id).is_none());
            assert_eq!(store.foreign_keys_for_table(&table.id).count(), 0);
        }
    }

    #[test]
    fn test_delete_table_is_idempotent() {
        let mut store = demo_store();
        assert_eq!(store.delete_table(&"users".into()), Outcome::Applied);
        let after_first = store.snapshot();
        assert_eq!(store.delete_table(&"users".into()), Outcome::NotFound);
        assert!(store.matches(&after_first));
    }

    #[test]
    fn test_delete_table_with_numeric_id() {
        let mut store = SchemaStore::new();
        store
            .add_table(Table::new(1700000000000u64, "numeric").with_column(Column::default_primary_key("c")))
            .unwrap();
        assert_eq!(store.delete_table(&EntityId::from("1700000000000")), Outcome::Applied);
        assert!(store.tables().is_empty());
    }

    #[test]
    fn test_add_foreign_key_requires_existing_columns() {
        let mut store = demo_store();
        let fk = ForeignKey::new(
            "fk_bad",
            ColumnRef::new("posts", "posts_title"),
            ColumnRef::new("users", "missing"),
        );
        let err = store.add_foreign_key(fk).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidReference { .. }));
        assert_eq!(store.foreign_keys().len(), 2);
    }

    #[test]
    fn test_add_foreign_key_duplicate_id() {
        let mut store = demo_store();
        let fk = ForeignKey::new(
            "fk_posts_users",
            ColumnRef::new("comments", "comments_post_id"),
            ColumnRef::new("users", "users_id"),
        );
        assert!(matches!(
            store.add_foreign_key(fk),
            Err(SchemaError::DuplicateId {
                kind: EntityKind::ForeignKey,
                ..
            })
        ));
    }

    #[test]
    fn test_delete_foreign_key_idempotent() {
        let mut store = demo_store();
        assert_eq!(store.delete_foreign_key(&"fk_posts_users".into()), Outcome::Applied);
        assert_eq!(store.delete_foreign_key(&"fk_posts_users".into()), Outcome::NotFound);
        assert_eq!(store.foreign_keys().len(), 1);
    }

    #[test]
    fn test_delete_column_cascades_foreign_keys() {
        let mut store = demo_store();
        let outcome = store.delete_column(&ColumnRef::new("posts", "posts_id"));
        assert_eq!(outcome, Outcome::Applied);
        assert!(store.foreign_key(&"fk_comments_posts".into()).is_none());
        assert!(store.foreign_key(&"fk_posts_users".into()).is_some());
    }

    #[test]
    fn test_add_and_update_column() {
        let mut store = demo_store();
        let users: EntityId = "users".into();
        let column = Column::new("users_age", "age", SqlDataType::SmallInt);
        assert_eq!(store.add_column(&users, column.clone()).unwrap(), Outcome::Applied);
        assert!(store.add_column(&users, column.clone()).is_err());

        let renamed = Column {
            name: "years".to_string(),
            ..column
        };
        assert_eq!(store.update_column(&users, renamed).unwrap(), Outcome::Applied);
        assert_eq!(
            store.column(&ColumnRef::new("users", "users_age")).unwrap().name,
            "years"
        );

        let missing = Column::new("nope", "nope", SqlDataType::Text);
        assert_eq!(store.update_column(&users, missing).unwrap(), Outcome::NotFound);
    }

    #[test]
    fn test_bulk_setters() {
        let mut store = demo_store();
        store.set_foreign_keys(Vec::new());
        store.set_tables(Vec::new());
        assert!(store.snapshot().is_empty());
    }
}
