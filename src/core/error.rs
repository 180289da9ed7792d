//! Error taxonomy for schema mutations
//!
//! Only conditions that must fail loudly are errors. Missing ids on update/delete
//! and empty undo/redo stacks are no-ops reported through [`Outcome`].

use crate::core::ids::EntityId;

/// Kind of entity named in an error
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum EntityKind {
    #[display("table")]
    Table,
    #[display("column")]
    Column,
    #[display("foreign key")]
    ForeignKey,
}

/// Schema mutation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: EntityId },

    #[error("Foreign key {fk} references missing column {table}.{column}")]
    InvalidReference {
        fk: EntityId,
        table: EntityId,
        column: EntityId,
    },

    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    #[error("Column index out of bounds: {from} -> {to} (len {len})")]
    ColumnIndexOutOfRange { from: usize, to: usize, len: usize },

    #[error("Invalid name: {0}")]
    InvalidName(#[from] crate::core::validation::ValidationError),
}

/// Result of an idempotent mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The mutation changed the store
    Applied,
    /// The target id was absent; nothing changed
    NotFound,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
