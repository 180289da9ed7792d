//! Canonical entity identifiers
//!
//! Tables, columns and foreign keys are addressed by [`EntityId`]. Identifiers may
//! arrive as numbers or strings (persisted schemas, drag-and-drop payloads, DOM
//! attributes), so every id is normalized to its string form at the boundary and
//! compared by value from then on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a table, column or foreign key.
///
/// `EntityId::from(42)` and `EntityId::from("42")` are the same id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct EntityId(String);

impl EntityId {
    /// Borrow the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for EntityId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityIdVisitor)
    }
}

struct EntityIdVisitor;

impl serde::de::Visitor<'_> for EntityIdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(EntityId::from(v))
    }
}

/// Kind of entity an id is generated for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Table,
    Column,
    ForeignKey,
}

impl IdKind {
    fn prefix(self) -> &'static str {
        match self {
            IdKind::Table => "table",
            IdKind::Column => "col",
            IdKind::ForeignKey => "fk",
        }
    }
}

/// Session-unique id source: `<prefix>_<session>_<counter>`
#[derive(Clone, Debug)]
pub struct IdGenerator {
    session: String,
    counter: u64,
}

impl IdGenerator {
    /// Create a generator with a random session tag
    pub fn new() -> Self {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        Self::with_session(&tag[..8])
    }

    /// Create a generator with a fixed session tag
    pub fn with_session(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            counter: 0,
        }
    }

    /// Next id for the given kind. Never repeats within one generator.
    pub fn next(&mut self, kind: IdKind) -> EntityId {
        self.counter += 1;
        EntityId(format!("{}_{}_{}", kind.prefix(), self.session, self.counter))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
