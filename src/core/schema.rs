use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::{EntityKind, SchemaError};
use crate::core::ids::EntityId;
use crate::core::validation::validate_name;

/// SQL data types offered by the column editor
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlDataType {
    Varchar,
    Char,
    Text,
    Int,
    BigInt,
    SmallInt,
    Decimal,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Blob,
}

/// Coarse grouping of data types, used for badge colours
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeCategory {
    Text,
    Numeric,
    Boolean,
    Temporal,
    Other,
}

impl SqlDataType {
    /// Every supported type, in menu order
    pub fn all() -> &'static [SqlDataType] {
        use SqlDataType::*;
        &[
            Varchar, Char, Text, Int, BigInt, SmallInt, Decimal, Float, Double, Boolean, Date,
            DateTime, Timestamp, Time, Json, Blob,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDataType::Varchar => "VARCHAR",
            SqlDataType::Char => "CHAR",
            SqlDataType::Text => "TEXT",
            SqlDataType::Int => "INT",
            SqlDataType::BigInt => "BIGINT",
            SqlDataType::SmallInt => "SMALLINT",
            SqlDataType::Decimal => "DECIMAL",
            SqlDataType::Float => "FLOAT",
            SqlDataType::Double => "DOUBLE",
            SqlDataType::Boolean => "BOOLEAN",
            SqlDataType::Date => "DATE",
            SqlDataType::DateTime => "DATETIME",
            SqlDataType::Timestamp => "TIMESTAMP",
            SqlDataType::Time => "TIME",
            SqlDataType::Json => "JSON",
            SqlDataType::Blob => "BLOB",
        }
    }

    /// VARCHAR, CHAR and DECIMAL need an explicit length
    pub fn requires_length(&self) -> bool {
        matches!(
            self,
            SqlDataType::Varchar | SqlDataType::Char | SqlDataType::Decimal
        )
    }

    /// Only integer types may auto-increment
    pub fn supports_auto_increment(&self) -> bool {
        matches!(
            self,
            SqlDataType::Int | SqlDataType::BigInt | SqlDataType::SmallInt
        )
    }

    pub fn category(&self) -> TypeCategory {
        match self {
            SqlDataType::Varchar | SqlDataType::Char | SqlDataType::Text => TypeCategory::Text,
            SqlDataType::Int
            | SqlDataType::BigInt
            | SqlDataType::SmallInt
            | SqlDataType::Decimal
            | SqlDataType::Float
            | SqlDataType::Double => TypeCategory::Numeric,
            SqlDataType::Boolean => TypeCategory::Boolean,
            SqlDataType::Date
            | SqlDataType::DateTime
            | SqlDataType::Timestamp
            | SqlDataType::Time => TypeCategory::Temporal,
            SqlDataType::Json | SqlDataType::Blob => TypeCategory::Other,
        }
    }
}

impl std::fmt::Display for SqlDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        SqlDataType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("Unknown data type: {}", s))
    }
}

/// Колонка таблицы
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: EntityId,
    pub name: String,
    pub data_type: SqlDataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    pub nullable: bool,
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, data_type: SqlDataType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type,
            length: None,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            default_value: None,
            description: None,
        }
    }

    /// The column every new table starts with: `id INT` auto-increment primary key
    pub fn default_primary_key(id: impl Into<EntityId>) -> Self {
        Self::new(id, "id", SqlDataType::Int)
            .primary_key()
            .auto_increment()
    }

    /// Mark as primary key. Primary keys are never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Type as shown on the table card, e.g. `VARCHAR(255)`
    pub fn display_type(&self) -> String {
        match self.length {
            Some(length) => format!("{}({})", self.data_type, length),
            None => self.data_type.to_string(),
        }
    }

    /// Check the per-column invariants
    pub fn validate(&self) -> Result<(), SchemaError> {
        let invalid = |reason: &str| SchemaError::InvalidColumn {
            column: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.primary_key && self.nullable {
            return Err(invalid("primary key cannot be nullable"));
        }
        if self.auto_increment && !self.data_type.supports_auto_increment() {
            return Err(invalid("auto-increment requires an integer type"));
        }
        if self.data_type.requires_length() && !matches!(self.length, Some(l) if l > 0) {
            return Err(invalid("length is required for this type"));
        }
        Ok(())
    }
}

/// Column as edited in the column form: free text where the user types
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDraft {
    pub name: String,
    pub data_type: SqlDataType,
    pub length: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub default_value: String,
    pub description: String,
}

impl ColumnDraft {
    pub fn from_column(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            data_type: column.data_type,
            length: column.length.map(|l| l.to_string()).unwrap_or_default(),
            nullable: column.nullable,
            primary_key: column.primary_key,
            auto_increment: column.auto_increment,
            default_value: column.default_value.clone().unwrap_or_default(),
            description: column.description.clone().unwrap_or_default(),
        }
    }

    /// Primary keys are never nullable
    pub fn set_primary_key(&mut self, primary_key: bool) {
        self.primary_key = primary_key;
        if primary_key {
            self.nullable = false;
        }
    }

    /// Switching away from an integer type drops auto-increment
    pub fn set_data_type(&mut self, data_type: SqlDataType) {
        self.data_type = data_type;
        if !data_type.supports_auto_increment() {
            self.auto_increment = false;
        }
    }

    /// Build the column under the given id, checking the name and the column rules
    pub fn build(&self, id: EntityId) -> Result<Column, SchemaError> {
        let name = validate_name(&self.name)?;
        let length = match self.length.trim() {
            "" => None,
            raw => Some(raw.parse::<u32>().map_err(|_| SchemaError::InvalidColumn {
                column: name.clone(),
                reason: format!("length must be a whole number, got '{}'", raw),
            })?),
        };
        let text = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        let column = Column {
            id,
            name,
            data_type: self.data_type,
            length,
            nullable: self.nullable && !self.primary_key,
            primary_key: self.primary_key,
            auto_increment: self.auto_increment,
            default_value: text(&self.default_value),
            description: text(&self.description),
        };
        column.validate()?;
        Ok(column)
    }
}

/// Позиция на канвасе
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Таблица базы данных
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Table {
    pub id: EntityId,
    pub name: String,
    pub columns: Vec<Column>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Table {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            columns: Vec::new(),
            position: Position::default(),
            description: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn column(&self, id: &EntityId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn column_index(&self, id: &EntityId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    /// Append a column. Fails on an id already used in this table.
    pub fn add_column(&mut self, column: Column) -> Result<(), SchemaError> {
        if self.column(&column.id).is_some() {
            return Err(SchemaError::DuplicateId {
                kind: EntityKind::Column,
                id: column.id,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replace the column with the same id. Returns false if absent.
    pub fn replace_column(&mut self, column: Column) -> bool {
        match self.column_index(&column.id) {
            Some(index) => {
                self.columns[index] = column;
                true
            }
            None => false,
        }
    }

    pub fn remove_column(&mut self, id: &EntityId) -> Option<Column> {
        self.column_index(id).map(|index| self.columns.remove(index))
    }

    /// Move a column to a new index
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), SchemaError> {
        let len = self.columns.len();
        if from >= len || to >= len {
            return Err(SchemaError::ColumnIndexOutOfRange { from, to, len });
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        Ok(())
    }

    /// Check every column and reject repeated column ids
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (index, column) in self.columns.iter().enumerate() {
            column.validate()?;
            if self.columns[..index].iter().any(|c| c.id == column.id) {
                return Err(SchemaError::DuplicateId {
                    kind: EntityKind::Column,
                    id: column.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Action taken on referencing rows
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum ReferentialAction {
    #[default]
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferentialAction::Cascade => write!(f, "CASCADE"),
            ReferentialAction::SetNull => write!(f, "SET NULL"),
            ReferentialAction::Restrict => write!(f, "RESTRICT"),
            ReferentialAction::NoAction => write!(f, "NO ACTION"),
        }
    }
}

/// A (table, column) pair
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub table_id: EntityId,
    pub column_id: EntityId,
}

impl ColumnRef {
    pub fn new(table_id: impl Into<EntityId>, column_id: impl Into<EntityId>) -> Self {
        Self {
            table_id: table_id.into(),
            column_id: column_id.into(),
        }
    }
}

/// Связь между таблицами: source column references target column
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub id: EntityId,
    pub source_table_id: EntityId,
    pub source_column_id: EntityId,
    pub target_table_id: EntityId,
    pub target_column_id: EntityId,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub on_update: ReferentialAction,
}

impl ForeignKey {
    /// New foreign key with CASCADE on both actions
    pub fn new(id: impl Into<EntityId>, source: ColumnRef, target: ColumnRef) -> Self {
        Self {
            id: id.into(),
            source_table_id: source.table_id,
            source_column_id: source.column_id,
            target_table_id: target.table_id,
            target_column_id: target.column_id,
            on_delete: ReferentialAction::Cascade,
            on_update: ReferentialAction::Cascade,
        }
    }

    pub fn source(&self) -> ColumnRef {
        ColumnRef::new(self.source_table_id.clone(), self.source_column_id.clone())
    }

    pub fn target(&self) -> ColumnRef {
        ColumnRef::new(self.target_table_id.clone(), self.target_column_id.clone())
    }

    pub fn touches_table(&self, table_id: &EntityId) -> bool {
        &self.source_table_id == table_id || &self.target_table_id == table_id
    }

    pub fn touches_column(&self, column: &ColumnRef) -> bool {
        self.source() == *column || self.target() == *column
    }
}

/// Full document state: the unit of undo/redo and of persistence
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    pub tables: Vec<Table>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<Table>, foreign_keys: Vec<ForeignKey>) -> Self {
        Self {
            tables,
            foreign_keys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.foreign_keys.is_empty()
    }
}

/// Создать демо-схему для пустого канваса
pub fn create_demo_schema() -> SchemaSnapshot {
    let users = Table::new("users", "users")
        .with_position(100.0, 100.0)
        .with_column(Column::default_primary_key("users_id"))
        .with_column(Column::new("users_email", "email", SqlDataType::Varchar).with_length(255).not_null())
        .with_column(Column::new("users_created_at", "created_at", SqlDataType::Timestamp).not_null());

    let posts = Table::new("posts", "posts")
        .with_position(460.0, 100.0)
        .with_column(Column::default_primary_key("posts_id"))
        .with_column(Column::new("posts_user_id", "user_id", SqlDataType::Int).not_null())
        .with_column(Column::new("posts_title", "title", SqlDataType::Varchar).with_length(255).not_null())
        .with_column(Column::new("posts_body", "body", SqlDataType::Text));

    let comments = Table::new("comments", "comments")
        .with_position(460.0, 400.0)
        .with_column(Column::default_primary_key("comments_id"))
        .with_column(Column::new("comments_post_id", "post_id", SqlDataType::Int).not_null())
        .with_column(Column::new("comments_body", "body", SqlDataType::Text).not_null());

    let foreign_keys = vec![
        ForeignKey::new(
            "fk_posts_users",
            ColumnRef::new("posts", "posts_user_id"),
            ColumnRef::new("users", "users_id"),
        ),
        ForeignKey::new(
            "fk_comments_posts",
            ColumnRef::new("comments", "comments_post_id"),
            ColumnRef::new("posts", "posts_id"),
        ),
    ];

    SchemaSnapshot::new(vec![users, posts, comments], foreign_keys)
}
