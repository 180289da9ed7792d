//! Editor configuration
//!
//! Defaults are built in. A JSON document can override any subset of fields and
//! environment variables override the result. Call `dotenvy::dotenv()` first on
//! the server to pick up a `.env` file.
//!
//! The server resolves the config once and embeds it in the page as JSON, so the
//! hydrating client runs with the same values.

use serde::{Deserialize, Serialize};

use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::router::{CORNER_RADIUS, ConnectorRouter, MIN_OFFSET};

pub const ENV_HISTORY_LIMIT: &str = "SCHEMA_CANVAS_HISTORY_LIMIT";
pub const ENV_CORNER_RADIUS: &str = "SCHEMA_CANVAS_CORNER_RADIUS";
pub const ENV_MIN_OFFSET: &str = "SCHEMA_CANVAS_MIN_OFFSET";

/// Tunables of the canvas core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo steps
    pub history_limit: usize,
    /// Radius of connector corners
    pub corner_radius: f64,
    /// Minimum horizontal run before a connector turns
    pub min_offset: f64,
    /// Where the first new table is placed
    pub new_table_origin: (f64, f64),
    /// Per-table shift of the default position, so new tables don't stack exactly
    pub new_table_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            corner_radius: CORNER_RADIUS,
            min_offset: MIN_OFFSET,
            new_table_origin: (100.0, 100.0),
            new_table_step: 40.0,
        }
    }
}

impl EditorConfig {
    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Apply overrides from a key lookup. Unparseable values are ignored with a warning.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(limit) = parse_var::<usize>(&lookup, ENV_HISTORY_LIMIT) {
            self.history_limit = limit.max(1);
        }
        if let Some(radius) = parse_var::<f64>(&lookup, ENV_CORNER_RADIUS) {
            self.corner_radius = radius;
        }
        if let Some(offset) = parse_var::<f64>(&lookup, ENV_MIN_OFFSET) {
            self.min_offset = offset;
        }
        self
    }

    pub fn router(&self) -> ConnectorRouter {
        ConnectorRouter::new(self.corner_radius, self.min_offset)
    }

    /// Default position for a new table given how many tables already exist
    pub fn new_table_position(&self, table_count: usize) -> (f64, f64) {
        let shift = table_count as f64 * self.new_table_step;
        (self.new_table_origin.0 + shift, self.new_table_origin.1 + shift)
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable config override");
            None
        }
    }
}
