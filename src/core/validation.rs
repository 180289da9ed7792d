//! Validation of table and column names entered through the naming prompt
//!
//! Hard errors block the mutation (empty, too long, control characters). Style
//! problems such as reserved keywords are reported as warnings only, since the
//! exported DDL quotes identifiers.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum length for identifiers (MySQL standard)
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// SQL keywords that need quoting when used as identifiers
static RESERVED_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
        "CONSTRAINT", "CREATE", "CROSS", "DATABASE", "DEFAULT", "DELETE", "DESC", "DISTINCT",
        "DROP", "ELSE", "END", "EXISTS", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN",
        "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT",
        "NULL", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET",
        "TABLE", "THEN", "TO", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "WHEN", "WHERE",
        "WITH",
    ]
    .into_iter()
    .collect()
});

/// Validation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is too long ({actual} chars, max {max})")]
    TooLong { max: usize, actual: usize },

    #[error("Name cannot contain control characters")]
    ControlCharacters,

    #[error("'{keyword}' is a reserved SQL keyword")]
    ReservedKeyword { keyword: String },

    #[error("Name contains characters that need quoting: '{chars}'")]
    NeedsQuoting { chars: String },

    #[error("Name cannot start with a digit")]
    StartsWithDigit,
}

/// Validate a name and return its trimmed form
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let length = trimmed.chars().count();
    if length > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_IDENTIFIER_LENGTH,
            actual: length,
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters);
    }

    Ok(trimmed.to_string())
}

/// Non-blocking style warnings for a name
pub fn name_warnings(name: &str) -> Vec<ValidationError> {
    let trimmed = name.trim();
    let mut warnings = Vec::new();

    if is_reserved_keyword(trimmed) {
        warnings.push(ValidationError::ReservedKeyword {
            keyword: trimmed.to_string(),
        });
    }

    let odd: String = trimmed
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && *c != '_')
        .collect();
    if !odd.is_empty() {
        warnings.push(ValidationError::NeedsQuoting { chars: odd });
    }

    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        warnings.push(ValidationError::StartsWithDigit);
    }

    warnings
}

/// Check if a string is a reserved keyword
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(name.to_uppercase().as_str())
}

/// Default name offered by the naming prompt for a new table
pub fn default_table_name(existing: &[&str]) -> String {
    (1..)
        .map(|n| format!("table_{}", n))
        .find(|candidate| !existing.iter().any(|name| name == candidate))
        .unwrap_or_else(|| "table".to_string())
}
