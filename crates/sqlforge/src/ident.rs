//! SQL identifier checks for table and column database names.
//!
//! Database names are emitted verbatim by downstream renderers, so they are
//! restricted to plain unquoted identifiers: `[A-Za-z_][A-Za-z0-9_$]*`.

use crate::error::{OrmError, OrmResult};

/// Returns `true` if `name` is a valid unquoted SQL identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return false;
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

/// Validate a database name; `kind` names what is being named ("table", "column").
pub fn validate_db_name(kind: &str, name: &str) -> OrmResult<()> {
    if name.is_empty() {
        return Err(OrmError::schema(format!("{kind} database name cannot be empty")));
    }
    if name.contains('\0') {
        return Err(OrmError::schema(format!(
            "{kind} database name cannot contain NUL character"
        )));
    }
    if !is_valid_identifier(name) {
        return Err(OrmError::schema(format!(
            "invalid {kind} database name '{name}'"
        )));
    }
    Ok(())
}
