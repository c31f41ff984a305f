use super::builder::convert_to_sql;
use super::call::infer_type;
use super::element::SqlArg;
use super::Sql;
use crate::error::{OrmError, OrmResult};
use crate::ident::is_valid_identifier;
use crate::types::{ColumnType, DataType};
use std::fmt;

/// An expression selected under an alias (`<expr> AS <alias>`).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedColumn {
    alias: String,
    sql: Sql,
}

impl SelectedColumn {
    /// Select `value` as `alias`.
    pub fn new(value: impl Into<SqlArg>, alias: impl Into<String>) -> OrmResult<Self> {
        let alias = alias.into();
        if !is_valid_identifier(&alias) {
            return Err(OrmError::expression(format!("invalid select alias '{alias}'")));
        }
        Ok(Self {
            alias,
            sql: convert_to_sql(value),
        })
    }

    /// Select `value` under the alias of the first column it references.
    pub fn infer(value: impl Into<SqlArg>) -> OrmResult<Self> {
        let sql = convert_to_sql(value);
        let alias = sql
            .find_column()
            .map_err(|e| e.context("cannot infer a select alias"))?
            .alias();
        Self::new(sql, alias)
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn sql(&self) -> &Sql {
        &self.sql
    }

    /// Result type, inferred from the expression.
    pub fn column_type(&self) -> ColumnType {
        infer_type(&self.sql).unwrap_or_else(|| DataType::Text.into())
    }
}

impl fmt::Display for SelectedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectedColumn({})", self.alias)
    }
}

/// Shorthand for [`SelectedColumn::new`].
pub fn select_as(value: impl Into<SqlArg>, alias: impl Into<String>) -> OrmResult<SelectedColumn> {
    SelectedColumn::new(value, alias)
}
