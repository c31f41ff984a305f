use super::{and_all, check_expressions, collect_inputs, context};
use crate::config::ValidationConfig;
use crate::error::{OrmError, OrmResult};
use crate::sql::{Sql, SqlArg, SqlVariable, convert_to_sql};
use crate::table::Table;

/// DELETE descriptor.
#[derive(Debug, Clone)]
#[must_use]
pub struct DeleteAction {
    table: Table,
    wheres: Vec<Sql>,
    unsafe_mode: bool,
}

/// Start a DELETE from `table`.
pub fn delete(table: &Table) -> DeleteAction {
    DeleteAction::new(table)
}

impl DeleteAction {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            wheres: Vec::new(),
            unsafe_mode: false,
        }
    }

    /// Add a WHERE condition; several conditions are AND-ed.
    pub fn filter(mut self, condition: impl Into<SqlArg>) -> Self {
        self.wheres.push(convert_to_sql(condition));
        self
    }

    /// Allow deleting every row (no WHERE clause).
    pub fn unsafe_mode(mut self) -> Self {
        self.unsafe_mode = true;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn is_unsafe(&self) -> bool {
        self.unsafe_mode
    }

    /// The combined WHERE condition; empty when none was given.
    pub fn where_sql(&self) -> Sql {
        and_all(&self.wheres).unwrap_or_default()
    }

    pub fn inputs(&self) -> Vec<SqlVariable> {
        collect_inputs(&self.wheres)
    }

    pub fn validate(&self) -> OrmResult<()> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        self.check(cfg)
            .map_err(|e| e.context(context("delete", &self.table)))
    }

    fn check(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        if cfg.require_where && !self.unsafe_mode && self.wheres.is_empty() {
            return Err(OrmError::validation(
                "DELETE without WHERE clause, call unsafe_mode() to delete every row",
            ));
        }
        check_expressions(&self.table, cfg, &self.wheres)
    }
}
