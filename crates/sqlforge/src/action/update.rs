use super::{and_all, check_expressions, check_setters, collect_inputs, context};
use crate::column::Column;
use crate::config::ValidationConfig;
use crate::error::{OrmError, OrmResult};
use crate::sql::{Sql, SqlArg, SqlVariable, convert_to_sql, param};
use crate::table::Table;

/// UPDATE descriptor.
#[derive(Debug, Clone)]
#[must_use]
pub struct UpdateAction {
    table: Table,
    setters: Vec<(Column, Sql)>,
    wheres: Vec<Sql>,
    unsafe_mode: bool,
}

/// Start an UPDATE of `table`.
pub fn update(table: &Table) -> UpdateAction {
    UpdateAction::new(table)
}

impl UpdateAction {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            setters: Vec::new(),
            wheres: Vec::new(),
            unsafe_mode: false,
        }
    }

    /// Set `column` to `value`.
    pub fn set(mut self, column: &Column, value: impl Into<SqlArg>) -> Self {
        self.setters.push((column.clone(), convert_to_sql(value)));
        self
    }

    /// Set `column` to a parameter named after it.
    pub fn set_param(self, column: &Column) -> Self {
        let p = param(column);
        self.set(column, p)
    }

    /// Add a WHERE condition; several conditions are AND-ed.
    pub fn filter(mut self, condition: impl Into<SqlArg>) -> Self {
        self.wheres.push(convert_to_sql(condition));
        self
    }

    /// Allow updating every row (no WHERE clause).
    pub fn unsafe_mode(mut self) -> Self {
        self.unsafe_mode = true;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn setters(&self) -> &[(Column, Sql)] {
        &self.setters
    }

    pub fn is_unsafe(&self) -> bool {
        self.unsafe_mode
    }

    /// The combined WHERE condition; empty when none was given.
    pub fn where_sql(&self) -> Sql {
        and_all(&self.wheres).unwrap_or_default()
    }

    pub fn inputs(&self) -> Vec<SqlVariable> {
        collect_inputs(self.setters.iter().map(|(_, v)| v).chain(&self.wheres))
    }

    pub fn validate(&self) -> OrmResult<()> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        self.check(cfg)
            .map_err(|e| e.context(context("update", &self.table)))
    }

    fn check(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        if self.setters.is_empty() {
            return Err(OrmError::validation("UPDATE requires at least one setter"));
        }
        check_setters(&self.table, &self.setters)?;
        if cfg.require_where && !self.unsafe_mode && self.wheres.is_empty() {
            return Err(OrmError::validation(
                "UPDATE without WHERE clause, call unsafe_mode() to update every row",
            ));
        }
        check_expressions(
            &self.table,
            cfg,
            self.setters.iter().map(|(_, v)| v).chain(&self.wheres),
        )
    }
}
