use super::{check_expressions, check_setters, collect_inputs, context, deferred};
use crate::column::Column;
use crate::config::ValidationConfig;
use crate::error::{OrmError, OrmResult};
use crate::sql::{Sql, SqlArg, SqlVariable, convert_to_sql, param};
use crate::table::Table;

/// INSERT descriptor.
#[derive(Debug, Clone)]
#[must_use]
pub struct InsertAction {
    table: Table,
    setters: Vec<(Column, Sql)>,
    full: bool,
    build_error: Option<String>,
}

/// Start an INSERT into `table`.
pub fn insert(table: &Table) -> InsertAction {
    InsertAction::new(table)
}

impl InsertAction {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            setters: Vec::new(),
            full: false,
            build_error: None,
        }
    }

    /// Set `column` to `value`.
    pub fn set(mut self, column: &Column, value: impl Into<SqlArg>) -> Self {
        self.setters.push((column.clone(), convert_to_sql(value)));
        self
    }

    /// Set `column` by property name.
    pub fn set_by_name(mut self, property: &str, value: impl Into<SqlArg>) -> Self {
        match self.table.col(property) {
            Ok(column) => self.setters.push((column, convert_to_sql(value))),
            Err(e) => {
                if self.build_error.is_none() {
                    self.build_error = Some(e.to_string());
                }
            }
        }
        self
    }

    /// Set `column` to a parameter named after it.
    pub fn set_param(self, column: &Column) -> Self {
        let p = param(column);
        self.set(column, p)
    }

    /// Insert every column except auto-increment ones, each from a parameter.
    pub fn with_params(mut self) -> Self {
        let columns: Vec<Column> = self
            .table
            .columns()
            .iter()
            .filter(|c| !c.is_auto_increment())
            .cloned()
            .collect();
        for column in &columns {
            self = self.set_param(column);
        }
        self.full()
    }

    /// Require a setter for every column except auto-increment ones.
    pub fn full(mut self) -> Self {
        self.full = true;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn setters(&self) -> &[(Column, Sql)] {
        &self.setters
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn inputs(&self) -> Vec<SqlVariable> {
        collect_inputs(self.setters.iter().map(|(_, v)| v))
    }

    pub fn validate(&self) -> OrmResult<()> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        self.check(cfg)
            .map_err(|e| e.context(context("insert", &self.table)))
    }

    fn check(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        deferred(&self.build_error)?;
        if self.setters.is_empty() {
            return Err(OrmError::validation("INSERT requires at least one setter"));
        }
        check_setters(&self.table, &self.setters)?;

        if self.full {
            let expected = self
                .table
                .columns()
                .iter()
                .filter(|c| !c.is_auto_increment())
                .count();
            if self.setters.len() != expected {
                return Err(OrmError::validation(format!(
                    "full insert expects {expected} setters, got {}",
                    self.setters.len()
                )));
            }
        }

        check_expressions(&self.table, cfg, self.setters.iter().map(|(_, v)| v))
    }
}
