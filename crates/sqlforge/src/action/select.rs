use super::{and_all, check_expressions, collect_inputs, context, deferred};
use crate::config::ValidationConfig;
use crate::error::{OrmError, OrmResult};
use crate::join::JoinTable;
use crate::sql::{SelectedColumn, Sql, SqlArg, SqlVariable, convert_to_sql};
use crate::table::Table;
use std::collections::HashSet;
use std::sync::Arc;

/// SELECT descriptor.
#[derive(Debug, Clone)]
#[must_use]
pub struct SelectAction {
    table: Table,
    /// Explicit columns; empty means every table column.
    columns: Vec<SelectedColumn>,
    wheres: Vec<Sql>,
    order_by: Vec<Sql>,
    group_by: Vec<Sql>,
    having: Option<Sql>,
    limit: Option<u64>,
    offset: Option<u64>,
    distinct: bool,
    unordered: bool,
    build_error: Option<String>,
}

/// Start a SELECT over `table`.
pub fn select(table: &Table) -> SelectAction {
    SelectAction::new(table)
}

impl SelectAction {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            columns: Vec::new(),
            wheres: Vec::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            having: None,
            limit: None,
            offset: None,
            distinct: false,
            unordered: false,
            build_error: None,
        }
    }

    fn fail(&mut self, err: OrmError) {
        if self.build_error.is_none() {
            self.build_error = Some(err.to_string());
        }
    }

    // ==================== SELECT columns ====================

    /// Select a column or expression under its inferred alias.
    pub fn column(mut self, value: impl Into<SqlArg>) -> Self {
        match SelectedColumn::infer(value) {
            Ok(selected) => self.columns.push(selected),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Select an expression under an explicit alias.
    pub fn column_as(mut self, value: impl Into<SqlArg>, alias: &str) -> Self {
        match SelectedColumn::new(value, alias) {
            Ok(selected) => self.columns.push(selected),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== Clauses ====================

    /// Add a WHERE condition; several conditions are AND-ed.
    pub fn filter(mut self, condition: impl Into<SqlArg>) -> Self {
        self.wheres.push(convert_to_sql(condition));
        self
    }

    pub fn order_by(mut self, expr: impl Into<SqlArg>) -> Self {
        self.order_by.push(convert_to_sql(expr));
        self
    }

    pub fn group_by(mut self, expr: impl Into<SqlArg>) -> Self {
        self.group_by.push(convert_to_sql(expr));
        self
    }

    pub fn having(mut self, condition: impl Into<SqlArg>) -> Self {
        self.having = Some(convert_to_sql(condition));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Fetch at most one row (`LIMIT 1`).
    pub fn first(self) -> Self {
        self.limit(1)
    }

    /// Accept an unspecified row order.
    pub fn unordered(mut self) -> Self {
        self.unordered = true;
        self
    }

    // ==================== Accessors ====================

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Selected columns, defaulting to every table column.
    pub fn columns(&self) -> Vec<SelectedColumn> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        self.table
            .columns()
            .iter()
            .filter_map(|c| SelectedColumn::new(c, c.alias()).ok())
            .collect()
    }

    /// The combined WHERE condition.
    pub fn where_sql(&self) -> Option<Sql> {
        and_all(&self.wheres)
    }

    pub fn order_by_exprs(&self) -> &[Sql] {
        &self.order_by
    }

    pub fn group_by_exprs(&self) -> &[Sql] {
        &self.group_by
    }

    pub fn having_sql(&self) -> Option<&Sql> {
        self.having.as_ref()
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Whether at most one row is fetched.
    pub fn is_single_row(&self) -> bool {
        self.limit == Some(1)
    }

    fn expressions(&self) -> Vec<Sql> {
        let mut exprs: Vec<Sql> = self.columns.iter().map(|c| c.sql().clone()).collect();
        exprs.extend(self.wheres.iter().cloned());
        exprs.extend(self.group_by.iter().cloned());
        exprs.extend(self.having.iter().cloned());
        exprs.extend(self.order_by.iter().cloned());
        exprs
    }

    pub fn inputs(&self) -> Vec<SqlVariable> {
        collect_inputs(&self.expressions())
    }

    /// Join descriptors needed by the query, parents before nested joins.
    pub fn joins(&self) -> Vec<Arc<JoinTable>> {
        let mut joins: Vec<Arc<JoinTable>> = Vec::new();
        for expr in self.expressions() {
            for column in expr.columns() {
                let mut next = column.join_table().cloned();
                while let Some(join) = next {
                    next = join.parent().cloned();
                    if !joins.iter().any(|j| j.same_join(&join)) {
                        joins.push(join);
                    }
                }
            }
        }
        joins.sort_by_key(|j| j.depth());
        joins
    }

    pub fn validate(&self) -> OrmResult<()> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        self.check(cfg)
            .map_err(|e| e.context(context("select", &self.table)))
    }

    fn check(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        deferred(&self.build_error)?;

        let mut aliases = HashSet::new();
        for column in &self.columns {
            if !aliases.insert(column.alias()) {
                return Err(OrmError::validation(format!(
                    "duplicate select alias '{}'",
                    column.alias()
                )));
            }
        }

        if self.having.is_some() && self.group_by.is_empty() {
            return Err(OrmError::validation("HAVING requires GROUP BY"));
        }

        if cfg.require_order_by
            && !self.is_single_row()
            && !self.unordered
            && self.order_by.is_empty()
        {
            return Err(OrmError::validation(
                "multi-row SELECT without ORDER BY, call unordered() to accept any order",
            ));
        }

        check_expressions(&self.table, cfg, &self.expressions())
    }
}
