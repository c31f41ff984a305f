//! Action descriptors built on the expression model.
//!
//! Actions only read tables, columns and expressions; they never mutate them.
//! Like the query builders they are assembled with consuming methods that
//! record the first problem in a deferred build error, and are checked as a
//! whole by [`Action::validate`]:
//!
//! ```ignore
//! use sqlforge::action::{select, update};
//! use sqlforge::sql;
//! use sqlforge::sql::param;
//!
//! let by_author = select(&post)
//!     .filter(sql!("{} = {}", &post_user_id, param(&post_user_id)))
//!     .order_by(sql!("{} DESC", &post_id));
//! by_author.validate()?;
//!
//! let rename = update(&user)
//!     .set(&user_name, param(&user_name))
//!     .filter(sql!("{} = {}", &user_id, param(&user_id)));
//! rename.validate()?;
//! ```

mod delete;
mod insert;
mod select;
mod update;

#[cfg(test)]
mod tests;

pub use delete::{DeleteAction, delete};
pub use insert::{InsertAction, insert};
pub use select::{SelectAction, select};
pub use update::{UpdateAction, update};

use crate::column::Column;
use crate::config::ValidationConfig;
use crate::error::{OrmError, OrmResult};
use crate::sql::{Sql, SqlArg, SqlVariable};
use crate::table::Table;
use std::fmt;
use std::sync::Arc;

/// Any action.
#[derive(Debug, Clone)]
pub enum Action {
    Select(SelectAction),
    Insert(InsertAction),
    Update(UpdateAction),
    Delete(DeleteAction),
}

impl Action {
    /// `"select"`, `"insert"`, `"update"` or `"delete"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Select(_) => "select",
            Action::Insert(_) => "insert",
            Action::Update(_) => "update",
            Action::Delete(_) => "delete",
        }
    }

    /// The table the action runs against.
    pub fn table(&self) -> &Table {
        match self {
            Action::Select(a) => a.table(),
            Action::Insert(a) => a.table(),
            Action::Update(a) => a.table(),
            Action::Delete(a) => a.table(),
        }
    }

    /// Validate against the default rules.
    pub fn validate(&self) -> OrmResult<()> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        match self {
            Action::Select(a) => a.validate_with(cfg),
            Action::Insert(a) => a.validate_with(cfg),
            Action::Update(a) => a.validate_with(cfg),
            Action::Delete(a) => a.validate_with(cfg),
        }
    }

    /// Distinct parameters in order of first occurrence.
    pub fn inputs(&self) -> Vec<SqlVariable> {
        match self {
            Action::Select(a) => a.inputs(),
            Action::Insert(a) => a.inputs(),
            Action::Update(a) => a.inputs(),
            Action::Delete(a) => a.inputs(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Action::Select(_) => "Select",
            Action::Insert(_) => "Insert",
            Action::Update(_) => "Update",
            Action::Delete(_) => "Delete",
        };
        write!(f, "{kind}({})", self.table().name())
    }
}

macro_rules! impl_action_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(a: $ty) -> Self {
                    Action::$variant(a)
                }
            }

            impl From<$ty> for SqlArg {
                fn from(a: $ty) -> Self {
                    SqlArg::Action(Arc::new(Action::$variant(a)))
                }
            }
        )*
    };
}

impl_action_conversions! {
    Select => SelectAction,
    Insert => InsertAction,
    Update => UpdateAction,
    Delete => DeleteAction,
}

// ==================== Shared checks ====================

fn context(kind: &str, table: &Table) -> String {
    format!("{kind} on {table}")
}

fn deferred(build_error: &Option<String>) -> OrmResult<()> {
    match build_error {
        Some(err) => Err(OrmError::Validation(err.clone())),
        None => Ok(()),
    }
}

/// Combine WHERE fragments with AND, parenthesizing when there are several.
fn and_all(parts: &[Sql]) -> Option<Sql> {
    match parts {
        [] => None,
        [one] => Some(one.clone()),
        many => Some(Sql::join(
            many.iter().map(|p| crate::sql!("({})", p)),
            " AND ",
        )),
    }
}

fn collect_inputs<'a>(exprs: impl IntoIterator<Item = &'a Sql>) -> Vec<SqlVariable> {
    let mut out: Vec<SqlVariable> = Vec::new();
    for expr in exprs {
        for input in expr.inputs() {
            if !out.contains(&input) {
                out.push(input);
            }
        }
    }
    out
}

/// Whether `column` can be addressed from a query over `table`: it belongs to
/// the table, or is reached through a join starting at it.
fn reachable_from(table: &Table, column: &Column) -> bool {
    match column.join_table() {
        Some(join) => join
            .root_table()
            .is_some_and(|root| Arc::ptr_eq(&root, table.info())),
        None => table.owns(column),
    }
}

fn check_expressions<'a>(
    table: &Table,
    cfg: &ValidationConfig,
    exprs: impl IntoIterator<Item = &'a Sql>,
) -> OrmResult<()> {
    for expr in exprs {
        for column in expr.columns() {
            if !reachable_from(table, &column) {
                return Err(OrmError::validation(format!(
                    "{column} is not reachable from {table}"
                )));
            }
            if let Some(join) = column.join_table() {
                let joins = join.depth() + 1;
                if joins > cfg.max_join_depth {
                    return Err(OrmError::validation(format!(
                        "{column} is {joins} joins deep, the limit is {}",
                        cfg.max_join_depth
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Check a list of SET targets: owned by `table`, each at most once.
fn check_setters(table: &Table, setters: &[(Column, Sql)]) -> OrmResult<()> {
    for (idx, (column, _)) in setters.iter().enumerate() {
        if !table.owns(column) {
            return Err(OrmError::validation(format!(
                "cannot set {column}: it does not belong to {table}"
            )));
        }
        if setters[..idx].iter().any(|(seen, _)| seen == column) {
            return Err(OrmError::validation(format!(
                "{column} is set more than once"
            )));
        }
    }
    Ok(())
}
