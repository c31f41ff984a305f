use super::{SelectedColumn, Sql, SqlCall, SqlVariable};
use crate::action::Action;
use crate::column::Column;
use crate::types::Literal;
use std::fmt;
use std::sync::Arc;

/// One leaf of a flattened SQL expression.
///
/// There is no nested-`Sql` variant: embedding an expression splices its
/// elements instead.
#[derive(Clone)]
pub enum SqlElement {
    Raw(String),
    Column(Column),
    Input(SqlVariable),
    Call(SqlCall),
    Selected(SelectedColumn),
    Action(Arc<Action>),
}

impl SqlElement {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            SqlElement::Raw(_) => "RAW",
            SqlElement::Column(_) => "COLUMN",
            SqlElement::Input(_) => "INPUT",
            SqlElement::Call(_) => "CALL",
            SqlElement::Selected(_) => "SELECTED",
            SqlElement::Action(_) => "ACTION",
        }
    }

    pub(crate) fn has_columns(&self) -> bool {
        match self {
            SqlElement::Column(_) | SqlElement::Input(_) | SqlElement::Selected(_) => true,
            SqlElement::Call(call) => call.has_columns(),
            SqlElement::Raw(_) | SqlElement::Action(_) => false,
        }
    }

    pub(crate) fn has_calls(&self) -> bool {
        match self {
            SqlElement::Call(_) => true,
            SqlElement::Selected(selected) => selected.sql().has_calls(),
            _ => false,
        }
    }
}

impl PartialEq for SqlElement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SqlElement::Raw(a), SqlElement::Raw(b)) => a == b,
            (SqlElement::Column(a), SqlElement::Column(b)) => a == b,
            (SqlElement::Input(a), SqlElement::Input(b)) => a == b,
            (SqlElement::Call(a), SqlElement::Call(b)) => a == b,
            (SqlElement::Selected(a), SqlElement::Selected(b)) => a == b,
            (SqlElement::Action(a), SqlElement::Action(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for SqlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlElement::Raw(s) => f.write_str(s),
            SqlElement::Column(c) => f.write_str(&c.qualified_name()),
            SqlElement::Input(v) => write!(f, ":{}", v.name()),
            SqlElement::Call(call) => write!(f, "{call}"),
            SqlElement::Selected(s) => write!(f, "{} AS {}", s.sql(), s.alias()),
            SqlElement::Action(a) => write!(f, "({a})"),
        }
    }
}

impl fmt::Debug for SqlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({}, ", self.kind())?;
        match self {
            SqlElement::Raw(s) => write!(f, "{s:?}")?,
            SqlElement::Column(c) => write!(f, "{c}")?,
            SqlElement::Input(v) => write!(f, "{v}")?,
            SqlElement::Call(call) => write!(f, "{call:?}")?,
            SqlElement::Selected(s) => write!(f, "{s}")?,
            SqlElement::Action(a) => write!(f, "{a}")?,
        }
        f.write_str(")")
    }
}

/// Anything that can be interpolated into an SQL template.
///
/// Unsupported argument types are rejected at compile time: there is simply
/// no `From` conversion for them.
#[derive(Debug, Clone)]
pub enum SqlArg {
    Raw(String),
    Column(Column),
    Input(SqlVariable),
    Sql(Sql),
    Call(SqlCall),
    Selected(SelectedColumn),
    Action(Arc<Action>),
}

impl From<&str> for SqlArg {
    fn from(s: &str) -> Self {
        SqlArg::Raw(s.to_string())
    }
}

impl From<String> for SqlArg {
    fn from(s: String) -> Self {
        SqlArg::Raw(s)
    }
}

impl From<&String> for SqlArg {
    fn from(s: &String) -> Self {
        SqlArg::Raw(s.clone())
    }
}

/// Literals are inlined as SQL text (`'it''s'`, `42`, `NULL`).
impl From<Literal> for SqlArg {
    fn from(lit: Literal) -> Self {
        SqlArg::Raw(lit.to_string())
    }
}

impl From<Column> for SqlArg {
    fn from(c: Column) -> Self {
        SqlArg::Column(c)
    }
}

impl From<&Column> for SqlArg {
    fn from(c: &Column) -> Self {
        SqlArg::Column(c.clone())
    }
}

impl From<SqlVariable> for SqlArg {
    fn from(v: SqlVariable) -> Self {
        SqlArg::Input(v)
    }
}

impl From<&SqlVariable> for SqlArg {
    fn from(v: &SqlVariable) -> Self {
        SqlArg::Input(v.clone())
    }
}

impl From<Sql> for SqlArg {
    fn from(s: Sql) -> Self {
        SqlArg::Sql(s)
    }
}

impl From<&Sql> for SqlArg {
    fn from(s: &Sql) -> Self {
        SqlArg::Sql(s.clone())
    }
}

impl From<SqlCall> for SqlArg {
    fn from(c: SqlCall) -> Self {
        SqlArg::Call(c)
    }
}

impl From<&SqlCall> for SqlArg {
    fn from(c: &SqlCall) -> Self {
        SqlArg::Call(c.clone())
    }
}

impl From<SelectedColumn> for SqlArg {
    fn from(s: SelectedColumn) -> Self {
        SqlArg::Selected(s)
    }
}

impl From<&SelectedColumn> for SqlArg {
    fn from(s: &SelectedColumn) -> Self {
        SqlArg::Selected(s.clone())
    }
}

impl From<Action> for SqlArg {
    fn from(a: Action) -> Self {
        SqlArg::Action(Arc::new(a))
    }
}

impl From<Arc<Action>> for SqlArg {
    fn from(a: Arc<Action>) -> Self {
        SqlArg::Action(a)
    }
}
