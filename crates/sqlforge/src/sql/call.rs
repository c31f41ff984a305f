//! SQL function calls.
//!
//! ```ignore
//! use sqlforge::sql::call::{count_all, coalesce, now};
//!
//! let total = count_all();
//! let seen = coalesce([sql!("{}", &last_seen), convert_to_sql(now())]);
//! ```

use super::builder::convert_to_sql;
use super::element::{SqlArg, SqlElement};
use super::Sql;
use crate::types::{ColumnType, DataType};
use std::fmt;

/// A typed function invocation.
#[derive(Clone, PartialEq)]
pub struct SqlCall {
    name: String,
    column_type: ColumnType,
    args: Vec<Sql>,
}

impl SqlCall {
    pub fn new(
        name: impl Into<String>,
        column_type: impl Into<ColumnType>,
        args: impl IntoIterator<Item = Sql>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Override the result type.
    pub fn with_type(mut self, column_type: impl Into<ColumnType>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn args(&self) -> &[Sql] {
        &self.args
    }

    pub fn has_columns(&self) -> bool {
        self.args.iter().any(Sql::has_columns)
    }
}

impl fmt::Display for SqlCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for SqlCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQLCall({}, {}", self.name, self.column_type)?;
        for arg in &self.args {
            write!(f, ", {arg:?}")?;
        }
        f.write_str(")")
    }
}

/// Result type of an expression: the first typed leaf (column, parameter or
/// call) decides.
pub(crate) fn infer_type(sql: &Sql) -> Option<ColumnType> {
    sql.elements().iter().find_map(|e| match e {
        SqlElement::Column(c) => Some(c.column_type()),
        SqlElement::Input(v) => Some(v.column_type()),
        SqlElement::Call(call) => Some(call.column_type().clone()),
        SqlElement::Selected(s) => infer_type(s.sql()),
        _ => None,
    })
}

fn aggregate(name: &str, arg: Sql, fallback: DataType) -> SqlCall {
    let mut column_type = infer_type(&arg).unwrap_or_else(|| fallback.into());
    column_type.nullable = true;
    column_type.primary_key = false;
    column_type.unique = false;
    column_type.auto_increment = false;
    SqlCall::new(name, column_type, [arg])
}

fn typed(data_type: DataType, nullable: bool) -> ColumnType {
    let mut t = ColumnType::new(data_type);
    t.nullable = nullable;
    t
}

pub fn count(arg: impl Into<SqlArg>) -> SqlCall {
    SqlCall::new("COUNT", DataType::BigInt, [convert_to_sql(arg)])
}

/// `COUNT(*)`
pub fn count_all() -> SqlCall {
    SqlCall::new("COUNT", DataType::BigInt, [Sql::raw("*")])
}

pub fn avg(arg: impl Into<SqlArg>) -> SqlCall {
    SqlCall::new("AVG", typed(DataType::Double, true), [convert_to_sql(arg)])
}

pub fn sum(arg: impl Into<SqlArg>) -> SqlCall {
    aggregate("SUM", convert_to_sql(arg), DataType::Decimal)
}

pub fn min(arg: impl Into<SqlArg>) -> SqlCall {
    aggregate("MIN", convert_to_sql(arg), DataType::Double)
}

pub fn max(arg: impl Into<SqlArg>) -> SqlCall {
    aggregate("MAX", convert_to_sql(arg), DataType::Double)
}

/// Typed after the first argument; nullable only if every argument is.
pub fn coalesce<I, A>(args: I) -> SqlCall
where
    I: IntoIterator<Item = A>,
    A: Into<SqlArg>,
{
    let args: Vec<Sql> = args.into_iter().map(convert_to_sql).collect();
    let types: Vec<ColumnType> = args.iter().filter_map(infer_type).collect();
    let mut column_type = types
        .first()
        .cloned()
        .unwrap_or_else(|| DataType::Text.into());
    column_type.nullable = types.iter().all(|t| t.nullable);
    SqlCall::new("COALESCE", column_type, args)
}

pub fn now() -> SqlCall {
    SqlCall::new("NOW", DataType::DateTime, Vec::<Sql>::new())
}

pub fn utc_now() -> SqlCall {
    SqlCall::new("UTC_TIMESTAMP", DataType::DateTime, Vec::<Sql>::new())
}

pub fn current_date() -> SqlCall {
    SqlCall::new("CURRENT_DATE", DataType::Date, Vec::<Sql>::new())
}

pub fn current_time() -> SqlCall {
    SqlCall::new("CURRENT_TIME", DataType::Time, Vec::<Sql>::new())
}

/// `EXISTS(subquery)`
pub fn exists(subquery: impl Into<SqlArg>) -> SqlCall {
    SqlCall::new("EXISTS", DataType::Bool, [convert_to_sql(subquery)])
}

/// `NOT EXISTS(subquery)`
pub fn not_exists(subquery: impl Into<SqlArg>) -> SqlCall {
    SqlCall::new("NOT EXISTS", DataType::Bool, [convert_to_sql(subquery)])
}

/// `IFNULL(value, fallback)`, typed after `value` and nullable only if `fallback` is.
pub fn if_null(value: impl Into<SqlArg>, fallback: impl Into<SqlArg>) -> SqlCall {
    let (value, fallback) = (convert_to_sql(value), convert_to_sql(fallback));
    let mut column_type = infer_type(&value)
        .or_else(|| infer_type(&fallback))
        .unwrap_or_else(|| DataType::Text.into());
    column_type.nullable = infer_type(&fallback).is_some_and(|t| t.nullable);
    SqlCall::new("IFNULL", column_type, [value, fallback])
}

/// `IF(condition, then, otherwise)`, typed after `then`.
pub fn if_(
    condition: impl Into<SqlArg>,
    then: impl Into<SqlArg>,
    otherwise: impl Into<SqlArg>,
) -> SqlCall {
    let (condition, then, otherwise) = (
        convert_to_sql(condition),
        convert_to_sql(then),
        convert_to_sql(otherwise),
    );
    let column_type = infer_type(&then)
        .or_else(|| infer_type(&otherwise))
        .unwrap_or_else(|| DataType::Text.into());
    SqlCall::new("IF", column_type, [condition, then, otherwise])
}
