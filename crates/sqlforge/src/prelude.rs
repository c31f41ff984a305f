//! Convenient imports for typical `sqlforge` usage.
//!
//! ```ignore
//! use sqlforge::prelude::*;
//! ```

pub use crate::column::{big_int, boolean, datetime, fk, int, pk, text, varchar};
pub use crate::sql::call::{count, count_all, now};
pub use crate::sql::{param_named, select_as};
pub use crate::{
    Action, Column, ColumnType, DataType, JoinType, OrmError, OrmResult, OrmResultExt, Schema,
    Sql, SqlVariable, Table, ValidationConfig, delete, input, insert, param, select, sql, table,
    update,
};
