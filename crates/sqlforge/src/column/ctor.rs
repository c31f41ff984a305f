//! Column type constructors.
//!
//! ```ignore
//! use sqlforge::column::{pk, varchar, datetime};
//! use sqlforge::sql::call::now;
//!
//! let id = pk();
//! let email = varchar(200).unique()?;
//! let created_at = datetime().set_default(now())?;
//! ```

use super::Column;
use crate::error::{OrmError, OrmResult};
use crate::types::{ColumnType, DataType};

/// Column of an arbitrary type descriptor.
pub fn column(column_type: impl Into<ColumnType>) -> Column {
    Column::new(column_type)
}

pub fn tiny_int() -> Column {
    Column::new(DataType::TinyInt)
}

pub fn small_int() -> Column {
    Column::new(DataType::SmallInt)
}

pub fn int() -> Column {
    Column::new(DataType::Int)
}

pub fn big_int() -> Column {
    Column::new(DataType::BigInt)
}

/// `DECIMAL(precision, scale)`
pub fn decimal(precision: u32, scale: u32) -> Column {
    Column::new(
        ColumnType::new(DataType::Decimal)
            .with_length(precision)
            .with_scale(scale),
    )
}

pub fn float() -> Column {
    Column::new(DataType::Float)
}

pub fn double() -> Column {
    Column::new(DataType::Double)
}

/// Fixed-length `CHAR(len)`.
pub fn char(len: u32) -> Column {
    Column::new(ColumnType::new(DataType::Char).with_length(len))
}

/// `VARCHAR(len)`
pub fn varchar(len: u32) -> Column {
    Column::new(ColumnType::new(DataType::VarChar).with_length(len))
}

pub fn text() -> Column {
    Column::new(DataType::Text)
}

pub fn boolean() -> Column {
    Column::new(DataType::Bool)
}

pub fn date() -> Column {
    Column::new(DataType::Date)
}

pub fn time() -> Column {
    Column::new(DataType::Time)
}

pub fn datetime() -> Column {
    Column::new(DataType::DateTime)
}

pub fn timestamp() -> Column {
    Column::new(DataType::Timestamp)
}

pub fn json() -> Column {
    Column::new(DataType::Json)
}

pub fn blob() -> Column {
    Column::new(DataType::Blob)
}

/// Auto-increment `INT` primary key.
pub fn pk() -> Column {
    let mut column_type = ColumnType::new(DataType::Int);
    column_type.primary_key = true;
    column_type.auto_increment = true;
    Column::new(column_type)
}

/// Turn a free-standing column into a (non auto-increment) primary key.
pub fn pk_of(column: Column) -> OrmResult<Column> {
    column.primary_key()
}

/// Foreign key referencing a column already bound into a table.
///
/// Unlike implicit reuse (assigning `other_table.id` directly to a table
/// field), `fk` returns an unfrozen column that can still be configured,
/// e.g. `fk(&user_id)?.nullable()?`.
pub fn fk(target: &Column) -> OrmResult<Column> {
    if target.is_joined() {
        return Err(OrmError::schema(format!(
            "fk() cannot reference joined column {target}"
        )));
    }
    if !target.is_frozen() || target.table().is_none() {
        return Err(OrmError::schema(format!(
            "fk() requires a column bound into a table, {target} is not"
        )));
    }
    Ok(Column::new_foreign_column(target))
}
