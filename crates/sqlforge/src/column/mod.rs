//! Typed column descriptors.
//!
//! A [`Column`] is a cheap, clonable handle. Free-standing columns (from
//! [`int()`], [`varchar()`], ...) are mutable through the fluent mutators until
//! they are bound into a [`Table`](crate::Table), which freezes them. The
//! frozen state is a one-way latch: every mutator checks it and fails with
//! [`OrmError::Frozen`] once it is set.
//!
//! Reusing a frozen column in another table never shares it: the table binds
//! a fresh *foreign column* whose [`Column::foreign_column`] points back to the
//! source column. Joins produce *joined columns* which mirror a remote column and
//! are owned by a [`JoinTable`] instead of a real table.

mod ctor;

#[cfg(test)]
mod tests;

pub use ctor::{
    big_int, blob, boolean, char, column, date, datetime, decimal, double, fk, float, int, json,
    pk, pk_of, small_int, text, time, timestamp, tiny_int, varchar,
};

use crate::error::{OrmError, OrmResult};
use crate::ident::validate_db_name;
use crate::join::{self, JoinTable, JoinType};
use crate::sql::Sql;
use crate::table::TableInfo;
use crate::types::{ColumnType, DataType, Literal};
use heck::ToSnakeCase;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default value of a column: a literal or an SQL expression without column references.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(Literal),
    Sql(Sql),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(lit) => write!(f, "{lit}"),
            DefaultValue::Sql(sql) => write!(f, "{sql}"),
        }
    }
}

impl From<Literal> for DefaultValue {
    fn from(v: Literal) -> Self {
        DefaultValue::Literal(v)
    }
}

impl From<Sql> for DefaultValue {
    fn from(v: Sql) -> Self {
        DefaultValue::Sql(v)
    }
}

impl From<crate::sql::SqlCall> for DefaultValue {
    fn from(v: crate::sql::SqlCall) -> Self {
        DefaultValue::Sql(crate::sql::convert_to_sql(v))
    }
}

impl From<bool> for DefaultValue {
    fn from(v: bool) -> Self {
        DefaultValue::Literal(v.into())
    }
}

impl From<i32> for DefaultValue {
    fn from(v: i32) -> Self {
        DefaultValue::Literal(v.into())
    }
}

impl From<i64> for DefaultValue {
    fn from(v: i64) -> Self {
        DefaultValue::Literal(v.into())
    }
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        DefaultValue::Literal(v.into())
    }
}

impl From<&str> for DefaultValue {
    fn from(v: &str) -> Self {
        DefaultValue::Literal(v.into())
    }
}

impl From<String> for DefaultValue {
    fn from(v: String) -> Self {
        DefaultValue::Literal(v.into())
    }
}

/// What a column is bound to: a real table, or a join descriptor for joined columns.
#[derive(Debug, Clone)]
pub enum ColumnOwner {
    Table(Arc<TableInfo>),
    Join(Arc<JoinTable>),
}

impl ColumnOwner {
    /// Same table (by identity) or the same join.
    pub fn same_as(&self, other: &ColumnOwner) -> bool {
        match (self, other) {
            (ColumnOwner::Table(a), ColumnOwner::Table(b)) => Arc::ptr_eq(a, b),
            (ColumnOwner::Join(a), ColumnOwner::Join(b)) => a.same_join(b),
            _ => false,
        }
    }
}

impl fmt::Display for ColumnOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOwner::Table(info) => write!(f, "Table({})", info.name()),
            ColumnOwner::Join(join) => write!(f, "Join({})", join.path()),
        }
    }
}

#[derive(Debug, Clone)]
enum Origin {
    Declared,
    Foreign(Column),
    Joined(Column),
}

#[derive(Debug, Clone)]
struct ColumnData {
    column_type: ColumnType,
    default: Option<DefaultValue>,
    name: Option<String>,
    db_name: Option<String>,
}

struct ColumnInner {
    data: RwLock<ColumnData>,
    origin: Origin,
    owner: OnceLock<ColumnOwner>,
    frozen: AtomicBool,
}

/// A typed column handle.
///
/// Cloning the handle does not copy the column: all clones observe the same
/// state and compare equal.
#[derive(Clone)]
pub struct Column {
    inner: Arc<ColumnInner>,
}

impl Column {
    /// Create a free-standing (unfrozen) column of the given type.
    pub fn new(column_type: impl Into<ColumnType>) -> Self {
        Self::from_parts(
            ColumnData {
                column_type: column_type.into(),
                default: None,
                name: None,
                db_name: None,
            },
            Origin::Declared,
        )
    }

    fn from_parts(data: ColumnData, origin: Origin) -> Self {
        Self {
            inner: Arc::new(ColumnInner {
                data: RwLock::new(data),
                origin,
                owner: OnceLock::new(),
                frozen: AtomicBool::new(false),
            }),
        }
    }

    /// Derive a new unfrozen foreign column referencing `source`.
    ///
    /// The type is copied (primary key and auto-increment dropped), as are the
    /// default value and the nullable/unique flags.
    pub fn new_foreign_column(source: &Column) -> Column {
        let data = source.read();
        Self::from_parts(
            ColumnData {
                column_type: data.column_type.to_foreign(),
                default: data.default.clone(),
                name: None,
                db_name: None,
            },
            Origin::Foreign(source.clone()),
        )
    }

    /// Derive a joined column mirroring `source` through `join`.
    ///
    /// The result keeps the source's property and database name, is owned by
    /// the join descriptor and is frozen from the start. Columns reached
    /// through the optional side of an outer join are nullable.
    pub fn new_joined_column(source: &Column, join: Arc<JoinTable>) -> Column {
        let mut data = source.read().clone();
        if matches!(join.join_type(), JoinType::Left | JoinType::Full) {
            data.column_type.nullable = true;
        }
        let column = Self::from_parts(data, Origin::Joined(source.clone()));
        let _ = column.inner.owner.set(ColumnOwner::Join(join));
        column.inner.frozen.store(true, Ordering::Release);
        column
    }

    fn read(&self) -> RwLockReadGuard<'_, ColumnData> {
        self.inner.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ColumnData> {
        self.inner.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(
        self,
        op: &str,
        f: impl FnOnce(&mut ColumnData) -> OrmResult<()>,
    ) -> OrmResult<Self> {
        {
            let mut data = self.write();
            if self.is_frozen() {
                return Err(OrmError::frozen(format!(
                    "cannot call {op}() on frozen column {}",
                    self.describe(&data)
                )));
            }
            f(&mut data)?;
        }
        Ok(self)
    }

    // ==================== Fluent configuration ====================

    /// Allow NULL values.
    pub fn nullable(self) -> OrmResult<Self> {
        self.mutate("nullable", |d| {
            d.column_type.nullable = true;
            Ok(())
        })
    }

    /// Disallow NULL values (the default).
    pub fn not_null(self) -> OrmResult<Self> {
        self.mutate("not_null", |d| {
            d.column_type.nullable = false;
            Ok(())
        })
    }

    /// Add a UNIQUE constraint.
    pub fn unique(self) -> OrmResult<Self> {
        self.mutate("unique", |d| {
            d.column_type.unique = true;
            Ok(())
        })
    }

    /// Make this column part of the primary key (implies NOT NULL).
    pub fn primary_key(self) -> OrmResult<Self> {
        self.mutate("primary_key", |d| {
            d.column_type.primary_key = true;
            d.column_type.nullable = false;
            Ok(())
        })
    }

    /// Mark an integer column as auto-increment.
    pub fn auto_increment(self) -> OrmResult<Self> {
        self.mutate("auto_increment", |d| {
            if !d.column_type.data_type.is_integer() {
                return Err(OrmError::schema(format!(
                    "auto_increment requires an integer column, got {}",
                    d.column_type
                )));
            }
            d.column_type.auto_increment = true;
            Ok(())
        })
    }

    /// Mark a numeric column as unsigned.
    pub fn unsigned(self) -> OrmResult<Self> {
        self.mutate("unsigned", |d| {
            if !d.column_type.data_type.is_numeric() {
                return Err(OrmError::schema(format!(
                    "unsigned requires a numeric column, got {}",
                    d.column_type
                )));
            }
            d.column_type.signed = false;
            Ok(())
        })
    }

    /// Set the default value.
    ///
    /// SQL defaults may call functions (`NOW()`), but must not reference columns.
    pub fn set_default(self, value: impl Into<DefaultValue>) -> OrmResult<Self> {
        let value = value.into();
        self.mutate("set_default", |d| {
            if let DefaultValue::Sql(sql) = &value {
                if sql.has_columns() {
                    return Err(OrmError::schema(format!(
                        "default value {sql} is too complex: it references columns"
                    )));
                }
            }
            d.default = Some(value);
            Ok(())
        })
    }

    /// Override the database name (otherwise derived from the property name).
    pub fn set_db_name(self, name: impl Into<String>) -> OrmResult<Self> {
        let name = name.into();
        self.mutate("set_db_name", |d| {
            validate_db_name("column", &name)?;
            d.db_name = Some(name);
            Ok(())
        })
    }

    /// Latch this column into its immutable state. Idempotent.
    pub fn freeze(&self) {
        let _data = self.write();
        self.inner.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Acquire)
    }

    /// Bind a fresh column to its table under `name`, then freeze it.
    pub(crate) fn bind(&self, name: &str, table: &Arc<TableInfo>) {
        let mut data = self.write();
        data.name = Some(name.to_string());
        if data.db_name.is_none() {
            data.db_name = Some(name.to_snake_case());
        }
        let _ = self.inner.owner.set(ColumnOwner::Table(table.clone()));
        self.inner.frozen.store(true, Ordering::Release);
    }

    // ==================== Accessors ====================

    /// Property name, once bound.
    pub fn name(&self) -> Option<String> {
        self.read().name.clone()
    }

    /// Database name: the explicit override, or the snake_case property name.
    pub fn db_name(&self) -> Option<String> {
        let data = self.read();
        data.db_name
            .clone()
            .or_else(|| data.name.as_deref().map(|n| n.to_snake_case()))
    }

    pub fn column_type(&self) -> ColumnType {
        self.read().column_type.clone()
    }

    pub fn data_type(&self) -> DataType {
        self.read().column_type.data_type
    }

    pub fn default_value(&self) -> Option<DefaultValue> {
        self.read().default.clone()
    }

    pub fn is_nullable(&self) -> bool {
        self.read().column_type.nullable
    }

    pub fn is_unique(&self) -> bool {
        self.read().column_type.unique
    }

    pub fn is_primary_key(&self) -> bool {
        self.read().column_type.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.read().column_type.auto_increment
    }

    pub fn owner(&self) -> Option<&ColumnOwner> {
        self.inner.owner.get()
    }

    /// The real table this column is bound to (`None` for joined or unbound columns).
    pub fn table(&self) -> Option<&Arc<TableInfo>> {
        match self.owner() {
            Some(ColumnOwner::Table(info)) => Some(info),
            _ => None,
        }
    }

    /// The join descriptor owning this joined column.
    pub fn join_table(&self) -> Option<&Arc<JoinTable>> {
        match self.owner() {
            Some(ColumnOwner::Join(join)) => Some(join),
            _ => None,
        }
    }

    /// The column this foreign column was derived from.
    pub fn foreign_column(&self) -> Option<&Column> {
        match &self.inner.origin {
            Origin::Foreign(source) => Some(source),
            _ => None,
        }
    }

    /// The remote column this joined column mirrors.
    pub fn mirrored_column(&self) -> Option<&Column> {
        match &self.inner.origin {
            Origin::Joined(source) => Some(source),
            _ => None,
        }
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self.inner.origin, Origin::Foreign(_))
    }

    pub fn is_joined(&self) -> bool {
        matches!(self.inner.origin, Origin::Joined(_))
    }

    /// The column a join from this column lands on when no remote column is given.
    ///
    /// Joined columns answer for the column they mirror.
    pub fn foreign_target(&self) -> Option<&Column> {
        match &self.inner.origin {
            Origin::Foreign(source) => Some(source),
            Origin::Joined(mirrored) => mirrored.foreign_target(),
            Origin::Declared => None,
        }
    }

    /// Follow the foreign-key chain back to the declaring column.
    pub fn root_column(&self) -> Column {
        match &self.inner.origin {
            Origin::Foreign(source) => source.root_column(),
            _ => self.clone(),
        }
    }

    /// Whether both columns trace back to the same declaring column.
    pub fn same_constraint(&self, other: &Column) -> bool {
        self.root_column().ptr_eq(&other.root_column())
    }

    /// Handle identity.
    pub fn ptr_eq(&self, other: &Column) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identifier used for models and implied parameter names.
    ///
    /// Joined columns compose the local column's name with the remote one,
    /// e.g. `user_id` joined to `name` gives `userName`.
    pub fn model_name(&self) -> String {
        match (&self.inner.origin, self.join_table()) {
            (Origin::Joined(mirrored), Some(join)) => {
                join::derive_joined_name(join.src_column(), mirrored)
            }
            _ => self.name().unwrap_or_default(),
        }
    }

    /// snake_case form of [`Column::model_name`], used as a select alias.
    pub fn alias(&self) -> String {
        self.model_name().to_snake_case()
    }

    /// `table.column` for bound columns, `<join path>.column` for joined ones.
    pub fn qualified_name(&self) -> String {
        let db_name = self.db_name().unwrap_or_else(|| "?".to_string());
        match self.owner() {
            Some(ColumnOwner::Table(info)) => format!("{}.{}", info.db_name(), db_name),
            Some(ColumnOwner::Join(join)) => format!("{}.{}", join.path(), db_name),
            None => db_name,
        }
    }

    fn describe(&self, data: &ColumnData) -> String {
        let name = data.name.as_deref().unwrap_or("?");
        match self.owner() {
            Some(owner) => format!("Column({name}, {owner})"),
            None => format!("Column({name}, -)"),
        }
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (&self.inner.origin, &other.inner.origin) {
            (Origin::Joined(a), Origin::Joined(b)) => {
                a == b
                    && match (self.owner(), other.owner()) {
                        (Some(x), Some(y)) => x.same_as(y),
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

impl Eq for Column {}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.read();
        f.write_str(&self.describe(&data))
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
