//! Table definitions.
//!
//! Tables are declared with an explicit, ordered list of `property → column`
//! pairs:
//!
//! ```ignore
//! use sqlforge::column::{pk, varchar};
//! use sqlforge::table;
//!
//! let user = table("User")
//!     .column("id", pk())
//!     .column("name", varchar(100))
//!     .build()?;
//!
//! let post = table("Post")
//!     .column("id", pk())
//!     .column("user_id", user.col("id")?) // reused frozen column => implicit FK
//!     .column("title", varchar(100))
//!     .build()?;
//! ```
//!
//! Building is all-or-nothing: every field is checked before any column is
//! bound or frozen.

use crate::column::Column;
use crate::error::{OrmError, OrmResult};
use crate::ident::validate_db_name;
use crate::sql::SelectedColumn;
use heck::ToSnakeCase;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Table identity shared by the table and all of its columns.
#[derive(Debug)]
pub struct TableInfo {
    name: String,
    db_name: String,
}

impl TableInfo {
    /// Canonical (snake_case) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// A value offered as a table field.
///
/// Only plain columns are valid members; the other variants exist so that
/// mistakes are reported with the offending property instead of being
/// silently accepted.
#[derive(Debug, Clone)]
pub enum TableField {
    Column(Column),
    Selected(SelectedColumn),
}

impl From<Column> for TableField {
    fn from(c: Column) -> Self {
        TableField::Column(c)
    }
}

impl From<&Column> for TableField {
    fn from(c: &Column) -> Self {
        TableField::Column(c.clone())
    }
}

impl From<SelectedColumn> for TableField {
    fn from(c: SelectedColumn) -> Self {
        TableField::Selected(c)
    }
}

/// Start declaring a table; `type_name` is the model name (e.g. `UserProfile`).
pub fn table(type_name: impl Into<String>) -> TableBuilder {
    TableBuilder::new(type_name)
}

/// Builder for [`Table`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    type_name: String,
    name: Option<String>,
    db_name: Option<String>,
    fields: Vec<(String, TableField)>,
}

impl TableBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
            db_name: None,
            fields: Vec::new(),
        }
    }

    /// Override the canonical name (otherwise snake_case of the type name).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the database name (otherwise the canonical name).
    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = Some(db_name.into());
        self
    }

    /// Add a field. Order of calls is the column order of the table.
    pub fn column(mut self, property: impl Into<String>, field: impl Into<TableField>) -> Self {
        self.fields.push((property.into(), field.into()));
        self
    }

    /// Validate every field, then bind and freeze the columns.
    pub fn build(self) -> OrmResult<Table> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => self.type_name.to_snake_case(),
        };
        if name.is_empty() {
            return Err(OrmError::schema("table name cannot be empty"));
        }
        let db_name = self.db_name.clone().unwrap_or_else(|| name.clone());

        self.check_fields()
            .and_then(|()| validate_db_name("table", &db_name))
            .map_err(|e| e.context(format!("table '{name}'")))?;

        let info = Arc::new(TableInfo { name, db_name });
        let mut columns = Vec::with_capacity(self.fields.len());
        let mut index = HashMap::with_capacity(self.fields.len());

        for (property, field) in self.fields {
            let TableField::Column(column) = field else {
                continue;
            };
            let column = if column.is_frozen() {
                tracing::debug!(
                    table = %info.name,
                    property = %property,
                    source = %column,
                    "deriving implicit foreign column"
                );
                Column::new_foreign_column(&column)
            } else {
                column
            };
            column.bind(&property, &info);
            index.insert(property, columns.len());
            columns.push(column);
        }

        let pks: Vec<Column> = columns.iter().filter(|c| c.is_primary_key()).cloned().collect();
        let ai_pks: Vec<Column> = pks.iter().filter(|c| c.is_auto_increment()).cloned().collect();

        tracing::debug!(
            table = %info.name,
            columns = columns.len(),
            pks = pks.len(),
            "table built"
        );

        Ok(Table {
            inner: Arc::new(TableInner {
                info,
                columns,
                index,
                pks,
                ai_pks,
            }),
        })
    }

    fn check_fields(&self) -> OrmResult<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        let mut fresh: Vec<&Column> = Vec::new();
        for (property, field) in &self.fields {
            if property.is_empty() {
                return Err(OrmError::schema("property name cannot be empty"));
            }
            if !seen.insert(property.as_str()) {
                return Err(OrmError::schema(format!("duplicate property '{property}'")));
            }
            let in_property = || format!("property '{property}'");
            match field {
                TableField::Selected(selected) => {
                    return Err(OrmError::schema(format!(
                        "selected column {selected} cannot be a table member"
                    ))
                    .context(in_property()));
                }
                TableField::Column(column) if column.is_joined() => {
                    return Err(OrmError::schema(format!(
                        "joined column {column} is query-only and cannot be a table member"
                    ))
                    .context(in_property()));
                }
                TableField::Column(column) if !column.is_frozen() => {
                    if fresh.iter().any(|c| c.ptr_eq(column)) {
                        return Err(OrmError::schema(
                            "the same unbound column cannot back two properties",
                        )
                        .context(in_property()));
                    }
                    fresh.push(column);
                    let db_name = column.db_name().unwrap_or_else(|| property.to_snake_case());
                    validate_db_name("column", &db_name).map_err(|e| e.context(in_property()))?;
                }
                TableField::Column(_) => {
                    validate_db_name("column", &property.to_snake_case())
                        .map_err(|e| e.context(in_property()))?;
                }
            }
        }
        Ok(())
    }
}

struct TableInner {
    info: Arc<TableInfo>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    pks: Vec<Column>,
    ai_pks: Vec<Column>,
}

/// A named, ordered collection of frozen columns.
#[derive(Clone)]
pub struct Table {
    inner: Arc<TableInner>,
}

impl Table {
    pub fn builder(type_name: impl Into<String>) -> TableBuilder {
        TableBuilder::new(type_name)
    }

    pub fn name(&self) -> &str {
        self.inner.info.name()
    }

    pub fn db_name(&self) -> &str {
        self.inner.info.db_name()
    }

    pub fn info(&self) -> &Arc<TableInfo> {
        &self.inner.info
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    /// Look up a column by property name.
    pub fn get(&self, property: &str) -> Option<&Column> {
        self.inner
            .index
            .get(property)
            .map(|&idx| &self.inner.columns[idx])
    }

    /// Look up a column by property name, failing if it does not exist.
    pub fn col(&self, property: &str) -> OrmResult<Column> {
        self.get(property).cloned().ok_or_else(|| {
            OrmError::schema(format!("no column '{property}' in {self}"))
        })
    }

    /// Primary key columns, in declaration order.
    pub fn pks(&self) -> &[Column] {
        &self.inner.pks
    }

    /// Auto-increment primary key columns.
    pub fn ai_pks(&self) -> &[Column] {
        &self.inner.ai_pks
    }

    /// Whether `column` is bound to this table.
    pub fn owns(&self, column: &Column) -> bool {
        column
            .table()
            .is_some_and(|info| Arc::ptr_eq(info, &self.inner.info))
    }

    pub fn ptr_eq(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.inner.info, &other.inner.info)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Table {}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table({})", self.name())
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
