//! Join path resolution.
//!
//! Joining a local column to a destination table yields a [`JoinedTable`]:
//! a lazy view over the destination whose [`JoinedTable::col`] produces
//! *joined columns* on demand. Joined columns mirror the remote column's type
//! and are owned by a shared [`JoinTable`] descriptor, whose `path` encodes
//! the full traversal:
//!
//! ```text
//! (J|0|post|user)[user_id|id]
//! (J|1|(J|0|post|user)[user_id|id]|company)[company_id|id]
//! ```
//!
//! Joining from a joined column extends the path of its join instead of
//! starting over from a real table.

use crate::column::Column;
use crate::error::{OrmError, OrmResult};
use crate::sql::Sql;
use crate::table::{Table, TableInfo};
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// SQL join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }

    pub const fn is_outer(self) -> bool {
        !matches!(self, JoinType::Inner)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_keyword())
    }
}

/// Descriptor shared by every joined column produced by one join.
#[derive(Debug, Clone)]
pub struct JoinTable {
    src_column: Column,
    dest_column: Column,
    dest_table: Table,
    path: String,
    depth: usize,
    extra_columns: Vec<(Column, Column)>,
    extra_sql: Option<Sql>,
    join_type: JoinType,
    associative: bool,
}

impl JoinTable {
    /// Local join key.
    pub fn src_column(&self) -> &Column {
        &self.src_column
    }

    /// Remote join key.
    pub fn dest_column(&self) -> &Column {
        &self.dest_column
    }

    pub fn dest_table(&self) -> &Table {
        &self.dest_table
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 0 for a join from a real table, +1 per nested join.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Additional `(local, remote)` key pairs of a composite join.
    pub fn extra_columns(&self) -> &[(Column, Column)] {
        &self.extra_columns
    }

    /// Additional ON-clause condition.
    pub fn extra_sql(&self) -> Option<&Sql> {
        self.extra_sql.as_ref()
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn is_associative(&self) -> bool {
        self.associative
    }

    /// The join this one was nested in, if any.
    pub fn parent(&self) -> Option<&Arc<JoinTable>> {
        self.src_column.join_table()
    }

    /// The real table the whole join chain starts from.
    pub fn root_table(&self) -> Option<Arc<TableInfo>> {
        match self.parent() {
            Some(parent) => parent.root_table(),
            None => self.src_column.table().cloned(),
        }
    }

    /// Whether both descriptors denote the same join: same path, kind and ON condition.
    pub fn same_join(&self, other: &JoinTable) -> bool {
        self.path == other.path
            && self.join_type == other.join_type
            && self.associative == other.associative
            && self.extra_sql == other.extra_sql
    }
}

impl fmt::Display for JoinTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Join({})", self.path)
    }
}

type ConditionFn = Box<dyn FnOnce(&JoinedTable) -> OrmResult<Sql>>;

/// Join builder.
///
/// ```ignore
/// let author = Join::new(&post.col("user_id")?, &user)
///     .join_type(JoinType::Left)
///     .condition(|u| Ok(sql!("{} = 1", u.col("active")?)))
///     .resolve()?;
/// let author_name = author.col("name")?;
/// ```
#[must_use]
pub struct Join {
    local: Column,
    dest_table: Table,
    dest_column: Option<Column>,
    extra_keys: Vec<(Column, Column)>,
    condition: Option<ConditionFn>,
    join_type: JoinType,
    associative: bool,
}

impl Join {
    pub fn new(local: &Column, dest_table: &Table) -> Self {
        Self {
            local: local.clone(),
            dest_table: dest_table.clone(),
            dest_column: None,
            extra_keys: Vec::new(),
            condition: None,
            join_type: JoinType::Inner,
            associative: false,
        }
    }

    /// Remote join key; required unless the local column is a foreign column.
    pub fn on(mut self, dest_column: &Column) -> Self {
        self.dest_column = Some(dest_column.clone());
        self
    }

    /// Add a `(local, remote)` key pair for composite joins.
    pub fn extra_key(mut self, local: &Column, remote: &Column) -> Self {
        self.extra_keys.push((local.clone(), remote.clone()));
        self
    }

    /// Additional ON condition, built against the joined view of the destination.
    pub fn condition<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&JoinedTable) -> OrmResult<Sql> + 'static,
    {
        self.condition = Some(Box::new(f));
        self
    }

    /// Set the join kind. Anything but LEFT clears [`Join::associative`].
    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        if join_type != JoinType::Left {
            self.associative = false;
        }
        self
    }

    /// Mark as an associative (many-side, optional) join; implies LEFT.
    pub fn associative(mut self) -> Self {
        self.associative = true;
        self.join_type = JoinType::Left;
        self
    }

    pub fn resolve(self) -> OrmResult<JoinedTable> {
        let Join {
            local,
            dest_table,
            dest_column,
            extra_keys,
            condition,
            join_type,
            associative,
        } = self;

        let dest_column = match dest_column {
            Some(column) => {
                if !dest_table.owns(&column) {
                    return Err(OrmError::join(format!(
                        "remote column {column} does not belong to {dest_table}"
                    )));
                }
                column
            }
            None => {
                let Some(target) = local.foreign_target() else {
                    return Err(OrmError::join(format!(
                        "remote column must be specified explicitly, {local} is not a foreign column"
                    )));
                };
                if !dest_table.owns(target) {
                    return Err(OrmError::join(format!(
                        "{local} references {target}, which does not belong to {dest_table}"
                    )));
                }
                target.clone()
            }
        };

        let (src, depth) = match (local.join_table(), local.table()) {
            (Some(parent), _) => (parent.path().to_string(), parent.depth() + 1),
            (None, Some(info)) => (info.name().to_string(), 0),
            (None, None) => {
                return Err(OrmError::join(format!(
                    "cannot join from {local}: it is not bound to a table"
                )));
            }
        };

        for (extra_local, extra_remote) in &extra_keys {
            if !dest_table.owns(extra_remote) {
                return Err(OrmError::join(format!(
                    "extra key {extra_remote} does not belong to {dest_table}"
                )));
            }
            if !same_source(&local, extra_local) {
                return Err(OrmError::join(format!(
                    "extra key {extra_local} does not share the source of {local}"
                )));
            }
        }

        let mut path = format!(
            "(J|{depth}|{src}|{})[{}|{}]",
            dest_table.name(),
            db_name(&local),
            db_name(&dest_column)
        );
        for (extra_local, extra_remote) in &extra_keys {
            path.push_str(&format!("[{}|{}]", db_name(extra_local), db_name(extra_remote)));
        }

        warn_if_incompatible(&local, &dest_column);
        for (extra_local, extra_remote) in &extra_keys {
            warn_if_incompatible(extra_local, extra_remote);
        }

        let base = Arc::new(JoinTable {
            src_column: local,
            dest_column,
            dest_table,
            path,
            depth,
            extra_columns: extra_keys,
            extra_sql: None,
            join_type,
            associative,
        });

        let join = match condition {
            Some(f) => {
                let sql = f(&JoinedTable { join: base.clone() })
                    .map_err(|e| e.context(format!("join condition of {base}")))?;
                Arc::new(JoinTable {
                    extra_sql: Some(sql),
                    ..(*base).clone()
                })
            }
            None => base,
        };

        tracing::trace!(path = %join.path, join_type = ?join.join_type, "join resolved");
        Ok(JoinedTable { join })
    }
}

fn db_name(column: &Column) -> String {
    column.db_name().unwrap_or_else(|| "?".to_string())
}

fn same_source(a: &Column, b: &Column) -> bool {
    match (a.join_table(), b.join_table()) {
        (Some(x), Some(y)) => x.same_join(y),
        (None, None) => match (a.table(), b.table()) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            _ => false,
        },
        _ => false,
    }
}

fn warn_if_incompatible(local: &Column, remote: &Column) {
    let (local_type, remote_type) = (local.column_type(), remote.column_type());
    if !remote_type.accepts(&local_type) || !local_type.accepts(&remote_type) {
        tracing::warn!(
            local = %local,
            local_type = %local_type,
            remote = %remote,
            remote_type = %remote_type,
            "joining columns of incompatible types"
        );
    }
}

/// Lazy view over a joined destination table.
#[derive(Debug, Clone)]
pub struct JoinedTable {
    join: Arc<JoinTable>,
}

impl JoinedTable {
    /// Joined column mirroring `property` of the destination table.
    pub fn col(&self, property: &str) -> OrmResult<Column> {
        let source = self
            .join
            .dest_table()
            .col(property)
            .map_err(|e| e.context(format!("in {}", self.join)))?;
        Ok(Column::new_joined_column(&source, self.join.clone()))
    }

    pub fn join_table(&self) -> &Arc<JoinTable> {
        &self.join
    }

    pub fn path(&self) -> &str {
        self.join.path()
    }

    /// The destination table.
    pub fn table(&self) -> &Table {
        self.join.dest_table()
    }
}

impl fmt::Display for JoinedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.join, f)
    }
}

impl Column {
    /// Inner join to `dest`, keyed by this foreign column's target.
    pub fn join(&self, dest: &Table) -> OrmResult<JoinedTable> {
        Join::new(self, dest).resolve()
    }

    pub fn left_join(&self, dest: &Table) -> OrmResult<JoinedTable> {
        Join::new(self, dest).join_type(JoinType::Left).resolve()
    }

    pub fn right_join(&self, dest: &Table) -> OrmResult<JoinedTable> {
        Join::new(self, dest).join_type(JoinType::Right).resolve()
    }

    pub fn full_join(&self, dest: &Table) -> OrmResult<JoinedTable> {
        Join::new(self, dest).join_type(JoinType::Full).resolve()
    }

    pub fn associative_join(&self, dest: &Table) -> OrmResult<JoinedTable> {
        Join::new(self, dest).associative().resolve()
    }

    /// Inner join to `dest` on an explicit remote column.
    pub fn join_on(&self, dest: &Table, dest_column: &Column) -> OrmResult<JoinedTable> {
        Join::new(self, dest).on(dest_column).resolve()
    }

    /// Start a [`Join`] builder from this column.
    pub fn join_with(&self, dest: &Table) -> Join {
        Join::new(self, dest)
    }
}

/// Model name of a joined column: the local key without its `id` suffix in
/// lowerCamelCase, followed by the remote name in UpperCamelCase.
///
/// `user_id` + `name` => `userName`; `userCompanyId` + `name` => `userCompanyName`.
pub(crate) fn derive_joined_name(local: &Column, remote: &Column) -> String {
    let base = local.model_name();
    let stem = ["_id", "Id", "ID"]
        .iter()
        .find_map(|suffix| {
            base.strip_suffix(*suffix)
                .filter(|stem| !stem.is_empty())
        })
        .unwrap_or(base.as_str());
    format!(
        "{}{}",
        stem.to_lower_camel_case(),
        remote.model_name().to_upper_camel_case()
    )
}
