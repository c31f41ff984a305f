//! # sqlforge
//!
//! Typed SQL expression trees for schema-aware statement generation.
//!
//! ## Features
//!
//! - **Typed columns**: every column carries a [`ColumnType`] and a set of
//!   constraints, and is frozen once it belongs to a table
//! - **Foreign and joined columns**: foreign keys mirror the referenced
//!   column, joined columns remember the join path they were reached through
//! - **Deterministic join paths**: structurally identical joins compare equal
//! - **Flattened SQL fragments**: [`Sql`] values are immutable, canonical and
//!   cheap to clone
//! - **Action validation**: SELECT/INSERT/UPDATE/DELETE descriptors are
//!   checked once, before any statement is generated
//!
//! ## Example
//!
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let user = table("User")
//!     .column("id", pk())
//!     .column("name", varchar(100))
//!     .build()?;
//!
//! let post = table("Post")
//!     .column("id", pk())
//!     .column("user_id", user.col("id")?)
//!     .column("title", varchar(200))
//!     .build()?;
//!
//! let author = post.col("user_id")?.join(&user)?;
//! let author_name = author.col("name")?;
//! assert_eq!(author_name.model_name(), "userName");
//!
//! let by_title = select(&post)
//!     .column(&author_name)
//!     .filter(sql!("{} = {}", &post.col("title")?, param(&post.col("title")?)))
//!     .order_by(sql!("{} DESC", &post.col("id")?));
//! by_title.validate()?;
//! ```

pub mod action;
pub mod column;
pub mod config;
pub mod error;
pub mod ident;
pub mod join;
pub mod prelude;
pub mod schema;
pub mod sql;
pub mod table;
pub mod types;

pub use action::{
    Action, DeleteAction, InsertAction, SelectAction, UpdateAction, delete, insert, select, update,
};
pub use column::{Column, ColumnOwner, DefaultValue};
pub use config::ValidationConfig;
pub use error::{OrmError, OrmResult, OrmResultExt};
pub use join::{Join, JoinTable, JoinType, JoinedTable};
pub use schema::Schema;
pub use sql::{
    SelectedColumn, Sql, SqlArg, SqlBuilder, SqlCall, SqlElement, SqlVariable, TypeSource, input,
    param,
};
pub use table::{Table, TableBuilder, TableField, TableInfo, table};
pub use types::{ColumnType, DataType, Literal};
