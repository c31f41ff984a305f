//! SQL expression trees.
//!
//! An [`Sql`] value is an immutable, flat list of [`SqlElement`]s: raw text,
//! column references, parameters, function calls, selected columns and
//! embedded actions. Expressions are composed with the [`sql!`](crate::sql!)
//! template macro; embedding one expression in another splices its elements,
//! so the result never nests.
//!
//! # Example
//!
//! ```ignore
//! use sqlforge::sql;
//! use sqlforge::sql::param;
//!
//! let id = user.col("id")?;
//! let name = user.col("name")?;
//! let cond = sql!("{} = 1 OR {} = {}", &id, &name, param(&name));
//!
//! assert!(cond.has_columns());
//! assert_eq!(cond.to_string(), "user.id = 1 OR user.name = :name");
//! ```

mod builder;
pub mod call;
mod element;
mod selected;
mod variable;


pub use builder::{Sql, SqlBuilder, convert_to_sql, placeholder_count};
pub use call::SqlCall;
pub use element::{SqlArg, SqlElement};
pub use selected::{SelectedColumn, select_as};
pub use variable::{SqlVariable, TypeSource, input, input_with_default, param, param_named};
