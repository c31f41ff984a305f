use super::element::{SqlArg, SqlElement};
use super::SqlVariable;
use crate::column::Column;
use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::sync::Arc;

struct SqlInner {
    elements: Vec<SqlElement>,
    has_columns: bool,
    has_calls: bool,
}

/// An immutable, flattened SQL expression.
///
/// Cloning is cheap and shares the element list. Two expressions are equal if
/// their element sequences are equal; adjacent raw text is always merged, so
/// equal text with equal parameters compares equal regardless of how it was
/// split up in the templates.
#[derive(Clone)]
pub struct Sql {
    inner: Arc<SqlInner>,
}

impl Sql {
    /// The empty expression.
    pub fn empty() -> Self {
        SqlBuilder::new().build()
    }

    /// Raw SQL text.
    pub fn raw(text: &str) -> Self {
        let mut b = SqlBuilder::new();
        b.push(text);
        b.build()
    }

    /// Build from literal segments interleaved with arguments.
    ///
    /// `literals` must have exactly one more entry than `args`:
    /// `literals[0] args[0] literals[1] ... args[n-1] literals[n]`.
    pub fn from_template(literals: &[&str], args: Vec<SqlArg>) -> OrmResult<Self> {
        if literals.len() != args.len() + 1 {
            return Err(OrmError::expression(format!(
                "template has {} literal segments but {} arguments, expected {}",
                literals.len(),
                args.len(),
                args.len() + 1
            )));
        }
        let mut b = SqlBuilder::new();
        let mut args = args.into_iter();
        for (idx, literal) in literals.iter().enumerate() {
            if idx > 0 {
                if let Some(arg) = args.next() {
                    b.push_arg(arg);
                }
            }
            b.push(literal);
        }
        Ok(b.build())
    }

    /// Build from a template with `{}` placeholders.
    pub fn format(template: &str, args: Vec<SqlArg>) -> OrmResult<Self> {
        let literals: Vec<&str> = template.split("{}").collect();
        Self::from_template(&literals, args).map_err(|e| e.context(format!("in template {template:?}")))
    }

    /// Placeholder/argument counts are checked by the `sql!` macro at compile
    /// time; surplus arguments are appended.
    #[doc(hidden)]
    pub fn interpolate(template: &str, args: Vec<SqlArg>) -> Self {
        let mut b = SqlBuilder::new();
        let mut args = args.into_iter();
        for (idx, literal) in template.split("{}").enumerate() {
            if idx > 0 {
                if let Some(arg) = args.next() {
                    b.push_arg(arg);
                }
            }
            b.push(literal);
        }
        for arg in args {
            b.push_arg(arg);
        }
        b.build()
    }

    /// Concatenate expressions.
    pub fn concat(parts: impl IntoIterator<Item = Sql>) -> Self {
        let mut b = SqlBuilder::new();
        for part in parts {
            b.push_sql(&part);
        }
        b.build()
    }

    /// Concatenate expressions with `separator` between them.
    pub fn join(parts: impl IntoIterator<Item = Sql>, separator: &str) -> Self {
        let mut b = SqlBuilder::new();
        for (idx, part) in parts.into_iter().enumerate() {
            if idx > 0 {
                b.push(separator);
            }
            b.push_sql(&part);
        }
        b.build()
    }

    pub fn elements(&self) -> &[SqlElement] {
        &self.inner.elements
    }

    pub fn is_empty(&self) -> bool {
        self.inner.elements.is_empty()
    }

    /// Whether any column or parameter occurs, including inside call arguments.
    pub fn has_columns(&self) -> bool {
        self.inner.has_columns
    }

    /// Whether any function call occurs.
    pub fn has_calls(&self) -> bool {
        self.inner.has_calls
    }

    /// Every column reference, depth-first through call arguments and
    /// selected columns.
    pub fn columns(&self) -> Vec<Column> {
        let mut out = Vec::new();
        self.visit(&mut |e| {
            if let SqlElement::Column(c) = e {
                out.push(c.clone());
            }
        });
        out
    }

    /// Distinct parameters in order of first occurrence.
    pub fn inputs(&self) -> Vec<SqlVariable> {
        let mut out: Vec<SqlVariable> = Vec::new();
        self.visit(&mut |e| {
            if let SqlElement::Input(v) = e {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
        });
        out
    }

    /// The first column reference, if any.
    pub fn find_first_column(&self) -> Option<Column> {
        let mut found = None;
        self.visit(&mut |e| {
            if found.is_some() {
                return;
            }
            if let SqlElement::Column(c) = e {
                found = Some(c.clone());
            }
        });
        found
    }

    /// Like [`Sql::find_first_column`], but a missing column is an error.
    pub fn find_column(&self) -> OrmResult<Column> {
        self.find_first_column()
            .ok_or_else(|| OrmError::expression(format!("no column found in {self}")))
    }

    pub(crate) fn visit(&self, f: &mut dyn FnMut(&SqlElement)) {
        for element in self.elements() {
            f(element);
            match element {
                SqlElement::Call(call) => {
                    for arg in call.args() {
                        arg.visit(f);
                    }
                }
                SqlElement::Selected(selected) => selected.sql().visit(f),
                _ => {}
            }
        }
    }

    pub fn ptr_eq(&self, other: &Sql) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Sql {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Sql {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.elements == other.inner.elements
    }
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.elements() {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SQL(")?;
        for (idx, element) in self.elements().iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element:?}")?;
        }
        f.write_str(")")
    }
}

/// Incremental builder behind every [`Sql`] constructor.
#[derive(Default)]
pub struct SqlBuilder {
    elements: Vec<SqlElement>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw SQL text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.elements.last_mut() {
            Some(SqlElement::Raw(last)) => last.push_str(sql),
            _ => self.elements.push(SqlElement::Raw(sql.to_string())),
        }
        self
    }

    /// Append an argument, splicing nested expressions.
    pub fn push_arg(&mut self, arg: impl Into<SqlArg>) -> &mut Self {
        match arg.into() {
            SqlArg::Raw(s) => self.push(&s),
            SqlArg::Sql(sql) => self.push_sql(&sql),
            SqlArg::Column(c) => self.push_element(SqlElement::Column(c)),
            SqlArg::Input(v) => self.push_element(SqlElement::Input(v)),
            SqlArg::Call(call) => self.push_element(SqlElement::Call(call)),
            SqlArg::Selected(s) => self.push_element(SqlElement::Selected(s)),
            SqlArg::Action(a) => self.push_element(SqlElement::Action(a)),
        }
    }

    /// Splice in all elements of an already built expression.
    pub fn push_sql(&mut self, sql: &Sql) -> &mut Self {
        for element in sql.elements() {
            self.push_element(element.clone());
        }
        self
    }

    fn push_element(&mut self, element: SqlElement) -> &mut Self {
        match element {
            SqlElement::Raw(s) => self.push(&s),
            other => {
                self.elements.push(other);
                self
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn build(self) -> Sql {
        let has_columns = self.elements.iter().any(SqlElement::has_columns);
        let has_calls = self.elements.iter().any(SqlElement::has_calls);
        Sql {
            inner: Arc::new(SqlInner {
                elements: self.elements,
                has_columns,
                has_calls,
            }),
        }
    }
}

/// Return `value` unchanged if it already is an expression, otherwise wrap it.
pub fn convert_to_sql(value: impl Into<SqlArg>) -> Sql {
    match value.into() {
        SqlArg::Sql(sql) => sql,
        other => {
            let mut b = SqlBuilder::new();
            b.push_arg(other);
            b.build()
        }
    }
}

/// Number of `{}` placeholders in a template.
#[doc(hidden)]
pub const fn placeholder_count(template: &str) -> usize {
    let bytes = template.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'}' {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

/// Build an [`Sql`] expression from a template with `{}` placeholders.
///
/// Each argument is converted through [`SqlArg`]: strings are raw text,
/// columns, parameters, calls, selected columns and actions become elements,
/// and nested [`Sql`] values are spliced in. A placeholder/argument count
/// mismatch does not compile.
///
/// ```ignore
/// let cond = sql!("{} = 1 OR {} = {}", &user_id, &user_name, param(&user_name));
/// ```
#[macro_export]
macro_rules! sql {
    ($template:literal $(, $arg:expr)* $(,)?) => {{
        const _: () = ::core::assert!(
            $crate::sql::placeholder_count($template)
                == <[&str]>::len(&[$(::core::stringify!($arg)),*]),
            "sql!: placeholder count does not match argument count"
        );
        $crate::sql::Sql::interpolate(
            $template,
            ::std::vec![$($crate::sql::SqlArg::from($arg)),*],
        )
    }};
}
