use crate::column::Column;
use crate::error::{OrmError, OrmResult};
use crate::types::{ColumnType, DataType, Literal};
use std::fmt;

/// Where a parameter takes its type from.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSource {
    Column(Column),
    Type(ColumnType),
    /// Bare type descriptor with an optional default value.
    Raw {
        column_type: ColumnType,
        default: Option<Literal>,
    },
}

impl TypeSource {
    pub fn column_type(&self) -> ColumnType {
        match self {
            TypeSource::Column(c) => c.column_type(),
            TypeSource::Type(t) | TypeSource::Raw { column_type: t, .. } => t.clone(),
        }
    }
}

impl From<Column> for TypeSource {
    fn from(c: Column) -> Self {
        TypeSource::Column(c)
    }
}

impl From<&Column> for TypeSource {
    fn from(c: &Column) -> Self {
        TypeSource::Column(c.clone())
    }
}

impl From<ColumnType> for TypeSource {
    fn from(t: ColumnType) -> Self {
        TypeSource::Type(t)
    }
}

impl From<DataType> for TypeSource {
    fn from(t: DataType) -> Self {
        TypeSource::Type(t.into())
    }
}

/// A named, typed placeholder for a value supplied at execution time.
#[derive(Debug, Clone)]
pub struct SqlVariable {
    source: TypeSource,
    name: Option<String>,
    array: bool,
    nullable: Option<bool>,
}

impl SqlVariable {
    /// Create a parameter. Only column-typed parameters may omit the name;
    /// they default to the column's model name.
    pub fn new(source: impl Into<TypeSource>, name: Option<String>) -> OrmResult<Self> {
        let source = source.into();
        match (&source, name.as_deref()) {
            (_, Some("")) => {
                return Err(OrmError::expression("parameter name cannot be empty"));
            }
            (TypeSource::Column(_), _) | (_, Some(_)) => {}
            (other, None) => {
                return Err(OrmError::expression(format!(
                    "parameter of type {} requires an explicit name",
                    other.column_type()
                )));
            }
        }
        Ok(Self {
            source,
            name,
            array: false,
            nullable: None,
        })
    }

    /// Accept a list of values instead of a single one.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Override the nullability inherited from the type source.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Effective name.
    pub fn name(&self) -> String {
        match (&self.name, &self.source) {
            (Some(name), _) => name.clone(),
            (None, TypeSource::Column(c)) => c.model_name(),
            (None, _) => String::new(),
        }
    }

    pub fn source(&self) -> &TypeSource {
        &self.source
    }

    pub fn column(&self) -> Option<&Column> {
        match &self.source {
            TypeSource::Column(c) => Some(c),
            _ => None,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        let mut t = self.source.column_type();
        if let Some(nullable) = self.nullable {
            t.nullable = nullable;
        }
        t
    }

    pub fn is_array(&self) -> bool {
        self.array
    }

    pub fn is_nullable(&self) -> bool {
        self.column_type().nullable
    }

    /// Default value of a raw-typed parameter.
    pub fn default_value(&self) -> Option<&Literal> {
        match &self.source {
            TypeSource::Raw { default, .. } => default.as_ref(),
            _ => None,
        }
    }
}

impl PartialEq for SqlVariable {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.array == other.array && self.name() == other.name()
    }
}

impl fmt::Display for SqlVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.array { "[]" } else { "" };
        write!(f, "SQLVariable({}, {}{suffix})", self.name(), self.column_type())
    }
}

/// Parameter typed and named after `column`.
pub fn param(column: &Column) -> SqlVariable {
    SqlVariable {
        source: TypeSource::Column(column.clone()),
        name: None,
        array: false,
        nullable: None,
    }
}

/// Parameter with an explicit name.
pub fn param_named(source: impl Into<TypeSource>, name: impl Into<String>) -> OrmResult<SqlVariable> {
    SqlVariable::new(source, Some(name.into()))
}

/// Parameter of a bare type.
pub fn input(column_type: impl Into<ColumnType>, name: impl Into<String>) -> OrmResult<SqlVariable> {
    SqlVariable::new(TypeSource::Type(column_type.into()), Some(name.into()))
}

/// Parameter of a bare type with a default value.
pub fn input_with_default(
    column_type: impl Into<ColumnType>,
    default: impl Into<Literal>,
    name: impl Into<String>,
) -> OrmResult<SqlVariable> {
    SqlVariable::new(
        TypeSource::Raw {
            column_type: column_type.into(),
            default: Some(default.into()),
        },
        Some(name.into()),
    )
}
