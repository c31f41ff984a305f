//! Error types for sqlforge

use thiserror::Error;

/// Result type alias for sqlforge operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for schema declaration, join resolution and expression building.
///
/// All of these are authoring errors: they are raised while tables, joins and
/// expressions are declared (or while actions are validated), never while a
/// query runs.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A mutator was called on a column that is already bound into a table.
    #[error("Frozen column: {0}")]
    Frozen(String),

    /// Invalid table or column declaration.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Join path could not be resolved.
    #[error("Join error: {0}")]
    Join(String),

    /// Invalid SQL expression input.
    #[error("Expression error: {0}")]
    Expression(String),

    /// Action validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),

    /// An inner error with a context suffix appended on the way up.
    #[error("{source}, {context}")]
    Context {
        context: String,
        source: Box<OrmError>,
    },
}

impl OrmError {
    /// Create a frozen-column error
    pub fn frozen(message: impl Into<String>) -> Self {
        Self::Frozen(message.into())
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a join error
    pub fn join(message: impl Into<String>) -> Self {
        Self::Join(message.into())
    }

    /// Create an expression error
    pub fn expression(message: impl Into<String>) -> Self {
        Self::Expression(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap this error with a context suffix, e.g. `"table 'post'"`.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping all context layers.
    pub fn root(&self) -> &OrmError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is a frozen-column error
    pub fn is_frozen(&self) -> bool {
        matches!(self.root(), Self::Frozen(_))
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self.root(), Self::Schema(_))
    }

    /// Check if this is a join error
    pub fn is_join(&self) -> bool {
        matches!(self.root(), Self::Join(_))
    }

    /// Check if this is an expression error
    pub fn is_expression(&self) -> bool {
        matches!(self.root(), Self::Expression(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Context helpers for [`OrmResult`].
pub trait OrmResultExt<T> {
    /// Append a context suffix to the error, if any.
    fn context(self, context: impl Into<String>) -> OrmResult<T>;

    /// Append a lazily built context suffix to the error, if any.
    fn with_context<C: Into<String>>(self, f: impl FnOnce() -> C) -> OrmResult<T>;
}

impl<T> OrmResultExt<T> for OrmResult<T> {
    fn context(self, context: impl Into<String>) -> OrmResult<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<C: Into<String>>(self, f: impl FnOnce() -> C) -> OrmResult<T> {
        self.map_err(|e| e.context(f()))
    }
}
