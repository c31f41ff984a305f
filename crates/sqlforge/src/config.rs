//! Validation settings for the action layer.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rules applied by [`Action::validate_with`](crate::action::Action::validate_with).
///
/// Can be loaded from TOML:
///
/// ```toml
/// require_where = true
/// require_order_by = false
/// max_join_depth = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// UPDATE/DELETE must have a WHERE clause unless in unsafe mode.
    pub require_where: bool,
    /// Multi-row SELECTs must have an ORDER BY unless marked unordered.
    pub require_order_by: bool,
    /// Maximum number of nested joins a single column may traverse.
    pub max_join_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_where: true,
            require_order_by: true,
            max_join_depth: 8,
        }
    }
}

impl ValidationConfig {
    /// Create a new configuration with defaults (all checks on, join depth 8).
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow UPDATE/DELETE without WHERE.
    pub fn allow_missing_where(mut self) -> Self {
        self.require_where = false;
        self
    }

    /// Allow multi-row SELECT without ORDER BY.
    pub fn allow_unordered(mut self) -> Self {
        self.require_order_by = false;
        self
    }

    /// Set the maximum join depth.
    pub fn with_max_join_depth(mut self, depth: usize) -> Self {
        self.max_join_depth = depth;
        self
    }

    /// Parse from TOML; missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let cfg: Self = toml::from_str(raw)?;
        if cfg.max_join_depth == 0 {
            return Err(OrmError::Config("max_join_depth must be at least 1".to_string()));
        }
        Ok(cfg)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| e.context(format!("config file {}", path.display())))
    }
}
