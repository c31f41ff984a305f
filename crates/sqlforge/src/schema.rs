//! Registry of the tables and actions that make up one schema.
//!
//! Tables and actions are registered under a unique name and kept in
//! registration order. [`Schema::validate`] is the one-time pass that checks
//! every action before it is handed to a statement generator.

use crate::action::Action;
use crate::config::ValidationConfig;
use crate::error::{OrmError, OrmResult};
use crate::table::Table;
use std::collections::HashMap;

/// Named entries kept in insertion order.
#[derive(Debug, Clone)]
struct Registry<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    fn insert(&mut self, what: &str, name: &str, value: T) -> OrmResult<()> {
        if name.is_empty() {
            return Err(OrmError::schema(format!("{what} name cannot be empty")));
        }
        if self.index.contains_key(name) {
            return Err(OrmError::schema(format!(
                "{what} '{name}' is already registered"
            )));
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), value));
        Ok(())
    }

    fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Tables and actions of one schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Registry<Table>,
    actions: Registry<Action>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under its own name.
    pub fn add_table(&mut self, table: &Table) -> OrmResult<()> {
        self.add_table_as(table.name(), table)
    }

    /// Register a table under `name`.
    pub fn add_table_as(&mut self, name: &str, table: &Table) -> OrmResult<()> {
        self.tables.insert("table", name, table.clone())
    }

    /// Register an action under `name`.
    pub fn add_action(&mut self, name: &str, action: impl Into<Action>) -> OrmResult<()> {
        self.actions.insert("action", name, action.into())
    }

    /// Builder-style [`add_table`](Self::add_table).
    pub fn with_table(mut self, table: &Table) -> OrmResult<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    /// Builder-style [`add_action`](Self::add_action).
    pub fn with_action(mut self, name: &str, action: impl Into<Action>) -> OrmResult<Self> {
        self.add_action(name, action)?;
        Ok(self)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Registered tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter()
    }

    /// Registered actions in registration order.
    pub fn actions(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.entries.len() + self.actions.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every action against the default rules.
    pub fn validate(&self) -> OrmResult<()> {
        self.validate_with(&ValidationConfig::default())
    }

    /// Validate every action, stopping at the first failure.
    pub fn validate_with(&self, cfg: &ValidationConfig) -> OrmResult<()> {
        for (name, action) in self.actions() {
            tracing::debug!(
                action = name,
                kind = action.kind(),
                table = action.table().name(),
                "validating action"
            );
            action
                .validate_with(cfg)
                .map_err(|e| e.context(format!("action '{name}'")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{delete, select, update};
    use crate::column::{pk, varchar};
    use crate::sql;
    use crate::sql::param;
    use crate::table::table;

    fn user() -> Table {
        table("User")
            .column("id", pk())
            .column("name", varchar(50))
            .build()
            .unwrap()
    }

    #[test]
    fn registration_keeps_order_and_rejects_duplicates() {
        let user = user();
        let mut schema = Schema::new();
        schema.add_table(&user).unwrap();
        schema.add_table_as("people", &user).unwrap();

        let err = schema.add_table(&user).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("table 'user' is already registered"));

        schema.add_action("wipe", delete(&user).unsafe_mode()).unwrap();
        schema.add_action("all", select(&user).unordered()).unwrap();
        assert!(schema.add_action("all", delete(&user)).unwrap_err().is_schema());
        assert!(schema.add_action("", delete(&user)).is_err());

        let names: Vec<&str> = schema.tables().map(|(n, _)| n).collect();
        assert_eq!(names, ["user", "people"]);
        let names: Vec<&str> = schema.actions().map(|(n, _)| n).collect();
        assert_eq!(names, ["wipe", "all"]);
        assert_eq!(schema.action("wipe").unwrap().kind(), "delete");
        assert!(schema.table("people").unwrap().ptr_eq(&user));
        assert_eq!(schema.len(), 4);
    }

    #[test]
    fn validation_names_the_failing_action() {
        let user = user();
        let id = user.col("id").unwrap();
        let name = user.col("name").unwrap();

        let schema = Schema::new()
            .with_table(&user)
            .unwrap()
            .with_action(
                "rename",
                update(&user)
                    .set_param(&name)
                    .filter(sql!("{} = {}", &id, param(&id))),
            )
            .unwrap();
        schema.validate().unwrap();

        let schema = schema
            .with_action("rename_all", update(&user).set_param(&name))
            .unwrap();
        let err = schema.validate().unwrap_err();
        assert!(err.is_validation());
        let msg = err.to_string();
        assert!(msg.contains("UPDATE without WHERE"));
        assert!(msg.contains("update on Table(user)"));
        assert!(msg.ends_with("action 'rename_all'"));

        schema
            .validate_with(&ValidationConfig::new().allow_missing_where())
            .unwrap();
    }
}
