// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Naming conventions shared by the predicate and entity compilers.
//!
//! [`NamingConfig`] turns field names into column names, domain names into
//! table names, and pairs of domains into many-to-many bridge tables.
//! Explicit overrides take precedence over every format.
//!
//! # Defaults
//!
//! | Setting | Default | Example |
//! |---------|---------|---------|
//! | `table_format` | `t_{}` | `user` → `t_user` |
//! | `join_table_format` | `a_{}_and_{}` | `user`, `role` → `a_user_and_role` |
//! | `join_id_format` | `{}_id` | `role` → `role_id` |
//! | `entity_suffix` | `Entity` | `UserEntity` → `user` |
//! | `column_case` | snake | `createTime` → `create_time` |

use std::collections::HashMap;

use convert_case::{Case, Casing};

/// Case applied when deriving column names from field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnCase {
    /// `snake_case` columns.
    #[default]
    Snake,

    /// `camelCase` columns.
    Camel,

    /// Field names are used verbatim.
    Preserve
}

impl ColumnCase {
    /// Convert a name into this case.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Snake => name.to_case(Case::Snake),
            Self::Camel => name.to_case(Case::Camel),
            Self::Preserve => name.to_owned()
        }
    }
}

/// Table and column naming configuration.
///
/// # Example
///
/// ```rust
/// use query_core::NamingConfig;
///
/// let naming = NamingConfig::default()
///     .with_join_table("user", "role", "user_roles")
///     .with_entity_table("perm", "t_permission");
///
/// assert_eq!(naming.join_table("role", "user"), "user_roles");
/// assert_eq!(naming.domain_table("perm"), "t_permission");
/// assert_eq!(naming.domain_table("menu"), "t_menu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NamingConfig {
    /// Format for domain tables; `{}` is replaced by the domain name.
    pub table_format:      String,

    /// Format for bridge tables; the two `{}` take the left and right domain.
    pub join_table_format: String,

    /// Format for bridge-table join columns; `{}` takes the domain name.
    pub join_id_format:    String,

    /// Suffix stripped from entity type names before formatting.
    pub entity_suffix:     String,

    /// Case of derived column names.
    pub column_case:       ColumnCase,

    /// Explicit bridge tables keyed by `"left,right"`.
    pub join_tables:       HashMap<String, String>,

    /// Explicit tables for domain or virtual entity names.
    pub entity_tables:     HashMap<String, String>
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            table_format:      "t_{}".to_owned(),
            join_table_format: "a_{}_and_{}".to_owned(),
            join_id_format:    "{}_id".to_owned(),
            entity_suffix:     "Entity".to_owned(),
            column_case:       ColumnCase::Snake,
            join_tables:       HashMap::new(),
            entity_tables:     HashMap::new()
        }
    }
}

impl NamingConfig {
    /// Set the domain table format.
    #[must_use]
    pub fn with_table_format(mut self, format: impl Into<String>) -> Self {
        self.table_format = format.into();
        self
    }

    /// Set the bridge table format.
    #[must_use]
    pub fn with_join_table_format(mut self, format: impl Into<String>) -> Self {
        self.join_table_format = format.into();
        self
    }

    /// Set the bridge join column format.
    #[must_use]
    pub fn with_join_id_format(mut self, format: impl Into<String>) -> Self {
        self.join_id_format = format.into();
        self
    }

    /// Set the column case.
    #[must_use]
    pub fn with_column_case(mut self, case: ColumnCase) -> Self {
        self.column_case = case;
        self
    }

    /// Register an explicit bridge table for two domains.
    ///
    /// The mapping applies in both path directions.
    #[must_use]
    pub fn with_join_table(
        mut self,
        left: &str,
        right: &str,
        table: impl Into<String>
    ) -> Self {
        self.join_tables
            .insert(format!("{},{}", left, right), table.into());
        self
    }

    /// Register an explicit table for a domain or virtual entity name.
    #[must_use]
    pub fn with_entity_table(mut self, domain: &str, table: impl Into<String>) -> Self {
        self.entity_tables.insert(domain.to_owned(), table.into());
        self
    }

    /// Column name for a field name.
    pub fn column(&self, field: &str) -> String {
        self.column_case.apply(field)
    }

    /// Table name for a path domain such as `user` or `role`.
    pub fn domain_table(&self, domain: &str) -> String {
        if let Some(table) = self.entity_tables.get(domain) {
            return table.clone();
        }
        fill(&self.table_format, &[domain])
    }

    /// Table name for an entity type name such as `UserEntity`.
    ///
    /// The configured suffix is stripped and the remainder converted with
    /// the column case before the table format is applied.
    pub fn entity_table(&self, type_name: &str) -> String {
        if let Some(table) = self.entity_tables.get(type_name) {
            return table.clone();
        }
        let domain = self.domain_of(type_name);
        self.domain_table(&domain)
    }

    /// Domain name for an entity type name: `UserRoleEntity` → `user_role`.
    pub fn domain_of(&self, type_name: &str) -> String {
        let stripped = type_name
            .strip_suffix(self.entity_suffix.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(type_name);
        self.column(stripped)
    }

    /// Bridge table joining two domains.
    pub fn join_table(&self, left: &str, right: &str) -> String {
        self.join_tables
            .get(&format!("{},{}", left, right))
            .or_else(|| self.join_tables.get(&format!("{},{}", right, left)))
            .cloned()
            .unwrap_or_else(|| fill(&self.join_table_format, &[left, right]))
    }

    /// Bridge table column referencing a domain.
    pub fn join_id(&self, domain: &str) -> String {
        fill(&self.join_id_format, &[domain])
    }
}

/// Replace successive `{}` markers with the given parts.
fn fill(format: &str, parts: &[&str]) -> String {
    let mut out = format.to_owned();
    for part in parts {
        out = out.replacen("{}", part, 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let naming = NamingConfig::default();
        assert_eq!(naming.domain_table("user"), "t_user");
        assert_eq!(naming.join_table("user", "role"), "a_user_and_role");
        assert_eq!(naming.join_id("role"), "role_id");
        assert_eq!(naming.column("createTime"), "create_time");
        assert_eq!(naming.column("user_name"), "user_name");
    }

    #[test]
    fn entity_type_names() {
        let naming = NamingConfig::default();
        assert_eq!(naming.entity_table("UserEntity"), "t_user");
        assert_eq!(naming.entity_table("UserRole"), "t_user_role");
        assert_eq!(naming.domain_of("Entity"), "entity");
    }

    #[test]
    fn join_override_is_symmetric() {
        let naming = NamingConfig::default().with_join_table("user", "role", "j_ur");
        assert_eq!(naming.join_table("user", "role"), "j_ur");
        assert_eq!(naming.join_table("role", "user"), "j_ur");
        assert_eq!(naming.join_table("role", "perm"), "a_role_and_perm");
    }

    #[test]
    fn entity_override_wins() {
        let naming = NamingConfig::default()
            .with_entity_table("perm", "permission")
            .with_entity_table("MenuView", "v_menu");
        assert_eq!(naming.domain_table("perm"), "permission");
        assert_eq!(naming.entity_table("MenuView"), "v_menu");
    }

    #[test]
    fn custom_formats() {
        let naming = NamingConfig::default()
            .with_table_format("{}")
            .with_join_table_format("{}_{}")
            .with_join_id_format("{}Id")
            .with_column_case(ColumnCase::Camel);
        assert_eq!(naming.domain_table("user"), "user");
        assert_eq!(naming.join_table("user", "role"), "user_role");
        assert_eq!(naming.join_id("role"), "roleId");
        assert_eq!(naming.column("create_time"), "createTime");
    }

    #[test]
    fn preserve_case() {
        let naming = NamingConfig::default().with_column_case(ColumnCase::Preserve);
        assert_eq!(naming.column("UserName"), "UserName");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial() {
        let naming: NamingConfig =
            serde_json::from_str(r#"{"table_format":"{}s","column_case":"camel"}"#).unwrap();
        assert_eq!(naming.domain_table("user"), "users");
        assert_eq!(naming.column_case, ColumnCase::Camel);
        assert_eq!(naming.join_id("user"), "user_id");
    }
}
