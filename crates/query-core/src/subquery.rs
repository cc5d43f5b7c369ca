// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Subquery annotations: `select:<expr>,from:<entity or table>`.

use crate::{
    error::{QueryError, QueryResult},
    naming::NamingConfig
};

/// A parsed subquery annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubquerySpec {
    /// Projected expression, e.g. `avg(score)`.
    pub select: String,
    /// Entity type name or literal table name.
    pub from:   String
}

impl SubquerySpec {
    /// Parse `select:<expr>,from:<name>`.
    ///
    /// The expression may itself contain commas; the last `,from:` ends it.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSubquery`] when either part is missing
    /// or empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_core::SubquerySpec;
    ///
    /// let spec = SubquerySpec::parse("select:coalesce(score, 0),from:UserEntity").unwrap();
    /// assert_eq!(spec.select, "coalesce(score, 0)");
    /// assert_eq!(spec.from, "UserEntity");
    /// ```
    pub fn parse(raw: &str) -> QueryResult<Self> {
        let invalid = || QueryError::InvalidSubquery(raw.to_owned());
        let body = raw.trim().strip_prefix("select:").ok_or_else(invalid)?;
        let (select, from) = body.rsplit_once(",from:").ok_or_else(invalid)?;
        let (select, from) = (select.trim(), from.trim());
        if select.is_empty() || from.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            select: select.to_owned(),
            from:   from.to_owned()
        })
    }

    /// Table queried by the subquery.
    ///
    /// A PascalCase `from` is an entity type name and goes through
    /// [`NamingConfig::entity_table`]; anything else is used as written.
    pub fn table(&self, naming: &NamingConfig) -> String {
        if self.from.starts_with(|c: char| c.is_ascii_uppercase()) {
            naming.entity_table(&self.from)
        } else {
            self.from.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parts() {
        let spec = SubquerySpec::parse("select:max(score),from:t_user").unwrap();
        assert_eq!(spec.select, "max(score)");
        assert_eq!(spec.from, "t_user");
    }

    #[test]
    fn resolves_entity_tables() {
        let naming = NamingConfig::default();
        let entity = SubquerySpec::parse("select:id,from:UserEntity").unwrap();
        assert_eq!(entity.table(&naming), "t_user");
        let literal = SubquerySpec::parse("select:id,from:users").unwrap();
        assert_eq!(literal.table(&naming), "users");
    }

    #[test]
    fn rejects_malformed() {
        for raw in ["from:t_user", "select:id", "select:,from:t", "select:id,from: "] {
            assert_eq!(
                SubquerySpec::parse(raw),
                Err(QueryError::InvalidSubquery(raw.into())),
                "{raw}"
            );
        }
    }
}
