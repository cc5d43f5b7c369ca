// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity path resolution.
//!
//! A path such as `user,role,perm` names a chain of entities starting at the
//! queried one. It compiles into a nested `IN` subquery selecting the root
//! entities reachable through the chain.
//!
//! # Grammar
//!
//! ```text
//! path  = token ("," token)+
//! token = entity                 many-to-many with the next entity
//!       | entity "->" fk_field   fk on this entity points at the next one
//!       | fk_field "<-" entity   fk on the next entity points at this one
//! ```
//!
//! Many-to-many hops use a bridge table (`a_user_and_role` by default) with
//! one join column per side (`user_id`, `role_id`). Each hop is one
//! [`Relation`] rendered as `SELECT <local> FROM <table> WHERE <foreign> IN
//! (...)`.
//!
//! # Example
//!
//! ```rust
//! use query_core::{EntityPath, NamingConfig, SqlAndArgs, Value};
//!
//! let naming = NamingConfig::default();
//! let path = EntityPath::parse("user,role", &naming).unwrap();
//! let filter = SqlAndArgs::new("name = ?", vec![Value::from("admin")]);
//!
//! let sql = path.compile(&[(1, filter)]);
//! assert_eq!(
//!     sql.sql,
//!     "id IN (SELECT user_id FROM a_user_and_role WHERE role_id IN \
//!      (SELECT id FROM t_role WHERE name = ?))"
//! );
//! ```

use std::fmt;

use crate::{
    error::{QueryError, QueryResult},
    naming::NamingConfig,
    schema::QueryFields,
    sql::{SqlAndArgs, SqlBuilder}
};

/// Identity column of every entity table.
pub const IDENTITY_COLUMN: &str = "id";

/// How two neighbouring entities are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Through a bridge table.
    ManyToMany,
    /// The left entity holds a foreign key to the right one.
    ForeignKeyLeft,
    /// The right entity holds a foreign key to the left one.
    ForeignKeyRight
}

/// One hop of an entity path.
///
/// Maps a set of right-entity ids to a set of left-entity ids:
/// `SELECT <local_key> FROM <join_table> WHERE <foreign_key> IN (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Connection kind.
    pub kind:        RelationKind,
    /// Column projected as the left entity's id.
    pub local_key:   String,
    /// Column matched against the right entity's ids.
    pub foreign_key: String,
    /// Table holding both columns.
    pub join_table:  String
}

/// A parsed, naming-resolved entity path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPath {
    /// The path as written.
    pub raw:       String,
    /// Entity domain names, root first.
    pub steps:     Vec<String>,
    /// Table of each step.
    pub tables:    Vec<String>,
    /// One relation per hop; always `steps.len() - 1` entries.
    pub relations: Vec<Relation>
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Marker {
    None,
    Left(String),
    Right(String)
}

impl EntityPath {
    /// Parse and resolve a path.
    ///
    /// # Errors
    ///
    /// - [`QueryError::PathTooShort`] for a single entity.
    /// - [`QueryError::InvalidPath`] for empty tokens, empty keys, or a
    ///   marker on the last entity.
    pub fn parse(raw: &str, naming: &NamingConfig) -> QueryResult<Self> {
        let tokens = raw.split(',').map(str::trim).collect::<Vec<_>>();
        if tokens.len() < 2 {
            return Err(QueryError::PathTooShort(raw.to_owned()));
        }

        let mut steps = Vec::with_capacity(tokens.len());
        let mut markers = Vec::with_capacity(tokens.len());
        for token in &tokens {
            let (domain, marker) = parse_token(raw, token)?;
            steps.push(naming.column(&domain));
            markers.push(marker);
        }
        if markers.last().is_some_and(|m| *m != Marker::None) {
            return Err(QueryError::invalid_path(
                raw,
                "the last entity cannot carry a key marker"
            ));
        }

        let tables = steps
            .iter()
            .map(|step| naming.domain_table(step))
            .collect::<Vec<_>>();
        let relations = (0..steps.len() - 1)
            .map(|i| match &markers[i] {
                Marker::None => Relation {
                    kind:        RelationKind::ManyToMany,
                    local_key:   naming.join_id(&steps[i]),
                    foreign_key: naming.join_id(&steps[i + 1]),
                    join_table:  naming.join_table(&steps[i], &steps[i + 1])
                },
                Marker::Left(fk) => Relation {
                    kind:        RelationKind::ForeignKeyLeft,
                    local_key:   IDENTITY_COLUMN.to_owned(),
                    foreign_key: naming.column(fk),
                    join_table:  tables[i].clone()
                },
                Marker::Right(fk) => Relation {
                    kind:        RelationKind::ForeignKeyRight,
                    local_key:   naming.column(fk),
                    foreign_key: IDENTITY_COLUMN.to_owned(),
                    join_table:  tables[i + 1].clone()
                }
            })
            .collect();

        Ok(Self {
            raw: raw.to_owned(),
            steps,
            tables,
            relations
        })
    }

    /// Number of hops.
    pub fn hops(&self) -> usize {
        self.relations.len()
    }

    /// Domain of the last entity.
    pub fn target(&self) -> &str {
        self.steps.last().map_or("", String::as_str)
    }

    /// Relation connecting the root to the second entity.
    pub fn base_relation(&self) -> Option<&Relation> {
        self.relations.first()
    }

    /// Compile into a condition on the root entity.
    ///
    /// `filters` pairs a step index with a compiled WHERE body for that
    /// step's table. Index 0 (the root itself) and out-of-range indices are
    /// ignored. Filters must be ordered by index; the first one given for an
    /// index wins.
    pub fn compile(&self, filters: &[(usize, SqlAndArgs)]) -> SqlAndArgs {
        let filter_for = |step: usize| {
            filters
                .iter()
                .find(|(i, _)| *i == step)
                .map(|(_, f)| f.clone())
                .filter(|f| !f.is_empty())
        };

        let last = self.steps.len() - 1;
        let mut inner = IdSet::Table {
            table:  self.tables[last].clone(),
            filter: filter_for(last)
        };

        for step in (1..last).rev() {
            let projected = self.project(step, inner);
            inner = match filter_for(step) {
                Some(filter) => {
                    let mut builder = SqlBuilder::default();
                    builder.push_fragment(projected);
                    builder.push(&format!(
                        " INTERSECT SELECT {} FROM {}",
                        IDENTITY_COLUMN, self.tables[step]
                    ));
                    builder.push_where(filter);
                    IdSet::Query(builder.build())
                }
                None => IdSet::Query(projected)
            };
        }

        let mut builder = SqlBuilder::default();
        match self.relations.first() {
            Some(base) if base.kind == RelationKind::ForeignKeyLeft => {
                builder.push(&format!("{} IN (", base.foreign_key));
                builder.push_fragment(inner.into_sql());
            }
            _ => {
                builder.push(&format!("{} IN (", IDENTITY_COLUMN));
                builder.push_fragment(self.project(0, inner));
            }
        }
        builder.push(")");
        builder.build()
    }

    /// Ids of the entity at `step`, given the ids of the next entity.
    fn project(&self, step: usize, inner: IdSet) -> SqlAndArgs {
        let relation = &self.relations[step];
        if relation.kind == RelationKind::ForeignKeyRight
            && let IdSet::Table {
                table,
                filter
            } = &inner
            && *table == relation.join_table
        {
            let mut builder = SqlBuilder::new(format!(
                "SELECT {} FROM {}",
                relation.local_key, relation.join_table
            ));
            if let Some(filter) = filter {
                builder.push_where(filter.clone());
            }
            return builder.build();
        }
        let mut builder = SqlBuilder::new(format!(
            "SELECT {} FROM {} WHERE {} IN (",
            relation.local_key, relation.join_table, relation.foreign_key
        ));
        builder.push_fragment(inner.into_sql());
        builder.push(")");
        builder.build()
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A set of ids: either a whole (filtered) table or a compiled subquery.
enum IdSet {
    Table {
        table:  String,
        filter: Option<SqlAndArgs>
    },
    Query(SqlAndArgs)
}

impl IdSet {
    fn into_sql(self) -> SqlAndArgs {
        match self {
            Self::Table {
                table,
                filter
            } => {
                let mut builder =
                    SqlBuilder::new(format!("SELECT {} FROM {}", IDENTITY_COLUMN, table));
                if let Some(filter) = filter {
                    builder.push_where(filter);
                }
                builder.build()
            }
            Self::Query(sql) => sql
        }
    }
}

fn parse_token(raw: &str, token: &str) -> QueryResult<(String, Marker)> {
    if token.is_empty() {
        return Err(QueryError::invalid_path(raw, "empty entity name"));
    }
    let (domain, marker) = if let Some((entity, key)) = token.split_once("->") {
        (entity.trim(), Marker::Left(key.trim().to_owned()))
    } else if let Some((key, entity)) = token.split_once("<-") {
        (entity.trim(), Marker::Right(key.trim().to_owned()))
    } else {
        (token, Marker::None)
    };
    if domain.is_empty() {
        return Err(QueryError::invalid_path(raw, format!("token '{}' names no entity", token)));
    }
    if let Marker::Left(key) | Marker::Right(key) = &marker
        && key.is_empty()
    {
        return Err(QueryError::invalid_path(raw, format!("token '{}' names no key", token)));
    }
    if !domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(QueryError::invalid_path(raw, format!("invalid entity name '{}'", domain)));
    }
    Ok((domain.to_owned(), marker))
}

/// Per-hop filters for a path field.
///
/// Index 1 is the entity after the root; the last index is the target.
///
/// ```rust
/// use query_core::PathQuery;
/// # use query_core::{FieldValue, QueryFields, QuerySchema};
/// # struct RoleQuery;
/// # static SCHEMA: QuerySchema = QuerySchema { type_name: "RoleQuery", fields: &[] };
/// # impl QueryFields for RoleQuery {
/// #     fn query_schema(&self) -> &'static QuerySchema { &SCHEMA }
/// #     fn field_value(&self, _: usize) -> FieldValue<'_> { FieldValue::Absent }
/// # }
///
/// let filters = PathQuery::new().hop(1, RoleQuery);
/// assert_eq!(filters.len(), 1);
/// ```
#[derive(Default)]
pub struct PathQuery {
    hops: Vec<(usize, Box<dyn QueryFields + Send + Sync>)>
}

impl PathQuery {
    /// Create without filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter for the entity at `index`.
    #[must_use]
    pub fn hop<Q>(mut self, index: usize, query: Q) -> Self
    where
        Q: QueryFields + Send + Sync + 'static
    {
        self.hops.push((index, Box::new(query)));
        self
    }

    /// Iterate over filters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &dyn QueryFields)> {
        self.hops
            .iter()
            .map(|(i, q)| (*i, q.as_ref() as &dyn QueryFields))
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Check whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

impl fmt::Debug for PathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hops.iter().map(|(i, q)| (i, q.query_schema().type_name)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn naming() -> NamingConfig {
        NamingConfig::default()
    }

    fn filter(sql: &str, value: i64) -> SqlAndArgs {
        SqlAndArgs::new(sql, vec![Value::Int(value)])
    }

    fn balance(sql: &str) -> i64 {
        sql.chars().fold(0, |acc, c| match c {
            '(' => acc + 1,
            ')' => acc - 1,
            _ => acc
        })
    }

    #[test]
    fn single_entity_is_too_short() {
        assert_eq!(
            EntityPath::parse("user", &naming()),
            Err(QueryError::PathTooShort("user".into()))
        );
    }

    #[test]
    fn relations_per_hop() {
        let path = EntityPath::parse("user,role,perm", &naming()).unwrap();
        assert_eq!(path.hops(), 2);
        assert_eq!(path.relations.len(), path.steps.len() - 1);
        assert_eq!(path.target(), "perm");
        let base = path.base_relation().unwrap();
        assert_eq!(base.join_table, "a_user_and_role");
        assert_eq!(base.local_key, "user_id");
        assert_eq!(base.foreign_key, "role_id");
    }

    #[test]
    fn two_hop_many_to_many() {
        let path = EntityPath::parse("user,role", &naming()).unwrap();
        let out = path.compile(&[(1, filter("code = ?", 3))]);
        assert_eq!(
            out.sql,
            "id IN (SELECT user_id FROM a_user_and_role WHERE role_id IN \
             (SELECT id FROM t_role WHERE code = ?))"
        );
        assert_eq!(out.args, vec![Value::Int(3)]);
        assert_eq!(balance(&out.sql), 0);
        assert_eq!(out.sql.matches(')').count(), path.hops() + 1);
    }

    #[test]
    fn three_hop_many_to_many() {
        let path = EntityPath::parse("user,role,perm", &naming()).unwrap();
        let out = path.compile(&[(2, filter("name = ?", 1))]);
        assert_eq!(
            out.sql,
            "id IN (SELECT user_id FROM a_user_and_role WHERE role_id IN \
             (SELECT role_id FROM a_role_and_perm WHERE perm_id IN \
             (SELECT id FROM t_perm WHERE name = ?)))"
        );
        assert_eq!(balance(&out.sql), 0);
    }

    #[test]
    fn intermediate_filter_intersects() {
        let path = EntityPath::parse("user,role,perm", &naming()).unwrap();
        let out = path.compile(&[(1, filter("valid = ?", 1)), (2, filter("name = ?", 2))]);
        assert_eq!(
            out.sql,
            "id IN (SELECT user_id FROM a_user_and_role WHERE role_id IN \
             (SELECT role_id FROM a_role_and_perm WHERE perm_id IN \
             (SELECT id FROM t_perm WHERE name = ?) \
             INTERSECT SELECT id FROM t_role WHERE valid = ?))"
        );
        assert_eq!(out.args, vec![Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn left_foreign_key() {
        let path = EntityPath::parse("menu->parentId,menu", &naming()).unwrap();
        let out = path.compile(&[(1, filter("valid = ?", 1))]);
        assert_eq!(out.sql, "parent_id IN (SELECT id FROM t_menu WHERE valid = ?)");
    }

    #[test]
    fn right_foreign_key_folds() {
        let path = EntityPath::parse("parent_id<-menu,menu", &naming()).unwrap();
        let out = path.compile(&[(1, filter("valid = ?", 1))]);
        assert_eq!(out.sql, "id IN (SELECT parent_id FROM t_menu WHERE valid = ?)");
        let unfiltered = path.compile(&[]);
        assert_eq!(unfiltered.sql, "id IN (SELECT parent_id FROM t_menu)");
    }

    #[test]
    fn root_filter_is_ignored() {
        let path = EntityPath::parse("user,role", &naming()).unwrap();
        let out = path.compile(&[(0, filter("x = ?", 1))]);
        assert!(out.args.is_empty());
        assert_eq!(
            out.sql,
            "id IN (SELECT user_id FROM a_user_and_role WHERE role_id IN (SELECT id FROM t_role))"
        );
    }

    #[test]
    fn overrides_are_honoured() {
        let naming = NamingConfig::default()
            .with_join_table("role", "user", "user_roles")
            .with_entity_table("role", "roles");
        let path = EntityPath::parse("user,role", &naming).unwrap();
        let out = path.compile(&[]);
        assert_eq!(
            out.sql,
            "id IN (SELECT user_id FROM user_roles WHERE role_id IN (SELECT id FROM roles))"
        );
    }

    #[test]
    fn malformed_tokens() {
        assert!(matches!(
            EntityPath::parse("user,", &naming()),
            Err(QueryError::InvalidPath { .. })
        ));
        assert!(matches!(
            EntityPath::parse("menu->,menu", &naming()),
            Err(QueryError::InvalidPath { .. })
        ));
        assert!(matches!(
            EntityPath::parse("menu,menu->parent_id", &naming()),
            Err(QueryError::InvalidPath { .. })
        ));
        assert!(matches!(
            EntityPath::parse("us er,role", &naming()),
            Err(QueryError::InvalidPath { .. })
        ));
    }

    #[test]
    fn compile_is_deterministic() {
        let path = EntityPath::parse("user,role,perm", &naming()).unwrap();
        let filters = [(1, filter("a = ?", 1)), (2, filter("b = ?", 2))];
        assert_eq!(path.compile(&filters), path.compile(&filters));
    }
}
