// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Predicate assembler.
//!
//! [`QueryCompiler`] owns the naming configuration and both caches. It walks
//! a query value's fields in declaration order, renders every present field
//! through its cached processor and joins the results with `AND`.
//!
//! # Example
//!
//! ```rust
//! use query_core::prelude::*;
//!
//! #[derive(Default)]
//! struct UserQuery {
//!     id_gt:     Option<i64>,
//!     memo_null: Option<bool>
//! }
//!
//! static SCHEMA: QuerySchema = QuerySchema {
//!     type_name: "UserQuery",
//!     fields:    &[
//!         QueryField::new("id_gt", FieldKind::Scalar),
//!         QueryField::new("memo_null", FieldKind::Scalar)
//!     ]
//! };
//!
//! impl QueryFields for UserQuery {
//!     fn query_schema(&self) -> &'static QuerySchema {
//!         &SCHEMA
//!     }
//!
//!     fn field_value(&self, index: usize) -> FieldValue<'_> {
//!         match index {
//!             0 => field::scalar(&self.id_gt),
//!             1 => field::scalar(&self.memo_null),
//!             _ => FieldValue::Absent
//!         }
//!     }
//! }
//!
//! let compiler = QueryCompiler::default();
//! let query = UserQuery {
//!     id_gt:     Some(5),
//!     memo_null: Some(true)
//! };
//! let clause = compiler.build_where(&query);
//! assert_eq!(clause.sql, "id > ? AND memo IS NULL");
//! assert_eq!(clause.args, vec![Value::Int(5)]);
//! ```

use std::sync::Arc;

use crate::{
    entity::{Columns, EntityMetadata, MetadataCache},
    naming::NamingConfig,
    paging::{SortOrder, build_paging},
    processor::{ProcessorRegistry, QueryPlan},
    schema::{QueryFields, QuerySchema},
    sql::{Conditions, SqlAndArgs}
};

/// Compiles query values into WHERE clauses and entities into statements.
///
/// Holds the naming configuration and the plan and metadata caches. Share
/// one instance (for example behind an [`Arc`]) for the process lifetime;
/// every cache entry is a pure function of a type's shape and the naming
/// configuration.
#[derive(Debug, Default)]
pub struct QueryCompiler {
    naming:   NamingConfig,
    registry: ProcessorRegistry,
    metadata: MetadataCache
}

impl QueryCompiler {
    /// Create with a naming configuration and empty caches.
    pub fn new(naming: NamingConfig) -> Self {
        Self {
            naming,
            registry: ProcessorRegistry::new(),
            metadata: MetadataCache::new()
        }
    }

    /// Naming configuration.
    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Query plan cache.
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// Entity metadata cache.
    pub fn metadata_cache(&self) -> &MetadataCache {
        &self.metadata
    }

    /// Cached plan for a query schema.
    pub fn plan(&self, schema: &QuerySchema) -> Arc<QueryPlan> {
        self.registry.plan(schema, &self.naming)
    }

    /// Cached metadata for an entity type.
    pub fn entity_metadata<E: Columns>(&self) -> Arc<EntityMetadata> {
        self.metadata.get(E::descriptor(), &self.naming)
    }

    /// Append the conditions of every present field to `out`, in field
    /// order.
    pub fn collect(&self, query: &dyn QueryFields, out: &mut Conditions) {
        let plan = self.plan(query.query_schema());
        for (index, entry) in plan.entries.iter().enumerate() {
            let value = query.field_value(index);
            entry
                .processor
                .apply(self, plan.type_name, entry.field, value, out);
        }
    }

    /// WHERE body of a query value, without the `WHERE` keyword.
    ///
    /// Empty when no field is present.
    pub fn build_where(&self, query: &dyn QueryFields) -> SqlAndArgs {
        let mut conditions = Conditions::new();
        self.collect(query, &mut conditions);
        conditions.join(" AND ")
    }

    /// ` ORDER BY ...` from the query's sort specification, or empty.
    pub fn build_order_by(&self, query: &dyn QueryFields) -> String {
        query
            .page()
            .and_then(|page| page.sort.as_deref())
            .map(|sort| SortOrder::parse_lenient(sort).as_sql(&self.naming))
            .unwrap_or_default()
    }

    /// ` LIMIT n OFFSET m` from the query's paging metadata, or empty.
    pub fn build_paging(&self, query: &dyn QueryFields) -> String {
        query.page().map(build_paging).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        paging::PageQuery,
        schema::{Connective, FieldKind, FieldValue, GroupShape, QueryField, field},
        value::Value
    };

    #[derive(Default)]
    struct NameQuery {
        username: Option<String>,
        email:    Option<String>
    }

    static NAME_SCHEMA: QuerySchema = QuerySchema {
        type_name: "compiler::tests::NameQuery",
        fields:    &[
            QueryField::new("username", FieldKind::Scalar),
            QueryField::new("email", FieldKind::Scalar)
        ]
    };

    impl QueryFields for NameQuery {
        fn query_schema(&self) -> &'static QuerySchema {
            &NAME_SCHEMA
        }

        fn field_value(&self, index: usize) -> FieldValue<'_> {
            match index {
                0 => field::scalar(&self.username),
                1 => field::scalar(&self.email),
                _ => FieldValue::Absent
            }
        }
    }

    #[derive(Default)]
    struct UserQuery {
        id_in:        Option<Vec<i64>>,
        name_or:      Option<NameQuery>,
        deleted:      bool,
        page:         PageQuery,
        names_or:     Option<Vec<NameQuery>>,
        nick_like_or: Option<Vec<String>>
    }

    static USER_SCHEMA: QuerySchema = QuerySchema {
        type_name: "compiler::tests::UserQuery",
        fields:    &[
            QueryField::new("id_in", FieldKind::Scalar),
            QueryField::new(
                "name_or",
                FieldKind::Group {
                    connective: Connective::Or,
                    shape:      GroupShape::Nested
                }
            ),
            QueryField::new("deleted", FieldKind::Scalar),
            QueryField::new("page", FieldKind::Page),
            QueryField::new(
                "names_or",
                FieldKind::Group {
                    connective: Connective::Or,
                    shape:      GroupShape::NestedList
                }
            ),
            QueryField::new(
                "nick_like_or",
                FieldKind::Group {
                    connective: Connective::Or,
                    shape:      GroupShape::ScalarList
                }
            )
        ]
    };

    impl QueryFields for UserQuery {
        fn query_schema(&self) -> &'static QuerySchema {
            &USER_SCHEMA
        }

        fn field_value(&self, index: usize) -> FieldValue<'_> {
            match index {
                0 => field::list(&self.id_in),
                1 => field::nested(&self.name_or),
                2 => field::flag(self.deleted),
                4 => field::nested_list(&self.names_or),
                5 => field::list(&self.nick_like_or),
                _ => FieldValue::Absent
            }
        }

        fn page(&self) -> Option<&PageQuery> {
            Some(&self.page)
        }
    }

    fn f0rb() -> NameQuery {
        NameQuery {
            username: Some("f0rb".into()),
            email:    Some("f0rb".into())
        }
    }

    #[test]
    fn empty_query_has_no_where() {
        let compiler = QueryCompiler::default();
        let clause = compiler.build_where(&UserQuery::default());
        assert!(clause.is_empty());
        assert_eq!(clause.where_clause(), "");
    }

    #[test]
    fn or_group_is_parenthesised() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            name_or: Some(f0rb()),
            ..Default::default()
        };
        let clause = compiler.build_where(&query);
        assert_eq!(clause.sql, "(username = ? OR email = ?)");
        assert_eq!(clause.args, vec![Value::from("f0rb"), Value::from("f0rb")]);
    }

    #[test]
    fn single_member_group_is_bare() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            name_or: Some(NameQuery {
                email: Some("a@b".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(compiler.build_where(&query).sql, "email = ?");
    }

    #[test]
    fn fields_join_in_order() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            id_in: Some(vec![5, 6, 7]),
            name_or: Some(f0rb()),
            deleted: true,
            ..Default::default()
        };
        let clause = compiler.build_where(&query);
        assert_eq!(
            clause.sql,
            "id IN (?, ?, ?) AND (username = ? OR email = ?) AND deleted = ?"
        );
        assert_eq!(
            clause.args,
            vec![
                Value::Int(5),
                Value::Int(6),
                Value::Int(7),
                Value::from("f0rb"),
                Value::from("f0rb"),
                Value::Bool(true)
            ]
        );
    }

    #[test]
    fn nested_list_group() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            names_or: Some(vec![
                f0rb(),
                NameQuery {
                    username: Some("other".into()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let clause = compiler.build_where(&query);
        assert_eq!(clause.sql, "((username = ? AND email = ?) OR username = ?)");
        assert_eq!(clause.args.len(), 3);
    }

    #[test]
    fn scalar_list_group() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            nick_like_or: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        };
        let clause = compiler.build_where(&query);
        assert_eq!(clause.sql, "(nick LIKE ? OR nick LIKE ?)");
        assert_eq!(clause.args, vec![Value::from("%a%"), Value::from("%b%")]);
    }

    #[test]
    fn paging_and_sort_come_from_page_field() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            page: PageQuery::new(3, 10).with_sort("id,desc"),
            ..Default::default()
        };
        assert!(compiler.build_where(&query).is_empty());
        assert_eq!(compiler.build_order_by(&query), " ORDER BY id DESC");
        assert_eq!(compiler.build_paging(&query), " LIMIT 10 OFFSET 20");
    }

    #[test]
    fn compilation_is_deterministic() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            id_in: Some(vec![1, 2]),
            name_or: Some(f0rb()),
            ..Default::default()
        };
        assert_eq!(compiler.build_where(&query), compiler.build_where(&query));
        assert_eq!(compiler.registry().len(), 2);
    }
}
