// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Full statements built from entity metadata and query predicates.
//!
//! | Method | SQL |
//! |--------|-----|
//! | [`select`](QueryCompiler::select) | `SELECT <cols> FROM <t>[ WHERE ..][ ORDER BY ..][ LIMIT .. OFFSET ..]` |
//! | [`count`](QueryCompiler::count) | `SELECT count(*) FROM <t>[ WHERE ..]` |
//! | [`delete`](QueryCompiler::delete) | `DELETE FROM <t>[ WHERE ..]` |
//! | [`select_by_id`](QueryCompiler::select_by_id) | `SELECT <cols> FROM <t> WHERE id = ?` |
//! | [`delete_by_id`](QueryCompiler::delete_by_id) | `DELETE FROM <t> WHERE id = ?` |
//! | [`insert`](QueryCompiler::insert) | `INSERT INTO <t> (<cols>) VALUES (?, ..)` |
//! | [`insert_batch`](QueryCompiler::insert_batch) | `INSERT INTO <t> (<cols>) VALUES (?, ..), (?, ..)` |
//! | [`update`](QueryCompiler::update) | `UPDATE <t> SET a = ?, .. WHERE id = ?` |
//! | [`patch`](QueryCompiler::patch) | `UPDATE <t> SET <non-null cols> WHERE id = ?` |
//! | [`patch_by_query`](QueryCompiler::patch_by_query) | `UPDATE <t> SET <non-null cols>[ WHERE ..]` |

use crate::{
    compiler::QueryCompiler,
    entity::{Columns, Entity, assignments},
    schema::QueryFields,
    sql::{SqlAndArgs, SqlBuilder},
    value::{ToValue, Value}
};

impl QueryCompiler {
    /// Select the entity's columns matching a query, sorted and paged.
    pub fn select<E: Columns>(&self, query: &dyn QueryFields) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        let mut builder =
            SqlBuilder::new(format!("SELECT {} FROM {}", meta.column_list, meta.table));
        builder.push_where(self.build_where(query));
        builder.push(&self.build_order_by(query));
        builder.push(&self.build_paging(query));
        builder.build()
    }

    /// Count rows matching a query.
    pub fn count<E: Columns>(&self, query: &dyn QueryFields) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        let mut builder = SqlBuilder::new(format!("SELECT count(*) FROM {}", meta.table));
        builder.push_where(self.build_where(query));
        builder.build()
    }

    /// Delete rows matching a query.
    ///
    /// An empty query deletes every row; callers guard against that.
    pub fn delete<E: Columns>(&self, query: &dyn QueryFields) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        let mut builder = SqlBuilder::new(format!("DELETE FROM {}", meta.table));
        builder.push_where(self.build_where(query));
        builder.build()
    }

    /// Select one row by identity.
    pub fn select_by_id<E: Entity>(&self, id: &E::Id) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        SqlAndArgs::new(meta.select_by_id_sql.clone(), vec![id.to_value()])
    }

    /// Delete one row by identity.
    pub fn delete_by_id<E: Entity>(&self, id: &E::Id) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        SqlAndArgs::new(meta.delete_by_id_sql.clone(), vec![id.to_value()])
    }

    /// Insert one entity; the identity column is left to the database.
    pub fn insert<E: Columns>(&self, entity: &E) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        let (args, _) = meta.split_identity(meta.values(entity));
        SqlAndArgs::new(meta.insert_sql.clone(), args)
    }

    /// Insert several entities in one statement.
    ///
    /// Returns `None` for an empty slice.
    pub fn insert_batch<E: Columns>(&self, entities: &[E]) -> Option<SqlAndArgs> {
        if entities.is_empty() {
            return None;
        }
        let meta = self.entity_metadata::<E>();
        let mut builder = SqlBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES ",
            meta.table,
            meta.insert_columns.join(", ")
        ));
        for (i, entity) in entities.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            let (values, _) = meta.split_identity(meta.values(entity));
            builder.push_group(values);
        }
        Some(builder.build())
    }

    /// Update every column of an entity by identity.
    pub fn update<E: Entity>(&self, entity: &E) -> SqlAndArgs {
        let meta = self.entity_metadata::<E>();
        let (mut args, _) = meta.split_identity(meta.values(entity));
        args.push(entity.id().to_value());
        SqlAndArgs::new(meta.update_sql.clone(), args)
    }

    /// Update only the non-null columns of an entity by identity.
    ///
    /// Returns `None` when every column is null.
    pub fn patch<E: Entity>(&self, entity: &E) -> Option<SqlAndArgs> {
        let meta = self.entity_metadata::<E>();
        let (set, mut args) = self.non_null_assignments(entity)?;
        args.push(entity.id().to_value());
        Some(SqlAndArgs::new(
            format!("UPDATE {} SET {} WHERE {} = ?", meta.table, set, meta.identity),
            args
        ))
    }

    /// Update the non-null columns of every row matching a query.
    ///
    /// Returns `None` when every column is null.
    pub fn patch_by_query<E: Columns>(
        &self,
        entity: &E,
        query: &dyn QueryFields
    ) -> Option<SqlAndArgs> {
        let meta = self.entity_metadata::<E>();
        let (set, args) = self.non_null_assignments(entity)?;
        let mut builder = SqlBuilder::default();
        builder.push_fragment(SqlAndArgs::new(format!("UPDATE {} SET {}", meta.table, set), args));
        builder.push_where(self.build_where(query));
        Some(builder.build())
    }

    fn non_null_assignments<E: Columns>(&self, entity: &E) -> Option<(String, Vec<Value>)> {
        let meta = self.entity_metadata::<E>();
        let (values, _) = meta.split_identity(meta.values(entity));
        let (columns, args): (Vec<_>, Vec<_>) = meta
            .insert_columns
            .iter()
            .cloned()
            .zip(values)
            .filter(|(_, value)| !value.is_null())
            .unzip();
        if columns.is_empty() {
            return None;
        }
        Some((assignments(&columns), args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{ColumnKind, EntityDescriptor, EntityField},
        paging::PageQuery,
        schema::{FieldKind, FieldValue, QueryField, QuerySchema, field}
    };

    #[derive(Default)]
    struct User {
        id:    Option<i64>,
        score: Option<i32>,
        memo:  Option<String>
    }

    static USER: EntityDescriptor = EntityDescriptor {
        type_name: "statement::tests::User",
        name:      "User",
        table:     None,
        fields:    &[
            EntityField {
                name:   "id",
                column: None,
                kind:   ColumnKind::Identity
            },
            EntityField {
                name:   "score",
                column: None,
                kind:   ColumnKind::Column
            },
            EntityField {
                name:   "memo",
                column: None,
                kind:   ColumnKind::Column
            }
        ]
    };

    impl Columns for User {
        fn descriptor() -> &'static EntityDescriptor {
            &USER
        }

        fn write_values(&self, out: &mut Vec<Value>) {
            out.push(self.id.to_value());
            out.push(self.score.to_value());
            out.push(self.memo.to_value());
        }
    }

    impl Entity for User {
        type Id = Option<i64>;

        fn id(&self) -> &Self::Id {
            &self.id
        }

        fn set_id(&mut self, id: Self::Id) {
            self.id = id;
        }
    }

    #[derive(Default)]
    struct UserQuery {
        id_gt:     Option<i64>,
        memo_null: Option<bool>,
        page:      PageQuery
    }

    static USER_QUERY: QuerySchema = QuerySchema {
        type_name: "statement::tests::UserQuery",
        fields:    &[
            QueryField::new("id_gt", FieldKind::Scalar),
            QueryField::new("memo_null", FieldKind::Scalar),
            QueryField::new("page", FieldKind::Page)
        ]
    };

    impl QueryFields for UserQuery {
        fn query_schema(&self) -> &'static QuerySchema {
            &USER_QUERY
        }

        fn field_value(&self, index: usize) -> FieldValue<'_> {
            match index {
                0 => field::scalar(&self.id_gt),
                1 => field::scalar(&self.memo_null),
                _ => FieldValue::Absent
            }
        }

        fn page(&self) -> Option<&PageQuery> {
            Some(&self.page)
        }
    }

    fn user() -> User {
        User {
            id:    Some(1),
            score: Some(90),
            memo:  None
        }
    }

    #[test]
    fn select_with_where_order_and_page() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            id_gt:     Some(5),
            memo_null: Some(true),
            page:      PageQuery::new(3, 10).with_sort("score,desc")
        };
        let out = compiler.select::<User>(&query);
        assert_eq!(
            out.sql,
            "SELECT id, score, memo FROM t_user WHERE id > ? AND memo IS NULL \
             ORDER BY score DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(out.args, vec![Value::Int(5)]);
    }

    #[test]
    fn count_and_delete() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            id_gt: Some(5),
            ..Default::default()
        };
        assert_eq!(
            compiler.count::<User>(&query).sql,
            "SELECT count(*) FROM t_user WHERE id > ?"
        );
        assert_eq!(
            compiler.delete::<User>(&UserQuery::default()).sql,
            "DELETE FROM t_user"
        );
    }

    #[test]
    fn by_id() {
        let compiler = QueryCompiler::default();
        let out = compiler.select_by_id::<User>(&Some(3));
        assert_eq!(out.sql, "SELECT id, score, memo FROM t_user WHERE id = ?");
        assert_eq!(out.args, vec![Value::Int(3)]);
        assert_eq!(
            compiler.delete_by_id::<User>(&Some(3)).sql,
            "DELETE FROM t_user WHERE id = ?"
        );
    }

    #[test]
    fn insert_skips_identity() {
        let compiler = QueryCompiler::default();
        let out = compiler.insert(&user());
        assert_eq!(out.sql, "INSERT INTO t_user (score, memo) VALUES (?, ?)");
        assert_eq!(out.args, vec![Value::Int(90), Value::Null]);
    }

    #[test]
    fn insert_batch_groups() {
        let compiler = QueryCompiler::default();
        assert!(compiler.insert_batch::<User>(&[]).is_none());
        let out = compiler.insert_batch(&[user(), user()]).unwrap();
        assert_eq!(
            out.sql,
            "INSERT INTO t_user (score, memo) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(out.args.len(), 4);
    }

    #[test]
    fn update_appends_identity() {
        let compiler = QueryCompiler::default();
        let out = compiler.update(&user());
        assert_eq!(out.sql, "UPDATE t_user SET score = ?, memo = ? WHERE id = ?");
        assert_eq!(out.args, vec![Value::Int(90), Value::Null, Value::Int(1)]);
    }

    #[test]
    fn patch_skips_nulls() {
        let compiler = QueryCompiler::default();
        let out = compiler.patch(&user()).unwrap();
        assert_eq!(out.sql, "UPDATE t_user SET score = ? WHERE id = ?");
        assert_eq!(out.args, vec![Value::Int(90), Value::Int(1)]);
        assert!(compiler.patch(&User::default()).is_none());
    }

    #[test]
    fn patch_by_query_uses_predicate() {
        let compiler = QueryCompiler::default();
        let query = UserQuery {
            id_gt: Some(5),
            ..Default::default()
        };
        let out = compiler.patch_by_query(&user(), &query).unwrap();
        assert_eq!(out.sql, "UPDATE t_user SET score = ? WHERE id > ?");
        assert_eq!(out.args, vec![Value::Int(90), Value::Int(5)]);
    }

    #[test]
    fn set_id_replaces_identity() {
        let mut user = user();
        user.set_id(Some(42));
        assert_eq!(*user.id(), Some(42));
    }
}
