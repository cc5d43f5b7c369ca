// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use query_derive::{PageQuery, Query, QueryCompiler, QueryFields};

#[derive(Query, Default)]
pub struct UserQuery {
    pub id_gt: Option<i64>,
    pub id_in: Option<Vec<i64>>,
    pub memo_null: Option<bool>,
    pub valid: bool,
    pub page: PageQuery,
}

fn main() {
    let schema = UserQuery::default().query_schema();
    assert_eq!(schema.fields.len(), 5);
    assert!(schema.type_name.ends_with("UserQuery"));

    let compiler = QueryCompiler::default();
    let clause = compiler.build_where(&UserQuery {
        id_gt: Some(5),
        memo_null: Some(true),
        ..Default::default()
    });
    assert_eq!(clause.sql, "id > ? AND memo IS NULL");
}
