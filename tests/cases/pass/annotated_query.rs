// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use query_derive::{PathQuery, Query, QueryCompiler};

#[derive(Query, Default)]
pub struct RoleQuery {
    pub role_code: Option<String>,
}

#[derive(Query, Default)]
pub struct AccountQuery {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Query, Default)]
pub struct UserQuery {
    pub account_or: Option<AccountQuery>,
    pub accounts_and: Option<Vec<AccountQuery>>,
    pub nick_like_or: Option<Vec<String>>,
    #[query(path = "user,role")]
    pub role: Option<RoleQuery>,
    #[query(path = "user,role,perm")]
    pub perm: Option<PathQuery>,
    #[query(subquery = "select:avg(score),from:UserEntity")]
    pub score_gt_avg: bool,
    #[query(condition = "(name LIKE ? OR nick LIKE ?)")]
    pub keyword: Option<String>,
    #[query(flatten)]
    pub extra: RoleQuery,
    #[query(column = "user_name")]
    pub login: Option<String>,
    #[query(skip)]
    pub lookup: HashMap<String, i64>,
    pub unsupported: Option<HashMap<String, i64>>,
}

fn main() {
    let compiler = QueryCompiler::default();
    let clause = compiler.build_where(&UserQuery {
        score_gt_avg: true,
        ..Default::default()
    });
    assert_eq!(clause.sql, "score > (SELECT avg(score) FROM t_user)");
}
