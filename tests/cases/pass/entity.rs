// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use query_derive::{Columns, Entity, QueryCompiler};

#[derive(Entity, Default)]
#[entity(embeddable)]
pub struct Audit {
    pub create_time: Option<String>,
}

#[derive(Entity, Default)]
#[entity(table = "users")]
pub struct UserEntity {
    #[id]
    pub id: i64,
    #[column(name = "nick")]
    pub user_name: String,
    #[column(skip)]
    pub cached: Vec<String>,
    #[embed]
    pub audit: Audit,
}

fn main() {
    assert_eq!(UserEntity::descriptor().fields.len(), 3);

    let mut user = UserEntity::default();
    user.set_id(9);
    assert_eq!(*user.id(), 9);

    let compiler = QueryCompiler::default();
    let stmt = compiler.insert(&user);
    assert_eq!(stmt.sql, "INSERT INTO users (nick, create_time) VALUES (?, ?)");
}
