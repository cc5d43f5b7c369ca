// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Concurrent first use of the plan and metadata caches.

use std::sync::Arc;

use proptest::prelude::*;
use query_derive::{Entity, Query, QueryCompiler, QueryFields};

#[derive(Query, Default)]
struct MenuQuery {
    id_gt:     Option<i64>,
    parent_or: Option<Box<MenuQuery>>,
    name_like: Option<String>
}

#[derive(Entity, Default)]
struct MenuEntity {
    #[id]
    id:   i64,
    name: String
}

#[test]
fn self_referential_query_compiles() {
    let compiler = QueryCompiler::default();
    let query = MenuQuery {
        id_gt: Some(1),
        parent_or: Some(Box::new(MenuQuery {
            id_gt: Some(2),
            name_like: Some("x".into()),
            ..Default::default()
        })),
        ..Default::default()
    };
    let clause = compiler.build_where(&query);
    assert_eq!(clause.sql, "id > ? AND (id > ? OR name LIKE ?)");
    assert_eq!(compiler.registry().len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn concurrent_first_use_installs_one_plan(threads in 2usize..8) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let compiler = QueryCompiler::default();
        let schema = MenuQuery::default().query_schema();

        let plans = std::thread::scope(|scope| {
            let handles = (0..threads)
                .map(|_| scope.spawn(|| compiler.plan(schema)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        prop_assert_eq!(compiler.registry().len(), 1);
        for plan in &plans {
            prop_assert!(Arc::ptr_eq(plan, &plans[0]));
        }
    }

    #[test]
    fn concurrent_first_use_installs_one_metadata(threads in 2usize..8) {
        let compiler = QueryCompiler::default();

        let metas = std::thread::scope(|scope| {
            let handles = (0..threads)
                .map(|_| scope.spawn(|| compiler.entity_metadata::<MenuEntity>()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        prop_assert_eq!(compiler.metadata_cache().len(), 1);
        for meta in &metas {
            prop_assert!(Arc::ptr_eq(meta, &metas[0]));
        }
    }

    #[test]
    fn compilation_is_deterministic(id in any::<i64>(), name in "[a-z]{1,8}") {
        let compiler = QueryCompiler::default();
        let query = MenuQuery {
            id_gt: Some(id),
            name_like: Some(name),
            ..Default::default()
        };
        prop_assert_eq!(compiler.build_where(&query), compiler.build_where(&query));
    }
}
