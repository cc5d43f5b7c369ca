// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Procedural macros for `query-derive`.
//!
//! Internal crate; depend on `query-derive` instead. Generated code refers
//! to `::query_core`, so the runtime crate must be reachable under that
//! name.
//!
//! # Attribute Quick Reference
//!
//! ## Query structs
//!
//! ```rust,ignore
//! #[derive(Query)]
//! pub struct UserQuery {
//!     pub id_gt: Option<i64>,              // id > ?
//!     pub id_in: Option<Vec<i64>>,         // id IN (?, ?, ?)
//!     pub memo_null: Option<bool>,         // memo IS NULL / IS NOT NULL
//!     pub valid: bool,                     // valid = ? when true
//!
//!     pub account_or: Option<AccountQuery>,      // (a = ? OR b = ?)
//!     pub name_like_or: Option<Vec<String>>,     // (name LIKE ? OR name LIKE ?)
//!
//!     #[query(path = "user,role")]               // id IN (SELECT user_id ...)
//!     pub role: Option<RoleQuery>,
//!
//!     #[query(subquery = "select:avg(score),from:UserEntity")]
//!     pub score_gt_avg: bool,                    // score > (SELECT avg(score) ...)
//!
//!     #[query(condition = "name LIKE ? OR nick LIKE ?")]
//!     pub keyword: Option<String>,
//!
//!     #[query(flatten)]                          // fields join the parent's list
//!     pub audit: AuditQuery,
//!
//!     #[query(column = "user_name")]             // explicit base column
//!     pub name_start: Option<String>,
//!
//!     #[query(skip)]
//!     pub cache: Vec<String>,
//!
//!     pub page: PageQuery,                       // ORDER BY / LIMIT / OFFSET
//! }
//! ```
//!
//! ## Entity structs
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(table = "users")]        // Optional: derived from the type name
//! pub struct UserEntity {
//!     #[id]                         // Required exactly once
//!     pub id: i64,
//!     #[column(name = "nick")]      // Explicit column name
//!     pub user_name: String,
//!     #[column(skip)]               // Not a column
//!     pub cached: Vec<String>,
//!     #[embed]                      // Columns flattened in place
//!     pub audit: Audit,
//! }
//!
//! #[derive(Entity)]
//! #[entity(embeddable)]             // Columns only, no identity
//! pub struct Audit {
//!     pub create_time: Option<String>,
//! }
//! ```

mod entity;
mod query;
mod utils;

use proc_macro::TokenStream;

/// Derive `QueryFields` for a query struct.
///
/// Each named field becomes one entry of a static schema table, in
/// declaration order. The field's kind is decided from its name, its type
/// and its `#[query(...)]` attributes:
///
/// | Field | Kind |
/// |-------|------|
/// | `#[query(skip)]` | omitted |
/// | `PageQuery` or `#[query(page)]` | paging metadata |
/// | `#[query(flatten)]` | embedded query |
/// | `#[query(path = "a,b")]` | relation path |
/// | `#[query(subquery = "select:..,from:..")]` | subquery |
/// | `#[query(condition = "..")]` | literal SQL template |
/// | name ending `_or` / `_and` | condition group |
/// | `bool`, `Option<T>`, `Option<Vec<T>>` | suffix-operator condition |
///
/// A field whose type fits none of these still compiles; the runtime logs
/// it and skips it.
///
/// # Example
///
/// ```rust,ignore
/// use query_derive::{Query, QueryCompiler};
///
/// #[derive(Query, Default)]
/// pub struct UserQuery {
///     pub id_gt: Option<i64>,
///     pub memo_null: Option<bool>,
/// }
///
/// let compiler = QueryCompiler::default();
/// let clause = compiler.build_where(&UserQuery {
///     id_gt: Some(5),
///     memo_null: Some(true),
/// });
/// assert_eq!(clause.sql, "id > ? AND memo IS NULL");
/// ```
#[proc_macro_derive(Query, attributes(query))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    query::derive(input)
}

/// Derive `Columns` and `Entity` for a table row struct.
///
/// # Errors
///
/// Compile errors for enums, tuple structs, generic structs, and for a
/// non-embeddable struct without exactly one `#[id]` field.
///
/// # Example
///
/// ```rust,ignore
/// use query_derive::{Entity, QueryCompiler};
///
/// #[derive(Entity)]
/// pub struct UserEntity {
///     #[id]
///     pub id: i64,
///     pub score: i32,
/// }
///
/// let compiler = QueryCompiler::default();
/// let stmt = compiler.insert(&UserEntity { id: 0, score: 7 });
/// assert_eq!(stmt.sql, "INSERT INTO t_user (score) VALUES (?)");
/// ```
#[proc_macro_derive(Entity, attributes(entity, id, column, embed))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
