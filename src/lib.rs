// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # query-derive
//!
//! One crate, all features. Re-exports:
//! - [`Query`] and [`Entity`](macro@Entity) derive macros from
//!   `query-derive-impl`
//! - All types from `query-core` ([`QueryCompiler`], [`PageQuery`],
//!   [`PathQuery`], [`SqlAndArgs`], [`Value`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use query_derive::{Query, QueryCompiler};
//!
//! #[derive(Query, Default)]
//! pub struct UserQuery {
//!     pub id_gt: Option<i64>,
//!     pub memo_null: Option<bool>,
//! }
//!
//! let compiler = QueryCompiler::default();
//! let clause = compiler.build_where(&UserQuery {
//!     id_gt: Some(5),
//!     memo_null: Some(true),
//! });
//! assert_eq!(clause.sql, "id > ? AND memo IS NULL");
//! ```

pub use query_core::*;
pub use query_derive_impl::{Entity, Query};
