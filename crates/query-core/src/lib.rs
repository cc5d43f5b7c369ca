// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime engine for query-derive.
//!
//! Compiles declaratively shaped query values into parameterised SQL
//! predicates, and entity values into statement templates. The derive macros
//! in `query-derive` generate the static schema tables this crate consumes;
//! the traits can also be implemented by hand.
//!
//! # Overview
//!
//! | Component | Item |
//! |-----------|------|
//! | Operator table | [`Operator`] |
//! | Suffix grammar | [`suffix::match_suffix`] |
//! | Schema description | [`QuerySchema`], [`FieldKind`], [`QueryFields`] |
//! | Processor registry | [`ProcessorRegistry`], [`QueryPlan`] |
//! | Entity path resolver | [`EntityPath`], [`PathQuery`] |
//! | Predicate assembler | [`QueryCompiler::build_where`] |
//! | Paging and sort | [`PageQuery`], [`SortOrder`], [`Pagination`] |
//! | Entity metadata | [`EntityMetadata`], [`MetadataCache`] |
//! | Statements | [`QueryCompiler::select`], [`QueryCompiler::insert`], ... |
//! | Naming | [`NamingConfig`] |
//!
//! Every `?` in emitted SQL is matched left to right by one [`Value`] in the
//! accompanying argument vector. Binding and execution belong to the caller.
//!
//! # Usage
//!
//! ```rust,ignore
//! use query_core::prelude::*;
//!
//! let compiler = QueryCompiler::new(NamingConfig::default());
//! let SqlAndArgs { sql, args } = compiler.select::<User>(&query);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod compiler;
mod entity;
mod error;
mod naming;
mod operator;
pub mod paging;
mod path;
pub mod prelude;
mod processor;
mod schema;
mod sql;
mod statement;
mod subquery;
pub mod suffix;
mod value;

pub use compiler::QueryCompiler;
pub use entity::{
    ColumnKind, Columns, Entity, EntityDescriptor, EntityField, EntityMetadata, MetadataCache
};
pub use error::{QueryError, QueryResult};
pub use naming::{ColumnCase, NamingConfig};
pub use operator::{Operator, Rendered, escape_like};
pub use paging::{PageQuery, Pagination, SortDirection, SortItem, SortOrder};
pub use path::{EntityPath, IDENTITY_COLUMN, PathQuery, Relation, RelationKind};
pub use processor::{PlanEntry, Processor, ProcessorRegistry, QueryPlan};
pub use schema::{
    Connective, FieldKind, FieldValue, GroupShape, QueryField, QueryFields, QuerySchema, field
};
pub use sql::{Conditions, SqlAndArgs, SqlBuilder};
pub use subquery::SubquerySpec;
pub use value::{ToValue, Value};
