// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use query_core::prelude::*;
//! ```

pub use crate::{
    Columns, Entity, FieldKind, FieldValue, NamingConfig, PageQuery, Pagination, PathQuery,
    QueryCompiler, QueryError, QueryField, QueryFields, QuerySchema, SortDirection, SqlAndArgs,
    ToValue, Value, field
};
