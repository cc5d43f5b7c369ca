// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for schema compilation.
//!
//! These are shape errors: a malformed annotation or an unsupported field
//! type. The registry logs them and skips the field, so a partially valid
//! query still compiles. They surface directly only from the standalone
//! parsers ([`EntityPath::parse`](crate::EntityPath::parse),
//! [`SubquerySpec::parse`](crate::SubquerySpec::parse),
//! [`SortOrder::parse`](crate::SortOrder::parse)).

use thiserror::Error;

/// Shape error raised while compiling a query or entity description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A relation path token could not be parsed.
    #[error("invalid entity path '{path}': {reason}")]
    InvalidPath {
        /// The raw path annotation.
        path:   String,
        /// What is wrong with it.
        reason: String
    },

    /// A relation path names fewer than two entities.
    #[error("entity path '{0}' must name at least two entities")]
    PathTooShort(String),

    /// A subquery annotation is missing `select:` or `from:`.
    #[error("invalid subquery annotation '{0}': expected 'select:<expr>,from:<entity>'")]
    InvalidSubquery(String),

    /// A sort entry is not `field` or `field,asc|desc`.
    #[error("invalid sort entry '{0}'")]
    InvalidSort(String),

    /// A field shape the engine cannot turn into a condition.
    #[error("unsupported field '{field}' on {type_name}: {reason}")]
    UnsupportedField {
        /// Owning query type.
        type_name: &'static str,
        /// Field name.
        field:     &'static str,
        /// Why it was rejected.
        reason:    &'static str
    }
}

impl QueryError {
    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path:   path.into(),
            reason: reason.into()
        }
    }
}

/// Result alias for fallible schema parsing.
pub type QueryResult<T> = Result<T, QueryError>;
