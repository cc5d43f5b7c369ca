// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Paging and sort compilation.
//!
//! Stateless: [`build_order_by`] turns a sort string into ` ORDER BY ...` and
//! [`build_paging`] turns page number and size into ` LIMIT n OFFSET m`.
//!
//! # Sort grammar
//!
//! ```text
//! sort  = entry (";" entry)*
//! entry = field ("," ("asc" | "desc"))?
//! ```
//!
//! Direction tokens are case-insensitive. Field names are converted to the
//! configured column case.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::{
    error::{QueryError, QueryResult},
    naming::NamingConfig
};

/// Page number used when none (or a non-positive one) is given.
pub const DEFAULT_PAGE_NUMBER: i64 = 1;

/// Page size used when none (or a non-positive one) is given.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

static SORT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("fail to create a regex for sort fields")
});

/// Resolved limit and offset.
///
/// # Example
///
/// ```rust
/// use query_core::Pagination;
///
/// let page = Pagination::page(3, 10);
/// assert_eq!(page, Pagination::new(10, 20));
/// assert_eq!(page.as_sql(), " LIMIT 10 OFFSET 20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of rows to return.
    pub limit: i64,

    /// Number of rows to skip.
    pub offset: i64
}

impl Pagination {
    /// Create from a limit and a zero-based offset.
    pub const fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset
        }
    }

    /// Create for a one-based page number.
    ///
    /// Non-positive numbers and sizes fall back to
    /// [`DEFAULT_PAGE_NUMBER`] and [`DEFAULT_PAGE_SIZE`]. The offset saturates
    /// at `i64::MAX` for page numbers past the addressable range.
    pub const fn page(number: i64, size: i64) -> Self {
        let number = if number > 0 { number } else { DEFAULT_PAGE_NUMBER };
        let size = if size > 0 { size } else { DEFAULT_PAGE_SIZE };
        Self {
            limit:  size,
            offset: number.saturating_sub(1).saturating_mul(size)
        }
    }

    /// Render as ` LIMIT <limit> OFFSET <offset>`.
    pub fn as_sql(&self) -> String {
        format!(" LIMIT {} OFFSET {}", self.limit, self.offset)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::page(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,

    /// Descending order.
    Desc
}

impl SortDirection {
    /// Convert to SQL keyword.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC"
        }
    }

    /// Parse `asc` or `desc`, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// One `field[,direction]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    /// Field name as written.
    pub field:     String,
    /// Explicit direction, if given.
    pub direction: Option<SortDirection>
}

impl SortItem {
    /// Parse one entry.
    pub fn parse(entry: &str) -> QueryResult<Self> {
        let mut parts = entry.split(',').map(str::trim);
        let field = parts.next().unwrap_or_default();
        if !SORT_FIELD.is_match(field) {
            return Err(QueryError::InvalidSort(entry.to_owned()));
        }
        let direction = match parts.next() {
            None => None,
            Some(token) => Some(
                SortDirection::parse(token)
                    .ok_or_else(|| QueryError::InvalidSort(entry.to_owned()))?
            )
        };
        if parts.next().is_some() {
            return Err(QueryError::InvalidSort(entry.to_owned()));
        }
        Ok(Self {
            field: field.to_owned(),
            direction
        })
    }

    fn render(&self, naming: &NamingConfig) -> String {
        let column = naming.column(&self.field);
        match self.direction {
            Some(direction) => format!("{} {}", column, direction.as_sql()),
            None => column
        }
    }
}

/// A parsed sort specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    /// Entries in order of precedence.
    pub items: Vec<SortItem>
}

impl SortOrder {
    /// Parse a whole sort string, failing on the first invalid entry.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidSort`] naming the offending entry.
    pub fn parse(sort: &str) -> QueryResult<Self> {
        let items = entries(sort)
            .map(SortItem::parse)
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Self {
            items
        })
    }

    /// Parse a sort string, dropping invalid entries with a warning.
    pub fn parse_lenient(sort: &str) -> Self {
        let items = entries(sort)
            .filter_map(|entry| match SortItem::parse(entry) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(%err, "dropping sort entry");
                    None
                }
            })
            .collect();
        Self {
            items
        }
    }

    /// Render as ` ORDER BY ...`, or an empty string.
    pub fn as_sql(&self, naming: &NamingConfig) -> String {
        if self.items.is_empty() {
            return String::new();
        }
        let columns = self
            .items
            .iter()
            .map(|item| item.render(naming))
            .collect::<Vec<_>>();
        format!(" ORDER BY {}", columns.join(", "))
    }
}

fn entries(sort: &str) -> impl Iterator<Item = &str> {
    sort.split(';').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Paging and sort metadata embedded in a query type.
///
/// Never contributes to the WHERE clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PageQuery {
    /// One-based page number.
    pub page_number: Option<i64>,

    /// Rows per page.
    pub page_size: Option<i64>,

    /// Sort specification such as `name;id,desc`.
    pub sort: Option<String>
}

impl PageQuery {
    /// Create for a page number and size.
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: Some(page_number),
            page_size:   Some(page_size),
            sort:        None
        }
    }

    /// Set the sort specification.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Check whether a page number or size was given.
    pub const fn needs_paging(&self) -> bool {
        self.page_number.is_some() || self.page_size.is_some()
    }

    /// Resolved limit and offset, when paging applies.
    pub fn pagination(&self) -> Option<Pagination> {
        self.needs_paging().then(|| {
            Pagination::page(
                self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
                self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
            )
        })
    }
}

/// Build ` ORDER BY ...` from a sort string; invalid entries are dropped.
///
/// # Example
///
/// ```rust
/// use query_core::{NamingConfig, paging::build_order_by};
///
/// let naming = NamingConfig::default();
/// assert_eq!(
///     build_order_by("createTime,desc;id", &naming),
///     " ORDER BY create_time DESC, id"
/// );
/// ```
pub fn build_order_by(sort: &str, naming: &NamingConfig) -> String {
    SortOrder::parse_lenient(sort).as_sql(naming)
}

/// Build ` LIMIT n OFFSET m`, or an empty string when paging does not
/// apply.
pub fn build_paging(page: &PageQuery) -> String {
    page.pagination()
        .map(|p| p.as_sql())
        .unwrap_or_default()
}
