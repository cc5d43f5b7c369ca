// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static schema description of query types.
//!
//! `#[derive(Query)]` emits one [`QuerySchema`] per type: an ordered table
//! of fields with their [`FieldKind`], decided at compile time. At runtime
//! the engine reads field values through [`QueryFields::field_value`] and
//! never inspects types.
//!
//! # Field kinds
//!
//! | Kind | Declared as | Value |
//! |------|-------------|-------|
//! | [`FieldKind::Scalar`] | `id_gt: Option<i64>`, `deleted: bool` | [`FieldValue::Scalar`] / [`FieldValue::List`] |
//! | [`FieldKind::Group`] | `name_or: Option<NameQuery>` | [`FieldValue::Query`] / [`FieldValue::Queries`] / [`FieldValue::List`] |
//! | [`FieldKind::Path`] | `#[query(path = "user,role")]` | [`FieldValue::Query`] / [`FieldValue::Path`] |
//! | [`FieldKind::Subquery`] | `#[query(subquery = "select:..,from:..")]` | [`FieldValue::Query`] |
//! | [`FieldKind::Condition`] | `#[query(condition = "...")]` | [`FieldValue::Scalar`] |
//! | [`FieldKind::Flatten`] | `#[query(flatten)]` | [`FieldValue::Query`] |
//! | [`FieldKind::Page`] | `page: PageQuery` | never present |

use crate::{paging::PageQuery, path::PathQuery, value::{ToValue, Value}};

/// Boolean connective joining the members of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// Members joined with `OR`.
    Or,
    /// Members joined with `AND`.
    And
}

impl Connective {
    /// Separator placed between members.
    pub const fn separator(&self) -> &'static str {
        match self {
            Self::Or => " OR ",
            Self::And => " AND "
        }
    }

    /// Split a trailing `_or` / `_and` off a field name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_core::Connective;
    ///
    /// assert_eq!(Connective::split("name_or"), Some((Connective::Or, "name")));
    /// assert_eq!(Connective::split("score_in_and"), Some((Connective::And, "score_in")));
    /// assert_eq!(Connective::split("color"), None);
    /// ```
    pub fn split(field: &str) -> Option<(Self, &str)> {
        if let Some(base) = field.strip_suffix("_or") {
            return Some((Self::Or, base));
        }
        if let Some(base) = field.strip_suffix("_and") {
            return Some((Self::And, base));
        }
        if let Some(base) = field.strip_suffix("Or")
            && !base.is_empty()
        {
            return Some((Self::Or, base));
        }
        field
            .strip_suffix("And")
            .filter(|base| !base.is_empty())
            .map(|base| (Self::And, base))
    }
}

/// Shape of a group field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupShape {
    /// One nested query whose own conditions are joined.
    Nested,
    /// A list of nested queries, each compiled to an AND predicate.
    NestedList,
    /// A list of scalars, one condition per element.
    ScalarList
}

/// How a query field contributes to the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Suffix-operator condition.
    Scalar,
    /// OR/AND group.
    Group {
        /// Joining connective.
        connective: Connective,
        /// Value shape.
        shape:      GroupShape
    },
    /// Relation path such as `user,role`.
    Path(&'static str),
    /// Subquery annotation `select:<expr>,from:<entity>`.
    Subquery(&'static str),
    /// Literal SQL template with `?` placeholders.
    Condition(&'static str),
    /// Embedded query whose fields join the parent's list.
    Flatten,
    /// Paging and sort metadata.
    Page,
    /// A shape the engine cannot compile.
    Unsupported(&'static str)
}

/// One field of a query type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryField {
    /// Rust field name.
    pub name:   &'static str,
    /// Explicit base column overriding the one derived from the name.
    pub column: Option<&'static str>,
    /// Field kind.
    pub kind:   FieldKind
}

impl QueryField {
    /// Create a field without a column override.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column: None,
            kind
        }
    }

    /// Set an explicit base column.
    pub const fn with_column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }
}

/// Field table of a query type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySchema {
    /// Fully qualified type name; the cache key.
    pub type_name: &'static str,
    /// Fields in declaration order.
    pub fields:    &'static [QueryField]
}

/// Runtime value of one query field.
pub enum FieldValue<'a> {
    /// The field is unset and contributes nothing.
    Absent,
    /// A scalar value.
    Scalar(Value),
    /// A collection of scalars.
    List(Vec<Value>),
    /// One nested query.
    Query(&'a dyn QueryFields),
    /// Several nested queries.
    Queries(Vec<&'a dyn QueryFields>),
    /// Per-hop filters for a relation path.
    Path(&'a PathQuery)
}

impl FieldValue<'_> {
    /// Check whether the field is unset.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A query value the predicate compiler can read.
///
/// Implemented by `#[derive(Query)]`.
pub trait QueryFields {
    /// The static field table.
    fn query_schema(&self) -> &'static QuerySchema;

    /// Value of the field at `index` in [`QuerySchema::fields`].
    fn field_value(&self, index: usize) -> FieldValue<'_>;

    /// Paging and sort metadata, if the type carries any.
    fn page(&self) -> Option<&PageQuery> {
        None
    }
}

impl<T: QueryFields + ?Sized> QueryFields for Box<T> {
    fn query_schema(&self) -> &'static QuerySchema {
        (**self).query_schema()
    }

    fn field_value(&self, index: usize) -> FieldValue<'_> {
        (**self).field_value(index)
    }

    fn page(&self) -> Option<&PageQuery> {
        (**self).page()
    }
}

impl<T: QueryFields + ?Sized> QueryFields for &T {
    fn query_schema(&self) -> &'static QuerySchema {
        (**self).query_schema()
    }

    fn field_value(&self, index: usize) -> FieldValue<'_> {
        (**self).field_value(index)
    }

    fn page(&self) -> Option<&PageQuery> {
        (**self).page()
    }
}

/// Field readers used by generated [`QueryFields::field_value`] bodies.
pub mod field {
    use super::*;

    /// An optional scalar.
    pub fn scalar<T: ToValue>(value: &Option<T>) -> FieldValue<'_> {
        value
            .as_ref()
            .map_or(FieldValue::Absent, |v| FieldValue::Scalar(v.to_value()))
    }

    /// An optional collection of scalars.
    pub fn list<T: ToValue>(value: &Option<Vec<T>>) -> FieldValue<'_> {
        value.as_ref().map_or(FieldValue::Absent, |items| {
            FieldValue::List(items.iter().map(ToValue::to_value).collect())
        })
    }

    /// A boolean flag, present only when set.
    pub fn flag(value: bool) -> FieldValue<'static> {
        if value {
            FieldValue::Scalar(Value::Bool(true))
        } else {
            FieldValue::Absent
        }
    }

    /// An optional nested query.
    pub fn nested<T: QueryFields>(value: &Option<T>) -> FieldValue<'_> {
        value
            .as_ref()
            .map_or(FieldValue::Absent, |q| FieldValue::Query(q))
    }

    /// A nested query that is always present.
    pub fn embedded<T: QueryFields>(value: &T) -> FieldValue<'_> {
        FieldValue::Query(value)
    }

    /// An optional list of nested queries.
    pub fn nested_list<T: QueryFields>(value: &Option<Vec<T>>) -> FieldValue<'_> {
        value.as_ref().map_or(FieldValue::Absent, |items| {
            FieldValue::Queries(items.iter().map(|q| q as &dyn QueryFields).collect())
        })
    }

    /// Optional per-hop path filters.
    pub fn path(value: &Option<PathQuery>) -> FieldValue<'_> {
        value.as_ref().map_or(FieldValue::Absent, FieldValue::Path)
    }
}
