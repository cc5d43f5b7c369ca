// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Query struct parsing.
//!
//! Every named field is classified once, at expansion time, into the kind
//! the runtime registry compiles and the reader that turns the field into a
//! `FieldValue`. Classification follows this order:
//!
//! | Step | Trigger | Kind |
//! |------|---------|------|
//! | 1 | `#[query(skip)]` | omitted |
//! | 2 | `#[query(page)]` or type `PageQuery` | `Page` |
//! | 3 | `#[query(flatten)]` | `Flatten` |
//! | 4 | `#[query(path = "..")]` | `Path` |
//! | 5 | `#[query(subquery = "..")]` | `Subquery` |
//! | 6 | `#[query(condition = "..")]` | `Condition` |
//! | 7 | name ends with `_or` / `_and` | `Group` |
//! | 8 | `bool`, `Option<scalar>`, `Option<Vec<scalar>>` | `Scalar` |
//! | 9 | anything else | `Unsupported` |

use darling::FromDeriveInput;
use syn::{DeriveInput, Field, Generics, Ident, LitStr, Type, meta::ParseNestedMeta};

use crate::utils::types::{
    is_bool, is_page_query, is_path_query, is_scalar, option_inner, vec_inner
};

/// Struct-level attributes.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(query), supports(struct_named), allow_unknown_fields)]
pub struct QueryAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Struct generics.
    pub generics: Generics
}

/// Joining connective of a group field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    Or,
    And
}

impl Connective {
    /// Connective named by a field's trailing word.
    pub fn of(name: &str) -> Option<Self> {
        if name.ends_with("_or") {
            Some(Self::Or)
        } else if name.ends_with("_and") {
            Some(Self::And)
        } else {
            None
        }
    }
}

/// Value shape of a group field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    Nested,
    NestedList,
    ScalarList
}

/// Field kind, mirrored into `::query_core::FieldKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindDef {
    Scalar,
    Group {
        connective: Connective,
        shape:      GroupShape
    },
    Path(String),
    Subquery(String),
    Condition(String),
    Flatten,
    Page,
    Unsupported(&'static str)
}

/// Helper in `::query_core::field` used to read the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reader {
    Scalar,
    List,
    Flag,
    Nested,
    Embedded,
    NestedList,
    Path,
    None
}

/// Parsed `#[query(...)]` field attributes.
#[derive(Debug, Default)]
struct FieldAttrs {
    skip:      bool,
    page:      bool,
    flatten:   bool,
    scalar:    bool,
    nested:    bool,
    path:      Option<String>,
    subquery:  Option<String>,
    condition: Option<String>,
    column:    Option<String>
}

impl FieldAttrs {
    fn parse(field: &Field) -> darling::Result<Self> {
        let mut attrs = Self::default();
        let mut errors = darling::Error::accumulator();

        for attr in &field.attrs {
            if !attr.path().is_ident("query") {
                continue;
            }
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                } else if meta.path.is_ident("page") {
                    attrs.page = true;
                } else if meta.path.is_ident("flatten") {
                    attrs.flatten = true;
                } else if meta.path.is_ident("scalar") {
                    attrs.scalar = true;
                } else if meta.path.is_ident("nested") {
                    attrs.nested = true;
                } else if meta.path.is_ident("path") {
                    attrs.path = Some(string_value(&meta)?);
                } else if meta.path.is_ident("subquery") {
                    attrs.subquery = Some(string_value(&meta)?);
                } else if meta.path.is_ident("condition") {
                    attrs.condition = Some(string_value(&meta)?);
                } else if meta.path.is_ident("column") {
                    attrs.column = Some(string_value(&meta)?);
                } else {
                    return Err(meta.error("unknown query attribute"));
                }
                Ok(())
            });
            if let Err(err) = result {
                errors.push(err.into());
            }
        }

        let special = [
            attrs.page,
            attrs.flatten,
            attrs.path.is_some(),
            attrs.subquery.is_some(),
            attrs.condition.is_some()
        ];
        if special.iter().filter(|set| **set).count() > 1 {
            errors.push(
                darling::Error::custom(
                    "page, flatten, path, subquery and condition are mutually exclusive"
                )
                .with_span(field)
            );
        }
        if attrs.scalar && attrs.nested {
            errors.push(
                darling::Error::custom("scalar and nested are mutually exclusive").with_span(field)
            );
        }

        errors.finish_with(attrs)
    }

    /// Scalar heuristic with the explicit overrides applied.
    fn treats_as_scalar(&self, ty: &Type) -> bool {
        self.scalar || (!self.nested && is_scalar(ty))
    }
}

fn string_value(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    let _: syn::Token![=] = meta.input.parse()?;
    let value: LitStr = meta.input.parse()?;
    Ok(value.value())
}

/// One classified query field.
#[derive(Debug)]
pub struct QueryFieldDef {
    /// Field identifier.
    pub ident:  Ident,
    /// Field type.
    pub ty:     Type,
    /// Explicit base column.
    pub column: Option<String>,
    /// Kind emitted into the schema.
    pub kind:   KindDef,
    /// Reader emitted into `field_value`.
    pub reader: Reader
}

impl QueryFieldDef {
    /// Parse and classify a field. `Ok(None)` for skipped fields.
    pub fn from_field(field: &Field) -> darling::Result<Option<Self>> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Query fields must be named").with_span(field)
        })?;
        let attrs = FieldAttrs::parse(field)?;
        if attrs.skip {
            return Ok(None);
        }

        let name = ident.to_string();
        let (kind, reader) = classify(&name, &field.ty, &attrs);

        Ok(Some(Self {
            ident,
            ty: field.ty.clone(),
            column: attrs.column,
            kind,
            reader
        }))
    }

    /// Check if the field carries paging metadata.
    pub fn is_page(&self) -> bool {
        self.kind == KindDef::Page
    }
}

fn classify(name: &str, ty: &Type, attrs: &FieldAttrs) -> (KindDef, Reader) {
    if attrs.page || is_page_query(ty) {
        return (KindDef::Page, Reader::None);
    }

    if attrs.flatten {
        return match option_inner(ty) {
            Some(_) => (KindDef::Flatten, Reader::Nested),
            None => (KindDef::Flatten, Reader::Embedded)
        };
    }

    if let Some(path) = &attrs.path {
        let reader = match option_inner(ty) {
            Some(inner) if is_path_query(inner) => Reader::Path,
            Some(_) => Reader::Nested,
            None if is_bool(ty) => Reader::Flag,
            None => {
                return (
                    KindDef::Unsupported(
                        "path fields must be bool, Option<PathQuery> or Option<query>"
                    ),
                    Reader::None
                );
            }
        };
        return (KindDef::Path(path.clone()), reader);
    }

    if let Some(subquery) = &attrs.subquery {
        let reader = match option_inner(ty) {
            Some(inner) if attrs.treats_as_scalar(inner) => Reader::Scalar,
            Some(_) => Reader::Nested,
            None if is_bool(ty) => Reader::Flag,
            None => {
                return (
                    KindDef::Unsupported("subquery fields must be bool or Option<query>"),
                    Reader::None
                );
            }
        };
        return (KindDef::Subquery(subquery.clone()), reader);
    }

    if let Some(condition) = &attrs.condition {
        let reader = match option_inner(ty) {
            Some(inner) if attrs.treats_as_scalar(inner) => Reader::Scalar,
            None if is_bool(ty) => Reader::Flag,
            _ => {
                return (
                    KindDef::Unsupported("condition fields must be bool or Option<scalar>"),
                    Reader::None
                );
            }
        };
        return (KindDef::Condition(condition.clone()), reader);
    }

    if let Some(connective) = Connective::of(name) {
        let Some(inner) = option_inner(ty) else {
            return (
                KindDef::Unsupported("group fields must be Option<query> or Option<Vec<_>>"),
                Reader::None
            );
        };
        let (shape, reader) = match vec_inner(inner) {
            Some(element) if attrs.treats_as_scalar(element) => {
                (GroupShape::ScalarList, Reader::List)
            }
            Some(_) => (GroupShape::NestedList, Reader::NestedList),
            None => (GroupShape::Nested, Reader::Nested)
        };
        return (KindDef::Group { connective, shape }, reader);
    }

    if is_bool(ty) {
        return (KindDef::Scalar, Reader::Flag);
    }

    if let Some(inner) = option_inner(ty) {
        if attrs.treats_as_scalar(inner) {
            return (KindDef::Scalar, Reader::Scalar);
        }
        if let Some(element) = vec_inner(inner)
            && attrs.treats_as_scalar(element)
        {
            return (KindDef::Scalar, Reader::List);
        }
    }

    (
        KindDef::Unsupported("expected bool, Option<scalar> or Option<Vec<scalar>>"),
        Reader::None
    )
}

/// Complete query struct definition.
#[derive(Debug)]
pub struct QueryDef {
    /// Struct identifier.
    pub ident:    Ident,
    /// Struct generics.
    pub generics: Generics,
    /// Classified fields, skipped ones removed.
    pub fields:   Vec<QueryFieldDef>
}

impl QueryDef {
    /// Parse a query struct from derive input.
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = QueryAttrs::from_derive_input(input)?;

        let syn::Data::Struct(data) = &input.data else {
            return Err(
                darling::Error::custom("Query can only be derived for structs")
                    .with_span(&input.ident)
            );
        };
        let syn::Fields::Named(named) = &data.fields else {
            return Err(
                darling::Error::custom("Query requires named fields").with_span(&input.ident)
            );
        };

        let mut errors = darling::Error::accumulator();
        let fields = named
            .named
            .iter()
            .filter_map(|field| errors.handle(QueryFieldDef::from_field(field)))
            .flatten()
            .collect::<Vec<_>>();

        if fields.iter().filter(|f| f.is_page()).count() > 1 {
            errors.push(
                darling::Error::custom("Query allows at most one paging field")
                    .with_span(&input.ident)
            );
        }

        errors.finish_with(Self {
            ident: attrs.ident,
            generics: attrs.generics,
            fields
        })
    }

    /// The paging field, if any.
    pub fn page_field(&self) -> Option<&QueryFieldDef> {
        self.fields.iter().find(|f| f.is_page())
    }
}
