// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity struct parsing.
//!
//! # Supported Attributes
//!
//! | Attribute | Level | Description |
//! |-----------|-------|-------------|
//! | `#[entity(table = "..")]` | struct | Explicit table name |
//! | `#[entity(embeddable)]` | struct | Columns only, no identity |
//! | `#[id]` | field | Identity column |
//! | `#[column(name = "..")]` | field | Explicit column name |
//! | `#[column(skip)]` | field | Not mapped to a column |
//! | `#[embed]` | field | Flatten an embeddable struct in place |

use darling::FromDeriveInput;
use syn::{DeriveInput, Field, Ident, LitStr, Meta, Type};

/// Entity-level attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named), allow_unknown_fields)]
pub struct EntityAttrs {
    /// Struct identifier (e.g., `UserEntity`).
    pub ident: Ident,

    /// Explicit table name. Derived from the type name when absent.
    #[darling(default)]
    pub table: Option<String>,

    /// Struct has no identity and is only embedded in other entities.
    #[darling(default)]
    pub embeddable: bool
}

/// Mapping of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Column,
    Identity,
    Embedded
}

/// One mapped entity field.
#[derive(Debug)]
pub struct EntityFieldDef {
    /// Field identifier.
    pub ident:  Ident,
    /// Field type.
    pub ty:     Type,
    /// Explicit column name from `#[column(name = "..")]`.
    pub column: Option<String>,
    /// Mapping.
    pub role:   FieldRole
}

impl EntityFieldDef {
    /// Parse a field. `Ok(None)` for `#[column(skip)]`.
    pub fn from_field(field: &Field) -> darling::Result<Option<Self>> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;

        let mut is_id = false;
        let mut is_embed = false;
        let mut skip = false;
        let mut column = None;

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                is_id = true;
            } else if attr.path().is_ident("embed") {
                is_embed = true;
            } else if attr.path().is_ident("column")
                && let Meta::List(meta_list) = &attr.meta
            {
                meta_list
                    .parse_nested_meta(|meta| {
                        if meta.path.is_ident("name") {
                            let _: syn::Token![=] = meta.input.parse()?;
                            let value: LitStr = meta.input.parse()?;
                            column = Some(value.value());
                        } else if meta.path.is_ident("skip") {
                            skip = true;
                        } else {
                            return Err(meta.error("expected `name = \"..\"` or `skip`"));
                        }
                        Ok(())
                    })
                    .map_err(darling::Error::from)?;
            }
        }

        if skip {
            return Ok(None);
        }

        let role = match (is_id, is_embed) {
            (true, true) => {
                return Err(darling::Error::custom("#[id] and #[embed] cannot be combined")
                    .with_span(field));
            }
            (true, false) => FieldRole::Identity,
            (false, true) => FieldRole::Embedded,
            (false, false) => FieldRole::Column
        };

        Ok(Some(Self {
            ident,
            ty: field.ty.clone(),
            column,
            role
        }))
    }

    /// Check if this is the identity field.
    pub fn is_id(&self) -> bool {
        self.role == FieldRole::Identity
    }
}

/// Complete entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier.
    pub ident:          Ident,
    /// Explicit table name.
    pub table:          Option<String>,
    /// Columns-only struct.
    pub embeddable:     bool,
    /// Mapped fields in declaration order.
    pub fields:         Vec<EntityFieldDef>,
    /// Index of the `#[id]` field in [`Self::fields`].
    pub id_field_index: Option<usize>
}

impl EntityDef {
    /// Parse an entity definition from derive input.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple or unit struct
    /// - Generic struct
    /// - Missing or repeated `#[id]` on a non-embeddable struct
    /// - `#[id]` on an embeddable struct
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        if !input.generics.params.is_empty() {
            return Err(darling::Error::custom("Entity cannot be derived for generic structs")
                .with_span(&input.generics));
        }

        let fields: Vec<EntityFieldDef> = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => named
                    .named
                    .iter()
                    .map(EntityFieldDef::from_field)
                    .collect::<darling::Result<Vec<_>>>()?
                    .into_iter()
                    .flatten()
                    .collect(),
                _ => {
                    return Err(darling::Error::custom("Entity requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Entity can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        let ids = fields.iter().filter(|f| f.is_id()).count();
        let id_field_index = if attrs.embeddable {
            if ids > 0 {
                return Err(darling::Error::custom(
                    "embeddable structs cannot declare an #[id] field"
                )
                .with_span(&input.ident));
            }
            None
        } else {
            if ids != 1 {
                return Err(darling::Error::custom(
                    "Entity must have exactly one field with #[id] attribute"
                )
                .with_span(&input.ident));
            }
            fields.iter().position(EntityFieldDef::is_id)
        };

        Ok(Self {
            ident: attrs.ident,
            table: attrs.table,
            embeddable: attrs.embeddable,
            fields,
            id_field_index
        })
    }

    /// The identity field of a non-embeddable entity.
    pub fn id_field(&self) -> Option<&EntityFieldDef> {
        self.id_field_index.and_then(|index| self.fields.get(index))
    }
}
