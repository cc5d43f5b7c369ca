// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `QueryFields` implementation generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::query_core::QueryFields for UserQuery {
//!     fn query_schema(&self) -> &'static ::query_core::QuerySchema {
//!         static SCHEMA: ::query_core::QuerySchema = ::query_core::QuerySchema {
//!             type_name: concat!(module_path!(), "::", stringify!(UserQuery)),
//!             fields: &[
//!                 ::query_core::QueryField::new("id_gt", ::query_core::FieldKind::Scalar),
//!                 // ...
//!             ]
//!         };
//!         &SCHEMA
//!     }
//!
//!     fn field_value(&self, index: usize) -> ::query_core::FieldValue<'_> {
//!         match index {
//!             0usize => ::query_core::field::scalar(&self.id_gt),
//!             _ => ::query_core::FieldValue::Absent
//!         }
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{Connective, GroupShape, KindDef, QueryDef, QueryFieldDef, Reader};
use crate::utils::types::option_inner;

/// Generate the `QueryFields` impl.
pub fn generate(query: &QueryDef) -> TokenStream {
    let ident = &query.ident;
    let (impl_generics, ty_generics, where_clause) = query.generics.split_for_impl();

    let entries = query.fields.iter().map(schema_entry);
    let arms = query
        .fields
        .iter()
        .enumerate()
        .filter_map(|(index, field)| reader_arm(index, field));
    let page = page_accessor(query);

    quote! {
        impl #impl_generics ::query_core::QueryFields for #ident #ty_generics #where_clause {
            fn query_schema(&self) -> &'static ::query_core::QuerySchema {
                static SCHEMA: ::query_core::QuerySchema = ::query_core::QuerySchema {
                    type_name: concat!(module_path!(), "::", stringify!(#ident)),
                    fields: &[#(#entries),*]
                };
                &SCHEMA
            }

            fn field_value(&self, index: usize) -> ::query_core::FieldValue<'_> {
                match index {
                    #(#arms,)*
                    _ => ::query_core::FieldValue::Absent
                }
            }

            #page
        }
    }
}

fn schema_entry(field: &QueryFieldDef) -> TokenStream {
    let name = field.ident.to_string();
    let kind = kind_tokens(&field.kind);
    match &field.column {
        Some(column) => quote! {
            ::query_core::QueryField::new(#name, #kind).with_column(#column)
        },
        None => quote! { ::query_core::QueryField::new(#name, #kind) }
    }
}

fn kind_tokens(kind: &KindDef) -> TokenStream {
    match kind {
        KindDef::Scalar => quote! { ::query_core::FieldKind::Scalar },
        KindDef::Group { connective, shape } => {
            let connective = match connective {
                Connective::Or => quote! { ::query_core::Connective::Or },
                Connective::And => quote! { ::query_core::Connective::And }
            };
            let shape = match shape {
                GroupShape::Nested => quote! { ::query_core::GroupShape::Nested },
                GroupShape::NestedList => quote! { ::query_core::GroupShape::NestedList },
                GroupShape::ScalarList => quote! { ::query_core::GroupShape::ScalarList }
            };
            quote! {
                ::query_core::FieldKind::Group {
                    connective: #connective,
                    shape: #shape
                }
            }
        }
        KindDef::Path(raw) => quote! { ::query_core::FieldKind::Path(#raw) },
        KindDef::Subquery(raw) => quote! { ::query_core::FieldKind::Subquery(#raw) },
        KindDef::Condition(template) => quote! { ::query_core::FieldKind::Condition(#template) },
        KindDef::Flatten => quote! { ::query_core::FieldKind::Flatten },
        KindDef::Page => quote! { ::query_core::FieldKind::Page },
        KindDef::Unsupported(reason) => quote! { ::query_core::FieldKind::Unsupported(#reason) }
    }
}

fn reader_arm(index: usize, field: &QueryFieldDef) -> Option<TokenStream> {
    let ident = &field.ident;
    let read = match field.reader {
        Reader::Scalar => quote! { ::query_core::field::scalar(&self.#ident) },
        Reader::List => quote! { ::query_core::field::list(&self.#ident) },
        Reader::Flag => quote! { ::query_core::field::flag(self.#ident) },
        Reader::Nested => quote! { ::query_core::field::nested(&self.#ident) },
        Reader::Embedded => quote! { ::query_core::field::embedded(&self.#ident) },
        Reader::NestedList => quote! { ::query_core::field::nested_list(&self.#ident) },
        Reader::Path => quote! { ::query_core::field::path(&self.#ident) },
        Reader::None => return None
    };
    Some(quote! { #index => #read })
}

fn page_accessor(query: &QueryDef) -> TokenStream {
    let Some(field) = query.page_field() else {
        return TokenStream::new();
    };
    let ident = &field.ident;
    let body = if option_inner(&field.ty).is_some() {
        quote! { self.#ident.as_ref() }
    } else {
        quote! { ::core::option::Option::Some(&self.#ident) }
    };
    quote! {
        fn page(&self) -> ::core::option::Option<&::query_core::PageQuery> {
            #body
        }
    }
}
