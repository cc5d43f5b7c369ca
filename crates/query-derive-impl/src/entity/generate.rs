// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `Columns` and `Entity` implementation generation.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{EntityDef, EntityFieldDef, FieldRole};

/// Generate `impl Columns`, plus `impl Entity` for non-embeddable structs.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let columns = columns_impl(entity);
    let identity = entity_impl(entity);

    quote! {
        #columns
        #identity
    }
}

fn columns_impl(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let name = ident.to_string();
    let table = match &entity.table {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None }
    };
    let fields = entity.fields.iter().map(descriptor_field);
    let writes = entity.fields.iter().map(write_value);

    quote! {
        impl ::query_core::Columns for #ident {
            fn descriptor() -> &'static ::query_core::EntityDescriptor {
                static DESCRIPTOR: ::query_core::EntityDescriptor = ::query_core::EntityDescriptor {
                    type_name: concat!(module_path!(), "::", #name),
                    name: #name,
                    table: #table,
                    fields: &[#(#fields),*]
                };
                &DESCRIPTOR
            }

            fn write_values(&self, out: &mut ::std::vec::Vec<::query_core::Value>) {
                #(#writes)*
            }
        }
    }
}

fn descriptor_field(field: &EntityFieldDef) -> TokenStream {
    let name = field.ident.to_string();
    let column = match &field.column {
        Some(column) => quote! { ::core::option::Option::Some(#column) },
        None => quote! { ::core::option::Option::None }
    };
    let kind = match field.role {
        FieldRole::Column => quote! { ::query_core::ColumnKind::Column },
        FieldRole::Identity => quote! { ::query_core::ColumnKind::Identity },
        FieldRole::Embedded => {
            let ty = &field.ty;
            quote! {
                ::query_core::ColumnKind::Embedded(<#ty as ::query_core::Columns>::descriptor)
            }
        }
    };

    quote! {
        ::query_core::EntityField {
            name: #name,
            column: #column,
            kind: #kind
        }
    }
}

fn write_value(field: &EntityFieldDef) -> TokenStream {
    let ident = &field.ident;
    match field.role {
        FieldRole::Embedded => quote! {
            ::query_core::Columns::write_values(&self.#ident, out);
        },
        FieldRole::Column | FieldRole::Identity => quote! {
            out.push(::query_core::ToValue::to_value(&self.#ident));
        }
    }
}

fn entity_impl(entity: &EntityDef) -> TokenStream {
    let Some(id) = entity.id_field() else {
        return TokenStream::new();
    };
    let ident = &entity.ident;
    let id_ident = &id.ident;
    let id_ty = &id.ty;

    quote! {
        impl ::query_core::Entity for #ident {
            type Id = #id_ty;

            fn id(&self) -> &Self::Id {
                &self.#id_ident
            }

            fn set_id(&mut self, id: Self::Id) {
                self.#id_ident = id;
            }
        }
    }
}
