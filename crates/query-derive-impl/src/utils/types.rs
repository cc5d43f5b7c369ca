// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Syntactic type inspection.
//!
//! Proc-macros see tokens, not resolved types, so every check here looks at
//! the last path segment only. `std::option::Option<T>` and `Option<T>` are
//! treated alike; a type alias hiding an `Option` is not seen through. The
//! `#[query(scalar)]` and `#[query(nested)]` attributes exist for the cases
//! these heuristics get wrong.

use syn::{GenericArgument, PathArguments, Type};

/// Type names rendered as a single bound value.
///
/// Must stay in step with the `ToValue` impls in `query_core::value`; a name
/// listed here without an impl turns into a type error in generated code.
const SCALARS: &[&str] = &[
    "bool",
    "char",
    "i8",
    "i16",
    "i32",
    "i64",
    "isize",
    "u8",
    "u16",
    "u32",
    "u64",
    "usize",
    "f32",
    "f64",
    "String",
    "str",
    "Uuid",
    "DateTime",
    "NaiveDate",
    "NaiveDateTime",
    "NaiveTime",
    "Value"
];

/// Last identifier of a path type, e.g. `Option` for `std::option::Option<T>`.
pub fn last_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        Type::Reference(reference) => last_ident(&reference.elem),
        Type::Group(group) => last_ident(&group.elem),
        Type::Paren(paren) => last_ident(&paren.elem),
        _ => None
    }
}

/// Single generic argument of `Wrapper<T>` when the last segment is
/// `wrapper`.
fn wrapped<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == wrapper
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

/// Inner type of `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    wrapped(ty, "Option")
}

/// Inner type of `Vec<T>`.
pub fn vec_inner(ty: &Type) -> Option<&Type> {
    wrapped(ty, "Vec")
}

/// Type with any `Box` layers removed.
pub fn unbox(ty: &Type) -> &Type {
    match wrapped(ty, "Box") {
        Some(inner) => unbox(inner),
        None => ty
    }
}

/// Check if the type is `bool`.
pub fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.path.is_ident("bool"))
}

/// Check if the type renders as one bound value.
///
/// `Vec<u8>` counts as a scalar (a byte string); every other `Vec` does not.
pub fn is_scalar(ty: &Type) -> bool {
    if let Some(inner) = vec_inner(ty) {
        return last_ident(inner).as_deref() == Some("u8");
    }
    if let Some(inner) = option_inner(ty) {
        return is_scalar(inner);
    }
    let ty = unbox(ty);
    last_ident(ty).is_some_and(|name| SCALARS.contains(&name.as_str()))
}

/// Check if the type is the paging metadata type.
pub fn is_page_query(ty: &Type) -> bool {
    last_ident(ty).as_deref() == Some("PageQuery")
        || option_inner(ty).is_some_and(|inner| last_ident(inner).as_deref() == Some("PageQuery"))
}

/// Check if the type is `PathQuery`.
pub fn is_path_query(ty: &Type) -> bool {
    last_ident(ty).as_deref() == Some("PathQuery")
}
