// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse.rs     → EntityDef, EntityFieldDef
//! └── generate.rs  → impl Columns, impl Entity
//! ```
//!
//! # Generated Code
//!
//! For an entity like:
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! pub struct UserEntity {
//!     #[id]
//!     pub id: i64,
//!     pub user_name: String,
//!     #[embed]
//!     pub audit: Audit,
//! }
//! ```
//!
//! | Item | Purpose |
//! |------|---------|
//! | `impl Columns for UserEntity` | Static descriptor, values in column order |
//! | `impl Entity for UserEntity` | Typed identity accessor and mutator |
//!
//! Embeddable structs (`#[entity(embeddable)]`) get `Columns` only.

mod generate;
mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::EntityDef;

/// Main entry point for the Entity derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => generate::generate(&entity).into(),
        Err(err) => err.write_errors().into()
    }
}
