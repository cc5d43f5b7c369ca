// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Query derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! query.rs (orchestrator)
//! │
//! ├── parse.rs     → QueryDef, field classification
//! └── generate.rs  → impl ::query_core::QueryFields
//! ```
//!
//! The generated impl carries a static schema table, so the runtime never
//! inspects the struct itself. Field order in the table is declaration
//! order and decides the order of conditions in the WHERE clause.

mod generate;
mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::QueryDef;

/// Main entry point for the Query derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match QueryDef::from_derive_input(&input) {
        Ok(query) => generate::generate(&query).into(),
        Err(err) => err.write_errors().into()
    }
}
