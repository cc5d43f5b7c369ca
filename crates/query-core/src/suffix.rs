// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Suffix operator grammar.
//!
//! A query field name such as `id_gt` or `username_not_in` is split into a
//! base column and an [`Operator`]. Matching is anchored at the end of the
//! name and prefers the longest suffix, so `name_not_in` resolves to
//! `NOT IN` rather than `name_not` with `IN`.
//!
//! A name with no recognised suffix is an equality test on the whole name.
//! This fallback is silent: `is_valid` is `is_valid = ?`, and so is a typo
//! such as `age_gtt`.
//!
//! PascalCase input (`IdGt`) is accepted and normalised to snake case first.

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;

use crate::{naming::NamingConfig, operator::Operator};

/// Snake-case suffixes, longest first within each shared prefix.
const SUFFIXES: [(&str, Operator); 19] = [
    ("not_contain", Operator::NotContain),
    ("not_start", Operator::NotStart),
    ("not_like", Operator::NotLike),
    ("not_end", Operator::NotEnd),
    ("not_in", Operator::NotIn),
    ("not", Operator::Not),
    ("contain", Operator::Contain),
    ("start", Operator::Start),
    ("like", Operator::Like),
    ("null", Operator::Null),
    ("end", Operator::End),
    ("in", Operator::In),
    ("gt", Operator::Gt),
    ("ge", Operator::Ge),
    ("lt", Operator::Lt),
    ("le", Operator::Le),
    ("ne", Operator::Ne),
    ("eq", Operator::Eq),
    ("rx", Operator::Rx)
];

static SUFFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([a-z0-9_]+?)_({})$", alternation()))
        .expect("fail to create a regex for field suffixes")
});

static QUALIFIED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([a-z0-9_]+?)_({})(?:_[a-z0-9_]+)?$", alternation()))
        .expect("fail to create a regex for qualified field suffixes")
});

fn alternation() -> String {
    SUFFIXES
        .iter()
        .map(|(token, _)| *token)
        .collect::<Vec<_>>()
        .join("|")
}

/// Operator selected by a snake-case suffix token.
pub fn operator_for(token: &str) -> Option<Operator> {
    SUFFIXES
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
}

/// Snake-case suffix token of an operator.
pub fn token_for(operator: Operator) -> &'static str {
    SUFFIXES
        .iter()
        .find(|(_, op)| *op == operator)
        .map_or("eq", |(token, _)| *token)
}

/// Result of splitting a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMatch {
    /// Column name in the configured column case.
    pub column:   String,
    /// Operator selected by the suffix, [`Operator::Eq`] when none matched.
    pub operator: Operator
}

/// Split a field name into `(column, operator)`.
///
/// # Example
///
/// ```rust
/// use query_core::{NamingConfig, Operator, suffix::match_suffix};
///
/// let naming = NamingConfig::default();
/// let m = match_suffix("username_not_in", &naming);
/// assert_eq!(m.column, "username");
/// assert_eq!(m.operator, Operator::NotIn);
///
/// let m = match_suffix("memo", &naming);
/// assert_eq!(m.column, "memo");
/// assert_eq!(m.operator, Operator::Eq);
/// ```
pub fn match_suffix(field: &str, naming: &NamingConfig) -> SuffixMatch {
    split(&SUFFIX_PATTERN, field, naming)
}

/// Split a field name that may carry a trailing qualifier word after its
/// operator, as subquery fields do: `score_gt_avg` → `score`, `>`.
pub fn match_qualified(field: &str, naming: &NamingConfig) -> SuffixMatch {
    split(&QUALIFIED_PATTERN, field, naming)
}

fn split(pattern: &Regex, field: &str, naming: &NamingConfig) -> SuffixMatch {
    let name = normalize(field);
    let parts = pattern.captures(&name).and_then(|caps| {
        let base = caps.get(1)?.as_str();
        let operator = operator_for(caps.get(2)?.as_str())?;
        Some((base.to_owned(), operator))
    });
    match parts {
        Some((base, operator)) => SuffixMatch {
            column: naming.column(&base),
            operator
        },
        None => SuffixMatch {
            column:   naming.column(&name),
            operator: Operator::Eq
        }
    }
}

fn normalize(field: &str) -> String {
    if field.chars().any(char::is_uppercase) {
        field.to_case(Case::Snake)
    } else {
        field.to_owned()
    }
}
