// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL text assembly.
//!
//! All statement text passes through [`SqlBuilder`] and [`Conditions`], so the
//! number of `?` placeholders always equals the number of collected
//! arguments. Identifier quoting is not applied; a dialect layer can be added
//! here without touching the grammar.

use crate::value::Value;

/// SQL text and its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlAndArgs {
    /// SQL text with `?` placeholders.
    pub sql:  String,
    /// Arguments matching the placeholders left to right.
    pub args: Vec<Value>
}

impl SqlAndArgs {
    /// Create from parts.
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args
        }
    }

    /// Check whether no SQL was produced.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// The SQL prefixed with ` WHERE `, or an empty string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_core::{SqlAndArgs, Value};
    ///
    /// let cond = SqlAndArgs::new("id > ?", vec![Value::Int(5)]);
    /// assert_eq!(cond.where_clause(), " WHERE id > ?");
    /// assert_eq!(SqlAndArgs::default().where_clause(), "");
    /// ```
    pub fn where_clause(&self) -> String {
        if self.sql.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql)
        }
    }

    /// Split into text and arguments.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

/// Incremental statement builder.
#[derive(Debug, Default)]
pub struct SqlBuilder {
    sql:  String,
    args: Vec<Value>
}

impl SqlBuilder {
    /// Start with some text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql:  sql.into(),
            args: Vec::new()
        }
    }

    /// Append raw text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a `?` placeholder bound to `value`.
    pub fn push_arg(&mut self, value: Value) -> &mut Self {
        self.sql.push('?');
        self.args.push(value);
        self
    }

    /// Append `(?, ?, ...)` with one placeholder per value.
    pub fn push_group(&mut self, values: impl IntoIterator<Item = Value>) -> &mut Self {
        self.sql.push('(');
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_arg(value);
        }
        self.sql.push(')');
        self
    }

    /// Append a fragment with its arguments.
    pub fn push_fragment(&mut self, fragment: SqlAndArgs) -> &mut Self {
        self.sql.push_str(&fragment.sql);
        self.args.extend(fragment.args);
        self
    }

    /// Append ` WHERE <fragment>` when the fragment is not empty.
    pub fn push_where(&mut self, fragment: SqlAndArgs) -> &mut Self {
        if !fragment.is_empty() {
            self.sql.push_str(" WHERE ");
            self.push_fragment(fragment);
        }
        self
    }

    /// Finish building.
    pub fn build(self) -> SqlAndArgs {
        SqlAndArgs {
            sql:  self.sql,
            args: self.args
        }
    }
}

/// An ordered list of conditions and their arguments.
#[derive(Debug, Default)]
pub struct Conditions {
    parts: Vec<String>,
    args:  Vec<Value>
}

impl Conditions {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one condition.
    pub fn push(&mut self, sql: String, args: Vec<Value>) {
        if sql.is_empty() {
            return;
        }
        self.parts.push(sql);
        self.args.extend(args);
    }

    /// Add a compiled fragment.
    pub fn push_fragment(&mut self, fragment: SqlAndArgs) {
        self.push(fragment.sql, fragment.args);
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check whether no condition was added.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Join with `separator`, unparenthesised.
    pub fn join(self, separator: &str) -> SqlAndArgs {
        SqlAndArgs {
            sql:  self.parts.join(separator),
            args: self.args
        }
    }

    /// Join with `separator`, parenthesised when more than one condition
    /// is present.
    pub fn group(self, separator: &str) -> SqlAndArgs {
        let wrap = self.parts.len() > 1;
        let mut joined = self.join(separator);
        if wrap {
            joined.sql = format!("({})", joined.sql);
        }
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_tracks_args() {
        let mut builder = SqlBuilder::new("SELECT id FROM t_user");
        builder.push_where(SqlAndArgs::new("id = ?", vec![Value::Int(1)]));
        builder.push(" AND name IN ").push_group(vec![Value::from("a"), Value::from("b")]);
        let out = builder.build();
        assert_eq!(out.sql, "SELECT id FROM t_user WHERE id = ? AND name IN (?, ?)");
        assert_eq!(out.args.len(), 3);
    }

    #[test]
    fn empty_where_is_omitted() {
        let mut builder = SqlBuilder::new("SELECT id FROM t_user");
        builder.push_where(SqlAndArgs::default());
        assert_eq!(builder.build().sql, "SELECT id FROM t_user");
    }

    #[test]
    fn group_parenthesises_many() {
        let mut conds = Conditions::new();
        conds.push("a = ?".into(), vec![Value::Int(1)]);
        conds.push("b = ?".into(), vec![Value::Int(2)]);
        let out = conds.group(" OR ");
        assert_eq!(out.sql, "(a = ? OR b = ?)");
        assert_eq!(out.args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn group_keeps_single_bare() {
        let mut conds = Conditions::new();
        conds.push("a = ?".into(), vec![Value::Int(1)]);
        conds.push(String::new(), Vec::new());
        assert_eq!(conds.len(), 1);
        assert_eq!(conds.group(" OR ").sql, "a = ?");
    }

    #[test]
    fn empty_conditions() {
        let conds = Conditions::new();
        assert!(conds.is_empty());
        assert!(conds.join(" AND ").is_empty());
    }
}
