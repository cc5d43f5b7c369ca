// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Operator table.
//!
//! Maps a field-name suffix token to a SQL operator and the function that
//! renders a runtime value into a placeholder plus its arguments.
//!
//! | Token | Sign | Placeholder | Argument |
//! |-------|------|-------------|----------|
//! | *(none)*, `Eq` | `=` | `?` | value |
//! | `Not` | `!=` | `?` | value |
//! | `Ne` | `<>` | `?` | value |
//! | `Gt` / `Ge` / `Lt` / `Le` | `>` / `>=` / `<` / `<=` | `?` | value |
//! | `In` / `NotIn` | `IN` / `NOT IN` | `(?, ?, ...)` | each element |
//! | `Like`, `Contain` | `LIKE` | `?` | `%v%` |
//! | `Start` | `LIKE` | `?` | `v%` |
//! | `End` | `LIKE` | `?` | `%v` |
//! | `NotLike`, `NotContain`, `NotStart`, `NotEnd` | `NOT LIKE` | `?` | as above |
//! | `Rx` | `REGEXP` | `?` | value |
//! | `Null` | `IS NULL` / `IS NOT NULL` | - | none |
//!
//! LIKE-family placeholders gain ` ESCAPE '\'` only when escaping actually
//! inserted a backslash.

use crate::value::Value;

/// Comparison operator selected by a field-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`; also the implicit operator of an unsuffixed field.
    Eq,
    /// `!=`
    Not,
    /// `<>`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `IS NULL` when the value is `true`, `IS NOT NULL` when `false`.
    Null,
    /// `IN (...)`
    In,
    /// `NOT IN (...)`
    NotIn,
    /// `LIKE %v%`
    Like,
    /// `NOT LIKE %v%`
    NotLike,
    /// `LIKE %v%`
    Contain,
    /// `NOT LIKE %v%`
    NotContain,
    /// `LIKE v%`
    Start,
    /// `NOT LIKE v%`
    NotStart,
    /// `LIKE %v`
    End,
    /// `NOT LIKE %v`
    NotEnd,
    /// `REGEXP`
    Rx
}

/// Placeholder text and the arguments it consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Placeholder (or, for `Null`, the complete predicate tail).
    pub placeholder: String,
    /// Arguments in placeholder order.
    pub args:        Vec<Value>
}

impl Rendered {
    fn single(value: Value) -> Self {
        Self {
            placeholder: "?".to_owned(),
            args:        vec![value]
        }
    }
}

/// Shape of the `%` wrapping applied to LIKE-family values.
#[derive(Clone, Copy)]
enum Wrap {
    Both,
    Start,
    End
}

impl Operator {
    /// Every operator, in suffix-token declaration order.
    pub const ALL: [Self; 19] = [
        Self::Eq,
        Self::Not,
        Self::Ne,
        Self::Gt,
        Self::Ge,
        Self::Lt,
        Self::Le,
        Self::Null,
        Self::In,
        Self::NotIn,
        Self::Like,
        Self::NotLike,
        Self::Contain,
        Self::NotContain,
        Self::Start,
        Self::NotStart,
        Self::End,
        Self::NotEnd,
        Self::Rx
    ];

    /// Suffix token as it appears at the end of a PascalCase field name.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Eq => "Eq",
            Self::Not => "Not",
            Self::Ne => "Ne",
            Self::Gt => "Gt",
            Self::Ge => "Ge",
            Self::Lt => "Lt",
            Self::Le => "Le",
            Self::Null => "Null",
            Self::In => "In",
            Self::NotIn => "NotIn",
            Self::Like => "Like",
            Self::NotLike => "NotLike",
            Self::Contain => "Contain",
            Self::NotContain => "NotContain",
            Self::Start => "Start",
            Self::NotStart => "NotStart",
            Self::End => "End",
            Self::NotEnd => "NotEnd",
            Self::Rx => "Rx"
        }
    }

    /// Look an operator up by its suffix token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// SQL operator symbol.
    pub const fn sign(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Not => "!=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Null => "IS NULL",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like | Self::Contain | Self::Start | Self::End => "LIKE",
            Self::NotLike | Self::NotContain | Self::NotStart | Self::NotEnd => "NOT LIKE",
            Self::Rx => "REGEXP"
        }
    }

    /// Check whether the operator takes a collection.
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    const fn wrap(&self) -> Option<Wrap> {
        match self {
            Self::Like | Self::NotLike | Self::Contain | Self::NotContain => Some(Wrap::Both),
            Self::Start | Self::NotStart => Some(Wrap::Start),
            Self::End | Self::NotEnd => Some(Wrap::End),
            _ => None
        }
    }

    /// Render a scalar value.
    ///
    /// Returns `None` when the value does not fit the operator (a non-boolean
    /// `Null` value, a non-text LIKE value).
    pub fn render(&self, value: &Value) -> Option<Rendered> {
        match self {
            Self::Null => {
                let is_null = value.as_bool()?;
                Some(Rendered {
                    placeholder: if is_null { " IS NULL" } else { " IS NOT NULL" }.to_owned(),
                    args:        Vec::new()
                })
            }
            Self::In | Self::NotIn => Some(self.render_list(std::slice::from_ref(value))),
            _ => match self.wrap() {
                Some(wrap) => render_like(value.as_str()?, wrap),
                None => Some(Rendered::single(value.clone()))
            }
        }
    }

    /// Render a collection value.
    ///
    /// `In`/`NotIn` emit one placeholder per element; an empty collection
    /// renders `(null)`. Other operators only accept a single element.
    pub fn render_list(&self, values: &[Value]) -> Rendered {
        if values.is_empty() {
            return Rendered {
                placeholder: "(null)".to_owned(),
                args:        Vec::new()
            };
        }
        let marks = vec!["?"; values.len()].join(", ");
        Rendered {
            placeholder: format!("({})", marks),
            args:        values.to_vec()
        }
    }

    /// Render a complete `column <sign> placeholder` condition.
    pub fn condition(&self, column: &str, value: &Value) -> Option<(String, Vec<Value>)> {
        let rendered = self.render(value)?;
        Some(self.join(column, rendered))
    }

    /// Render a complete condition for a collection value.
    pub fn list_condition(&self, column: &str, values: &[Value]) -> Option<(String, Vec<Value>)> {
        if self.is_collection() {
            return Some(self.join(column, self.render_list(values)));
        }
        match values {
            [single] => self.condition(column, single),
            _ => None
        }
    }

    fn join(&self, column: &str, rendered: Rendered) -> (String, Vec<Value>) {
        let sql = match self {
            Self::Null => format!("{}{}", column, rendered.placeholder),
            _ => format!("{} {} {}", column, self.sign(), rendered.placeholder)
        };
        (sql, rendered.args)
    }
}

/// Escape `\`, `_` and `%` so a literal never acts as a wildcard.
///
/// Returns the escaped text and whether a backslash was introduced.
pub fn escape_like(raw: &str) -> (String, bool) {
    let mut out = String::with_capacity(raw.len());
    let mut escaped = false;
    for c in raw.chars() {
        if matches!(c, '\\' | '_' | '%') {
            out.push('\\');
            escaped = true;
        }
        out.push(c);
    }
    (out, escaped)
}

fn render_like(raw: &str, wrap: Wrap) -> Option<Rendered> {
    let (escaped, has_escape) = escape_like(raw);
    let pattern = match wrap {
        Wrap::Both => format!("%{}%", escaped),
        Wrap::Start => format!("{}%", escaped),
        Wrap::End => format!("%{}", escaped)
    };
    let placeholder = if has_escape { "? ESCAPE '\\'" } else { "?" };
    Some(Rendered {
        placeholder: placeholder.to_owned(),
        args:        vec![Value::Text(pattern)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_escapes_wildcards() {
        let rendered = Operator::Contain.render(&Value::from("a_%t")).unwrap();
        assert_eq!(rendered.placeholder, "? ESCAPE '\\'");
        assert_eq!(rendered.args, vec![Value::from("%a\\_\\%t%")]);
    }

    #[test]
    fn like_without_wildcards_has_no_escape_clause() {
        let rendered = Operator::Like.render(&Value::from("abc")).unwrap();
        assert_eq!(rendered.placeholder, "?");
        assert_eq!(rendered.args, vec![Value::from("%abc%")]);
    }

    #[test]
    fn start_and_end_wrap_one_side() {
        let start = Operator::NotStart.render(&Value::from("ab")).unwrap();
        assert_eq!(start.args, vec![Value::from("ab%")]);
        let end = Operator::End.render(&Value::from("a\\b")).unwrap();
        assert_eq!(end.args, vec![Value::from("%a\\\\b")]);
        assert_eq!(end.placeholder, "? ESCAPE '\\'");
    }

    #[test]
    fn in_renders_one_placeholder_per_element() {
        let values = [Value::Int(5), Value::Int(6), Value::Int(7)];
        let rendered = Operator::In.render_list(&values);
        assert_eq!(rendered.placeholder, "(?, ?, ?)");
        assert_eq!(rendered.args, values.to_vec());
    }

    #[test]
    fn empty_in_renders_null() {
        let (sql, args) = Operator::NotIn.list_condition("id", &[]).unwrap();
        assert_eq!(sql, "id NOT IN (null)");
        assert!(args.is_empty());
    }

    #[test]
    fn scalar_in_is_single_element() {
        let (sql, args) = Operator::In.condition("id", &Value::Int(1)).unwrap();
        assert_eq!(sql, "id IN (?)");
        assert_eq!(args, vec![Value::Int(1)]);
    }

    #[test]
    fn null_polarity_follows_value() {
        let (sql, args) = Operator::Null.condition("memo", &Value::Bool(true)).unwrap();
        assert_eq!(sql, "memo IS NULL");
        assert!(args.is_empty());
        let (sql, _) = Operator::Null.condition("memo", &Value::Bool(false)).unwrap();
        assert_eq!(sql, "memo IS NOT NULL");
        assert!(Operator::Null.condition("memo", &Value::Int(1)).is_none());
    }

    #[test]
    fn comparison_conditions() {
        let (sql, args) = Operator::Gt.condition("id", &Value::Int(5)).unwrap();
        assert_eq!(sql, "id > ?");
        assert_eq!(args, vec![Value::Int(5)]);
        assert_eq!(Operator::Ne.condition("a", &Value::Int(1)).unwrap().0, "a <> ?");
        assert_eq!(Operator::Not.condition("a", &Value::Int(1)).unwrap().0, "a != ?");
        assert_eq!(Operator::Rx.condition("a", &Value::from("^x")).unwrap().0, "a REGEXP ?");
    }

    #[test]
    fn like_rejects_non_text() {
        assert!(Operator::Like.render(&Value::Int(3)).is_none());
    }

    #[test]
    fn tokens_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_token(op.token()), Some(op));
        }
        assert_eq!(Operator::from_token("Between"), None);
    }

    #[test]
    fn placeholder_count_matches_args() {
        for op in Operator::ALL {
            let value = match op {
                Operator::Null => Value::Bool(true),
                _ => Value::from("x")
            };
            if let Some(rendered) = op.render(&value) {
                assert_eq!(rendered.placeholder.matches('?').count(), rendered.args.len());
            }
        }
    }
}
