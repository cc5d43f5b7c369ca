// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Driver-agnostic argument values.
//!
//! Every `?` placeholder emitted by the engine is matched, left to right, by
//! one [`Value`] in the argument vector. The executor binds them positionally;
//! nothing here knows about a concrete driver.
//!
//! # Conversions
//!
//! | Rust type | Variant |
//! |-----------|---------|
//! | `bool` | [`Value::Bool`] |
//! | `i8` .. `i64`, `isize` | [`Value::Int`] |
//! | `u8` .. `u64`, `usize` | [`Value::UInt`] |
//! | `f32`, `f64` | [`Value::Float`] |
//! | `String`, `&str`, `char` | [`Value::Text`] |
//! | `Vec<u8>` | [`Value::Bytes`] |
//! | `uuid::Uuid` (feature `uuid`) | `Value::Uuid` |
//! | `chrono::DateTime<Tz>` (feature `chrono`) | `Value::Timestamp`, normalised to UTC |
//! | `chrono::NaiveDateTime` (feature `chrono`) | `Value::DateTime` |
//! | `chrono::NaiveDate` (feature `chrono`) | `Value::Date` |
//! | `chrono::NaiveTime` (feature `chrono`) | `Value::Time` |
//!
//! 128-bit integers and decimals have no variant; such fields are reported
//! as unsupported by the derive rather than converted lossily.

use std::fmt;

/// A positional SQL argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`; also marks an unset entity column.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer.
    Int(i64),

    /// Unsigned integer.
    UInt(u64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    Text(String),

    /// Raw bytes.
    Bytes(Vec<u8>),

    /// UUID value.
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),

    /// UTC timestamp.
    #[cfg(feature = "chrono")]
    Timestamp(chrono::DateTime<chrono::Utc>),

    /// Date and time without a zone.
    #[cfg(feature = "chrono")]
    DateTime(chrono::NaiveDateTime),

    /// Calendar date.
    #[cfg(feature = "chrono")]
    Date(chrono::NaiveDate),

    /// Time of day.
    #[cfg(feature = "chrono")]
    Time(chrono::NaiveTime)
}

impl Value {
    /// Check whether this is [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None
        }
    }

    /// Read the boolean payload, if any.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::UInt(u) => write!(f, "{}", u),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "'{}'", s),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            #[cfg(feature = "uuid")]
            Self::Uuid(u) => write!(f, "'{}'", u),
            #[cfg(feature = "chrono")]
            Self::Timestamp(t) => write!(f, "'{}'", t.to_rfc3339()),
            #[cfg(feature = "chrono")]
            Self::DateTime(t) => write!(f, "'{}'", t),
            #[cfg(feature = "chrono")]
            Self::Date(d) => write!(f, "'{}'", d),
            #[cfg(feature = "chrono")]
            Self::Time(t) => write!(f, "'{}'", t)
        }
    }
}

/// Conversion of a field value into a positional argument.
///
/// Implemented for the scalar types a query or entity field may hold.
/// Generated code calls it by reference so fields are never moved out.
pub trait ToValue {
    /// Produce the argument for this value.
    fn to_value(&self) -> Value;
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

macro_rules! to_value_via {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self as $target)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

to_value_via!(Int as i64: i8, i16, i32, i64, isize);
to_value_via!(UInt as u64: u8, u16, u32, u64, usize);
to_value_via!(Float as f64: f32, f64);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(feature = "uuid")]
impl ToValue for uuid::Uuid {
    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Uuid(v)
    }
}

#[cfg(feature = "chrono")]
impl<Tz: chrono::TimeZone> ToValue for chrono::DateTime<Tz> {
    fn to_value(&self) -> Value {
        Value::Timestamp(self.with_timezone(&chrono::Utc))
    }
}

#[cfg(feature = "chrono")]
impl ToValue for chrono::NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

#[cfg(feature = "chrono")]
impl ToValue for chrono::NaiveDate {
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
}

#[cfg(feature = "chrono")]
impl ToValue for chrono::NaiveTime {
    fn to_value(&self) -> Value {
        Value::Time(*self)
    }
}
