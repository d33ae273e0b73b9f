//! Typed key/value fields attached to a log record
//!
//! Fields borrow their keys, strings and group children whenever they can, so
//! call-site fields built on the stack never touch the heap:
//!
//! ```
//! use rust_field_logger::Field;
//!
//! let children = [
//!     Field::float64("float64", 6.1),
//!     Field::int64("int64", 7),
//! ];
//! let fields = [
//!     Field::string("user", "alice"),
//!     Field::group("TEST", &children),
//! ];
//! assert_eq!(fields[1].children().len(), 2);
//! ```

use std::borrow::Cow;

/// Value carried by a [`Field`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    String(Cow<'a, str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Ordered child fields rendered under the parent's key
    Group(Cow<'a, [Field<'a>]>),
}

impl FieldValue<'_> {
    /// Short name of the value kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Int(_) => "int64",
            FieldValue::Float(_) => "float64",
            FieldValue::Bool(_) => "bool",
            FieldValue::Group(_) => "group",
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::String(Cow::Borrowed(s))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(s: String) -> Self {
        FieldValue::String(Cow::Owned(s))
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// A named, typed value. Keys are positional: duplicates are allowed and
/// encoders keep them in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub key: Cow<'a, str>,
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::String(value.into()),
        }
    }

    pub fn int64(key: impl Into<Cow<'a, str>>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Int(value),
        }
    }

    pub fn float64(key: impl Into<Cow<'a, str>>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Float(value),
        }
    }

    pub fn bool(key: impl Into<Cow<'a, str>>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Bool(value),
        }
    }

    /// Group borrowing its children
    pub fn group(key: impl Into<Cow<'a, str>>, fields: &'a [Field<'a>]) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Group(Cow::Borrowed(fields)),
        }
    }

    /// Group owning its children, for fields kept beyond the call site
    pub fn owned_group(key: impl Into<Cow<'a, str>>, fields: Vec<Field<'a>>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Group(Cow::Owned(fields)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_group(&self) -> bool {
        matches!(self.value, FieldValue::Group(_))
    }

    /// Children of a group field; empty for scalar fields
    pub fn children(&self) -> &[Field<'a>] {
        match &self.value {
            FieldValue::Group(children) => children,
            _ => &[],
        }
    }

    /// Detach the field from every borrow so it can live in configuration
    pub fn into_owned(self) -> Field<'static> {
        let value = match self.value {
            FieldValue::String(s) => FieldValue::String(Cow::Owned(s.into_owned())),
            FieldValue::Int(i) => FieldValue::Int(i),
            FieldValue::Float(f) => FieldValue::Float(f),
            FieldValue::Bool(b) => FieldValue::Bool(b),
            FieldValue::Group(children) => FieldValue::Group(Cow::Owned(
                children
                    .iter()
                    .cloned()
                    .map(Field::into_owned)
                    .collect(),
            )),
        };
        Field {
            key: Cow::Owned(self.key.into_owned()),
            value,
        }
    }
}
