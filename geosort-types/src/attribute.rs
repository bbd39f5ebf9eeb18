use geo::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of value an attribute column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Boolean,
    Integer,
    Double,
    String,
    Geometry,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Boolean => "boolean",
            AttributeKind::Integer => "integer",
            AttributeKind::Double => "double",
            AttributeKind::String => "string",
            AttributeKind::Geometry => "geometry",
        };
        f.write_str(name)
    }
}

/// A single attribute value of a feature.
///
/// `Null` is valid for every kind; a value's kind is otherwise implied by its
/// variant.
///
/// # Examples
///
/// ```
/// use geosort_types::attribute::{AttributeKind, AttributeValue};
///
/// let name = AttributeValue::from("Brooklyn");
/// assert_eq!(name.kind(), Some(AttributeKind::String));
/// assert_eq!(name.as_str(), Some("Brooklyn"));
///
/// assert_eq!(AttributeValue::Null.kind(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Geometry(Geometry<f64>),
}

impl AttributeValue {
    /// The kind of this value, or `None` for `Null`.
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::Boolean(_) => Some(AttributeKind::Boolean),
            AttributeValue::Integer(_) => Some(AttributeKind::Integer),
            AttributeValue::Double(_) => Some(AttributeKind::Double),
            AttributeValue::String(_) => Some(AttributeKind::String),
            AttributeValue::Geometry(_) => Some(AttributeKind::Geometry),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Whether this value may be stored in a column of `kind`.
    pub fn fits(&self, kind: AttributeKind) -> bool {
        self.kind().is_none_or(|k| k == kind)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(d) => Some(*d),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry<f64>> {
        match self {
            AttributeValue::Geometry(g) => Some(g),
            _ => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Geometry<f64>> for AttributeValue {
    fn from(value: Geometry<f64>) -> Self {
        AttributeValue::Geometry(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

/// Name and kind of one schema column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default = "AttributeDescriptor::default_nullable")]
    pub nullable: bool,
}

impl AttributeDescriptor {
    const fn default_nullable() -> bool {
        true
    }

    /// Create a nullable descriptor.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Check a value against this column's kind and nullability.
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        value.fits(self.kind)
    }
}
