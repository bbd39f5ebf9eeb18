use crate::attribute::{AttributeDescriptor, AttributeKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building or extending a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate attribute '{0}'")]
    DuplicateAttribute(String),
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("attribute '{name}' is {actual}, expected geometry")]
    NotAGeometry { name: String, actual: AttributeKind },
}

/// Ordered attribute layout shared by all features of a collection.
///
/// The default geometry column is either named explicitly or, when unset,
/// the first column of kind `Geometry`.
///
/// # Examples
///
/// ```
/// use geosort_types::attribute::{AttributeDescriptor, AttributeKind};
/// use geosort_types::schema::Schema;
///
/// let schema = Schema::new(
///     "roads",
///     vec![
///         AttributeDescriptor::new("name", AttributeKind::String),
///         AttributeDescriptor::new("the_geom", AttributeKind::Geometry),
///     ],
/// );
///
/// assert_eq!(schema.index_of("the_geom"), Some(1));
/// assert_eq!(schema.geometry_index(), Some(1));
///
/// let extended = schema
///     .with_attribute(AttributeDescriptor::new("rank", AttributeKind::Integer))
///     .unwrap();
/// assert_eq!(extended.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub attributes: Vec<AttributeDescriptor>,
    #[serde(default)]
    pub geometry_name: Option<String>,
}

impl Schema {
    pub fn new(name: impl Into<String>, attributes: Vec<AttributeDescriptor>) -> Self {
        Self {
            name: name.into(),
            attributes,
            geometry_name: None,
        }
    }

    /// Name the default geometry column explicitly.
    pub fn with_geometry_name(mut self, name: impl Into<String>) -> Result<Self, SchemaError> {
        let name = name.into();
        let descriptor = self
            .attribute(&name)
            .ok_or_else(|| SchemaError::UnknownAttribute(name.clone()))?;
        if descriptor.kind != AttributeKind::Geometry {
            return Err(SchemaError::NotAGeometry {
                actual: descriptor.kind,
                name,
            });
        }
        self.geometry_name = Some(name);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Position of the default geometry column.
    pub fn geometry_index(&self) -> Option<usize> {
        match &self.geometry_name {
            Some(name) => self.index_of(name),
            None => self
                .attributes
                .iter()
                .position(|a| a.kind == AttributeKind::Geometry),
        }
    }

    /// Attribute names in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Return a copy of this schema with `descriptor` appended as the last column.
    pub fn with_attribute(&self, descriptor: AttributeDescriptor) -> Result<Self, SchemaError> {
        if self.index_of(&descriptor.name).is_some() {
            return Err(SchemaError::DuplicateAttribute(descriptor.name));
        }
        let mut extended = self.clone();
        extended.attributes.push(descriptor);
        Ok(extended)
    }

    /// Return a copy of this schema without the named column.
    pub fn without_attribute(&self, name: &str) -> Result<Self, SchemaError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| SchemaError::UnknownAttribute(name.to_string()))?;
        let mut reduced = self.clone();
        reduced.attributes.remove(index);
        if reduced.geometry_name.as_deref() == Some(name) {
            reduced.geometry_name = None;
        }
        Ok(reduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roads() -> Schema {
        Schema::new(
            "roads",
            vec![
                AttributeDescriptor::new("name", AttributeKind::String),
                AttributeDescriptor::new("centerline", AttributeKind::Geometry),
                AttributeDescriptor::new("envelope", AttributeKind::Geometry),
            ],
        )
    }

    #[test]
    fn test_first_geometry_is_default() {
        assert_eq!(roads().geometry_index(), Some(1));
    }

    #[test]
    fn test_named_geometry() {
        let schema = roads().with_geometry_name("envelope").unwrap();
        assert_eq!(schema.geometry_index(), Some(2));

        let err = roads().with_geometry_name("name").unwrap_err();
        assert!(matches!(err, SchemaError::NotAGeometry { .. }));

        let err = roads().with_geometry_name("missing").unwrap_err();
        assert_eq!(err, SchemaError::UnknownAttribute("missing".into()));
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let err = roads()
            .with_attribute(AttributeDescriptor::new("name", AttributeKind::String))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateAttribute("name".into()));
    }

    #[test]
    fn test_without_attribute() {
        let schema = roads().with_geometry_name("envelope").unwrap();
        let reduced = schema.without_attribute("envelope").unwrap();
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced.geometry_name, None);
        assert_eq!(reduced.geometry_index(), Some(1));
    }
}
