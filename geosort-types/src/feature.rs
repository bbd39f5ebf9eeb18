use crate::attribute::AttributeValue;
use crate::schema::Schema;
use geo::Geometry;
use serde::{Deserialize, Serialize};

/// An identified row of attribute values.
///
/// Values are positional: `values[i]` belongs to `schema.attributes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub values: Vec<AttributeValue>,
}

impl Feature {
    pub fn new(id: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of the named attribute, resolved through `schema`.
    pub fn value(&self, schema: &Schema, name: &str) -> Option<&AttributeValue> {
        schema.index_of(name).and_then(|i| self.values.get(i))
    }

    /// The default geometry, if the schema has one and it is not null.
    pub fn geometry(&self, schema: &Schema) -> Option<&Geometry<f64>> {
        schema
            .geometry_index()
            .and_then(|i| self.values.get(i))
            .and_then(AttributeValue::as_geometry)
    }

    /// Whether this feature has one value per column, each accepted by its descriptor.
    pub fn conforms_to(&self, schema: &Schema) -> bool {
        self.values.len() == schema.len()
            && schema
                .attributes
                .iter()
                .zip(&self.values)
                .all(|(descriptor, value)| descriptor.accepts(value))
    }

    /// Append a value as the new last column.
    pub fn with_value(mut self, value: AttributeValue) -> Self {
        self.values.push(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeDescriptor, AttributeKind};
    use geo::Point;

    fn schema() -> Schema {
        Schema::new(
            "poi",
            vec![
                AttributeDescriptor::new("name", AttributeKind::String).required(),
                AttributeDescriptor::new("geom", AttributeKind::Geometry),
            ],
        )
    }

    #[test]
    fn test_value_lookup() {
        let f = Feature::new(
            "poi.1",
            vec![
                AttributeValue::from("museum"),
                AttributeValue::from(Geometry::Point(Point::new(2.0, 3.0))),
            ],
        );
        let schema = schema();
        assert_eq!(f.value(&schema, "name"), Some(&AttributeValue::from("museum")));
        assert_eq!(f.value(&schema, "missing"), None);
        assert_eq!(f.geometry(&schema), Some(&Geometry::Point(Point::new(2.0, 3.0))));
        assert!(f.conforms_to(&schema));
    }

    #[test]
    fn test_null_geometry() {
        let f = Feature::new("poi.2", vec![AttributeValue::from("park"), AttributeValue::Null]);
        assert_eq!(f.geometry(&schema()), None);
        assert!(f.conforms_to(&schema()));
    }

    #[test]
    fn test_conformance_failures() {
        let short = Feature::new("poi.3", vec![AttributeValue::from("x")]);
        assert!(!short.conforms_to(&schema()));

        let null_required = Feature::new("poi.4", vec![AttributeValue::Null, AttributeValue::Null]);
        assert!(!null_required.conforms_to(&schema()));
    }
}
