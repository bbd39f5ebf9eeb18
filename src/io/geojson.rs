//! GeoJSON conversion for feature collections.
//!
//! Reading infers a schema: a `geometry` column first, then one column per
//! property key. Property kinds are taken from the values seen; integers and
//! doubles mixed in one column widen to double, any other mix is an error.
//! A legacy named `crs` member (`{"type": "name", "properties": {"name":
//! "EPSG:3857"}}`) sets the collection's reference system.

use crate::collection::MemoryCollection;
use crate::crs::Crs;
use crate::error::{GeoSortError, Result};
use geojson::feature::Id;
use geojson::{GeoJson, Geometry, Value};
use geosort_types::{AttributeDescriptor, AttributeKind, AttributeValue, Feature, Schema};
use rustc_hash::FxHashMap;
use serde_json::{Map, Number, Value as JsonValue, json};

/// Name of the geometry column of schemas read from GeoJSON.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Parses a GeoJSON FeatureCollection (or single Feature) into a collection named `name`.
///
/// # Examples
///
/// ```
/// use geosort::io::geojson::read_feature_collection;
///
/// let json = r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "id": "nyc",
///         "geometry": { "type": "Point", "coordinates": [-74.006, 40.7128] },
///         "properties": { "name": "New York", "population": 8336817 }
///     }]
/// }"#;
///
/// let cities = read_feature_collection(json, "cities").unwrap();
/// assert_eq!(cities.len(), 1);
/// let names: Vec<&str> = cities.schema().names().collect();
/// assert_eq!(names, vec!["geometry", "name", "population"]);
/// ```
pub fn read_feature_collection(json: &str, name: &str) -> Result<MemoryCollection> {
    let geojson: GeoJson = json.parse()?;

    let (features, foreign) = match geojson {
        GeoJson::FeatureCollection(fc) => (fc.features, fc.foreign_members),
        GeoJson::Feature(f) => (vec![f], None),
        GeoJson::Geometry(_) => {
            return Err(GeoSortError::Parse(
                "GeoJSON input is a bare geometry, expected a Feature or FeatureCollection"
                    .to_string(),
            ));
        }
    };

    let crs = foreign
        .as_ref()
        .and_then(|members| members.get("crs"))
        .map(crs_from_member)
        .transpose()?;

    let columns = infer_columns(&features)?;

    let mut attributes = Vec::with_capacity(columns.len() + 1);
    attributes.push(AttributeDescriptor::new(GEOMETRY_COLUMN, AttributeKind::Geometry));
    attributes.extend(
        columns
            .iter()
            .map(|(key, kind)| AttributeDescriptor::new(key.clone(), *kind)),
    );
    let schema = Schema::new(name, attributes).with_geometry_name(GEOMETRY_COLUMN)?;

    let rows = features
        .into_iter()
        .map(|f| convert_feature(f, &columns))
        .collect::<Result<Vec<_>>>()?;

    let collection = MemoryCollection::new(schema, rows)?;
    Ok(match crs {
        Some(crs) => collection.with_crs(crs),
        None => collection,
    })
}

fn crs_from_member(member: &JsonValue) -> Result<Crs> {
    let name = member
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(JsonValue::as_str)
        .ok_or_else(|| GeoSortError::Parse("GeoJSON crs member has no name".to_string()))?;
    Crs::from_code(name)
}

fn json_kind(value: &JsonValue) -> Result<Option<AttributeKind>> {
    Ok(match value {
        JsonValue::Null => None,
        JsonValue::Bool(_) => Some(AttributeKind::Boolean),
        JsonValue::Number(n) if n.is_i64() => Some(AttributeKind::Integer),
        JsonValue::Number(_) => Some(AttributeKind::Double),
        JsonValue::String(_) => Some(AttributeKind::String),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(GeoSortError::Parse(
                "Nested GeoJSON properties are not supported".to_string(),
            ));
        }
    })
}

/// Property columns in first-seen order, with their merged kinds.
fn infer_columns(features: &[geojson::Feature]) -> Result<Vec<(String, AttributeKind)>> {
    let mut order: Vec<String> = Vec::new();
    let mut kinds: FxHashMap<String, Option<AttributeKind>> = FxHashMap::default();

    for feature in features {
        let Some(properties) = &feature.properties else {
            continue;
        };
        for (key, value) in properties {
            if key == GEOMETRY_COLUMN {
                return Err(GeoSortError::Parse(format!(
                    "Property '{}' clashes with the geometry column",
                    key
                )));
            }
            let seen = json_kind(value)?;
            let slot = kinds.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                None
            });
            *slot = merge_kinds(key, *slot, seen)?;
        }
    }

    Ok(order
        .into_iter()
        .map(|key| {
            let kind = kinds
                .get(&key)
                .copied()
                .flatten()
                .unwrap_or(AttributeKind::String);
            (key, kind)
        })
        .collect())
}

fn merge_kinds(
    key: &str,
    current: Option<AttributeKind>,
    seen: Option<AttributeKind>,
) -> Result<Option<AttributeKind>> {
    use AttributeKind::{Double, Integer};
    match (current, seen) {
        (None, k) | (k, None) => Ok(k),
        (Some(a), Some(b)) if a == b => Ok(Some(a)),
        (Some(Integer), Some(Double)) | (Some(Double), Some(Integer)) => Ok(Some(Double)),
        (Some(a), Some(b)) => Err(GeoSortError::Parse(format!(
            "Property '{}' mixes {} and {} values",
            key, a, b
        ))),
    }
}

fn convert_value(value: &JsonValue, kind: AttributeKind) -> AttributeValue {
    match (value, kind) {
        (JsonValue::Bool(b), _) => AttributeValue::Boolean(*b),
        (JsonValue::Number(n), AttributeKind::Integer) => {
            n.as_i64().map_or(AttributeValue::Null, AttributeValue::Integer)
        }
        (JsonValue::Number(n), _) => {
            n.as_f64().map_or(AttributeValue::Null, AttributeValue::Double)
        }
        (JsonValue::String(s), _) => AttributeValue::String(s.clone()),
        _ => AttributeValue::Null,
    }
}

fn convert_feature(
    feature: geojson::Feature,
    columns: &[(String, AttributeKind)],
) -> Result<Feature> {
    let id = match feature.id {
        Some(Id::String(s)) => s,
        Some(Id::Number(n)) => n.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };

    let geometry = match feature.geometry {
        Some(g) => AttributeValue::Geometry(geo::Geometry::<f64>::try_from(g)?),
        None => AttributeValue::Null,
    };

    let mut values = Vec::with_capacity(columns.len() + 1);
    values.push(geometry);
    for (key, kind) in columns {
        let value = feature
            .properties
            .as_ref()
            .and_then(|p| p.get(key))
            .map_or(AttributeValue::Null, |v| convert_value(v, *kind));
        values.push(value);
    }

    Ok(Feature::new(id, values))
}

fn to_json_value(value: &AttributeValue) -> Result<JsonValue> {
    Ok(match value {
        AttributeValue::Null => JsonValue::Null,
        AttributeValue::Boolean(b) => JsonValue::Bool(*b),
        AttributeValue::Integer(i) => JsonValue::Number((*i).into()),
        AttributeValue::Double(d) => {
            Number::from_f64(*d).map_or(JsonValue::Null, JsonValue::Number)
        }
        AttributeValue::String(s) => JsonValue::String(s.clone()),
        AttributeValue::Geometry(g) => serde_json::to_value(Geometry::new(Value::from(g)))
            .map_err(|e| {
                GeoSortError::Serialization(format!("Failed to serialize geometry: {}", e))
            })?,
    })
}

/// Converts a collection to a GeoJSON FeatureCollection string.
///
/// The default geometry becomes the feature geometry, every other column a
/// property (secondary geometries as nested GeoJSON geometries). A
/// non-geographic reference system is written as a named `crs` member.
pub fn write_feature_collection(collection: &MemoryCollection) -> Result<String> {
    let schema = collection.schema();
    let geometry_index = schema.geometry_index();

    let mut features = Vec::with_capacity(collection.len());
    for feature in collection.iter() {
        let geometry = feature
            .geometry(schema)
            .map(|g| Geometry::new(Value::from(g)));

        let mut properties = Map::new();
        for (i, (descriptor, value)) in schema.attributes.iter().zip(&feature.values).enumerate() {
            if Some(i) == geometry_index {
                continue;
            }
            properties.insert(descriptor.name.clone(), to_json_value(value)?);
        }

        features.push(geojson::Feature {
            bbox: None,
            geometry,
            id: Some(Id::String(feature.id.clone())),
            properties: Some(properties),
            foreign_members: None,
        });
    }

    let foreign_members = match collection.crs() {
        Some(crs) if !crs.is_geographic() => {
            let mut members = Map::new();
            members.insert(
                "crs".to_string(),
                json!({ "type": "name", "properties": { "name": crs.code() } }),
            );
            Some(members)
        }
        _ => None,
    };

    let fc = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    };

    serde_json::to_string(&fc).map_err(|e| {
        GeoSortError::Serialization(format!("Failed to serialize feature collection: {}", e))
    })
}
