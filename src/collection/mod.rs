//! Feature collections.
//!
//! A [`FeatureSource`] is a schema plus a single-pass cursor of features. Two
//! plain sources are provided:
//!
//! - [`MemoryCollection`]: features held in a `Vec`
//! - [`CursorSource`]: any iterator of `Result<Feature>`, consumed once
//!
//! [`GeoHashCollection`] decorates any source with a geohash column.

mod geohash;

pub use geohash::{DEFAULT_ATTRIBUTE_NAME, GeoHashCollection};

use crate::crs::Crs;
use crate::error::{GeoSortError, Result};
use geosort_types::{Feature, Schema};

/// A schema and a single-pass stream of features conforming to it.
pub trait FeatureSource {
    type Features: Iterator<Item = Result<Feature>>;

    fn schema(&self) -> &Schema;

    /// Native reference system of the geometries, when known.
    fn crs(&self) -> Option<&Crs> {
        None
    }

    /// Consume the source into its feature stream.
    fn into_features(self) -> Self::Features;
}

type OkFeatures = std::iter::Map<std::vec::IntoIter<Feature>, fn(Feature) -> Result<Feature>>;

/// An in-memory feature collection.
///
/// # Examples
///
/// ```
/// use geosort::collection::MemoryCollection;
/// use geosort_types::{AttributeDescriptor, AttributeKind, AttributeValue, Feature, Schema};
///
/// let schema = Schema::new(
///     "places",
///     vec![AttributeDescriptor::new("name", AttributeKind::String)],
/// );
/// let mut places = MemoryCollection::new(schema, vec![]).unwrap();
/// places.push(Feature::new("p.1", vec![AttributeValue::from("harbour")])).unwrap();
/// assert_eq!(places.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCollection {
    schema: Schema,
    crs: Option<Crs>,
    features: Vec<Feature>,
}

impl MemoryCollection {
    /// Create a collection, checking every feature against the schema.
    pub fn new(schema: Schema, features: Vec<Feature>) -> Result<Self> {
        for feature in &features {
            check_conforms(&schema, feature)?;
        }
        Ok(Self {
            schema,
            crs: None,
            features,
        })
    }

    /// Drain a source into memory.
    pub fn collect<S: FeatureSource>(source: S) -> Result<Self> {
        let schema = source.schema().clone();
        let crs = source.crs().cloned();
        let features = source.into_features().collect::<Result<Vec<_>>>()?;
        Ok(Self {
            schema,
            crs,
            features,
        })
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    pub fn push(&mut self, feature: Feature) -> Result<()> {
        check_conforms(&self.schema, &feature)?;
        self.features.push(feature);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Split into schema and features.
    pub fn into_parts(self) -> (Schema, Vec<Feature>) {
        (self.schema, self.features)
    }

    pub(crate) fn from_parts_unchecked(
        schema: Schema,
        crs: Option<Crs>,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            schema,
            crs,
            features,
        }
    }
}

impl FeatureSource for MemoryCollection {
    type Features = OkFeatures;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    fn into_features(self) -> Self::Features {
        self.features.into_iter().map(Ok as fn(Feature) -> Result<Feature>)
    }
}

impl<'a> IntoIterator for &'a MemoryCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// A source backed by an arbitrary cursor, such as a database result set.
///
/// Features are not checked up front; a decorator reports misaligned rows as
/// they are read.
pub struct CursorSource<I> {
    schema: Schema,
    crs: Option<Crs>,
    cursor: I,
}

impl<I> CursorSource<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    pub fn new(schema: Schema, cursor: I) -> Self {
        Self {
            schema,
            crs: None,
            cursor,
        }
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }
}

impl<I> FeatureSource for CursorSource<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    type Features = I;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    fn into_features(self) -> Self::Features {
        self.cursor
    }
}

pub(crate) fn check_conforms(schema: &Schema, feature: &Feature) -> Result<()> {
    if feature.values.len() != schema.len() {
        return Err(GeoSortError::Schema(format!(
            "Feature '{}' has {} values, schema '{}' expects {}",
            feature.id,
            feature.values.len(),
            schema.name,
            schema.len()
        )));
    }
    if !feature.conforms_to(schema) {
        return Err(GeoSortError::Schema(format!(
            "Feature '{}' has values that do not match schema '{}'",
            feature.id, schema.name
        )));
    }
    Ok(())
}
