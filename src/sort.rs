//! Spatial ordering of feature collections by geohash.
//!
//! Sorting features lexicographically on their geohash key groups nearby
//! features together, a cheap approximation of a Z-order spatial sort. This
//! is what a container export uses to lay out rows with spatial locality.

use crate::collection::{
    DEFAULT_ATTRIBUTE_NAME, FeatureSource, GeoHashCollection, MemoryCollection,
};
use crate::compute::cell::parent;
use crate::compute::geohash::{DEFAULT_PRECISION, GeoHashCalculator};
use crate::compute::validation::validate_precision;
use crate::crs::Crs;
use crate::error::{GeoSortError, Result};
use geosort_types::{AttributeValue, Feature};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Options for [`sort_by_geohash`].
#[derive(Debug, Clone, PartialEq)]
pub struct SortOptions {
    /// Key precision (1-12).
    pub precision: usize,
    /// Name of the key column.
    pub attribute_name: String,
    /// Keep the key column in the sorted output.
    pub keep_key: bool,
    /// Reference system assumed when the source has none.
    pub crs: Crs,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            keep_key: true,
            crs: Crs::Geographic,
        }
    }
}

impl SortOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    pub fn with_keep_key(mut self, keep: bool) -> Self {
        self.keep_key = keep;
        self
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    fn calculator(&self) -> Result<GeoHashCalculator> {
        Ok(GeoHashCalculator::new(self.precision)?.with_crs(self.crs.clone()))
    }
}

/// Order keys with nulls last.
fn compare_keys(a: &AttributeValue, b: &AttributeValue) -> Ordering {
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort a source by the geohash of each feature's default geometry.
///
/// The sort is stable: features with equal keys keep their source order.
/// Features without a geometry sort last. Any feature whose key cannot be
/// computed aborts the sort with that error.
///
/// # Examples
///
/// ```
/// use geosort::collection::MemoryCollection;
/// use geosort::sort::{SortOptions, sort_by_geohash};
/// use geosort_types::{AttributeDescriptor, AttributeKind, AttributeValue, Feature, Schema};
/// use geo::{Geometry, Point};
///
/// let schema = Schema::new(
///     "cities",
///     vec![
///         AttributeDescriptor::new("name", AttributeKind::String),
///         AttributeDescriptor::new("geom", AttributeKind::Geometry),
///     ],
/// );
/// let city = |id: &str, name: &str, lon: f64, lat: f64| {
///     Feature::new(id, vec![
///         AttributeValue::from(name),
///         AttributeValue::from(Geometry::Point(Point::new(lon, lat))),
///     ])
/// };
/// let cities = MemoryCollection::new(schema, vec![
///     city("c.1", "New York", -74.0060, 40.7128),
///     city("c.2", "Los Angeles", -118.2437, 34.0522),
///     city("c.3", "Brooklyn", -73.9442, 40.6782),
/// ]).unwrap();
///
/// let sorted = sort_by_geohash(cities, &SortOptions::default().with_keep_key(false)).unwrap();
/// let ids: Vec<&str> = sorted.iter().map(|f| f.id()).collect();
/// assert_eq!(ids, vec!["c.2", "c.1", "c.3"]);
/// assert_eq!(sorted.schema().len(), 2);
/// ```
pub fn sort_by_geohash<S: FeatureSource>(
    source: S,
    options: &SortOptions,
) -> Result<MemoryCollection> {
    let decorated =
        GeoHashCollection::decorate(source, options.calculator()?, &options.attribute_name)?;
    let schema = decorated.schema().clone();
    let crs = decorated.crs().clone();
    let key_index = schema.len() - 1;

    let mut features = decorated.collect::<Result<Vec<Feature>>>()?;
    features.sort_by(|a, b| compare_keys(&a.values[key_index], &b.values[key_index]));

    log::debug!(
        "Sorted {} features of '{}' by {}",
        features.len(),
        schema.name,
        options.attribute_name
    );

    if options.keep_key {
        return Ok(MemoryCollection::from_parts_unchecked(schema, Some(crs), features));
    }

    let schema = schema.without_attribute(&options.attribute_name)?;
    for feature in &mut features {
        feature.values.truncate(key_index);
    }
    Ok(MemoryCollection::from_parts_unchecked(schema, Some(crs), features))
}

/// Bucket features by the first `prefix_len` characters of their key.
///
/// Features without a key are collected under the empty string. Buckets are
/// returned in key order and keep source order within a bucket.
pub fn group_by_prefix<S: FeatureSource>(
    source: S,
    prefix_len: usize,
    options: &SortOptions,
) -> Result<BTreeMap<String, Vec<Feature>>> {
    validate_precision(prefix_len)?;
    if prefix_len > options.precision {
        return Err(GeoSortError::InvalidInput(format!(
            "Prefix length {} exceeds key precision {}",
            prefix_len, options.precision
        )));
    }

    let decorated =
        GeoHashCollection::decorate(source, options.calculator()?, &options.attribute_name)?;
    let key_index = decorated.schema().len() - 1;

    let mut groups: BTreeMap<String, Vec<Feature>> = BTreeMap::new();
    for feature in decorated {
        let mut feature = feature?;
        let bucket = feature.values[key_index]
            .as_str()
            .map(|key| parent(key, prefix_len).to_string())
            .unwrap_or_default();
        if !options.keep_key {
            feature.values.truncate(key_index);
        }
        groups.entry(bucket).or_default().push(feature);
    }

    Ok(groups)
}
