use super::{FeatureSource, check_conforms};
use crate::compute::geohash::GeoHashCalculator;
use crate::crs::Crs;
use crate::error::{GeoSortError, Result};
use geo::BoundingRect;
use geosort_types::{AttributeDescriptor, AttributeKind, AttributeValue, Feature, Schema};

/// Name of the appended key column unless configured otherwise.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "geohash";

/// A lazy view over a feature source that appends a geohash column.
///
/// The decorated schema is the source schema plus one trailing `String`
/// attribute. Each feature keeps its id, values and value order; its key is
/// computed from the default geometry when the feature is pulled. Features
/// without a geometry get a null key.
///
/// The view is single-pass: iterating it consumes the source cursor.
///
/// # Examples
///
/// ```
/// use geosort::collection::{GeoHashCollection, MemoryCollection};
/// use geosort::GeoHashCalculator;
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
/// let cities = MemoryCollection::new(
///     schema,
///     vec![Feature::new(
///         "cities.1",
///         vec![
///             AttributeValue::from("New York"),
///             AttributeValue::from(Geometry::Point(Point::new(-74.0060, 40.7128))),
///         ],
///     )],
/// )
/// .unwrap();
///
/// let calc = GeoHashCalculator::new(7).unwrap();
/// let decorated = GeoHashCollection::decorate(cities, calc, "geohash").unwrap();
/// assert_eq!(decorated.schema().len(), 3);
///
/// let features: Vec<Feature> = decorated.collect::<Result<_, _>>().unwrap();
/// assert_eq!(features[0].values[2], AttributeValue::from("dr5regw"));
/// ```
pub struct GeoHashCollection<I> {
    source_schema: Schema,
    schema: Schema,
    crs: Crs,
    calculator: GeoHashCalculator,
    geometry_index: Option<usize>,
    features: I,
}

impl<I> GeoHashCollection<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    /// Decorate a source, appending a key column named `attribute_name`.
    ///
    /// Geometries are read in the source's reference system when it has one,
    /// otherwise in the calculator's.
    pub fn decorate<S>(
        source: S,
        calculator: GeoHashCalculator,
        attribute_name: &str,
    ) -> Result<Self>
    where
        S: FeatureSource<Features = I>,
    {
        let source_schema = source.schema().clone();
        let crs = source
            .crs()
            .cloned()
            .unwrap_or_else(|| calculator.crs().clone());
        Self::new(source_schema, crs, source.into_features(), calculator, attribute_name)
    }

    fn new(
        source_schema: Schema,
        crs: Crs,
        features: I,
        calculator: GeoHashCalculator,
        attribute_name: &str,
    ) -> Result<Self> {
        if attribute_name.is_empty() {
            return Err(GeoSortError::Schema(
                "Geohash attribute name cannot be empty".into(),
            ));
        }

        let schema = source_schema
            .with_attribute(AttributeDescriptor::new(attribute_name, AttributeKind::String))?;
        let geometry_index = source_schema.geometry_index();

        if geometry_index.is_none() {
            log::warn!(
                "Schema '{}' has no geometry column, every geohash will be null",
                source_schema.name
            );
        }

        log::debug!(
            "Decorating '{}' with '{}' (precision {}, {})",
            source_schema.name,
            attribute_name,
            calculator.precision(),
            crs
        );

        Ok(Self {
            source_schema,
            schema,
            crs,
            calculator,
            geometry_index,
            features,
        })
    }

    /// The decorated schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Reference system geometries are read in.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    fn key_for(&self, feature: &Feature) -> Result<AttributeValue> {
        let Some(index) = self.geometry_index else {
            return Ok(AttributeValue::Null);
        };

        match &feature.values[index] {
            AttributeValue::Null => Ok(AttributeValue::Null),
            AttributeValue::Geometry(g) if g.bounding_rect().is_none() => Ok(AttributeValue::Null),
            AttributeValue::Geometry(g) => self
                .calculator
                .compute_with_crs(g, &self.crs)
                .map(AttributeValue::String)
                .inspect_err(|e| {
                    log::warn!("Cannot compute geohash for feature '{}': {}", feature.id, e)
                }),
            other => Err(GeoSortError::Schema(format!(
                "Feature '{}' holds a {} in geometry column '{}'",
                feature.id,
                other.kind().map_or("null".to_string(), |k| k.to_string()),
                self.source_schema.attributes[index].name
            ))),
        }
    }

    fn decorate_feature(&self, feature: Feature) -> Result<Feature> {
        check_conforms(&self.source_schema, &feature)?;
        let key = self.key_for(&feature)?;
        Ok(feature.with_value(key))
    }
}

impl<I> Iterator for GeoHashCollection<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    type Item = Result<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.features.next()?;
        Some(next.and_then(|feature| self.decorate_feature(feature)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.features.size_hint()
    }
}

impl<I> FeatureSource for GeoHashCollection<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    type Features = Self;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn crs(&self) -> Option<&Crs> {
        Some(&self.crs)
    }

    fn into_features(self) -> Self::Features {
        self
    }
}
