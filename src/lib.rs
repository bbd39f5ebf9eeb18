//! Geohash spatial sort keys for geometries and feature collections.
//!
//! ```rust
//! use geosort::{Crs, GeoHashCalculator};
//! use geo::{Geometry, Point};
//!
//! let calc = GeoHashCalculator::new(12)?;
//! let origin = Geometry::Point(Point::new(0.0, 0.0));
//! assert_eq!(calc.compute(&origin)?, "s00000000000");
//!
//! // Projected input is brought to longitude/latitude first
//! let utm = GeoHashCalculator::new(12)?.with_crs(Crs::from_code("EPSG:32632")?);
//! let meridian = Geometry::Point(Point::new(500_000.0, 0.0));
//! assert!(utm.compute(&meridian)?.starts_with("s0n"));
//! # Ok::<(), geosort::GeoSortError>(())
//! ```

pub mod collection;
pub mod compute;
pub mod config;
pub mod crs;
pub mod error;
pub mod io;
pub mod sort;

pub use collection::{CursorSource, FeatureSource, GeoHashCollection, MemoryCollection};
pub use compute::geohash::{GeoHashCalculator, common_prefix, encode};
pub use config::Config;
pub use crs::Crs;
pub use error::{GeoSortError, Result};
pub use sort::{SortOptions, group_by_prefix, sort_by_geohash};

pub use geo::{Geometry, Point, Rect};
pub use geosort_types::{
    AttributeDescriptor, AttributeKind, AttributeValue, Feature, Schema, SchemaError,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Crs, GeoHashCalculator, GeoSortError, Result};

    pub use geo::{Geometry, Point, Rect};

    pub use crate::collection::{FeatureSource, GeoHashCollection, MemoryCollection};

    pub use crate::sort::{SortOptions, sort_by_geohash};

    pub use geosort_types::{AttributeDescriptor, AttributeKind, AttributeValue, Feature, Schema};
}
