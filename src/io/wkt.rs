//! WKT conversion for geometries.

use crate::error::{GeoSortError, Result};
use geo::Geometry;
use geozero::{ToGeo, ToWkt};

/// Parse WKT into a geometry.
///
/// # Example
///
/// ```
/// use geosort::io::wkt::parse_wkt;
/// use geo::{Geometry, Point};
///
/// let geom = parse_wkt("POINT(0 0)").unwrap();
/// assert_eq!(geom, Geometry::Point(Point::new(0.0, 0.0)));
/// ```
pub fn parse_wkt(wkt: &str) -> Result<Geometry<f64>> {
    let geom: Geometry<f64> = geozero::wkt::Wkt(wkt.as_bytes()).to_geo()?;
    Ok(geom)
}

/// Write a geometry as WKT.
pub fn to_wkt(geometry: &Geometry<f64>) -> Result<String> {
    geometry
        .to_wkt()
        .map_err(|e| GeoSortError::Serialization(format!("Failed to write WKT: {}", e)))
}
