//! Validation for geographic coordinates, envelopes and geohash input.

use crate::error::{GeoSortError, Result};
use geo::{Coord, Rect};

/// Smallest accepted geohash precision.
pub const MIN_PRECISION: usize = 1;
/// Largest accepted geohash precision.
pub const MAX_PRECISION: usize = 12;

/// Validates a coordinate has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geosort::compute::validation::validate_geographic_coord;
/// use geo::coord;
///
/// assert!(validate_geographic_coord(coord! { x: -74.0060, y: 40.7128 }).is_ok());
/// assert!(validate_geographic_coord(coord! { x: 200.0, y: 40.0 }).is_err());
/// assert!(validate_geographic_coord(coord! { x: -74.0, y: 95.0 }).is_err());
/// ```
pub fn validate_geographic_coord(c: Coord<f64>) -> Result<()> {
    check_axis("Longitude", c.x, LON_RANGE)?;
    check_axis("Latitude", c.y, LAT_RANGE)
}

const LON_RANGE: (f64, f64) = (-180.0, 180.0);
const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Overshoot, in degrees, a reprojected coordinate may have and still be clamped.
pub const CLAMP_TOLERANCE: f64 = 1e-9;

fn check_axis(axis: &str, value: f64, (lo, hi): (f64, f64)) -> Result<()> {
    if !value.is_finite() {
        return Err(GeoSortError::InvalidInput(format!(
            "{} must be finite, got: {}",
            axis, value
        )));
    }
    if !(lo..=hi).contains(&value) {
        return Err(GeoSortError::InvalidInput(format!(
            "{} out of range [{:.1}, {:.1}]: {}",
            axis, lo, hi, value
        )));
    }
    Ok(())
}

/// Validates both corners of a geographic envelope.
pub fn validate_geographic_envelope(envelope: &Rect<f64>) -> Result<()> {
    validate_geographic_coord(envelope.min())?;
    validate_geographic_coord(envelope.max())
}

/// Validates a geohash precision (1-12).
pub fn validate_precision(precision: usize) -> Result<()> {
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(GeoSortError::InvalidInput(format!(
            "Geohash precision must be between {} and {}, got: {}",
            MIN_PRECISION, MAX_PRECISION, precision
        )));
    }
    Ok(())
}

/// Clamp a reprojected envelope into the geographic domain.
///
/// Inverse projections can overshoot the domain by rounding near the poles
/// and the antimeridian. Overshoot up to [`CLAMP_TOLERANCE`] is pulled back
/// in; anything further out means the input lies outside the projection's
/// domain and is a transform error.
pub fn clamp_to_geographic(envelope: Rect<f64>) -> Result<Rect<f64>> {
    let min = clamp_coord(envelope.min())?;
    let max = clamp_coord(envelope.max())?;
    Ok(Rect::new(min, max))
}

fn clamp_coord(c: Coord<f64>) -> Result<Coord<f64>> {
    Ok(Coord {
        x: clamp_axis("Longitude", c.x, LON_RANGE)?,
        y: clamp_axis("Latitude", c.y, LAT_RANGE)?,
    })
}

fn clamp_axis(axis: &str, value: f64, (lo, hi): (f64, f64)) -> Result<f64> {
    if value.is_finite() && (lo - CLAMP_TOLERANCE..=hi + CLAMP_TOLERANCE).contains(&value) {
        return Ok(value.clamp(lo, hi));
    }
    log::warn!("Reprojected {} {} is outside [{}, {}]", axis, value, lo, hi);
    Err(GeoSortError::Transform(format!(
        "Reprojected {} out of range [{:.1}, {:.1}]: {}",
        axis.to_lowercase(),
        lo,
        hi,
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_valid_coords() {
        assert!(validate_geographic_coord(coord! { x: 0.0, y: 0.0 }).is_ok());
        assert!(validate_geographic_coord(coord! { x: 180.0, y: 90.0 }).is_ok());
        assert!(validate_geographic_coord(coord! { x: -180.0, y: -90.0 }).is_ok());
    }

    #[test]
    fn test_invalid_coords() {
        assert!(validate_geographic_coord(coord! { x: 180.1, y: 0.0 }).is_err());
        assert!(validate_geographic_coord(coord! { x: 0.0, y: -90.1 }).is_err());
        assert!(validate_geographic_coord(coord! { x: f64::NAN, y: 0.0 }).is_err());
        assert!(validate_geographic_coord(coord! { x: 0.0, y: f64::INFINITY }).is_err());
    }

    #[test]
    fn test_precision_bounds() {
        assert!(validate_precision(0).is_err());
        assert!(validate_precision(1).is_ok());
        assert!(validate_precision(12).is_ok());
        assert!(validate_precision(13).is_err());
    }

    #[test]
    fn test_clamp_rounding_overshoot() {
        let r = Rect::new(
            coord! { x: -180.000_000_000_1, y: 10.0 },
            coord! { x: 20.0, y: 90.000_000_000_2 },
        );
        let clamped = clamp_to_geographic(r).unwrap();
        assert_eq!(clamped.min(), coord! { x: -180.0, y: 10.0 });
        assert_eq!(clamped.max(), coord! { x: 20.0, y: 90.0 });
    }

    #[test]
    fn test_clamp_rejects_far_outside() {
        let r = Rect::new(coord! { x: 100.0, y: 0.0 }, coord! { x: 269.5, y: 1.0 });
        assert!(matches!(
            clamp_to_geographic(r),
            Err(GeoSortError::Transform(_))
        ));

        let r = Rect::new(coord! { x: 0.0, y: -90.0001 }, coord! { x: 1.0, y: 0.0 });
        assert!(clamp_to_geographic(r).is_err());
    }
}
