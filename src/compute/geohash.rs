//! Geohash keys for geometries.
//!
//! A key is computed from the geometry's envelope in longitude/latitude: both
//! corners are encoded at full precision and the key is their longest common
//! prefix. Points therefore get a full-precision key and larger geometries a
//! shorter one naming the smallest cell that holds both corners.
//!
//! At a bisection midpoint the coordinate goes to the upper half
//! (`value >= mid`), so `POINT(0 0)` encodes as `s00000000000`.

use super::validation::{
    clamp_to_geographic, validate_geographic_coord, validate_geographic_envelope,
    validate_precision,
};
use crate::crs::Crs;
use crate::error::{GeoSortError, Result};
use geo::{BoundingRect, Coord, Geometry, Rect};

/// Geohash alphabet; excludes `a`, `i`, `l` and `o`.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Precision used when none is configured.
pub const DEFAULT_PRECISION: usize = 12;

/// Encode a longitude/latitude coordinate as a geohash of `precision` characters.
///
/// # Examples
///
/// ```
/// use geosort::compute::geohash::encode;
/// use geo::coord;
///
/// assert_eq!(encode(coord! { x: 0.0, y: 0.0 }, 12).unwrap(), "s00000000000");
/// assert_eq!(encode(coord! { x: -74.0060, y: 40.7128 }, 7).unwrap(), "dr5regw");
/// ```
pub fn encode(c: Coord<f64>, precision: usize) -> Result<String> {
    validate_precision(precision)?;
    validate_geographic_coord(c)?;

    let (mut lon_lo, mut lon_hi) = (-180.0_f64, 180.0_f64);
    let (mut lat_lo, mut lat_hi) = (-90.0_f64, 90.0_f64);
    let mut hash = String::with_capacity(precision);
    let mut even = true;

    while hash.len() < precision {
        let mut index = 0usize;
        for _ in 0..5 {
            let (value, lo, hi) = if even {
                (c.x, &mut lon_lo, &mut lon_hi)
            } else {
                (c.y, &mut lat_lo, &mut lat_hi)
            };
            let mid = (*lo + *hi) / 2.0;
            if value >= mid {
                index = (index << 1) | 1;
                *lo = mid;
            } else {
                index <<= 1;
                *hi = mid;
            }
            even = !even;
        }
        hash.push(BASE32[index] as char);
    }

    Ok(hash)
}

/// Longest common prefix of two geohashes.
///
/// Compares characters, so the prefix always ends on a character boundary.
pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len: usize = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    &a[..len]
}

/// Computes geohash keys for geometries in a given reference system.
///
/// # Examples
///
/// ```
/// use geosort::GeoHashCalculator;
/// use geo::{Geometry, Point, Rect, coord};
///
/// let calc = GeoHashCalculator::default();
///
/// let point = Geometry::Point(Point::new(0.0, 0.0));
/// assert_eq!(calc.compute(&point).unwrap(), "s00000000000");
///
/// // Larger extents get shorter keys naming their enclosing cell
/// let paris = Geometry::Rect(Rect::new(
///     coord! { x: 2.25, y: 48.8 },
///     coord! { x: 2.45, y: 48.9 },
/// ));
/// assert_eq!(calc.compute(&paris).unwrap(), "u09");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeoHashCalculator {
    precision: usize,
    crs: Crs,
}

impl GeoHashCalculator {
    /// Create a calculator for geographic input.
    pub fn new(precision: usize) -> Result<Self> {
        validate_precision(precision)?;
        Ok(Self {
            precision,
            crs: Crs::Geographic,
        })
    }

    /// Set the reference system geometries are assumed to be in.
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Compute the key of a geometry in the calculator's reference system.
    pub fn compute(&self, geometry: &Geometry<f64>) -> Result<String> {
        self.compute_with_crs(geometry, &self.crs)
    }

    /// Compute the key of a geometry in an explicitly supplied reference system.
    ///
    /// Fails with [`GeoSortError::Transform`] when the envelope cannot be
    /// brought to geographic coordinates.
    pub fn compute_with_crs(&self, geometry: &Geometry<f64>, crs: &Crs) -> Result<String> {
        let envelope = geometry.bounding_rect().ok_or_else(|| {
            GeoSortError::InvalidInput("Cannot compute a geohash for an empty geometry".into())
        })?;

        let envelope = if crs.is_geographic() {
            envelope
        } else {
            clamp_to_geographic(crs.envelope_to_geographic(envelope)?)?
        };

        self.compute_envelope(envelope)
    }

    /// Compute the key of a geographic envelope.
    ///
    /// When the corners share no prefix at all the key falls back to the
    /// first-level cell holding the envelope centre, so it is never empty.
    pub fn compute_envelope(&self, envelope: Rect<f64>) -> Result<String> {
        if let Err(e) = validate_geographic_envelope(&envelope) {
            log::warn!("Rejecting envelope {:?}: {}", envelope, e);
            return Err(e);
        }

        let min_hash = encode(envelope.min(), self.precision)?;
        let max_hash = encode(envelope.max(), self.precision)?;
        let prefix = common_prefix(&min_hash, &max_hash);

        if prefix.is_empty() {
            encode(envelope.center(), 1)
        } else {
            Ok(prefix.to_string())
        }
    }
}

impl Default for GeoHashCalculator {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            crs: Crs::Geographic,
        }
    }
}
