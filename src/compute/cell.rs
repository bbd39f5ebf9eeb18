//! Geohash cell helpers: bounds, neighbours and prefix containment.

use super::geohash::BASE32;
use super::validation::MAX_PRECISION;
use crate::error::{GeoSortError, Result};
use geo::Rect;
use geohash::{Neighbors, decode_bbox, neighbors};

/// Check that `hash` is a non-empty geohash of at most 12 valid characters.
pub fn validate_hash(hash: &str) -> Result<()> {
    if hash.is_empty() || hash.len() > MAX_PRECISION {
        return Err(GeoSortError::InvalidInput(format!(
            "Geohash length must be between 1 and {}, got: {}",
            MAX_PRECISION,
            hash.len()
        )));
    }
    if let Some(bad) = hash.bytes().find(|b| !BASE32.contains(b)) {
        return Err(GeoSortError::InvalidInput(format!(
            "Invalid geohash character '{}' in '{}'",
            bad as char, hash
        )));
    }
    Ok(())
}

/// The longitude/latitude rectangle covered by a geohash cell.
///
/// # Examples
///
/// ```
/// use geosort::compute::cell::cell_bounds;
///
/// let s = cell_bounds("s").unwrap();
/// assert_eq!((s.min().x, s.min().y), (0.0, 0.0));
/// assert_eq!((s.max().x, s.max().y), (45.0, 45.0));
/// ```
pub fn cell_bounds(hash: &str) -> Result<Rect<f64>> {
    validate_hash(hash)?;
    decode_bbox(hash).map_err(|e| GeoSortError::InvalidInput(format!("{}: {}", hash, e)))
}

/// The eight cells adjacent to a geohash cell, at the same precision.
pub fn cell_neighbors(hash: &str) -> Result<Neighbors> {
    validate_hash(hash)?;
    neighbors(hash).map_err(|e| GeoSortError::InvalidInput(format!("{}: {}", hash, e)))
}

/// Whether the cell `ancestor` spatially contains the cell `descendant`.
///
/// A cell contains itself. The empty key is the whole world.
pub fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    descendant.starts_with(ancestor)
}

/// Truncate a key to at most `len` characters, naming an enclosing cell.
pub fn parent(hash: &str, len: usize) -> &str {
    hash.char_indices().nth(len).map_or(hash, |(i, _)| &hash[..i])
}
