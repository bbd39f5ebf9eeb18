//! Coordinate reference systems and reprojection to geographic coordinates.
//!
//! Geohash keys are always computed in longitude/latitude. This module brings
//! coordinates of the supported reference systems to that space:
//!
//! - **Geographic** (EPSG:4326, CRS:84): identity, x = longitude, y = latitude
//! - **Web Mercator** (EPSG:3857): the `webmerc` operator
//! - **UTM** (EPSG:326zz north, EPSG:327zz south): the `utm` operator on WGS84
//! - **PROJ** (feature `proj`): any definition the PROJ library understands
//!
//! Web Mercator and UTM run through Rust Geodesy, so no native library is
//! needed for them. Axis order is always x/y (easting/northing,
//! longitude/latitude).

use crate::error::{GeoSortError, Result};
use geo::{Coord, Rect, coord};
use geodesy::prelude::{Context, Coor2D, Direction, Minimal};
use std::fmt;
#[cfg(feature = "proj")]
use std::sync::Arc;

/// Web Mercator latitude limit.
const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Half the width of the Web Mercator square, in meters.
const MERCATOR_EXTENT: f64 = 20_037_508.342_789_244;

/// A reference system the crate can reproject to and from geographic coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Crs {
    /// Longitude/latitude in degrees on WGS84.
    #[default]
    Geographic,
    /// Spherical (pseudo) Mercator in meters.
    WebMercator,
    /// Universal Transverse Mercator on WGS84, meters.
    Utm { zone: u8, north: bool },
    /// A PROJ-backed reference system.
    #[cfg(feature = "proj")]
    Proj(Arc<ProjCrs>),
}

impl Crs {
    /// Build a UTM reference system, checking the zone.
    pub fn utm(zone: u8, north: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(GeoSortError::Transform(format!(
                "UTM zone must be between 1 and 60, got: {}",
                zone
            )));
        }
        Ok(Crs::Utm { zone, north })
    }

    /// Resolve a reference system identifier.
    ///
    /// Accepts bare EPSG numbers, `EPSG:nnnn`, OGC URNs and URLs, and the
    /// `CRS:84` / `OGC:CRS84` aliases.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosort::Crs;
    ///
    /// assert_eq!(Crs::from_code("EPSG:4326").unwrap(), Crs::Geographic);
    /// assert_eq!(Crs::from_code("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(), Crs::Geographic);
    /// assert_eq!(Crs::from_code("3857").unwrap(), Crs::WebMercator);
    /// assert_eq!(
    ///     Crs::from_code("EPSG:32632").unwrap(),
    ///     Crs::Utm { zone: 32, north: true }
    /// );
    /// ```
    pub fn from_code(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        let upper = trimmed.to_ascii_uppercase();

        if upper.ends_with("CRS84") || upper == "CRS:84" {
            return Ok(Crs::Geographic);
        }

        let number = upper
            .rsplit([':', '/', '#'])
            .next()
            .and_then(|tail| tail.parse::<u32>().ok());

        match number {
            Some(4326) => Ok(Crs::Geographic),
            Some(3857 | 900913 | 3785 | 102100) => Ok(Crs::WebMercator),
            Some(n @ 32601..=32660) => Crs::utm((n - 32600) as u8, true),
            Some(n @ 32701..=32760) => Crs::utm((n - 32700) as u8, false),
            _ => Self::fallback(trimmed),
        }
    }

    #[cfg(feature = "proj")]
    fn fallback(code: &str) -> Result<Self> {
        Ok(Crs::Proj(Arc::new(ProjCrs::new(code)?)))
    }

    #[cfg(not(feature = "proj"))]
    fn fallback(code: &str) -> Result<Self> {
        Err(GeoSortError::Transform(format!(
            "Unsupported coordinate reference system: {}",
            code
        )))
    }

    /// Canonical identifier of this reference system.
    pub fn code(&self) -> String {
        match self {
            Crs::Geographic => "EPSG:4326".to_string(),
            Crs::WebMercator => "EPSG:3857".to_string(),
            Crs::Utm { zone, north: true } => format!("EPSG:{}", 32600 + u32::from(*zone)),
            Crs::Utm { zone, north: false } => format!("EPSG:{}", 32700 + u32::from(*zone)),
            #[cfg(feature = "proj")]
            Crs::Proj(p) => p.definition.clone(),
        }
    }

    /// Whether coordinates are already longitude/latitude.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic)
    }

    /// Transform a coordinate of this system to longitude/latitude degrees.
    pub fn to_geographic(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        let [out] = self.to_geographic_all([c])?;
        Ok(out)
    }

    /// Transform longitude/latitude degrees into this system.
    pub fn from_geographic(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        if !c.x.is_finite() || !c.y.is_finite() || c.y.abs() > 90.0 {
            return Err(GeoSortError::Transform(format!(
                "Invalid geographic coordinate ({}, {})",
                c.x, c.y
            )));
        }

        let out = match self {
            Crs::Geographic => c,
            Crs::WebMercator if c.y.abs() > MERCATOR_MAX_LAT => {
                return Err(GeoSortError::Transform(format!(
                    "Latitude {} is outside the Web Mercator domain",
                    c.y
                )));
            }
            Crs::WebMercator | Crs::Utm { .. } => {
                let mut data = [Coor2D([c.x.to_radians(), c.y.to_radians()])];
                self.apply(Direction::Fwd, &mut data)?;
                let [Coor2D([x, y])] = data;
                coord! { x: x, y: y }
            }
            #[cfg(feature = "proj")]
            Crs::Proj(p) => p.from_geographic(c)?,
        };

        check_output(out, self)
    }

    /// Transform several coordinates with a single operator instantiation.
    fn to_geographic_all<const N: usize>(
        &self,
        coords: [Coord<f64>; N],
    ) -> Result<[Coord<f64>; N]> {
        for c in &coords {
            self.check_domain(*c)?;
        }

        let out = match self {
            Crs::Geographic => coords,
            Crs::WebMercator | Crs::Utm { .. } => {
                let mut data = coords.map(|c| Coor2D([c.x, c.y]));
                self.apply(Direction::Inv, &mut data)?;
                data.map(|Coor2D([lon, lat])| coord! { x: lon.to_degrees(), y: lat.to_degrees() })
            }
            #[cfg(feature = "proj")]
            Crs::Proj(p) => {
                let mut out = coords;
                for c in out.iter_mut() {
                    *c = p.to_geographic(*c)?;
                }
                out
            }
        };

        for c in &out {
            check_output(*c, self)?;
        }
        Ok(out)
    }

    /// Reject input coordinates the system cannot hold.
    fn check_domain(&self, c: Coord<f64>) -> Result<()> {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(GeoSortError::Transform(format!(
                "Cannot transform non-finite coordinate ({}, {}) from {}",
                c.x, c.y, self
            )));
        }
        if matches!(self, Crs::WebMercator)
            && (c.x.abs() > MERCATOR_EXTENT || c.y.abs() > MERCATOR_EXTENT)
        {
            return Err(GeoSortError::Transform(format!(
                "Coordinate ({}, {}) is outside the Web Mercator extent",
                c.x, c.y
            )));
        }
        Ok(())
    }

    /// Rust Geodesy operator definition for the built-in projected systems.
    fn operator(&self) -> Option<String> {
        match self {
            Crs::WebMercator => Some("webmerc".to_string()),
            Crs::Utm { zone, north: true } => Some(format!("utm zone={}", zone)),
            Crs::Utm { zone, north: false } => Some(format!("utm zone={} south", zone)),
            _ => None,
        }
    }

    /// Run the geodesy operator of this system over `data` in place.
    ///
    /// Points the operator cannot map come back as NaN and are rejected by
    /// the output check.
    fn apply<const N: usize>(&self, direction: Direction, data: &mut [Coor2D; N]) -> Result<()> {
        let definition = self.operator().ok_or_else(|| {
            GeoSortError::Transform(format!("No geodesy operator for {}", self))
        })?;

        let mut ctx = Minimal::new();
        let op = ctx.op(&definition).map_err(|e| {
            GeoSortError::Transform(format!("Invalid operator '{}': {}", definition, e))
        })?;
        ctx.apply(op, direction, data).map_err(|e| {
            GeoSortError::Transform(format!("Transform through {} failed: {}", self, e))
        })?;
        Ok(())
    }

    /// Reproject an envelope to a geographic envelope.
    ///
    /// All four corners are transformed and the result is their bounding
    /// rectangle, since a projected rectangle is not axis-aligned in
    /// longitude/latitude.
    pub fn envelope_to_geographic(&self, envelope: Rect<f64>) -> Result<Rect<f64>> {
        if self.is_geographic() {
            return Ok(envelope);
        }

        let (min, max) = (envelope.min(), envelope.max());
        let corners = [
            min,
            coord! { x: max.x, y: min.y },
            max,
            coord! { x: min.x, y: max.y },
        ];

        let mut lo = coord! { x: f64::INFINITY, y: f64::INFINITY };
        let mut hi = coord! { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
        for g in self.to_geographic_all(corners)? {
            lo.x = lo.x.min(g.x);
            lo.y = lo.y.min(g.y);
            hi.x = hi.x.max(g.x);
            hi.y = hi.y.max(g.y);
        }

        Ok(Rect::new(lo, hi))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

fn check_output(c: Coord<f64>, crs: &Crs) -> Result<Coord<f64>> {
    if c.x.is_finite() && c.y.is_finite() {
        Ok(c)
    } else {
        log::warn!("Transform through {} produced a non-finite coordinate", crs);
        Err(GeoSortError::Transform(format!(
            "Transform through {} is undefined for this coordinate",
            crs
        )))
    }
}

/// A reference system resolved through the PROJ library.
#[cfg(feature = "proj")]
pub struct ProjCrs {
    definition: String,
    to_geo: proj::Proj,
    from_geo: proj::Proj,
}

#[cfg(feature = "proj")]
impl ProjCrs {
    pub fn new(definition: &str) -> Result<Self> {
        let to_geo = proj::Proj::new_known_crs(definition, "EPSG:4326", None).map_err(|e| {
            GeoSortError::Transform(format!(
                "Failed to create projection from {} to EPSG:4326: {}",
                definition, e
            ))
        })?;
        let from_geo = proj::Proj::new_known_crs("EPSG:4326", definition, None).map_err(|e| {
            GeoSortError::Transform(format!(
                "Failed to create projection from EPSG:4326 to {}: {}",
                definition, e
            ))
        })?;
        Ok(Self {
            definition: definition.to_string(),
            to_geo,
            from_geo,
        })
    }

    fn to_geographic(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        let (x, y) = self
            .to_geo
            .convert((c.x, c.y))
            .map_err(|e| GeoSortError::Transform(format!("Projection failed: {}", e)))?;
        Ok(coord! { x: x, y: y })
    }

    fn from_geographic(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        let (x, y) = self
            .from_geo
            .convert((c.x, c.y))
            .map_err(|e| GeoSortError::Transform(format!("Projection failed: {}", e)))?;
        Ok(coord! { x: x, y: y })
    }
}

#[cfg(feature = "proj")]
impl fmt::Debug for ProjCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjCrs")
            .field("definition", &self.definition)
            .finish()
    }
}

#[cfg(feature = "proj")]
impl PartialEq for ProjCrs {
    fn eq(&self, other: &Self) -> bool {
        self.definition == other.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Coord<f64>, b: Coord<f64>, tol: f64) {
        assert!(
            (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol,
            "{:?} != {:?} (tolerance {})",
            a,
            b,
            tol
        );
    }

    #[test]
    fn test_code_parsing() {
        assert_eq!(Crs::from_code("4326").unwrap(), Crs::Geographic);
        assert_eq!(Crs::from_code("CRS:84").unwrap(), Crs::Geographic);
        assert_eq!(
            Crs::from_code("urn:ogc:def:crs:EPSG::4326").unwrap(),
            Crs::Geographic
        );
        assert_eq!(
            Crs::from_code("http://www.opengis.net/def/crs/EPSG/0/3857").unwrap(),
            Crs::WebMercator
        );
        assert_eq!(Crs::from_code("EPSG:900913").unwrap(), Crs::WebMercator);
        assert_eq!(
            Crs::from_code("epsg:32733").unwrap(),
            Crs::Utm {
                zone: 33,
                north: false
            }
        );
    }

    #[cfg(not(feature = "proj"))]
    #[test]
    fn test_unknown_code_is_transform_error() {
        let err = Crs::from_code("EPSG:27700").unwrap_err();
        assert!(matches!(err, GeoSortError::Transform(_)));
    }

    #[test]
    fn test_code_roundtrip() {
        for code in ["EPSG:4326", "EPSG:3857", "EPSG:32632", "EPSG:32701"] {
            assert_eq!(Crs::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_utm_zone_bounds() {
        assert!(Crs::utm(0, true).is_err());
        assert!(Crs::utm(61, true).is_err());
        assert!(Crs::utm(60, false).is_ok());
    }

    #[test]
    fn test_utm_central_meridian_origin() {
        let utm32 = Crs::utm(32, true).unwrap();
        let geo = utm32
            .to_geographic(coord! { x: 500_000.0, y: 0.0 })
            .unwrap();
        assert_close(geo, coord! { x: 9.0, y: 0.0 }, 1e-9);
    }

    #[test]
    fn test_utm_forward_reference_point() {
        // Copenhagen area, 12E 55N in zone 32
        let utm32 = Crs::utm(32, true).unwrap();
        let projected = utm32
            .from_geographic(coord! { x: 12.0, y: 55.0 })
            .unwrap();
        assert_close(
            projected,
            coord! { x: 691_875.632, y: 6_098_907.825 },
            1e-3,
        );
    }

    #[test]
    fn test_utm_roundtrip() {
        let utm = Crs::utm(18, true).unwrap();
        let nyc = coord! { x: -74.0060, y: 40.7128 };
        let projected = utm.from_geographic(nyc).unwrap();
        let back = utm.to_geographic(projected).unwrap();
        assert_close(back, nyc, 1e-7);

        let south = Crs::utm(56, false).unwrap();
        let sydney = coord! { x: 151.2093, y: -33.8688 };
        let back = south
            .to_geographic(south.from_geographic(sydney).unwrap())
            .unwrap();
        assert_close(back, sydney, 1e-7);
    }

    #[test]
    fn test_web_mercator_roundtrip() {
        let c = coord! { x: 2.3522, y: 48.8566 };
        let projected = Crs::WebMercator.from_geographic(c).unwrap();
        let back = Crs::WebMercator.to_geographic(projected).unwrap();
        assert_close(back, c, 1e-9);
    }

    #[test]
    fn test_web_mercator_rejects_poles() {
        let err = Crs::WebMercator
            .from_geographic(coord! { x: 0.0, y: 89.9 })
            .unwrap_err();
        assert!(matches!(err, GeoSortError::Transform(_)));
    }

    #[test]
    fn test_web_mercator_rejects_outside_extent() {
        let err = Crs::WebMercator
            .to_geographic(coord! { x: 3e7, y: 0.0 })
            .unwrap_err();
        assert!(matches!(err, GeoSortError::Transform(_)));
        assert!(Crs::WebMercator.to_geographic(coord! { x: 2e7, y: 0.0 }).is_ok());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let err = Crs::WebMercator
            .to_geographic(coord! { x: f64::NAN, y: 0.0 })
            .unwrap_err();
        assert!(matches!(err, GeoSortError::Transform(_)));
    }

    #[test]
    fn test_envelope_to_geographic_uses_all_corners() {
        let utm32 = Crs::utm(32, true).unwrap();
        let envelope = Rect::new(
            coord! { x: 400_000.0, y: 5_000_000.0 },
            coord! { x: 600_000.0, y: 5_200_000.0 },
        );
        let geo = utm32.envelope_to_geographic(envelope).unwrap();

        for corner in [
            coord! { x: 400_000.0, y: 5_000_000.0 },
            coord! { x: 600_000.0, y: 5_000_000.0 },
            coord! { x: 400_000.0, y: 5_200_000.0 },
            coord! { x: 600_000.0, y: 5_200_000.0 },
        ] {
            let g = utm32.to_geographic(corner).unwrap();
            assert!(g.x >= geo.min().x && g.x <= geo.max().x);
            assert!(g.y >= geo.min().y && g.y <= geo.max().y);
        }
    }

    #[test]
    fn test_geographic_envelope_is_identity() {
        let envelope = Rect::new(coord! { x: -10.0, y: -5.0 }, coord! { x: 10.0, y: 5.0 });
        assert_eq!(Crs::Geographic.envelope_to_geographic(envelope).unwrap(), envelope);
    }
}
