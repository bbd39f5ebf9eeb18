//! Reading and writing geometries and feature collections.

pub mod geojson;
pub mod wkt;
