//! Error types for geosort.

use geosort_types::SchemaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoSortError>;

#[derive(Debug, Error)]
pub enum GeoSortError {
    /// The source reference system could not be brought to geographic coordinates.
    #[error("Coordinate transform failed: {0}")]
    Transform(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SchemaError> for GeoSortError {
    fn from(err: SchemaError) -> Self {
        GeoSortError::Schema(err.to_string())
    }
}

impl From<geojson::Error> for GeoSortError {
    fn from(err: geojson::Error) -> Self {
        GeoSortError::Parse(format!("GeoJSON: {}", err))
    }
}

impl From<geozero::error::GeozeroError> for GeoSortError {
    fn from(err: geozero::error::GeozeroError) -> Self {
        GeoSortError::Parse(format!("WKT: {}", err))
    }
}
