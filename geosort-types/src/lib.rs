//! # geosort-types
//!
//! Feature model types for the geosort crate.
//!
//! - **Attributes**: `AttributeKind`, `AttributeValue`, `AttributeDescriptor`
//! - **Schemas**: `Schema`, an ordered list of attribute descriptors with a
//!   default geometry column
//! - **Features**: `Feature`, an identified row of values aligned with a schema
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geosort_types::attribute::{AttributeDescriptor, AttributeKind, AttributeValue};
//! use geosort_types::feature::Feature;
//! use geosort_types::schema::Schema;
//! use geo::{Geometry, Point};
//!
//! let schema = Schema::new(
//!     "cities",
//!     vec![
//!         AttributeDescriptor::new("name", AttributeKind::String),
//!         AttributeDescriptor::new("location", AttributeKind::Geometry),
//!     ],
//! );
//!
//! let nyc = Feature::new(
//!     "cities.1",
//!     vec![
//!         AttributeValue::from("New York"),
//!         AttributeValue::from(Geometry::Point(Point::new(-74.0060, 40.7128))),
//!     ],
//! );
//!
//! assert!(nyc.geometry(&schema).is_some());
//! ```

pub mod attribute;
pub mod feature;
pub mod schema;

pub use attribute::{AttributeDescriptor, AttributeKind, AttributeValue};
pub use feature::Feature;
pub use schema::{Schema, SchemaError};
