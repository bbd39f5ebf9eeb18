//! Compute layer for geohash keys.
//!
//! This module holds the pure algorithms of the crate:
//! - Geohash encoding and the envelope key calculator
//! - Cell helpers (bounds, neighbours, containment)
//! - Input validation shared by both
//!
//! Nothing here knows about features or collections.

pub mod cell;
pub mod geohash;
pub mod validation;
