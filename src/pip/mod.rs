//! Point-in-Polygon (PIP) region lookup.
//!
//! Loads administrative region boundaries from GeoJSON and resolves which
//! region contains a coordinate using planar ray-casting.

mod boundary;
mod geometry;
mod locator;

pub use boundary::{load_boundaries, read_boundaries, GeoFeature};
pub use geometry::{multipolygon_contains, polygon_contains, ring_contains};
pub use locator::RegionLocator;
