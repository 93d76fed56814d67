//! Core data models for the outlet dataset.

pub mod outlet;
pub mod tree;

pub use outlet::{Coordinate, District, Outlet, UNKNOWN_ADDRESS, UNKNOWN_REGION};
pub use tree::{DistrictNode, RegionNode, RegionTree};
