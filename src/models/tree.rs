//! Three-level region tree handed to presentation layers.
//!
//! The tree is a derived view: district bucket -> administrative region ->
//! outlets. It is rebuilt from the store on every read and never persisted.

use serde::Serialize;

use super::{District, Outlet};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionTree {
    pub districts: Vec<DistrictNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistrictNode {
    /// "region-north" / "region-south"
    pub id: String,
    pub name: String,
    #[serde(skip)]
    pub district: District,
    pub regions: Vec<RegionNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionNode {
    /// Region name doubles as its id
    pub id: String,
    pub name: String,
    pub outlets: Vec<Outlet>,
}

impl RegionTree {
    pub fn district(&self, district: District) -> Option<&DistrictNode> {
        self.districts.iter().find(|d| d.district == district)
    }

    /// Total outlets placed in the tree
    pub fn outlet_count(&self) -> usize {
        self.districts.iter().map(DistrictNode::outlet_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

impl DistrictNode {
    pub fn region(&self, name: &str) -> Option<&RegionNode> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn outlet_count(&self) -> usize {
        self.regions.iter().map(|r| r.outlets.len()).sum()
    }
}
