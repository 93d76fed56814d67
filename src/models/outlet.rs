//! Persisted outlet record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region name assigned when no boundary feature contains the outlet.
pub const UNKNOWN_REGION: &str = "Unknown Region";

/// Address assigned when the source row leaves it blank.
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Coarse two-way district tag carried by the source extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum District {
    North,
    South,
}

impl District {
    /// Resolve a raw district cell. Anything other than north/south is unrecognized.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("north") {
            Some(District::North)
        } else if tag.eq_ignore_ascii_case("south") {
            Some(District::South)
        } else {
            None
        }
    }

    /// Display label used by presentation layers
    pub fn label(&self) -> &'static str {
        match self {
            District::North => "District North",
            District::South => "District South",
        }
    }

    /// Stable identifier of the district bucket in the region tree
    pub fn bucket_id(&self) -> &'static str {
        match self {
            District::North => "region-north",
            District::South => "region-south",
        }
    }

    pub fn all() -> &'static [District] {
        &[District::North, District::South]
    }
}

impl std::fmt::Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            District::North => write!(f, "North"),
            District::South => write!(f, "South"),
        }
    }
}

/// Planar (longitude, latitude) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lng, lat }
    }
}

/// Outlet document stored in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    /// Unique identifier, see [`crate::pipeline::OutletIds`]
    pub id: String,

    pub name: String,

    pub address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Outlet type column from the source (e.g. "Mainstream")
    pub outlet_type: String,

    pub coordinate: Coordinate,

    pub district: District,

    /// Containing administrative region, or [`UNKNOWN_REGION`]
    pub admin_region: String,

    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,

    /// Price observations attached by other tooling. Not interpreted here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<serde_json::Value>,
}

impl Outlet {
    pub fn is_resolved(&self) -> bool {
        self.admin_region != UNKNOWN_REGION
    }

    /// Map search link for the outlet's coordinate
    pub fn location_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.coordinate.lat, self.coordinate.lng
        )
    }
}
