//! Administrative boundary features loaded from a GeoJSON FeatureCollection.

use flate2::read::GzDecoder;
use geo::BoundingRect;
use geo_types::{Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Coordinate, UNKNOWN_REGION};
use crate::pip::geometry::multipolygon_contains;

/// A single named region polygon
#[derive(Debug, Clone)]
pub struct GeoFeature {
    /// `shapeName` property
    pub name: Option<String>,
    /// `name` property, used when `shapeName` is missing
    pub alt_name: Option<String>,
    pub geometry: MultiPolygon<f64>,
    bbox: Option<Rect<f64>>,
}

impl GeoFeature {
    pub fn new(name: Option<String>, alt_name: Option<String>, geometry: MultiPolygon<f64>) -> Self {
        let bbox = geometry.bounding_rect();
        Self {
            name,
            alt_name,
            geometry,
            bbox,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.alt_name.as_deref())
            .unwrap_or(UNKNOWN_REGION)
    }

    /// Get the bounding box of this feature as (min_lng, min_lat, max_lng, max_lat)
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.bbox
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let point = Coord {
            x: coordinate.lng,
            y: coordinate.lat,
        };

        // A ray cast from outside the envelope never crosses an odd number of edges
        if let Some(rect) = self.bbox {
            if point.x < rect.min().x
                || point.x > rect.max().x
                || point.y < rect.min().y
                || point.y > rect.max().y
            {
                return false;
            }
        }

        multipolygon_contains(&self.geometry, point)
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// GeoJSON ring: positions may carry a third (altitude) element
type RawRing = Vec<Vec<f64>>;

/// Load the boundary dataset from disk. `.gz` files are decompressed.
pub fn load_boundaries(path: &Path) -> Result<Vec<GeoFeature>> {
    info!("Loading boundary dataset from {}", path.display());

    let load_error = |reason: String| Error::BoundaryDatasetLoad {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let features = read_boundaries(BufReader::new(reader)).map_err(|e| load_error(e.to_string()))?;

    if features.is_empty() {
        return Err(load_error("no Polygon or MultiPolygon features".to_string()));
    }

    info!("Loaded {} boundary features", features.len());
    Ok(features)
}

/// Parse a FeatureCollection, keeping dataset order.
///
/// Features without a Polygon/MultiPolygon geometry are skipped.
pub fn read_boundaries<R: Read>(reader: R) -> serde_json::Result<Vec<GeoFeature>> {
    let collection: FeatureCollection = serde_json::from_reader(reader)?;

    let mut features = Vec::with_capacity(collection.features.len());

    for (index, raw) in collection.features.into_iter().enumerate() {
        let properties = raw.properties.unwrap_or_default();
        let name = string_property(&properties, "shapeName");
        let alt_name = string_property(&properties, "name");

        let geometry = match raw.geometry {
            Some(g) => g,
            None => {
                debug!("Feature {} has no geometry", index);
                continue;
            }
        };

        let multi = match geometry.kind.as_str() {
            "Polygon" => to_polygon(serde_json::from_value(geometry.coordinates)?)
                .map(|p| MultiPolygon::new(vec![p])),
            "MultiPolygon" => {
                let parts: Vec<Polygon<f64>> =
                    serde_json::from_value::<Vec<Vec<RawRing>>>(geometry.coordinates)?
                        .into_iter()
                        .filter_map(to_polygon)
                        .collect();
                (!parts.is_empty()).then(|| MultiPolygon::new(parts))
            }
            other => {
                debug!("Skipping feature {} with {} geometry", index, other);
                continue;
            }
        };

        match multi {
            Some(geometry) => features.push(GeoFeature::new(name, alt_name, geometry)),
            None => warn!(
                "Feature {} ({}) has no usable exterior ring",
                index,
                name.as_deref().or(alt_name.as_deref()).unwrap_or("unnamed")
            ),
        }
    }

    Ok(features)
}

fn string_property(properties: &Map<String, Value>, key: &str) -> Option<String> {
    properties
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First ring is the exterior, the rest are holes
fn to_polygon(rings: Vec<RawRing>) -> Option<Polygon<f64>> {
    let mut rings = rings.into_iter().map(to_line_string);
    let exterior = rings.next()?;
    if exterior.0.len() < 3 {
        return None;
    }
    Some(Polygon::new(exterior, rings.collect()))
}

fn to_line_string(ring: RawRing) -> LineString<f64> {
    ring.into_iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| Coord { x: pos[0], y: pos[1] })
        .collect::<Vec<_>>()
        .into()
}
