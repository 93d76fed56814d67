//! Region lookup for a single coordinate.

use tracing::debug;

use super::GeoFeature;
use crate::models::Coordinate;

/// Point-in-Polygon lookup over a fixed set of region features.
///
/// Features are scanned linearly in dataset order. The set is small (tens of
/// regions) and lookups happen once per outlet at ingestion time.
pub struct RegionLocator {
    features: Vec<GeoFeature>,
}

impl RegionLocator {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    /// Name of the first feature containing the coordinate
    pub fn locate(&self, coordinate: Coordinate) -> Option<&str> {
        let found = self
            .features
            .iter()
            .find(|f| f.contains(coordinate))
            .map(GeoFeature::display_name);

        debug!(
            "PIP lookup at ({}, {}): {}",
            coordinate.lng,
            coordinate.lat,
            found.unwrap_or("unresolved")
        );

        found
    }

    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, MultiPolygon, Polygon};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (min_x, max_y),
                (max_x, max_y),
                (max_x, min_y),
                (min_x, min_y),
            ]),
            vec![],
        )
    }

    fn feature(name: &str, parts: Vec<Polygon<f64>>) -> GeoFeature {
        GeoFeature::new(Some(name.to_string()), None, MultiPolygon::new(parts))
    }

    #[test]
    fn test_empty_locator() {
        let locator = RegionLocator::new(vec![]);
        assert!(locator.is_empty());
        assert_eq!(locator.locate(Coordinate::new(6.5, 0.0)), None);
    }

    #[test]
    fn test_first_match_wins() {
        let locator = RegionLocator::new(vec![
            feature("Greater Accra", vec![rect(-0.5, 5.0, 0.5, 6.0)]),
            feature("Eastern", vec![rect(-1.0, 5.0, 1.0, 8.0)]),
        ]);
        assert_eq!(locator.len(), 2);
        assert_eq!(locator.locate(Coordinate::new(5.5, 0.0)), Some("Greater Accra"));
        assert_eq!(locator.locate(Coordinate::new(7.0, 0.0)), Some("Eastern"));
        assert_eq!(locator.locate(Coordinate::new(9.0, 0.0)), None);
    }

    #[test]
    fn test_multipolygon_part() {
        let locator = RegionLocator::new(vec![feature(
            "Volta",
            vec![rect(0.0, 0.0, 1.0, 1.0), rect(2.0, 2.0, 3.0, 3.0)],
        )]);
        assert_eq!(locator.locate(Coordinate::new(2.5, 2.5)), Some("Volta"));
        assert_eq!(locator.locate(Coordinate::new(1.5, 1.5)), None);
    }

    #[test]
    fn test_unnamed_feature() {
        let locator = RegionLocator::new(vec![GeoFeature::new(
            None,
            None,
            MultiPolygon::new(vec![rect(-1.0, 5.0, 1.0, 8.0)]),
        )]);
        assert_eq!(
            locator.locate(Coordinate::new(6.0, 0.0)),
            Some(crate::models::UNKNOWN_REGION)
        );
    }
}
