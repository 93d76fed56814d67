//! Correction rules for coordinate pairs that were typed into the wrong
//! columns or lost their sign.

use serde::Deserialize;
use tracing::debug;

use crate::error::RowError;
use crate::models::Coordinate;

/// Operating-region bounds and repair thresholds.
///
/// Defaults describe the region the source extract covers: latitude 4..12,
/// longitude -4..2.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoordinateRules {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    /// Swap when |lat| is below and |lng| above this magnitude
    pub transpose_threshold: f64,
    /// Pairs with both magnitudes below this are placeholders
    pub null_island_epsilon: f64,
    /// Open interval of longitudes that get their sign restored
    pub sign_repair_min: f64,
    pub sign_repair_max: f64,
}

impl Default for CoordinateRules {
    fn default() -> Self {
        Self {
            min_lat: 4.0,
            max_lat: 12.0,
            min_lng: -4.0,
            max_lng: 2.0,
            transpose_threshold: 4.0,
            null_island_epsilon: 0.1,
            sign_repair_min: 1.5,
            sign_repair_max: 4.0,
        }
    }
}

impl CoordinateRules {
    pub fn in_bounds(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }

    /// Apply one correction pass to a parsed (lat, lng) pair.
    ///
    /// Transposition is checked first so a swapped pair gets a chance to land
    /// in range. A pair near the origin that is still out of range is a null
    /// placeholder and is rejected. A longitude inside the sign-repair window
    /// is negated; the window reaches past the eastern edge of the bounding
    /// box, so this also applies to the sliver between `sign_repair_min` and
    /// `max_lng`. Nothing is re-checked afterwards: other out-of-range pairs
    /// are returned unchanged and simply fail to match a region later on.
    pub fn repair(&self, lat: f64, lng: f64) -> Result<Coordinate, RowError> {
        let (mut lat, mut lng) = (lat, lng);

        if lat.abs() < self.transpose_threshold && lng.abs() > self.transpose_threshold {
            debug!("Swapping transposed coordinate ({}, {})", lat, lng);
            std::mem::swap(&mut lat, &mut lng);
        }

        // Applies inside the bounds too: (6.2, 1.8) must come out as (6.2, -1.8)
        let in_sign_window = lng > self.sign_repair_min && lng < self.sign_repair_max;

        if !self.in_bounds(lat, lng) || in_sign_window {
            if lat.abs() < self.null_island_epsilon && lng.abs() < self.null_island_epsilon {
                return Err(RowError::CoordinateOutOfRecoverableBounds { lat, lng });
            }

            if in_sign_window {
                debug!("Restoring missing sign on longitude {}", lng);
                lng = -lng;
            }
        }

        Ok(Coordinate::new(lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_pair_untouched() {
        let rules = CoordinateRules::default();
        assert_eq!(rules.repair(6.5, 0.0).unwrap(), Coordinate::new(6.5, 0.0));
        assert_eq!(rules.repair(9.4, -0.85).unwrap(), Coordinate::new(9.4, -0.85));
    }

    #[test]
    fn test_transposed_pair_swapped() {
        let rules = CoordinateRules::default();
        let c = rules.repair(0.0927, 6.23685).unwrap();
        assert_eq!(c.lat, 6.23685);
        assert_eq!(c.lng, 0.0927);
    }

    #[test]
    fn test_missing_sign_restored() {
        let rules = CoordinateRules::default();
        assert_eq!(rules.repair(6.2, 1.8).unwrap(), Coordinate::new(6.2, -1.8));
    }

    #[test]
    fn test_outside_repair_window_left_alone() {
        let rules = CoordinateRules::default();
        let c = rules.repair(6.2, 5.0).unwrap();
        assert_eq!(c, Coordinate::new(6.2, 5.0));
        assert!(!rules.in_bounds(c.lat, c.lng));
    }

    #[test]
    fn test_null_island_rejected() {
        let rules = CoordinateRules::default();
        assert!(matches!(
            rules.repair(0.02, -0.01),
            Err(RowError::CoordinateOutOfRecoverableBounds { .. })
        ));
    }

    #[test]
    fn test_single_pass_only() {
        let rules = CoordinateRules::default();
        // Swapped into range, then the longitude sits in the sign window
        assert_eq!(rules.repair(1.8, 6.2).unwrap(), Coordinate::new(6.2, -1.8));
        // Sign lost on a transposed latitude is not recoverable
        assert_eq!(rules.repair(-6.2, 1.0).unwrap(), Coordinate::new(-6.2, 1.0));
        // Far out of range and outside the window: returned untouched
        assert_eq!(rules.repair(40.0, -70.0).unwrap(), Coordinate::new(40.0, -70.0));
    }

    #[test]
    fn test_custom_bounds() {
        let rules = CoordinateRules {
            max_lng: 1.5,
            ..CoordinateRules::default()
        };
        assert!(!rules.in_bounds(6.0, 1.6));
        assert_eq!(rules.repair(6.0, 1.6).unwrap(), Coordinate::new(6.0, -1.6));
    }
}
