//! Coordinate repair: token sanitizing and pair heuristics.

mod heuristics;
mod sanitize;

pub use heuristics::CoordinateRules;
pub use sanitize::sanitize_token;

use crate::error::RowError;
use crate::models::Coordinate;

/// Sanitize both raw tokens and run the pair heuristics over the result.
pub fn resolve_coordinate(
    lat_token: Option<&str>,
    lng_token: Option<&str>,
    rules: &CoordinateRules,
) -> Result<Coordinate, RowError> {
    let lat = sanitize_token(lat_token).ok_or_else(|| invalid_token(lat_token))?;
    let lng = sanitize_token(lng_token).ok_or_else(|| invalid_token(lng_token))?;
    rules.repair(lat, lng)
}

fn invalid_token(token: Option<&str>) -> RowError {
    RowError::InvalidCoordinateToken(token.unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_coordinate() {
        let rules = CoordinateRules::default();
        let c = resolve_coordinate(Some("6.23685"), Some("0.09270"), &rules).unwrap();
        assert_eq!(c, Coordinate::new(6.23685, 0.0927));

        let err = resolve_coordinate(Some("?"), Some("0.1"), &rules).unwrap_err();
        assert_eq!(err, RowError::InvalidCoordinateToken("?".to_string()));

        let err = resolve_coordinate(Some("6.2"), None, &rules).unwrap_err();
        assert_eq!(err, RowError::InvalidCoordinateToken(String::new()));
    }
}
