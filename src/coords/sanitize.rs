//! Repair of free-text coordinate tokens.

use regex::Regex;
use std::sync::LazyLock;

/// Longest leading numeric literal of a stripped token
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").unwrap());

/// Turn a raw coordinate cell into a number.
///
/// Every character other than digits, `.` and `-` is dropped. When more than
/// one `.` survives, the first is kept as the decimal point and the remaining
/// digit groups are joined onto the fraction, so `"5.49.487"` becomes
/// `5.49487`. The leading numeric literal is then parsed. Returns `None` for
/// absent, empty or unparseable tokens.
pub fn sanitize_token(token: Option<&str>) -> Option<f64> {
    let token = token?;

    let stripped: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if stripped.is_empty() {
        return None;
    }

    let collapsed = collapse_decimal_points(&stripped);

    let literal = NUMERIC_PREFIX.find(&collapsed)?.as_str();
    let value: f64 = literal.parse().ok()?;

    value.is_finite().then_some(value)
}

fn collapse_decimal_points(stripped: &str) -> String {
    let mut parts = stripped.split('.');
    let head = parts.next().unwrap_or_default();
    let tail: Vec<&str> = parts.collect();

    if tail.len() > 1 {
        format!("{}.{}", head, tail.concat())
    } else {
        stripped.to_string()
    }
}
