//! Compass labels for headings and courses.

/// Label used when a vessel reports no heading or course
pub const UNKNOWN_DIRECTION: &str = "unknown";

const DIRECTIONS_8: [&str; 8] = [
    "north",
    "north-east",
    "east",
    "south-east",
    "south",
    "south-west",
    "west",
    "north-west",
];

const DIRECTIONS_16: [&str; 16] = [
    "north",
    "north-north-east",
    "north-east",
    "east-north-east",
    "east",
    "east-south-east",
    "south-east",
    "south-south-east",
    "south",
    "south-south-west",
    "south-west",
    "west-south-west",
    "west",
    "west-north-west",
    "north-west",
    "north-north-west",
];

const DIRECTIONS_SHORT: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

fn normalize(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

fn sector(degrees: f64, sectors: usize) -> usize {
    let width = 360.0 / sectors as f64;
    ((normalize(degrees) + width / 2.0) / width) as usize % sectors
}

/// 8-point compass label ("north", "north-east", ...).
///
/// Each label covers 45°, centred on its bearing, so north spans
/// 337.5° up to (not including) 22.5°.
pub fn compass_8point(degrees: Option<f64>) -> &'static str {
    match degrees {
        Some(d) if d.is_finite() => DIRECTIONS_8[sector(d, 8)],
        _ => UNKNOWN_DIRECTION,
    }
}

/// 16-point compass label ("north-north-east", ...), 22.5° sectors
pub fn compass_16point(degrees: Option<f64>) -> &'static str {
    match degrees {
        Some(d) if d.is_finite() => DIRECTIONS_16[sector(d, 16)],
        _ => UNKNOWN_DIRECTION,
    }
}

/// Abbreviated 8-point label ("N", "NE", ...), "?" when unknown
pub fn compass_short(degrees: Option<f64>) -> &'static str {
    match degrees {
        Some(d) if d.is_finite() => DIRECTIONS_SHORT[sector(d, 8)],
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_8point_cardinals() {
        assert_eq!(compass_8point(Some(0.0)), "north");
        assert_eq!(compass_8point(Some(45.0)), "north-east");
        assert_eq!(compass_8point(Some(90.0)), "east");
        assert_eq!(compass_8point(Some(135.0)), "south-east");
        assert_eq!(compass_8point(Some(180.0)), "south");
        assert_eq!(compass_8point(Some(225.0)), "south-west");
        assert_eq!(compass_8point(Some(270.0)), "west");
        assert_eq!(compass_8point(Some(315.0)), "north-west");
    }

    #[test]
    fn test_compass_8point_boundaries() {
        assert_eq!(compass_8point(Some(22.4)), "north");
        assert_eq!(compass_8point(Some(22.5)), "north-east");
        assert_eq!(compass_8point(Some(337.4)), "north-west");
        assert_eq!(compass_8point(Some(337.5)), "north");
        assert_eq!(compass_8point(Some(359.9)), "north");
    }

    #[test]
    fn test_compass_8point_normalizes() {
        assert_eq!(compass_8point(Some(360.0)), "north");
        assert_eq!(compass_8point(Some(405.0)), "north-east");
        assert_eq!(compass_8point(Some(-90.0)), "west");
    }

    #[test]
    fn test_compass_unknown() {
        assert_eq!(compass_8point(None), "unknown");
        assert_eq!(compass_8point(Some(f64::NAN)), "unknown");
        assert_eq!(compass_16point(None), "unknown");
        assert_eq!(compass_short(None), "?");
    }

    #[test]
    fn test_compass_16point() {
        assert_eq!(compass_16point(Some(0.0)), "north");
        assert_eq!(compass_16point(Some(22.5)), "north-north-east");
        assert_eq!(compass_16point(Some(11.2)), "north");
        assert_eq!(compass_16point(Some(11.25)), "north-north-east");
        assert_eq!(compass_16point(Some(200.0)), "south-south-west");
    }

    #[test]
    fn test_compass_short() {
        assert_eq!(compass_short(Some(0.0)), "N");
        assert_eq!(compass_short(Some(100.0)), "E");
        assert_eq!(compass_short(Some(230.0)), "SW");
    }
}
