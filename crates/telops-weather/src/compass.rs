//! 16-point compass codes to degrees.

/// Compass sectors, clockwise from north in 22.5 degree steps.
pub const COMPASS_POINTS: [(&str, f64); 16] = [
    ("N", 0.0),
    ("NNE", 22.5),
    ("NE", 45.0),
    ("ENE", 67.5),
    ("E", 90.0),
    ("ESE", 112.5),
    ("SE", 135.0),
    ("SSE", 157.5),
    ("S", 180.0),
    ("SSW", 202.5),
    ("SW", 225.0),
    ("WSW", 247.5),
    ("W", 270.0),
    ("WNW", 292.5),
    ("NW", 315.0),
    ("NNW", 337.5),
];

/// Degrees for an exact compass code, `None` for anything else.
///
/// No trimming or case folding happens here.
pub fn to_degrees(code: &str) -> Option<f64> {
    COMPASS_POINTS
        .iter()
        .find(|(point, _)| *point == code)
        .map(|(_, degrees)| *degrees)
}
