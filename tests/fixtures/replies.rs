//! Canned directions-service response bodies.

use route_engine::Coordinate;

/// Encoded geometry used by the replies below.
pub const REFERENCE_GEOMETRY: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub fn reference_path() -> Vec<Coordinate> {
    vec![
        Coordinate::new(38.5, -120.2),
        Coordinate::new(40.7, -120.95),
        Coordinate::new(43.252, -126.453),
    ]
}

pub fn encoded_route(distance: f64, duration: f64) -> String {
    format!(
        r#"{{"routes":[{{"summary":{{"distance":{},"duration":{}}},"geometry":"{}"}}]}}"#,
        distance, duration, REFERENCE_GEOMETRY
    )
}

pub fn empty_geometry() -> String {
    r#"{"routes":[{"summary":{"distance":1200.0,"duration":90.0},"geometry":""}]}"#.to_string()
}
