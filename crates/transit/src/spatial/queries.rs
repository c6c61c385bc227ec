//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{Destination, Distance, Haversine, Point};
use nextbus_api_types::MicroCoordinate;

const MICRO_DEGREES: f64 = 1_000_000.0;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    Haversine.distance(p1, p2)
}

/// Returns a bounding box centered upon `center` containing a circle with radius `radius` meters.
///
/// The bbox is in (N, E, S, W) order.
pub fn bbox_with_center(center: Point, radius: f64) -> (f64, f64, f64, f64) {
    let north = Haversine.destination(center, 0.0, radius).y();
    let east = Haversine.destination(center, 90.0, radius).x();
    let south = Haversine.destination(center, 180.0, radius).y();
    let west = Haversine.destination(center, 270.0, radius).x();

    (north, east, south, west)
}

/// Convert a micro-degree coordinate to a (lon, lat) point
pub fn micro_to_point(coordinate: MicroCoordinate) -> Point {
    Point::new(
        f64::from(coordinate.longitude) / MICRO_DEGREES,
        f64::from(coordinate.latitude) / MICRO_DEGREES,
    )
}
