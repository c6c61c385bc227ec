//! R-tree nodes for spatial indexing.
//!
//! Wraps stop records with geometric data for efficient spatial queries.
//!
//! ## Two-Stage Filtering
//!
//! Stop searches use a two-stage filtering approach:
//! 1. **R-tree filter**: the haversine bounding box of the search circle
//! 2. **Haversine filter**: exact geodesic distance on the candidates
//!
//! The bounding box is computed with the same geodesic math as the final
//! filter, so no stop inside the circle is dropped in the first stage even at
//! high latitudes where a degree of longitude is short.

use std::sync::Arc;

use geo::Point;
use nextbus_api_types::StopRecord;
use rstar::{RTreeObject, AABB, PointDistance};

use crate::spatial::queries::micro_to_point;

// ============================================================================
// Stop Spatial Node
// ============================================================================

#[derive(Clone, Debug)]
pub struct StopNode {
    pub stop: Arc<StopRecord>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<StopRecord>) -> Self {
        let location = micro_to_point(stop.coordinate);
        Self {
            stop,
            point: [location.x(), location.y()],
        }
    }

    pub fn location(&self) -> Point {
        Point::new(self.point[0], self.point[1])
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
