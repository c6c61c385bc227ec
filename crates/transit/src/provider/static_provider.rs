//! In-memory stop directory.
//!
//! Answers stop searches and departure lookups from data held in memory,
//! with a spatial index for fast radius queries. Used for offline runs and
//! as a deterministic backend in tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use geo::Point;
use nextbus_api_types::{DepartureQuery, DepartureRecord, StopQuery, StopRecord};
use rstar::RTree;
use serde::Deserialize;
use tracing::debug;

use crate::identifiers::StopId;
use crate::models::types::Result;
use crate::network::traits::{DepartureSource, StopSearch};
use crate::spatial::index::StopNode;
use crate::spatial::queries::{bbox_with_center, haversine_distance, micro_to_point};

/// On-disk layout of a directory fixture
#[derive(Debug, Deserialize)]
struct DirectoryData {
    stops: Vec<StopRecord>,
    #[serde(default)]
    departures: HashMap<String, Vec<DepartureRecord>>,
}

// ============================================================================
// Static Directory
// ============================================================================

/// In-memory stop directory with spatial indexing
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Default)]
pub struct StaticStopDirectory {
    stops: Vec<Arc<StopRecord>>,
    stop_tree: RTree<StopNode>,
    departures: HashMap<StopId, Arc<[DepartureRecord]>>,
}

impl StaticStopDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from raw data
    pub fn from_data(
        stops: Vec<StopRecord>,
        departures: HashMap<StopId, Vec<DepartureRecord>>,
    ) -> Self {
        let stops: Vec<Arc<StopRecord>> = stops.into_iter().map(Arc::new).collect();

        let stop_tree = RTree::bulk_load(stops.iter().cloned().map(StopNode::new).collect());

        let departures = departures
            .into_iter()
            .map(|(id, list)| (id, Arc::from(list)))
            .collect();

        Self {
            stops,
            stop_tree,
            departures,
        }
    }

    /// Load a directory from a JSON fixture:
    /// `{ "stops": [StopRecord...], "departures": { "<stopId>": [DepartureRecord...] } }`
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let data: DirectoryData = serde_json::from_slice(bytes)?;
        let departures = data
            .departures
            .into_iter()
            .map(|(id, list)| (StopId::new(id), list))
            .collect();

        Ok(Self::from_data(data.stops, departures))
    }

    pub fn all_stops(&self) -> &[Arc<StopRecord>] {
        &self.stops
    }

    /// Stops within `radius_m` meters of `center`, nearest first, at most `max`
    pub fn stops_near(&self, center: Point, radius_m: f64, max: usize) -> Vec<StopRecord> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        // Degree-space circle enclosing the haversine bounding box
        let (north, east, _, _) = bbox_with_center(center, radius_m);
        let dlat = north - center.y();
        let dlon = (east - center.x()).abs();
        let max_squared_radius = dlat * dlat + dlon * dlon;

        let mut hits: Vec<(f64, &StopNode)> = self
            .stop_tree
            .locate_within_distance([center.x(), center.y()], max_squared_radius)
            .map(|node| (haversine_distance(center, node.location()), node))
            .filter(|(distance, _)| *distance <= radius_m)
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        hits.into_iter()
            .take(max)
            .map(|(_, node)| StopRecord::clone(&node.stop))
            .collect()
    }

    /// The first `max` departures registered for `id`
    pub fn next_departures(&self, id: &StopId, max: usize) -> Vec<DepartureRecord> {
        self.departures
            .get(id)
            .map(|list| list.iter().take(max).cloned().collect())
            .unwrap_or_default()
    }
}

impl StopSearch for StaticStopDirectory {
    fn search<'a>(
        &'a self,
        query: &'a StopQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StopRecord>>> + Send + 'a>> {
        let center = micro_to_point(query.center);
        let stops = self.stops_near(center, f64::from(query.radius_m), query.max);
        debug!(found = stops.len(), "Searched static directory");

        Box::pin(async move { Ok(stops) })
    }
}

impl DepartureSource for StaticStopDirectory {
    fn departures<'a>(
        &'a self,
        query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DepartureRecord>>> + Send + 'a>> {
        let departures = self.next_departures(&StopId::new(&query.stop_id), query.max);

        Box::pin(async move { Ok(departures) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use nextbus_api_types::MicroCoordinate;

    fn stop(id: &str, latitude: i32, longitude: i32) -> StopRecord {
        StopRecord {
            id: id.into(),
            name: format!("Stop {}", id),
            coordinate: MicroCoordinate::new(latitude, longitude),
        }
    }

    fn departure(name: &str, hour: u32, minute: u32) -> DepartureRecord {
        DepartureRecord {
            name: name.into(),
            time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            direction: None,
            has_direction: None,
        }
    }

    fn aarhus() -> StaticStopDirectory {
        StaticStopDirectory::from_data(
            vec![
                // ~110 m north of the center
                stop("near", 56_154_014, 10_203_261),
                // ~330 m east
                stop("east", 56_153_014, 10_208_600),
                // ~1.1 km south
                stop("far", 56_143_014, 10_203_261),
            ],
            HashMap::from([(
                StopId::new("near"),
                vec![departure("Bus 1", 8, 0), departure("Bus 2", 8, 5), departure("Bus 3", 8, 10)],
            )]),
        )
    }

    #[test]
    fn test_empty_directory() {
        let directory = StaticStopDirectory::new();
        assert!(directory.all_stops().is_empty());
        assert!(directory.stops_near(Point::new(10.2, 56.1), 500.0, 50).is_empty());
    }

    #[test]
    fn test_stops_near_filters_by_haversine_radius() {
        let directory = aarhus();
        let center = Point::new(10.203261, 56.153014);

        let stops = directory.stops_near(center, 500.0, 50);
        let ids: Vec<_> = stops.iter().map(|s| s.id.as_str()).collect();

        // Nearest first, the far stop is outside the circle
        assert_eq!(ids, vec!["near", "east"]);
    }

    #[test]
    fn test_stops_near_caps_result_count() {
        let directory = aarhus();
        let center = Point::new(10.203261, 56.153014);

        let stops = directory.stops_near(center, 5_000.0, 2);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id, "near");
    }

    #[test]
    fn test_invalid_radius_finds_nothing() {
        let directory = aarhus();
        let center = Point::new(10.203261, 56.153014);

        assert!(directory.stops_near(center, 0.0, 50).is_empty());
        assert!(directory.stops_near(center, -10.0, 50).is_empty());
        assert!(directory.stops_near(center, f64::NAN, 50).is_empty());
    }

    #[test]
    fn test_next_departures() {
        let directory = aarhus();

        let departures = directory.next_departures(&StopId::new("near"), 2);
        assert_eq!(departures.len(), 2);
        assert_eq!(departures[1].name, "Bus 2");

        assert!(directory.next_departures(&StopId::new("east"), 5).is_empty());
    }

    #[test]
    fn test_from_json_fixture() {
        let json = r#"{
            "stops": [{"id":"1","name":"Rådhuset","coordinate":{"latitude":56153014,"longitude":10203261}}],
            "departures": {"1": [{"name":"Bus 6A","time":"12:30","direction":"Lisbjerg","hasDirection":true}]}
        }"#;

        let directory = StaticStopDirectory::from_json_slice(json.as_bytes()).unwrap();
        assert_eq!(directory.all_stops().len(), 1);
        assert_eq!(directory.all_stops()[0].name, "Rådhuset");

        let departures = directory.next_departures(&StopId::new("1"), 5);
        assert_eq!(departures[0].direction(), Some("Lisbjerg"));
    }

    #[tokio::test]
    async fn test_trait_queries() {
        let directory = aarhus();

        let query = StopQuery {
            center: MicroCoordinate::new(56_153_014, 10_203_261),
            radius_m: 500,
            max: 50,
        };
        assert_eq!(directory.search(&query).await.unwrap().len(), 2);

        let query = DepartureQuery {
            stop_id: "near".into(),
            max: 5,
        };
        assert_eq!(directory.departures(&query).await.unwrap().len(), 3);
    }
}
