//! # nextbus-api-types
//!
//! JSON records exchanged with the stop/departure lookup service.
//!
//! ## Endpoints
//!
//! - `GET /stops?latitude=<µ°>&longitude=<µ°>&radius=<m>&max=<n>` answers a list of
//!   [`StopRecord`]s ordered by the service.
//! - `GET /departures?stopId=<id>&max=<n>` answers a list of [`DepartureRecord`]s.
//!
//! ```
//! use nextbus_api_types::DepartureRecord;
//!
//! let json = r#"{"name":"Bus 2A","direction":"Skejby","hasDirection":true,"time":"21:05"}"#;
//! let departure: DepartureRecord = serde_json::from_str(json).unwrap();
//! assert_eq!(departure.direction(), Some("Skejby"));
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Integer micro-degrees (degrees × 1 000 000), the service's coordinate encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MicroCoordinate {
    pub latitude: i32,
    pub longitude: i32,
}

impl MicroCoordinate {
    pub fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A stop as returned by the stop search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    /// Opaque backend identifier, only stable for a limited time.
    pub id: String,
    pub name: String,
    pub coordinate: MicroCoordinate,
}

/// A single upcoming departure from a stop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecord {
    pub name: String,

    #[serde(with = "hh_mm")]
    pub time: NaiveTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_direction: Option<bool>,
}

impl DepartureRecord {
    /// The direction to display, if any.
    ///
    /// An explicit `hasDirection: false` hides a direction the service sent anyway.
    pub fn direction(&self) -> Option<&str> {
        match self.has_direction {
            Some(false) => None,
            _ => self.direction.as_deref(),
        }
    }
}

/// Parameters of a stop search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StopQuery {
    pub center: MicroCoordinate,
    pub radius_m: u32,
    pub max: usize,
}

impl StopQuery {
    /// Query-string pairs in the order the service documents them.
    pub fn params(&self) -> [(&'static str, String); 4] {
        [
            ("latitude", self.center.latitude.to_string()),
            ("longitude", self.center.longitude.to_string()),
            ("radius", self.radius_m.to_string()),
            ("max", self.max.to_string()),
        ]
    }
}

/// Parameters of a departure lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartureQuery {
    pub stop_id: String,
    pub max: usize,
}

impl DepartureQuery {
    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            ("stopId", self.stop_id.clone()),
            ("max", self.max.to_string()),
        ]
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
