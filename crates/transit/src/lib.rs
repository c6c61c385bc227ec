//! # nextbus-transit
//!
//! Stop and departure lookups with modular networking.
//!
//! ## Features
//!
//! - **Pluggable networking**: implement [`DataFetcher`] to change transport
//! - **HTTP backend**: query the stop/departure service over HTTP
//! - **Offline directory**: answer the same queries from memory with an R-tree
//! - **Structured keys**: deduplicate stops by coordinate without string tricks
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use geo::Point;
//! use nextbus_api_types::{MicroCoordinate, StopRecord};
//! use nextbus_transit::prelude::*;
//!
//! let directory = StaticStopDirectory::from_data(
//!     vec![StopRecord {
//!         id: "751464200".into(),
//!         name: "Park Allé".into(),
//!         coordinate: MicroCoordinate::new(56_153_500, 10_204_000),
//!     }],
//!     HashMap::new(),
//! );
//!
//! let nearby = directory.stops_near(Point::new(10.203261, 56.153014), 500.0, 50);
//! assert_eq!(nearby.len(), 1);
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::types::*;
    pub use crate::network::{
        DataFetcher, DepartureSource, HttpBackend, ReqwestFetcher, StopSearch,
    };
    pub use crate::provider::StaticStopDirectory;
}

pub use prelude::*;
