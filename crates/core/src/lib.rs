//! # nextbus-core
//!
//! The client logic of a "next bus" map: a draggable self marker, the stops
//! discovered around it and the departures of the stop the user picks.
//!
//! Rendering, history and the backend are reached through traits
//! ([`MapSurface`], [`NavigationHistory`] and the lookup traits of
//! `nextbus-transit`), so the same client runs against a real map widget or
//! the in-memory [`HeadlessMap`].

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod content;
pub mod display;
pub mod error;
pub mod history;
pub mod map;
pub mod position;
pub mod registry;
pub mod stop;
pub mod tooltip;
pub mod tracker;

#[cfg(test)]
mod testing;

// Re-export transit from the transit crate
pub use nextbus_transit as transit;

pub use bootstrap::{BootState, Bootstrap, GeolocationError, Geolocator, StartSource, Started};
pub use client::{Collaborators, StopClient};
pub use config::{ClientConfig, Messages};
pub use content::{DepartureBoard, PopupContent};
pub use display::DepartureDisplay;
pub use error::ClientError;
pub use history::{HistoryEntry, NavigationHistory, SessionHistory};
pub use map::{Anchor, HeadlessMap, MapEvent, MapSurface, Popup};
pub use position::{ParsePositionError, Position};
pub use registry::StopRegistry;
pub use stop::{Stop, StopServices};
pub use tooltip::{Tooltip, TooltipState};
pub use tracker::{DiscoveryHandle, SelfPositionTracker};
