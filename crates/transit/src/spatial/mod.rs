//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use queries::{bbox_with_center, haversine_distance, micro_to_point};
