//! Pluggable networking traits.
//!
//! External crates implement these to provide stop and departure lookups.

use std::future::Future;
use std::pin::Pin;

use nextbus_api_types::{DepartureQuery, DepartureRecord, StopQuery, StopRecord};

use crate::models::types::Result;

/// Fetch raw bytes from a URL
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// Finds stops around a coordinate
pub trait StopSearch: Send + Sync {
    /// Stops within `query.radius_m` of `query.center`, at most `query.max` of them
    fn search<'a>(
        &'a self,
        query: &'a StopQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StopRecord>>> + Send + 'a>>;
}

/// Looks up the next departures from a stop
pub trait DepartureSource: Send + Sync {
    /// At most `query.max` upcoming departures, soonest first
    fn departures<'a>(
        &'a self,
        query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DepartureRecord>>> + Send + 'a>>;
}
