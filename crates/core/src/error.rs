//! Client error kinds.

use nextbus_transit::{StopId, TransitError};

/// Failures the client surfaces to the user.
///
/// Both kinds are recoverable and shown through the same tooltip; the user
/// retries by moving the marker or clicking the stop again.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Stop discovery failed: {0}")]
    DiscoveryFailed(#[source] TransitError),

    #[error("Departures for stop {stop} failed: {source}")]
    DeparturesFailed {
        stop: StopId,
        #[source]
        source: TransitError,
    },
}
