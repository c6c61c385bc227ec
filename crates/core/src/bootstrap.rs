//! Startup: decide where the self marker starts, then start the client.
//!
//! An explicit position in the URL wins. Without one the client asks the
//! geolocator, bounded by a timeout, and falls back to the configured default
//! position when geolocation is missing, fails or times out.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::client::{Collaborators, StopClient};
use crate::config::ClientConfig;
use crate::history::position_from_query;
use crate::position::Position;
use crate::tracker::DiscoveryHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    Locating,
    Ready,
}

/// Where the start position came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartSource {
    Url,
    Geolocation,
    Default,
}

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("Geolocation permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// Device position lookup.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> Pin<Box<dyn Future<Output = Result<Position, GeolocationError>> + Send + '_>>;
}

/// The result of a completed startup.
pub struct Started {
    pub client: StopClient,

    /// The first discovery around the start position.
    pub discovery: DiscoveryHandle,

    pub source: StartSource,
}

pub struct Bootstrap {
    config: ClientConfig,
    collaborators: Collaborators,
    geolocator: Option<Arc<dyn Geolocator>>,
    state: watch::Sender<BootState>,
}

impl Bootstrap {
    pub fn new(config: ClientConfig, collaborators: Collaborators) -> Self {
        let (state, _) = watch::channel(BootState::Uninitialized);
        Self {
            config,
            collaborators,
            geolocator: None,
            state,
        }
    }

    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    pub fn state(&self) -> BootState {
        *self.state.borrow()
    }

    /// Follow the state as startup progresses.
    pub fn subscribe(&self) -> watch::Receiver<BootState> {
        self.state.subscribe()
    }

    /// Resolve the start position from `query` (the page URL's query string)
    /// and start the client there.
    pub async fn run(self, query: Option<&str>) -> Started {
        let (position, source) = self.start_position(query).await;
        info!(%position, ?source, "Starting client");

        let (client, discovery) = StopClient::start(self.config, self.collaborators, position);
        self.state.send_replace(BootState::Ready);

        Started {
            client,
            discovery,
            source,
        }
    }

    async fn start_position(&self, query: Option<&str>) -> (Position, StartSource) {
        match query.and_then(position_from_query) {
            Some(Ok(position)) => return (position, StartSource::Url),
            Some(Err(error)) => warn!(%error, "Ignoring malformed position parameter"),
            None => {}
        }

        self.state.send_replace(BootState::Locating);
        let fallback = (self.config.default_position, StartSource::Default);

        let Some(geolocator) = &self.geolocator else {
            info!("Geolocation unavailable, using default position");
            return fallback;
        };

        match tokio::time::timeout(self.config.geolocation_timeout, geolocator.locate()).await {
            Ok(Ok(position)) => (position, StartSource::Geolocation),
            Ok(Err(error)) => {
                warn!(%error, "Geolocation failed, using default position");
                fallback
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.geolocation_timeout.as_millis() as u64,
                    "Geolocation timed out, using default position"
                );
                fallback
            }
        }
    }
}
