//! The draggable "you are here" marker and the stop discovery it drives.

use std::sync::Arc;

use nextbus_api_types::StopQuery;
use nextbus_transit::StopSearch;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::history::{HistoryEntry, NavigationHistory};
use crate::map::MapSurface;
use crate::position::Position;
use crate::registry::StopRegistry;
use crate::tooltip::Tooltip;

/// A spawned discovery. Resolves to the number of newly added stops.
pub type DiscoveryHandle = JoinHandle<Result<usize, ClientError>>;

/// Tracks the self-marker position.
///
/// Every position change moves the search circle, pans the map and starts a
/// discovery around the new position. Discoveries are not cancelled when the
/// marker moves on; each one merges its stops into the shared registry when
/// it completes, so the order they finish in does not matter.
pub struct SelfPositionTracker {
    position: Mutex<Position>,
    search_radius_m: u32,
    max_stops: usize,
    map: Arc<dyn MapSurface>,
    history: Arc<dyn NavigationHistory>,
    search: Arc<dyn StopSearch>,
    tooltip: Arc<Tooltip>,
    registry: Arc<Mutex<StopRegistry>>,
}

impl SelfPositionTracker {
    pub fn new(
        initial: Position,
        config: &ClientConfig,
        map: Arc<dyn MapSurface>,
        history: Arc<dyn NavigationHistory>,
        search: Arc<dyn StopSearch>,
        tooltip: Arc<Tooltip>,
        registry: Arc<Mutex<StopRegistry>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(initial),
            search_radius_m: config.search_radius_m,
            max_stops: config.max_stops,
            map,
            history,
            search,
            tooltip,
            registry,
        })
    }

    /// Put the marker on the map and run the first discovery.
    ///
    /// Opens the hint for `config.hint_duration`, draws the search circle and
    /// records the start position in the history.
    pub fn initialize(self: &Arc<Self>, config: &ClientConfig) -> DiscoveryHandle {
        let position = self.position();
        info!(%position, radius_m = self.search_radius_m, "Placing self marker");

        self.map.place_self_marker(position);
        self.tooltip.show_hint(config.hint_duration);
        self.map.draw_search_radius(position, self.search_radius_m);
        self.push_history(position);

        self.reconcile(position)
    }

    /// The user dropped the marker at `position`.
    pub fn on_drag(self: &Arc<Self>, position: Position) -> DiscoveryHandle {
        debug!(%position, "Self marker dragged");
        *self.position.lock() = position;
        self.push_history(position);

        self.reconcile(position)
    }

    /// The user navigated the history.
    ///
    /// Entries without a position are not ours and are ignored. A restored
    /// position is not pushed again.
    pub fn on_history_navigate(self: &Arc<Self>, restored: Option<Position>) -> Option<DiscoveryHandle> {
        let Some(position) = restored else {
            debug!("Ignoring history entry without position");
            return None;
        };

        debug!(%position, "Restoring position from history");
        *self.position.lock() = position;
        self.map.move_self_marker(position);

        Some(self.reconcile(position))
    }

    pub fn position(&self) -> Position {
        *self.position.lock()
    }

    /// Search around `position` and add the stops not seen before.
    ///
    /// New stops get a marker. On failure the registry is left untouched and
    /// the tooltip shows the error.
    pub async fn discover(&self, position: Position) -> Result<usize, ClientError> {
        let query = StopQuery {
            center: position.to_micro(),
            radius_m: self.search_radius_m,
            max: self.max_stops,
        };

        match self.search.search(&query).await {
            Ok(mut records) => {
                records.truncate(self.max_stops);
                let found = records.len();
                let added = self.registry.lock().merge(records);

                for stop in &added {
                    self.map.place_stop_marker(stop);
                }

                debug!(%position, found, added = added.len(), "Discovery merged");
                Ok(added.len())
            }
            Err(source) => {
                warn!(%position, error = %source, "Stop discovery failed");
                self.tooltip.show_error();
                Err(ClientError::DiscoveryFailed(source))
            }
        }
    }

    fn push_history(&self, position: Position) {
        self.history.push(HistoryEntry::new(position));
    }

    fn reconcile(self: &Arc<Self>, position: Position) -> DiscoveryHandle {
        self.map.move_search_radius(position);
        self.map.pan_to(position);

        let tracker = Arc::clone(self);
        tokio::spawn(async move { tracker.discover(position).await })
    }
}
