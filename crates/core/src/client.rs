//! The running client and its input handlers.

use std::sync::Arc;

use nextbus_transit::{DepartureSource, StopKey, StopSearch};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ClientConfig;
use crate::display::DepartureDisplay;
use crate::error::ClientError;
use crate::history::NavigationHistory;
use crate::map::MapSurface;
use crate::position::Position;
use crate::registry::StopRegistry;
use crate::stop::{Stop, StopServices};
use crate::tooltip::Tooltip;
use crate::tracker::{DiscoveryHandle, SelfPositionTracker};

/// Everything the client talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub map: Arc<dyn MapSurface>,
    pub history: Arc<dyn NavigationHistory>,
    pub stops: Arc<dyn StopSearch>,
    pub departures: Arc<dyn DepartureSource>,
}

/// A client whose self marker is on the map.
///
/// The embedder forwards user input to the `on_*` handlers. Handlers that
/// start a lookup return its task handle; dropping the handle does not cancel
/// the lookup.
pub struct StopClient {
    config: ClientConfig,
    registry: Arc<Mutex<StopRegistry>>,
    display: Arc<DepartureDisplay>,
    tooltip: Arc<Tooltip>,
    tracker: Arc<SelfPositionTracker>,
}

impl StopClient {
    /// Place the self marker at `position` and start the first discovery.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: ClientConfig,
        collaborators: Collaborators,
        position: Position,
    ) -> (Self, DiscoveryHandle) {
        let Collaborators {
            map,
            history,
            stops,
            departures,
        } = collaborators;

        let display = Arc::new(DepartureDisplay::new(map.clone()));
        let tooltip = Arc::new(Tooltip::new(map.clone()));
        let services = Arc::new(StopServices {
            departures,
            display: display.clone(),
            tooltip: tooltip.clone(),
            max_departures: config.max_departures,
        });
        let registry = Arc::new(Mutex::new(StopRegistry::new(services)));

        let tracker = SelfPositionTracker::new(
            position,
            &config,
            map,
            history,
            stops,
            tooltip.clone(),
            registry.clone(),
        );
        let discovery = tracker.initialize(&config);

        let client = Self {
            config,
            registry,
            display,
            tooltip,
            tracker,
        };
        (client, discovery)
    }

    pub fn on_drag(&self, position: Position) -> DiscoveryHandle {
        self.tracker.on_drag(position)
    }

    /// `restored` is the position stored in the history entry navigated to,
    /// if it has one.
    pub fn on_history_navigate(&self, restored: Option<Position>) -> Option<DiscoveryHandle> {
        self.tracker.on_history_navigate(restored)
    }

    /// A stop marker was clicked. Returns `None` for an unknown stop.
    pub fn on_stop_clicked(&self, key: StopKey) -> Option<JoinHandle<Result<usize, ClientError>>> {
        let stop = self.registry.lock().get(&key)?;
        debug!(stop = %stop.id(), "Stop clicked");

        Some(tokio::spawn(async move { stop.show_departures().await }))
    }

    /// A click on the map outside any marker closes the departures.
    pub fn on_map_clicked(&self) {
        self.display.close();
    }

    pub fn position(&self) -> Position {
        self.tracker.position()
    }

    pub fn stop(&self, key: &StopKey) -> Option<Arc<Stop>> {
        self.registry.lock().get(key)
    }

    /// Known stops ordered by key.
    pub fn stops(&self) -> Vec<Arc<Stop>> {
        self.registry.lock().stops()
    }

    pub fn stop_count(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn departure_display(&self) -> &DepartureDisplay {
        &self.display
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use nextbus_transit::{StaticStopDirectory, StopId};

    use crate::history::SessionHistory;
    use crate::map::{Anchor, HeadlessMap, Popup};
    use crate::testing::{departure, stop_record, FailingBackend};
    use crate::tooltip::TooltipState;

    fn collaborators(map: Arc<HeadlessMap>, departures: Arc<dyn DepartureSource>) -> Collaborators {
        let directory = Arc::new(StaticStopDirectory::from_data(
            vec![
                stop_record("park", 56_153_500, 10_204_000),
                stop_record("station", 56_152_000, 10_202_000),
            ],
            HashMap::new(),
        ));
        Collaborators {
            map,
            history: Arc::new(SessionHistory::new()),
            stops: directory,
            departures,
        }
    }

    #[tokio::test]
    async fn test_click_stops_and_map() {
        let map = Arc::new(HeadlessMap::new());
        let departures = Arc::new(StaticStopDirectory::from_data(
            Vec::new(),
            HashMap::from([(StopId::new("park"), vec![departure("1A", 8, 0)])]),
        ));
        let (client, discovery) = StopClient::start(
            ClientConfig::default(),
            collaborators(map.clone(), departures),
            Position::new(56.153014, 10.203261),
        );
        assert_eq!(discovery.await.unwrap().unwrap(), 2);

        let park = StopKey::new(56_153_500, 10_204_000);
        let station = StopKey::new(56_152_000, 10_202_000);

        assert_eq!(client.on_stop_clicked(park).unwrap().await.unwrap().unwrap(), 1);
        assert_eq!(client.departure_display().open_at(), Some(park));

        assert_eq!(client.on_stop_clicked(station).unwrap().await.unwrap().unwrap(), 0);
        assert_eq!(client.departure_display().open_at(), Some(station));
        assert_eq!(
            map.popup(Popup::Departures).map(|(anchor, _)| anchor),
            Some(Anchor::Stop(station))
        );

        client.on_map_clicked();
        assert_eq!(client.departure_display().open_at(), None);
        assert_eq!(map.popup(Popup::Departures), None);
    }

    #[tokio::test]
    async fn test_unknown_stop_click() {
        let map = Arc::new(HeadlessMap::new());
        let (client, _) = StopClient::start(
            ClientConfig::default(),
            collaborators(map, Arc::new(FailingBackend)),
            Position::new(56.153014, 10.203261),
        );

        assert!(client.on_stop_clicked(StopKey::new(0, 0)).is_none());
    }

    #[tokio::test]
    async fn test_departure_failure_uses_shared_tooltip() {
        let map = Arc::new(HeadlessMap::new());
        let (client, discovery) = StopClient::start(
            ClientConfig::default(),
            collaborators(map.clone(), Arc::new(FailingBackend)),
            Position::new(56.153014, 10.203261),
        );
        discovery.await.unwrap().unwrap();

        let park = StopKey::new(56_153_500, 10_204_000);
        let result = client.on_stop_clicked(park).unwrap().await.unwrap();

        assert!(result.is_err());
        assert_eq!(client.tooltip().state(), TooltipState::Error);
        assert_eq!(client.tooltip().error_count(), 1);
        assert_eq!(client.departure_display().open_at(), None);
    }
}
