//! A map surface without a screen.
//!
//! `HeadlessMap` keeps the state a real map widget would display and an
//! ordered log of every call, which makes it usable both for command-line
//! runs and for asserting on the client's behaviour.

use std::collections::HashMap;

use nextbus_transit::StopKey;
use parking_lot::Mutex;
use tracing::debug;

use crate::content::PopupContent;
use crate::map::{Anchor, MapSurface, Popup};
use crate::position::Position;
use crate::stop::Stop;

/// One call made on the map.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    SelfMarkerPlaced(Position),
    SelfMarkerMoved(Position),
    SearchRadiusDrawn { center: Position, radius_m: u32 },
    SearchRadiusMoved(Position),
    Panned(Position),
    StopMarkerPlaced(StopKey),
    PopupOpened {
        popup: Popup,
        anchor: Anchor,
        content: PopupContent,
    },
    PopupClosed(Popup),
}

/// A placed stop marker.
#[derive(Clone, Debug, PartialEq)]
pub struct StopMarker {
    pub key: StopKey,
    pub name: String,
    pub position: Position,
}

#[derive(Default)]
struct HeadlessState {
    self_marker: Option<Position>,
    search_radius: Option<(Position, u32)>,
    center: Option<Position>,
    stop_markers: Vec<StopMarker>,
    popups: HashMap<Popup, (Anchor, PopupContent)>,
    events: Vec<MapEvent>,
}

impl HeadlessState {
    fn record(&mut self, event: MapEvent) {
        debug!(?event, "Map call");
        self.events.push(event);
    }
}

#[derive(Default)]
pub struct HeadlessMap {
    state: Mutex<HeadlessState>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user dropping the self marker at `position`.
    ///
    /// Only the marker moves; forward the drag to the client to react to it.
    pub fn drag_self_marker(&self, position: Position) {
        self.state.lock().self_marker = Some(position);
    }

    pub fn self_marker(&self) -> Option<Position> {
        self.state.lock().self_marker
    }

    pub fn search_radius(&self) -> Option<(Position, u32)> {
        self.state.lock().search_radius
    }

    /// Centre of the viewport after the last pan.
    pub fn center(&self) -> Option<Position> {
        self.state.lock().center
    }

    pub fn stop_markers(&self) -> Vec<StopMarker> {
        self.state.lock().stop_markers.clone()
    }

    pub fn stop_marker_count(&self) -> usize {
        self.state.lock().stop_markers.len()
    }

    /// Anchor and content of `popup` if it is open.
    pub fn popup(&self, popup: Popup) -> Option<(Anchor, PopupContent)> {
        self.state.lock().popups.get(&popup).cloned()
    }

    pub fn events(&self) -> Vec<MapEvent> {
        self.state.lock().events.clone()
    }

    /// Forget the event log, keeping the displayed state.
    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }
}

impl MapSurface for HeadlessMap {
    fn place_self_marker(&self, position: Position) {
        let mut state = self.state.lock();
        state.self_marker = Some(position);
        state.record(MapEvent::SelfMarkerPlaced(position));
    }

    fn move_self_marker(&self, position: Position) {
        let mut state = self.state.lock();
        state.self_marker = Some(position);
        state.record(MapEvent::SelfMarkerMoved(position));
    }

    fn draw_search_radius(&self, center: Position, radius_m: u32) {
        let mut state = self.state.lock();
        state.search_radius = Some((center, radius_m));
        state.record(MapEvent::SearchRadiusDrawn { center, radius_m });
    }

    fn move_search_radius(&self, center: Position) {
        let mut state = self.state.lock();
        if let Some((_, radius_m)) = state.search_radius {
            state.search_radius = Some((center, radius_m));
        }
        state.record(MapEvent::SearchRadiusMoved(center));
    }

    fn pan_to(&self, center: Position) {
        let mut state = self.state.lock();
        state.center = Some(center);
        state.record(MapEvent::Panned(center));
    }

    fn place_stop_marker(&self, stop: &Stop) {
        let mut state = self.state.lock();
        state.stop_markers.push(StopMarker {
            key: stop.key(),
            name: stop.name().to_string(),
            position: stop.position(),
        });
        state.record(MapEvent::StopMarkerPlaced(stop.key()));
    }

    fn open_popup(&self, popup: Popup, anchor: Anchor, content: &PopupContent) {
        let mut state = self.state.lock();
        state.popups.insert(popup, (anchor, content.clone()));
        state.record(MapEvent::PopupOpened {
            popup,
            anchor,
            content: content.clone(),
        });
    }

    fn close_popup(&self, popup: Popup) {
        let mut state = self.state.lock();
        if state.popups.remove(&popup).is_some() {
            state.record(MapEvent::PopupClosed(popup));
        }
    }
}
