//! The map widget the client drives.
//!
//! The client never renders anything itself. It tells a [`MapSurface`] where
//! the self marker, the search circle and the stop markers go, and which popup
//! to open where. Input flows the other way: the embedder forwards drags,
//! clicks and history events to [`StopClient`](crate::StopClient).

pub mod headless;

use nextbus_transit::StopKey;

use crate::content::PopupContent;
use crate::position::Position;
use crate::stop::Stop;

pub use headless::{HeadlessMap, MapEvent};

/// The two popups the client ever shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Popup {
    /// Hint and error messages on the self marker.
    Tooltip,

    /// Departure list of the selected stop.
    Departures,
}

/// What a popup points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    SelfMarker,
    Stop(StopKey),
}

pub trait MapSurface: Send + Sync {
    /// Put the draggable self marker on the map.
    fn place_self_marker(&self, position: Position);

    /// Move the self marker programmatically (history navigation).
    fn move_self_marker(&self, position: Position);

    /// Draw the search radius indicator.
    fn draw_search_radius(&self, center: Position, radius_m: u32);

    fn move_search_radius(&self, center: Position);

    /// Pan the viewport so `center` is in the middle.
    fn pan_to(&self, center: Position);

    /// Add a clickable marker for a newly discovered stop.
    fn place_stop_marker(&self, stop: &Stop);

    /// Open `popup` at `anchor`, replacing its content.
    fn open_popup(&self, popup: Popup, anchor: Anchor, content: &PopupContent);

    /// Close `popup`. Closing a closed popup does nothing.
    fn close_popup(&self, popup: Popup);
}
