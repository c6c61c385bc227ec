//! The departure popup shared by all stops.

use std::sync::Arc;

use nextbus_transit::StopKey;
use parking_lot::Mutex;

use crate::content::PopupContent;
use crate::map::{Anchor, MapSurface, Popup};

/// Owner of the single departure popup.
///
/// Showing departures for one stop closes whatever another stop had open, so
/// at most one departure list is visible at any time.
pub struct DepartureDisplay {
    map: Arc<dyn MapSurface>,
    open_at: Mutex<Option<StopKey>>,
}

impl DepartureDisplay {
    pub fn new(map: Arc<dyn MapSurface>) -> Self {
        Self {
            map,
            open_at: Mutex::new(None),
        }
    }

    pub fn show(&self, stop: StopKey, content: PopupContent) {
        let mut open_at = self.open_at.lock();
        self.map.close_popup(Popup::Departures);
        self.map
            .open_popup(Popup::Departures, Anchor::Stop(stop), &content);
        *open_at = Some(stop);
    }

    pub fn close(&self) {
        if self.open_at.lock().take().is_some() {
            self.map.close_popup(Popup::Departures);
        }
    }

    /// The stop whose departures are showing.
    pub fn open_at(&self) -> Option<StopKey> {
        *self.open_at.lock()
    }
}
