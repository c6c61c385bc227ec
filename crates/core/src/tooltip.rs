//! The tooltip on the self marker.
//!
//! It shows the startup hint, which closes by itself after a while, and is
//! the one place where failures become visible: both failed discoveries and
//! failed departure lookups switch it to the "unavailable" message.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::content::PopupContent;
use crate::map::{Anchor, MapSurface, Popup};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipState {
    Closed,
    Hint,
    Error,
}

struct TooltipInner {
    state: TooltipState,
    dismiss: Option<JoinHandle<()>>,
    errors: usize,
}

pub struct Tooltip {
    map: Arc<dyn MapSurface>,
    inner: Mutex<TooltipInner>,
}

impl Tooltip {
    pub fn new(map: Arc<dyn MapSurface>) -> Self {
        Self {
            map,
            inner: Mutex::new(TooltipInner {
                state: TooltipState::Closed,
                dismiss: None,
                errors: 0,
            }),
        }
    }

    /// Open the hint and close it again after `duration`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn show_hint(self: &Arc<Self>, duration: Duration) {
        let mut inner = self.inner.lock();
        if let Some(pending) = inner.dismiss.take() {
            pending.abort();
        }

        self.map
            .open_popup(Popup::Tooltip, Anchor::SelfMarker, &PopupContent::Hint);
        inner.state = TooltipState::Hint;

        let tooltip = Arc::downgrade(self);
        inner.dismiss = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(tooltip) = tooltip.upgrade() {
                tooltip.dismiss_hint();
            }
        }));
    }

    fn dismiss_hint(&self) {
        let mut inner = self.inner.lock();
        inner.dismiss = None;
        if inner.state == TooltipState::Hint {
            debug!("Dismissing hint");
            self.map.close_popup(Popup::Tooltip);
            inner.state = TooltipState::Closed;
        }
    }

    /// Switch to the "unavailable" message.
    ///
    /// Cancels a pending hint dismissal so the error stays until the next
    /// hint or error replaces it.
    pub fn show_error(&self) {
        let mut inner = self.inner.lock();
        if let Some(pending) = inner.dismiss.take() {
            pending.abort();
        }

        self.map.close_popup(Popup::Tooltip);
        self.map
            .open_popup(Popup::Tooltip, Anchor::SelfMarker, &PopupContent::Unavailable);
        inner.state = TooltipState::Error;
        inner.errors += 1;
    }

    pub fn state(&self) -> TooltipState {
        self.inner.lock().state
    }

    /// How many times the error message has been shown.
    pub fn error_count(&self) -> usize {
        self.inner.lock().errors
    }
}
