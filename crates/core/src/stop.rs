//! A discovered stop.

use std::fmt;
use std::sync::Arc;

use nextbus_api_types::{DepartureQuery, StopRecord};
use nextbus_transit::{DepartureSource, StopId, StopKey};
use tracing::{debug, warn};

use crate::content::{DepartureBoard, PopupContent};
use crate::display::DepartureDisplay;
use crate::error::ClientError;
use crate::position::Position;
use crate::tooltip::Tooltip;

/// What every stop needs to show its departures.
///
/// One instance is shared by all stops of a client, which is what makes the
/// departure popup and the error tooltip single shared surfaces.
pub struct StopServices {
    pub departures: Arc<dyn DepartureSource>,
    pub display: Arc<DepartureDisplay>,
    pub tooltip: Arc<Tooltip>,
    pub max_departures: usize,
}

pub struct Stop {
    key: StopKey,
    id: StopId,
    name: Arc<str>,
    position: Position,
    services: Arc<StopServices>,
}

impl Stop {
    pub fn new(record: StopRecord, services: Arc<StopServices>) -> Self {
        Self {
            key: StopKey::from(record.coordinate),
            id: StopId::from(record.id),
            name: record.name.into(),
            position: Position::from_micro(record.coordinate),
            services,
        }
    }

    pub fn key(&self) -> StopKey {
        self.key
    }

    pub fn id(&self) -> &StopId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Fetch the next departures and show them in the departure popup.
    ///
    /// Returns how many departures were shown. On failure the popup is left
    /// as it was and the shared tooltip switches to the error message.
    pub async fn show_departures(&self) -> Result<usize, ClientError> {
        let query = DepartureQuery {
            stop_id: self.id.to_string(),
            max: self.services.max_departures,
        };

        match self.services.departures.departures(&query).await {
            Ok(mut records) => {
                records.truncate(self.services.max_departures);
                let count = records.len();
                debug!(stop = %self.id, count, "Showing departures");

                let board = DepartureBoard::from_records(records);
                self.services
                    .display
                    .show(self.key, PopupContent::Departures(board));
                Ok(count)
            }
            Err(source) => {
                warn!(stop = %self.id, error = %source, "Departure lookup failed");
                self.services.tooltip.show_error();
                Err(ClientError::DeparturesFailed {
                    stop: self.id.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Debug for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stop")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
