//! Fakes shared by the unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::NaiveTime;
use nextbus_api_types::{DepartureQuery, DepartureRecord, MicroCoordinate, StopQuery, StopRecord};
use nextbus_transit::{DepartureSource, Result, StopSearch, TransitError};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::display::DepartureDisplay;
use crate::map::MapSurface;
use crate::stop::StopServices;
use crate::tooltip::Tooltip;

pub fn stop_record(id: &str, latitude: i32, longitude: i32) -> StopRecord {
    StopRecord {
        id: id.into(),
        name: format!("Stop {}", id),
        coordinate: MicroCoordinate::new(latitude, longitude),
    }
}

pub fn departure(name: &str, hour: u32, minute: u32) -> DepartureRecord {
    DepartureRecord {
        name: name.into(),
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        direction: None,
        has_direction: None,
    }
}

pub fn services(
    map: Arc<dyn MapSurface>,
    departures: Arc<dyn DepartureSource>,
) -> Arc<StopServices> {
    Arc::new(StopServices {
        departures,
        display: Arc::new(DepartureDisplay::new(map.clone())),
        tooltip: Arc::new(Tooltip::new(map)),
        max_departures: 5,
    })
}

/// Backend that is always down.
pub struct FailingBackend;

impl StopSearch for FailingBackend {
    fn search<'a>(
        &'a self,
        _query: &'a StopQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StopRecord>>> + Send + 'a>> {
        Box::pin(async { Err(TransitError::Request("connection refused".into())) })
    }
}

impl DepartureSource for FailingBackend {
    fn departures<'a>(
        &'a self,
        _query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DepartureRecord>>> + Send + 'a>> {
        Box::pin(async { Err(TransitError::Request("connection refused".into())) })
    }
}

/// Stop search whose responses the test releases one by one.
///
/// Each search waits for the response registered for its center, so a test
/// decides in which order overlapping searches complete.
#[derive(Default)]
pub struct GatedSearch {
    gates: Mutex<HashMap<MicroCoordinate, oneshot::Receiver<Result<Vec<StopRecord>>>>>,
    queries: Mutex<Vec<StopQuery>>,
}

impl GatedSearch {
    pub fn gate(&self, center: MicroCoordinate) -> oneshot::Sender<Result<Vec<StopRecord>>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(center, rx);
        tx
    }

    pub fn queries(&self) -> Vec<StopQuery> {
        self.queries.lock().clone()
    }
}

impl StopSearch for GatedSearch {
    fn search<'a>(
        &'a self,
        query: &'a StopQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StopRecord>>> + Send + 'a>> {
        self.queries.lock().push(*query);
        let gate = self.gates.lock().remove(&query.center);

        Box::pin(async move {
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(TransitError::Request("gate dropped".into()))),
                None => Ok(Vec::new()),
            }
        })
    }
}
