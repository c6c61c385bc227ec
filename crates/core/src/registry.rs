//! The set of stops discovered so far.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use nextbus_api_types::StopRecord;
use nextbus_transit::StopKey;

use crate::stop::{Stop, StopServices};

/// Stops keyed by coordinate.
///
/// The registry only grows: a stop reported again by a later discovery, or
/// twice within one response, keeps the instance created when it was first
/// seen. Merging the same responses in any order yields the same key set.
pub struct StopRegistry {
    services: Arc<StopServices>,
    stops: HashMap<StopKey, Arc<Stop>>,
}

impl StopRegistry {
    pub fn new(services: Arc<StopServices>) -> Self {
        Self {
            services,
            stops: HashMap::new(),
        }
    }

    /// Add the stops whose keys are unknown and return just those, in
    /// response order.
    pub fn merge(&mut self, records: impl IntoIterator<Item = StopRecord>) -> Vec<Arc<Stop>> {
        let mut added = Vec::new();

        for record in records {
            let key = StopKey::from(record.coordinate);
            if let Entry::Vacant(slot) = self.stops.entry(key) {
                let stop = Arc::new(Stop::new(record, Arc::clone(&self.services)));
                slot.insert(Arc::clone(&stop));
                added.push(stop);
            }
        }

        added
    }

    pub fn get(&self, key: &StopKey) -> Option<Arc<Stop>> {
        self.stops.get(key).cloned()
    }

    pub fn contains(&self, key: &StopKey) -> bool {
        self.stops.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = StopKey> + '_ {
        self.stops.keys().copied()
    }

    /// All stops ordered by key.
    pub fn stops(&self) -> Vec<Arc<Stop>> {
        let mut stops: Vec<_> = self.stops.values().cloned().collect();
        stops.sort_by_key(|stop| stop.key());
        stops
    }
}
