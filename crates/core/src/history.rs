//! Session history of self-marker positions.
//!
//! Every user-driven move pushes an entry whose URL carries the position, so
//! reloading or sharing the URL restores it and back/forward walk through
//! earlier positions.

use parking_lot::Mutex;
use tracing::debug;
use url::form_urlencoded;

use crate::position::{ParsePositionError, Position};

/// Query parameter carrying an explicit start position.
pub const POSITION_PARAM: &str = "position";

/// A state pushed to the session history.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub position: Position,
    pub title: String,
    pub url: String,
}

impl HistoryEntry {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            title: position.to_string(),
            url: format!("?{}={}", POSITION_PARAM, position.to_url_value()),
        }
    }
}

/// The browser's history, as far as the client uses it.
pub trait NavigationHistory: Send + Sync {
    fn push(&self, entry: HistoryEntry);
}

/// Extract the explicit position from a URL query string.
///
/// Accepts the query with or without the leading `?` and ignores a trailing
/// `#fragment`. Values are form-urlencoded. Returns `None` when the parameter
/// is absent; a present but malformed value is an error so the caller can log
/// it before ignoring it.
pub fn position_from_query(query: &str) -> Option<Result<Position, ParsePositionError>> {
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(name, _)| name == POSITION_PARAM)
        .map(|(_, value)| value.parse())
}

#[derive(Default)]
struct SessionState {
    entries: Vec<HistoryEntry>,
    current: Option<usize>,
}

/// In-memory history with browser semantics.
///
/// Pushing while not at the newest entry drops everything after the current
/// entry; `back` and `forward` return the position stored in the entry they
/// land on.
#[derive(Default)]
pub struct SessionHistory {
    state: Mutex<SessionState>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn back(&self) -> Option<Position> {
        let mut state = self.state.lock();
        let target = state.current?.checked_sub(1)?;
        state.current = Some(target);
        Some(state.entries[target].position)
    }

    pub fn forward(&self) -> Option<Position> {
        let mut state = self.state.lock();
        let target = state.current? + 1;
        let position = state.entries.get(target)?.position;
        state.current = Some(target);
        Some(position)
    }

    pub fn current(&self) -> Option<HistoryEntry> {
        let state = self.state.lock();
        state.current.map(|index| state.entries[index].clone())
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

impl NavigationHistory for SessionHistory {
    fn push(&self, entry: HistoryEntry) {
        debug!(url = %entry.url, "History push");
        let mut state = self.state.lock();
        let keep = state.current.map_or(0, |index| index + 1);
        state.entries.truncate(keep);
        state.entries.push(entry);
        state.current = Some(state.entries.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_url_and_title() {
        let entry = HistoryEntry::new(Position::new(56.153014, 10.203261));
        assert_eq!(entry.url, "?position=56.153014,10.203261");
        assert_eq!(entry.title, "(56.153014, 10.203261)");
    }

    #[test]
    fn test_position_from_query() {
        let found = position_from_query("?zoom=15&position=55.6761,12.5683");
        assert_eq!(found, Some(Ok(Position::new(55.6761, 12.5683))));

        let found = position_from_query("position=55.6761%2C12.5683");
        assert_eq!(found, Some(Ok(Position::new(55.6761, 12.5683))));

        assert_eq!(position_from_query(""), None);
        assert_eq!(position_from_query("?zoom=15"), None);
        assert!(matches!(position_from_query("?position=here"), Some(Err(_))));
    }

    #[test]
    fn test_position_from_query_decodes_escapes() {
        let expected = Some(Ok(Position::new(55.6761, 12.5683)));

        assert_eq!(position_from_query("?position=55.6761%2C%2012.5683"), expected);
        assert_eq!(position_from_query("?position=55%2E6761,12.5683"), expected);
        assert_eq!(position_from_query("?position=55.6761,12.5683#map"), expected);
        assert_eq!(position_from_query("?position=55.6761,+12.5683"), expected);
        assert_eq!(position_from_query("?zoom=15#position=55.6761,12.5683"), None);
    }

    #[test]
    fn test_back_and_forward() {
        let history = SessionHistory::new();
        let a = Position::new(56.0, 10.0);
        let b = Position::new(56.1, 10.1);
        let c = Position::new(56.2, 10.2);

        assert_eq!(history.back(), None);

        history.push(HistoryEntry::new(a));
        history.push(HistoryEntry::new(b));
        history.push(HistoryEntry::new(c));

        assert_eq!(history.back(), Some(b));
        assert_eq!(history.back(), Some(a));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(b));
        assert_eq!(history.current().map(|e| e.position), Some(b));
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let history = SessionHistory::new();
        let a = Position::new(56.0, 10.0);
        let b = Position::new(56.1, 10.1);
        let d = Position::new(56.3, 10.3);

        history.push(HistoryEntry::new(a));
        history.push(HistoryEntry::new(b));
        history.back();
        history.push(HistoryEntry::new(d));

        assert_eq!(history.len(), 2);
        assert_eq!(history.forward(), None);
        assert_eq!(history.back(), Some(a));
    }
}
