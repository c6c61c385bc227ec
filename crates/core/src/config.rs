//! Client configuration.
//!
//! `ClientConfig` gathers the fixed numbers the client works with (search
//! radius, result caps, timers, fallback position) and the texts it shows.
//! Every field has a default matching the deployed service; embedders
//! override what they need with the `with_*` setters.

use std::time::Duration;

use crate::position::Position;

/// Radius of the stop search circle around the self marker, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 500;

/// Maximum number of stops asked for per discovery.
pub const DEFAULT_MAX_STOPS: usize = 50;

/// Maximum number of departures shown for a stop.
pub const DEFAULT_MAX_DEPARTURES: usize = 5;

/// How long the "you can move me" hint stays open.
pub const DEFAULT_HINT_DURATION: Duration = Duration::from_secs(3);

/// How long bootstrap waits for geolocation before using the default position.
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Aarhus city centre.
pub const DEFAULT_POSITION: Position = Position::new(56.153014, 10.203261);

/// Texts shown in popups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Messages {
    /// Tooltip shown on the self marker at startup.
    pub hint: String,

    /// Tooltip shown when stops or departures cannot be fetched.
    pub unavailable: String,

    /// Departure popup text for a stop without departures.
    pub no_departures: String,

    /// Data source line appended under a non-empty departure list.
    pub attribution: String,

    /// Link target of the attribution line, if any.
    pub attribution_url: Option<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            hint: "Du kan flytte mig!".to_string(),
            unavailable: "Undskyld! Jeg kan ikke læse afgangstavlen lige nu.".to_string(),
            no_departures: "Ingen afgangsinformation for dette stop.".to_string(),
            attribution: "Info fra Rejseplanen under Creative Commons.".to_string(),
            attribution_url: Some("http://www.rejseplanen.dk".to_string()),
        }
    }
}

/// Configuration of a [`StopClient`](crate::StopClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub search_radius_m: u32,
    pub max_stops: usize,
    pub max_departures: usize,
    pub hint_duration: Duration,
    pub geolocation_timeout: Duration,

    /// Where the self marker starts when neither the URL nor geolocation
    /// provides a position.
    pub default_position: Position,

    pub messages: Messages,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            max_stops: DEFAULT_MAX_STOPS,
            max_departures: DEFAULT_MAX_DEPARTURES,
            hint_duration: DEFAULT_HINT_DURATION,
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            default_position: DEFAULT_POSITION,
            messages: Messages::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_search_radius(mut self, meters: u32) -> Self {
        self.search_radius_m = meters;
        self
    }

    pub fn with_max_stops(mut self, max: usize) -> Self {
        self.max_stops = max;
        self
    }

    pub fn with_max_departures(mut self, max: usize) -> Self {
        self.max_departures = max;
        self
    }

    pub fn with_hint_duration(mut self, duration: Duration) -> Self {
        self.hint_duration = duration;
        self
    }

    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    pub fn with_default_position(mut self, position: Position) -> Self {
        self.default_position = position;
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}
