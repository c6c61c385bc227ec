//! Geographic positions as the client sees them.

use std::fmt;
use std::str::FromStr;

use nextbus_api_types::MicroCoordinate;

const MICRO_DEGREES: f64 = 1_000_000.0;

/// A latitude/longitude pair in degrees.
///
/// Positions are snapshots: moving something means replacing its position
/// with a new value, never editing one in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Micro-degrees, truncated toward zero.
    pub fn to_micro(&self) -> MicroCoordinate {
        MicroCoordinate::new(
            (self.latitude * MICRO_DEGREES) as i32,
            (self.longitude * MICRO_DEGREES) as i32,
        )
    }

    pub fn from_micro(coordinate: MicroCoordinate) -> Self {
        Self::new(
            f64::from(coordinate.latitude) / MICRO_DEGREES,
            f64::from(coordinate.longitude) / MICRO_DEGREES,
        )
    }

    /// `lat,lng` rounded to six decimals, as carried in the `position` URL parameter.
    pub fn to_url_value(&self) -> String {
        format!("{},{}", url_number(self.latitude), url_number(self.longitude))
    }
}

fn url_number(value: f64) -> String {
    let fixed = format!("{:.6}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePositionError {
    #[error("expected \"latitude,longitude\", got {0:?}")]
    Shape(String),

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("coordinate out of range: {0}")]
    OutOfRange(String),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParsePositionError::Shape(s.to_string()));
        };

        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParsePositionError::NotANumber(raw.trim().to_string()))
        };
        let latitude = parse(lat)?;
        let longitude = parse(lng)?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ParsePositionError::OutOfRange(s.trim().to_string()));
        }

        Ok(Self::new(latitude, longitude))
    }
}
