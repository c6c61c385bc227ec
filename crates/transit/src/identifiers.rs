//! Type-safe identifiers for stops.
//!
//! Opaque identifiers use Arc<str> for cheap cloning and minimal memory overhead.

use std::sync::Arc;
use std::fmt;
use std::hash::{Hash, Hasher};

use nextbus_api_types::MicroCoordinate;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

// Backend-assigned, used for departure lookups
impl_identifier!(StopId);

/// Deduplication key of a stop, derived from its coordinate.
///
/// Two stops reported at the same micro-degree coordinate are the same stop,
/// whatever id the backend hands out for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopKey {
    pub latitude: i32,
    pub longitude: i32,
}

impl StopKey {
    pub fn new(latitude: i32, longitude: i32) -> Self {
        Self { latitude, longitude }
    }
}

impl From<MicroCoordinate> for StopKey {
    fn from(coordinate: MicroCoordinate) -> Self {
        Self::new(coordinate.latitude, coordinate.longitude)
    }
}

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.latitude, self.longitude)
    }
}
