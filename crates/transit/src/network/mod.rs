//! Network and IO abstractions.

pub mod http;
pub mod traits;

pub use http::{HttpBackend, ReqwestFetcher};
pub use traits::{DataFetcher, DepartureSource, StopSearch};
