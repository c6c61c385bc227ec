//! Error types for transit data access.

// ============================================================================
// Errors
// ============================================================================

/// Everything that can go wrong while asking for stops or departures.
///
/// Callers in the client treat every variant the same way; the distinction
/// only matters for logs.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
