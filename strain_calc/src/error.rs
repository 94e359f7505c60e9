use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WindowError {
    #[error("E5001: window size must be a positive finite number of ms (got {size_ms})")]
    InvalidSize { size_ms: f64 },

    #[error("E5002: window origin must be finite (got {origin_ms})")]
    InvalidOrigin { origin_ms: f64 },
}
