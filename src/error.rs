//! Error types for Gaze Sentinel

use thiserror::Error;

/// Errors that can occur while building, feeding, or replaying a session
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to parse session log: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(String),

    #[error("Invalid session log: {0}")]
    InvalidSession(String),

    #[error("Session inputs out of order at t={0}s")]
    OutOfOrderInput(f64),

    #[error("Unknown zone id: {0}")]
    UnknownZone(String),

    #[error("Unknown calibration point: {0}")]
    UnknownCalibrationPoint(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
