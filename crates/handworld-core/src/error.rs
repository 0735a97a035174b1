//! Error types for Handworld

use thiserror::Error;

/// Core Handworld errors
#[derive(Error, Debug)]
pub enum HandworldError {
    // Object authoring errors
    #[error("model3d objects require a model URL")]
    MissingModelUrl,

    #[error("Invalid {field}: {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("Unknown object kind: {0}")]
    UnknownObjectKind(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    // Recognition errors
    #[error("Unknown gesture type: {0}")]
    UnknownGesture(String),

    // Detector errors
    #[error("Detector initialization failed: {0}")]
    DetectorInit(String),

    #[error("Detection failed: {0}")]
    DetectorFailure(String),

    // Session errors
    #[error("Session stopped")]
    SessionStopped,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HandworldError {
    /// Does this error disable recognition for the rest of the session?
    pub fn is_detector_error(&self) -> bool {
        matches!(
            self,
            HandworldError::DetectorInit(_) | HandworldError::DetectorFailure(_)
        )
    }
}

/// Result type for Handworld operations
pub type HandworldResult<T> = Result<T, HandworldError>;
