//! Domain error types

use thiserror::Error;

/// Errors that can occur while managing air-quality devices
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AirQualityError {
    /// A requested mutation was rejected; draft state is unchanged
    #[error("Validation error: {0}")]
    Validation(String),

    /// The edit or remove target no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// The settings store rejected a read or write
    #[error("Settings store error: {0}")]
    Store(String),

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Sensor read thread error: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for air-quality operations
pub type AirQualityResult<T> = Result<T, AirQualityError>;
