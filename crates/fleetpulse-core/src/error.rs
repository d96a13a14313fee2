//! Shared error type across FleetPulse crates.

use thiserror::Error;

/// Stable error codes (used by callers and tests instead of message text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Metric name registered twice.
    DuplicateMetric,
    /// Bounds or initial value are inconsistent.
    InvalidRange,
    /// Metric name not registered.
    UnknownMetric,
    /// No formatter configured for a metric.
    UnknownFormat,
    /// Clock started twice.
    AlreadyRunning,
    /// Configuration rejected.
    BadConfig,
    /// Input line could not be parsed as a command.
    BadCommand,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and command replies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::InvalidRange => "INVALID_RANGE",
            ErrorCode::UnknownMetric => "UNKNOWN_METRIC",
            ErrorCode::UnknownFormat => "UNKNOWN_FORMAT",
            ErrorCode::AlreadyRunning => "ALREADY_RUNNING",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::BadCommand => "BAD_COMMAND",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FleetPulseError>;

/// Unified error type used by core and dashboard.
#[derive(Debug, Error)]
pub enum FleetPulseError {
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("invalid range for {name}: value={value} min={min} max={max}")]
    InvalidRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("no format configured for metric: {0}")]
    UnknownFormat(String),
    #[error("simulation clock already running")]
    AlreadyRunning,
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("bad command: {0}")]
    BadCommand(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl FleetPulseError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            FleetPulseError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            FleetPulseError::InvalidRange { .. } => ErrorCode::InvalidRange,
            FleetPulseError::UnknownMetric(_) => ErrorCode::UnknownMetric,
            FleetPulseError::UnknownFormat(_) => ErrorCode::UnknownFormat,
            FleetPulseError::AlreadyRunning => ErrorCode::AlreadyRunning,
            FleetPulseError::BadConfig(_) => ErrorCode::BadConfig,
            FleetPulseError::BadCommand(_) => ErrorCode::BadCommand,
            FleetPulseError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            FleetPulseError::Internal(_) => ErrorCode::Internal,
        }
    }
}
