use thiserror::Error;

/// Errors surfaced by the tracking core.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// A detection carried a non-finite coordinate or confidence. The
    /// detection is rejected at construction; tracking continues without it.
    #[error("invalid detection: {0}")]
    InvalidDetection(String),

    /// An out-of-range option at construction time. Fatal: no tracker
    /// instance is created.
    #[error("invalid tracker configuration: {0}")]
    Configuration(String),

    /// Linear-algebra failure inside the motion filter update.
    #[error("numerical failure in motion filter: {0}")]
    Numerical(String),
}
