use thiserror::Error;

/// diemtrack error types
#[derive(Error, Debug)]
pub enum DiemtrackError {
    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted store read/write failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for diemtrack
pub type Result<T> = std::result::Result<T, DiemtrackError>;
