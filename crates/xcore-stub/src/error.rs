//! Error types for the stub binary.

use thiserror::Error;

/// Errors that stop the stub.
#[derive(Debug, Error)]
pub enum StubError {
    /// The serial device could not be opened or configured.
    #[error("cannot open {path}: {source}")]
    Open {
        /// Device path given on the command line.
        path: String,
        /// Underlying serial error.
        #[source]
        source: tokio_serial::Error,
    },

    /// I/O error on the serial stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for stub operations.
pub type StubResult<T> = Result<T, StubError>;
