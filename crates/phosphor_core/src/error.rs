//! # Field Error Types
//!
//! All errors that can occur while building or driving a particle field.

use thiserror::Error;

/// Errors that can occur in the particle field core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Pixel buffer length does not match the declared dimensions.
    #[error("pixel buffer mismatch: {width}x{height} needs {expected} bytes, got {actual}")]
    PixelBufferMismatch {
        /// Declared image width.
        width: u32,
        /// Declared image height.
        height: u32,
        /// Expected byte count (`width * height * 4`).
        expected: usize,
        /// Actual byte count supplied.
        actual: usize,
    },

    /// Image has a zero dimension.
    #[error("image dimension is zero: {width}x{height}")]
    ZeroDimension {
        /// Declared image width.
        width: u32,
        /// Declared image height.
        height: u32,
    },

    /// Image decode failed (bad path, unsupported format, truncated file).
    ///
    /// Recovered locally by the driver with the fallback grid.
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("configuration not readable: {0}")]
    ConfigIo(String),
}

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;
