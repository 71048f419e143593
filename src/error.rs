//! Error types for qrmint operations

use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias using qrmint's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrmint operations
#[derive(Error, Debug)]
pub enum Error {
    /// A customization field could not be coerced to an integer.
    ///
    /// This is the only error the input collector recovers from.
    #[error("invalid literal for {field}: '{value}' ({source})")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Raw text entered by the user
        value: String,
        /// Underlying integer parse failure
        #[source]
        source: ParseIntError,
    },

    /// Requested symbol version outside 1..=40
    #[error("Invalid version {0}, expected a value between 1 and 40")]
    InvalidVersion(i64),

    /// Box size or border that cannot produce a raster
    #[error("Invalid {name} {value}: {reason}")]
    InvalidDimension {
        /// Which dimension was rejected
        name: &'static str,
        /// Value that was supplied
        value: i64,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Payload does not fit even the largest symbol
    #[error("Data too long: {len} bytes do not fit a version 40 symbol at level {level}")]
    DataTooLong {
        /// Payload length in bytes
        len: usize,
        /// Requested error-correction level
        level: char,
    },

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed during verification
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// Color specifier rejected by the color parser
    #[error("Unknown color specifier '{spec}': {reason}")]
    Color {
        /// The raw specifier
        spec: String,
        /// Parser message
        reason: String,
    },

    /// Read-back verification disagreed with the payload
    #[error("Verification failed: {0}")]
    Verify(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the input collector may swallow this error and fall back to defaults.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidField { .. })
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
