//! Mask loading errors

use thiserror::Error;

/// Errors raised while building a collision mask
#[derive(Error, Debug)]
pub enum MaskError {
    /// Failed to read the mask file
    #[error("Failed to read mask: {0}")]
    Io(#[from] std::io::Error),

    /// The data is not a decodable image
    #[error("Failed to decode mask: {0}")]
    Decode(#[from] image::ImageError),

    /// Invalid base64 payload
    #[error("Base64 decode error: {0}")]
    Base64(String),

    /// Pixel buffer length does not match the dimensions
    #[error("Invalid mask dimensions: {0}")]
    InvalidDimensions(String),
}

/// Result type for mask operations
pub type Result<T> = std::result::Result<T, MaskError>;
