//! Mask sources and loaders

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;

use crate::error::{MaskError, Result};
use crate::mask::CollisionMask;

/// Where a mask image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSource {
    /// Encoded image file on the local filesystem
    File(PathBuf),
    /// Encoded image bytes
    Bytes(Arc<[u8]>),
    /// Base64 encoded image, plain or as a `data:` URI
    Base64(String),
}

impl From<PathBuf> for MaskSource {
    fn from(path: PathBuf) -> Self {
        MaskSource::File(path)
    }
}

impl From<&Path> for MaskSource {
    fn from(path: &Path) -> Self {
        MaskSource::File(path.to_path_buf())
    }
}

impl From<&str> for MaskSource {
    fn from(path: &str) -> Self {
        MaskSource::File(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for MaskSource {
    fn from(data: Vec<u8>) -> Self {
        MaskSource::Bytes(data.into())
    }
}

impl From<&[u8]> for MaskSource {
    fn from(data: &[u8]) -> Self {
        MaskSource::Bytes(data.into())
    }
}

impl std::fmt::Display for MaskSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskSource::File(path) => write!(f, "{}", path.display()),
            MaskSource::Bytes(data) => write!(f, "<{} bytes>", data.len()),
            MaskSource::Base64(data) => write!(f, "<base64, {} chars>", data.len()),
        }
    }
}

/// Turns a source into a decoded mask
pub trait MaskLoader {
    fn load(&self, source: &MaskSource) -> Result<CollisionMask>;
}

/// Loader backed by the `image` crate and the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMaskLoader;

impl MaskLoader for ImageMaskLoader {
    fn load(&self, source: &MaskSource) -> Result<CollisionMask> {
        match source {
            MaskSource::File(path) => {
                let data = std::fs::read(path)?;
                CollisionMask::from_bytes(&data)
            }
            MaskSource::Bytes(data) => CollisionMask::from_bytes(data),
            MaskSource::Base64(data) => {
                let bytes = decode_base64(data)?;
                CollisionMask::from_bytes(&bytes)
            }
        }
    }
}

fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let payload = if data.starts_with("data:") {
        data.find(";base64,")
            .map(|pos| &data[pos + 8..])
            .ok_or_else(|| MaskError::Base64("Invalid data URI format".to_string()))?
    } else {
        data
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| MaskError::Base64(e.to_string()))
}
