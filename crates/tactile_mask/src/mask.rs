//! Alpha-plane collision bitmap

use image::DynamicImage;
use tactile_core::{Point, Size};

use crate::error::{MaskError, Result};

/// Immutable alpha plane of a decoded image
///
/// Row 0 is the top row of the image. Masks are shared behind an `Arc` by
/// the testers that use them.
#[derive(Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    /// One byte per pixel, row-major from the top
    alpha: Vec<u8>,
}

impl CollisionMask {
    /// Build a mask from a raw alpha plane
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if alpha.len() != expected {
            return Err(MaskError::InvalidDimensions(format!(
                "expected {} alpha values for {}x{}, got {}",
                expected,
                width,
                height,
                alpha.len()
            )));
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Build a mask from RGBA pixels, keeping only the alpha channel
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = pixel_count(width, height)? * 4;
        if rgba.len() != expected {
            return Err(MaskError::InvalidDimensions(format!(
                "expected {} RGBA bytes for {}x{}, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }
        let alpha = rgba.chunks_exact(4).map(|pixel| pixel[3]).collect();
        Self::from_alpha(width, height, alpha)
    }

    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.as_raw())
    }

    /// Decode an encoded image (PNG, JPEG, ...) from memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)?;
        Self::from_dynamic_image(&image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at a pixel; zero outside the mask
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.alpha.get(index).copied().unwrap_or(0)
    }

    /// Alpha under a widget-local point
    ///
    /// Local space has `y` growing upward from the widget's bottom edge, so
    /// the row is flipped: the widget's top edge maps to mask row 0. The mask
    /// is stretched over the whole widget and coordinates are truncated to
    /// pixel indices.
    pub fn sample_local(&self, local: Point, widget: Size) -> u8 {
        if !(widget.width > 0.0 && widget.height > 0.0) {
            return 0;
        }

        let mx = local.x * self.width as f32 / widget.width;
        let my = (widget.height - local.y) * self.height as f32 / widget.height;
        if !(mx.is_finite() && my.is_finite()) || mx < 0.0 || my < 0.0 {
            return 0;
        }

        self.alpha_at(mx as u32, my as u32)
    }

    /// Number of pixels with non-zero alpha
    pub fn opaque_count(&self) -> usize {
        self.alpha.iter().filter(|alpha| **alpha > 0).count()
    }
}

impl std::fmt::Debug for CollisionMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opaque", &self.opaque_count())
            .finish()
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(MaskError::InvalidDimensions(format!(
            "mask must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| MaskError::InvalidDimensions(format!("{}x{} overflows", width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 mask with a single opaque pixel at image coordinates (x, y)
    fn single_pixel(x: usize, y: usize) -> CollisionMask {
        let mut alpha = vec![0u8; 16];
        alpha[y * 4 + x] = 255;
        CollisionMask::from_alpha(4, 4, alpha).unwrap()
    }

    #[test]
    fn test_rejects_mismatched_buffers() {
        assert!(matches!(
            CollisionMask::from_alpha(2, 2, vec![0; 3]),
            Err(MaskError::InvalidDimensions(_))
        ));
        assert!(matches!(
            CollisionMask::from_rgba(1, 1, &[0, 0, 0]),
            Err(MaskError::InvalidDimensions(_))
        ));
        assert!(matches!(
            CollisionMask::from_alpha(0, 4, Vec::new()),
            Err(MaskError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_from_rgba_keeps_alpha() {
        let mask = CollisionMask::from_rgba(2, 1, &[255, 0, 0, 0, 0, 0, 255, 128]).unwrap();

        assert_eq!(mask.alpha_at(0, 0), 0);
        assert_eq!(mask.alpha_at(1, 0), 128);
        assert_eq!(mask.alpha_at(2, 0), 0);
        assert_eq!(mask.opaque_count(), 1);
    }

    #[test]
    fn test_sample_flips_rows() {
        let mask = single_pixel(2, 1);
        let widget = Size::new(8.0, 8.0);

        // (5, 5) -> (2.5, 1.5) -> pixel (2, 1)
        assert_eq!(mask.sample_local(Point::new(5.0, 5.0), widget), 255);
        // (5, 1) -> (2.5, 3.5) -> pixel (2, 3)
        assert_eq!(mask.sample_local(Point::new(5.0, 1.0), widget), 0);
    }

    #[test]
    fn test_sample_outside_mask_is_transparent() {
        let mask = CollisionMask::from_alpha(2, 2, vec![255; 4]).unwrap();
        let widget = Size::new(2.0, 2.0);

        assert_eq!(mask.sample_local(Point::new(1.0, 1.0), widget), 255);
        assert_eq!(mask.sample_local(Point::new(-0.5, 1.0), widget), 0);
        assert_eq!(mask.sample_local(Point::new(1.0, 2.5), widget), 0);
        // Bottom edge maps one row past the mask
        assert_eq!(mask.sample_local(Point::new(1.0, 0.0), widget), 0);
        assert_eq!(mask.sample_local(Point::new(f32::NAN, 1.0), widget), 0);
        assert_eq!(mask.sample_local(Point::new(1.0, 1.0), Size::ZERO), 0);
    }
}
