//! Pixel-perfect hit testing against an alpha mask

use std::any::Any;
use std::sync::Arc;

use tactile_core::{HitGeometry, HitTest, Point, RectHitTest};

use crate::loader::{ImageMaskLoader, MaskLoader, MaskSource};
use crate::mask::CollisionMask;

/// Hit tester that refines the bounds test with a mask's alpha channel
///
/// A point collides when it is inside the widget's region or bounds and the
/// mask pixel under it has non-zero alpha. Without a mask nothing collides.
#[derive(Debug, Clone, Default)]
pub struct PixelMaskHitTest {
    source: Option<MaskSource>,
    mask: Option<Arc<CollisionMask>>,
}

impl PixelMaskHitTest {
    /// A tester with no mask
    pub fn new() -> Self {
        Self::default()
    }

    /// A tester with its mask loaded from `source`
    pub fn with_source(source: impl Into<MaskSource>) -> Self {
        let mut tester = Self::new();
        tester.set_source(source);
        tester
    }

    /// Share an already decoded mask
    pub fn with_mask(mask: Arc<CollisionMask>) -> Self {
        Self {
            source: None,
            mask: Some(mask),
        }
    }

    /// Load a new mask with the default loader
    ///
    /// Failure leaves the tester without a mask; the error is logged.
    pub fn set_source(&mut self, source: impl Into<MaskSource>) {
        self.set_source_with(source, &ImageMaskLoader);
    }

    /// Load a new mask with a custom loader
    pub fn set_source_with(&mut self, source: impl Into<MaskSource>, loader: &impl MaskLoader) {
        let source = source.into();
        self.mask = match loader.load(&source) {
            Ok(mask) => {
                tracing::debug!(
                    "Loaded collision mask {}x{} from {}",
                    mask.width(),
                    mask.height(),
                    source
                );
                Some(Arc::new(mask))
            }
            Err(e) => {
                tracing::warn!("Failed to load collision mask from {}: {}", source, e);
                None
            }
        };
        self.source = Some(source);
    }

    pub fn set_mask(&mut self, mask: Option<Arc<CollisionMask>>) {
        self.source = None;
        self.mask = mask;
    }

    pub fn source(&self) -> Option<&MaskSource> {
        self.source.as_ref()
    }

    pub fn mask(&self) -> Option<&Arc<CollisionMask>> {
        self.mask.as_ref()
    }
}

impl HitTest for PixelMaskHitTest {
    fn hit_test(&self, local: Point, geometry: &HitGeometry) -> bool {
        if !RectHitTest.hit_test(local, geometry) {
            return false;
        }
        let Some(mask) = &self.mask else {
            return false;
        };
        mask.sample_local(local, geometry.size) > 0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::encode_png;
    use tactile_core::{HoverRegion, Size};

    fn geometry(width: f32, height: f32) -> HitGeometry {
        HitGeometry::new(Size::new(width, height), HoverRegion::UNSET)
    }

    #[test]
    fn test_without_mask_nothing_collides() {
        let tester = PixelMaskHitTest::new();
        assert!(!tester.hit_test(Point::new(1.0, 1.0), &geometry(8.0, 8.0)));
    }

    #[test]
    fn test_single_opaque_pixel() {
        // Image row 1 counted from the top is row 2 counted from the bottom
        // of the 4-row mask; local y = 5 lands in that row
        let tester = PixelMaskHitTest::with_source(encode_png(4, 4, &[(2, 1)]));
        let geometry = geometry(8.0, 8.0);

        assert!(tester.hit_test(Point::new(5.0, 5.0), &geometry));
        assert!(!tester.hit_test(Point::new(5.0, 1.0), &geometry));
        assert!(!tester.hit_test(Point::new(1.0, 7.0), &geometry));
    }

    #[test]
    fn test_bounds_are_checked_first() {
        let mask = CollisionMask::from_alpha(2, 2, vec![255; 4]).unwrap();
        let tester = PixelMaskHitTest::with_mask(Arc::new(mask));
        let clipped = HitGeometry::new(Size::new(8.0, 8.0), HoverRegion::new(0.0, 4.0, 4.0, 4.0));

        assert!(tester.hit_test(Point::new(2.0, 6.0), &clipped));
        assert!(!tester.hit_test(Point::new(6.0, 2.0), &clipped));
        assert!(!tester.hit_test(Point::new(9.0, 2.0), &geometry(8.0, 8.0)));
    }

    #[test]
    fn test_failed_load_clears_previous_mask() {
        let mut tester = PixelMaskHitTest::with_source(encode_png(1, 1, &[(0, 0)]));
        assert!(tester.mask().is_some());

        tester.set_source(vec![0u8, 1, 2]);
        assert!(tester.mask().is_none());
        assert!(tester.source().is_some());
        assert!(!tester.hit_test(Point::new(0.5, 0.5), &geometry(1.0, 1.0)));
    }

    #[test]
    fn test_masks_are_shared() {
        let mask = Arc::new(CollisionMask::from_alpha(1, 1, vec![1]).unwrap());
        let a = PixelMaskHitTest::with_mask(Arc::clone(&mask));
        let b = PixelMaskHitTest::with_mask(Arc::clone(&mask));

        assert_eq!(Arc::strong_count(&mask), 3);
        assert!(a.hit_test(Point::new(0.5, 0.5), &geometry(1.0, 1.0)));
        assert!(b.hit_test(Point::new(0.5, 0.5), &geometry(1.0, 1.0)));
    }
}
