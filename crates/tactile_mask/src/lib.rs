//! Tactile Mask
//!
//! Pixel-perfect hit testing for Tactile widgets. A [`PixelMaskHitTest`]
//! replaces a widget's default bounds test and only reports a hit where the
//! mask image is not fully transparent.
//!
//! ```rust,no_run
//! use tactile_core::{Interactions, Size, Widget};
//! use tactile_mask::PixelMaskHitTest;
//!
//! let mut ui: Interactions = Interactions::new();
//! let id = ui.insert(
//!     Widget::new(Size::new(64.0, 64.0))
//!         .momentary()
//!         .hit_test(PixelMaskHitTest::with_source("assets/round_button.png")),
//! );
//!
//! // Swap the mask later without rebuilding the widget
//! if let Some(tester) = ui.hit_test_mut::<PixelMaskHitTest>(id) {
//!     tester.set_source("assets/round_button_pressed.png");
//! }
//! ```

mod collision;
mod error;
mod loader;
mod mask;


pub use collision::PixelMaskHitTest;
pub use error::{MaskError, Result};
pub use loader::{ImageMaskLoader, MaskLoader, MaskSource};
pub use mask::CollisionMask;
