//! Geometry primitives and coordinate spaces
//!
//! Widget-local space has its origin at the widget's bottom-left corner with
//! `y` growing upward. Hosts describe how a root-space pointer position maps
//! into a widget's local space through [`CoordinateSpace`].

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns true if both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Inclusive containment test on all four edges
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }
}

/// Explicit hit rectangle in local coordinates
///
/// A region with all four components equal to zero is "unset": the widget's
/// native bounds are used instead. Zero is a sentinel, not an empty region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HoverRegion {
    /// The unset region (falls back to native bounds)
    pub const UNSET: HoverRegion = HoverRegion {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }

    /// The rectangle used for hit testing a widget of the given size
    pub fn resolve(&self, native: Size) -> Rect {
        if self.is_unset() {
            native.to_rect()
        } else {
            Rect::new(self.x, self.y, self.width, self.height)
        }
    }
}

/// Conversion between a parent's coordinate space and a widget's local space
///
/// `to_local` is used when a pointer event is routed into the widget;
/// `to_parent` lets a parent express a child's local position in its own
/// space when dispatching top-down.
pub trait CoordinateSpace {
    fn to_local(&self, point: Point) -> Point;

    fn to_parent(&self, point: Point) -> Point;
}

/// Local origin placed at `origin` in the parent's space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translation {
    pub origin: Point,
}

impl Translation {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            origin: Point::new(x, y),
        }
    }
}

impl CoordinateSpace for Translation {
    fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.origin.x, point.y - self.origin.y)
    }

    fn to_parent(&self, point: Point) -> Point {
        Point::new(point.x + self.origin.x, point.y + self.origin.y)
    }
}

/// Uniform scale about the local origin followed by a translation
///
/// A scale of zero collapses the space; `to_local` then yields non-finite
/// coordinates, which hit tests treat as a miss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTranslate {
    pub origin: Point,
    pub scale: f32,
}

impl ScaleTranslate {
    pub const fn new(origin: Point, scale: f32) -> Self {
        Self { origin, scale }
    }
}

impl CoordinateSpace for ScaleTranslate {
    fn to_local(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.origin.x) / self.scale,
            (point.y - self.origin.y) / self.scale,
        )
    }

    fn to_parent(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.origin.x,
            point.y * self.scale + self.origin.y,
        )
    }
}

/// A child space nested inside a parent space
///
/// `to_local` applies the parent conversion first, then the child's.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nested<P, C> {
    pub parent: P,
    pub child: C,
}

impl<P, C> Nested<P, C> {
    pub const fn new(parent: P, child: C) -> Self {
        Self { parent, child }
    }
}

impl<P: CoordinateSpace, C: CoordinateSpace> CoordinateSpace for Nested<P, C> {
    fn to_local(&self, point: Point) -> Point {
        self.child.to_local(self.parent.to_local(point))
    }

    fn to_parent(&self, point: Point) -> Point {
        self.parent.to_parent(self.child.to_parent(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_region_uses_native_bounds() {
        let native = Size::new(40.0, 20.0);
        assert!(HoverRegion::UNSET.is_unset());
        assert_eq!(HoverRegion::UNSET.resolve(native), Rect::new(0.0, 0.0, 40.0, 20.0));

        let region = HoverRegion::new(0.0, 0.0, 10.0, 0.0);
        assert!(!region.is_unset());
        assert_eq!(region.resolve(native), Rect::new(0.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(!rect.contains(Point::new(10.01, 5.0)));
        assert!(!rect.contains(Point::new(f32::NAN, 5.0)));
    }

    #[test]
    fn test_nested_space_round_trip() {
        let space = Nested::new(
            Translation::new(100.0, 50.0),
            ScaleTranslate::new(Point::new(10.0, 10.0), 2.0),
        );

        let local = space.to_local(Point::new(120.0, 70.0));
        assert_eq!(local, Point::new(5.0, 5.0));
        assert_eq!(space.to_parent(local), Point::new(120.0, 70.0));
    }

    #[test]
    fn test_zero_scale_produces_non_finite_point() {
        let space = ScaleTranslate::new(Point::ZERO, 0.0);
        assert!(!space.to_local(Point::new(1.0, 1.0)).is_finite());
    }
}
