//! Coordinate conversion between rendered-pixel space and the percent space
//! markers are stored in, plus the small vector helpers the interaction
//! engine shares.

use kurbo::{Point, Vec2};
use sw_core::Marker;

/// The rendered bounding box of the annotated image, pixels.
///
/// All pointer events arrive in this space; marker geometry is stored as
/// percent of this box so it survives responsive layout changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub width: f64,
    pub height: f64,
}

impl ImageFrame {
    pub fn new(width: f64, height: f64) -> Self {
        // A zero-sized frame would turn every conversion into NaN.
        Self {
            width: if width.is_finite() && width > 0.0 {
                width
            } else {
                1.0
            },
            height: if height.is_finite() && height > 0.0 {
                height
            } else {
                1.0
            },
        }
    }

    /// Pixel point → percent coordinates (unclamped; callers clamp on store).
    pub fn to_pct(&self, p: Point) -> (f64, f64) {
        (p.x / self.width * 100.0, p.y / self.height * 100.0)
    }

    /// Percent coordinates → pixel point.
    pub fn to_px(&self, x_pct: f64, y_pct: f64) -> Point {
        Point::new(x_pct / 100.0 * self.width, y_pct / 100.0 * self.height)
    }

    /// A pixel delta expressed as a percent delta.
    pub fn delta_pct(&self, from: Point, to: Point) -> (f64, f64) {
        (
            (to.x - from.x) / self.width * 100.0,
            (to.y - from.y) / self.height * 100.0,
        )
    }
}

/// Distance from `p` to the segment `a`–`b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 <= f64::EPSILON {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot()
}

/// Rotate `p` around `center` by `angle` radians.
pub fn rotate_about(p: Point, center: Point, angle: f64) -> Point {
    let v = p - center;
    let (sin, cos) = angle.sin_cos();
    center + Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// The line's rendered endpoints in pixel space: stored endpoints rotated by
/// the marker's extra render-time rotation around the segment midpoint.
pub fn line_render_endpoints(marker: &Marker, frame: &ImageFrame) -> (Point, Point) {
    let a = frame.to_px(marker.x1, marker.y1);
    let b = frame.to_px(marker.x2, marker.y2);
    if marker.rotation == 0.0 {
        return (a, b);
    }
    let mid = frame.to_px(marker.line_midpoint().0, marker.line_midpoint().1);
    (
        rotate_about(a, mid, marker.rotation),
        rotate_about(b, mid, marker.rotation),
    )
}

/// Arrow shaft endpoints in pixel space: tip anchor plus `length` pixels
/// along the rotation direction.
pub fn arrow_endpoints(marker: &Marker, frame: &ImageFrame) -> (Point, Point) {
    let tip = frame.to_px(marker.x, marker.y);
    let dir = Vec2::from_angle(marker.rotation);
    (tip, tip + dir * marker.length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn pct_px_roundtrip() {
        let frame = ImageFrame::new(200.0, 100.0);
        let p = frame.to_px(50.0, 50.0);
        assert_eq!(p, Point::new(100.0, 50.0));
        assert_eq!(frame.to_pct(p), (50.0, 50.0));
    }

    #[test]
    fn zero_sized_frame_never_divides_by_zero() {
        let frame = ImageFrame::new(0.0, f64::NAN);
        let (x, y) = frame.to_pct(Point::new(1.0, 1.0));
        assert!(x.is_finite() && y.is_finite());
    }

    #[test]
    fn segment_distance_endpoints_and_interior() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(point_segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_segment_distance(Point::new(-4.0, 0.0), a, b), 4.0);
        // Degenerate segment
        assert_eq!(point_segment_distance(Point::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn rotate_about_quarter_turn() {
        let p = rotate_about(Point::new(2.0, 0.0), Point::ORIGIN, FRAC_PI_2);
        assert!((p.x - 0.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }
}
