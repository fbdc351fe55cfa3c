//! Hit testing: pointer position → marker body or handle.
//!
//! Works in rendered-pixel space so thresholds feel constant regardless of
//! image size. Markers later in the storage array render on top, so body
//! hit testing walks the array in reverse.

use crate::geometry::{
    ImageFrame, arrow_endpoints, line_render_endpoints, point_segment_distance,
};
use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use sw_core::{Id, Marker, MarkerShape};

/// Pixel slop around thin shapes (lines, arrow shafts) and handles.
const HIT_PAD: f64 = 8.0;
/// Handle grab radius, pixels.
const HANDLE_RADIUS: f64 = 10.0;
/// How far past the shape its rotate handle sits, pixels.
const ROTATE_HANDLE_OFFSET: f64 = 24.0;

/// Rectangle corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    /// West corners flip the x sign during resize.
    pub fn flips_x(self) -> bool {
        matches!(self, Corner::Nw | Corner::Sw)
    }

    /// North corners flip the y sign during resize.
    pub fn flips_y(self) -> bool {
        matches!(self, Corner::Nw | Corner::Ne)
    }
}

/// Which line endpoint a gesture is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    End,
}

/// The grabbable handles of a selected marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Dot: single size handle.
    DotSize,
    /// Rectangle: four corner handles.
    RectCorner(Corner),
    /// Arrow: shaft-end length handle.
    ArrowEnd,
    /// Arrow: rotation handle past the shaft end.
    ArrowRotate,
    /// Line: endpoint handles.
    LineEndpoint(LineEnd),
    /// Line: rotation handle perpendicular to the midpoint.
    LineRotate,
}

/// Handle positions for a marker, in pixel space.
pub fn handle_positions(marker: &Marker, frame: &ImageFrame) -> SmallVec<[(Handle, Point); 5]> {
    let mut out = SmallVec::new();
    match marker.shape {
        MarkerShape::Dot => {
            let c = frame.to_px(marker.x, marker.y);
            let r = marker.size / 2.0;
            out.push((Handle::DotSize, c + Vec2::new(r, r)));
        }
        MarkerShape::Rectangle => {
            let c = frame.to_px(marker.x, marker.y);
            let half = Vec2::new(
                marker.width / 200.0 * frame.width,
                marker.height / 200.0 * frame.height,
            );
            out.push((Handle::RectCorner(Corner::Nw), c + Vec2::new(-half.x, -half.y)));
            out.push((Handle::RectCorner(Corner::Ne), c + Vec2::new(half.x, -half.y)));
            out.push((Handle::RectCorner(Corner::Sw), c + Vec2::new(-half.x, half.y)));
            out.push((Handle::RectCorner(Corner::Se), c + Vec2::new(half.x, half.y)));
        }
        MarkerShape::Arrow => {
            let (tip, end) = arrow_endpoints(marker, frame);
            let dir = Vec2::from_angle(marker.rotation);
            out.push((Handle::ArrowEnd, end));
            out.push((Handle::ArrowRotate, tip + dir * (marker.length + ROTATE_HANDLE_OFFSET)));
        }
        MarkerShape::Line => {
            let (a, b) = line_render_endpoints(marker, frame);
            out.push((Handle::LineEndpoint(LineEnd::Start), a));
            out.push((Handle::LineEndpoint(LineEnd::End), b));
            // Rotate handle hangs perpendicular off the midpoint.
            let mid = a.midpoint(b);
            let along = (b - a).normalize();
            let normal = if along.hypot2() > 0.0 {
                Vec2::new(-along.y, along.x)
            } else {
                Vec2::new(0.0, -1.0)
            };
            out.push((Handle::LineRotate, mid + normal * ROTATE_HANDLE_OFFSET));
        }
    }
    out
}

/// Which handle of `marker`, if any, is under the pointer.
pub fn hit_handle(marker: &Marker, frame: &ImageFrame, p: Point) -> Option<Handle> {
    handle_positions(marker, frame)
        .into_iter()
        .find(|(_, pos)| (*pos - p).hypot() <= HANDLE_RADIUS)
        .map(|(h, _)| h)
}

/// Whether the pointer is on the marker's body.
pub fn hit_body(marker: &Marker, frame: &ImageFrame, p: Point) -> bool {
    match marker.shape {
        MarkerShape::Dot => {
            let c = frame.to_px(marker.x, marker.y);
            (p - c).hypot() <= marker.size / 2.0 + HIT_PAD / 2.0
        }
        MarkerShape::Rectangle => {
            let c = frame.to_px(marker.x, marker.y);
            let hw = marker.width / 200.0 * frame.width;
            let hh = marker.height / 200.0 * frame.height;
            (p.x - c.x).abs() <= hw && (p.y - c.y).abs() <= hh
        }
        MarkerShape::Arrow => {
            let (tip, end) = arrow_endpoints(marker, frame);
            point_segment_distance(p, tip, end) <= HIT_PAD
        }
        MarkerShape::Line => {
            let (a, b) = line_render_endpoints(marker, frame);
            point_segment_distance(p, a, b) <= HIT_PAD
        }
    }
}

/// Topmost marker under the pointer, if any. Later markers draw on top.
pub fn hit_test(markers: &[Marker], frame: &ImageFrame, p: Point) -> Option<Id> {
    markers
        .iter()
        .rev()
        .find(|m| hit_body(m, frame, p))
        .map(|m| m.id)
}
