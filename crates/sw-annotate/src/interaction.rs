//! Pointer-driven interaction state machine for annotation markers.
//!
//! One interaction at a time: `Idle → Dragging | Resizing | Rotating → Idle`.
//! Pointer-up and pointer-leave unconditionally return to `Idle` — a stuck
//! non-idle state would permanently break every further interaction, so
//! there is deliberately no code path that keeps a gesture alive past its
//! release.
//!
//! Gesture math uses the *initial* anchor plus the cumulative pointer delta,
//! never the previous frame's position plus a per-frame delta: move events
//! arrive already coalesced by the host, and incremental accumulation drifts
//! under event loss. Every computed coordinate passes through
//! `Marker::sanitize` before it is stored.

use crate::geometry::ImageFrame;
use crate::hit::{Corner, Handle, LineEnd, hit_handle, hit_test};
use kurbo::{Point, Vec2};
use log::debug;
use sw_core::marker::normalize_angle;
use sw_core::{Id, Marker, MarkerShape};

/// Dot resize: pixels of size change per pixel of pointer travel.
const DOT_RESIZE_SENSITIVITY: f64 = 1.0;
/// Dot diameter bounds, pixels.
const DOT_SIZE_MIN: f64 = 10.0;
const DOT_SIZE_MAX: f64 = 200.0;
/// Rectangle extent floor, percent.
const RECT_MIN_EXTENT: f64 = 5.0;
/// Arrow resize: length change per pixel of along-axis pointer travel.
const ARROW_RESIZE_SENSITIVITY: f64 = 2.0;
/// Arrow length bounds, pixels.
const ARROW_LENGTH_MIN: f64 = 20.0;
const ARROW_LENGTH_MAX: f64 = 300.0;
/// Line length floor, percent.
const LINE_MIN_LENGTH: f64 = 5.0;

/// Which axis a dot-resize gesture is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Geometry captured at drag start.
#[derive(Debug, Clone, Copy)]
enum DragAnchor {
    /// Dot / rectangle center or arrow tip, percent.
    Point { x: f64, y: f64 },
    /// Both line endpoints, percent.
    Segment { x1: f64, y1: f64, x2: f64, y2: f64 },
}

/// Shape-specific state captured at resize start.
#[derive(Debug, Clone, Copy)]
enum ResizeGesture {
    Dot {
        axis: Axis,
        start_pointer: Point,
        start_size: f64,
    },
    Rect {
        corner: Corner,
    },
    Arrow {
        start_pointer: Point,
        start_length: f64,
        /// Rotation at gesture start; the projection axis is fixed for the
        /// whole gesture even if something else mutates the marker.
        rotation: f64,
    },
    Line {
        end: LineEnd,
        /// The fixed opposite endpoint, percent.
        anchor: Point,
        /// Unit direction from anchor to the moving endpoint at gesture
        /// start, percent space. The endpoint may only travel along it.
        dir: Vec2,
    },
}

/// The active interaction.
#[derive(Debug, Clone, Copy)]
enum Interaction {
    Idle,
    Dragging {
        id: Id,
        start_pointer_pct: (f64, f64),
        anchor: DragAnchor,
        /// Whether any movement happened (distinguishes click from drag).
        moved: bool,
        /// Marker was created by this gesture's pointer-down.
        fresh: bool,
    },
    Resizing {
        id: Id,
        gesture: ResizeGesture,
    },
    Rotating {
        id: Id,
        center_px: Point,
        /// `start_rotation - angle(center → pointer at gesture start)`, so the
        /// shape tracks relative pointer movement instead of snapping to it.
        offset: f64,
    },
}

/// Editing state for one annotated image: the marker list, the single
/// editable selection, and the in-flight gesture.
pub struct AnnotationEditor {
    markers: Vec<Marker>,
    frame: ImageFrame,
    selected: Option<Id>,
    state: Interaction,
}

impl AnnotationEditor {
    pub fn new(markers: Vec<Marker>, frame: ImageFrame) -> Self {
        Self {
            markers,
            frame,
            selected: None,
            state: Interaction::Idle,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn selected(&self) -> Option<Id> {
        self.selected
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Interaction::Idle)
    }

    /// 1-based badge number: the marker's position in storage order. Not a
    /// stable id — deleting an earlier marker renumbers everything after it.
    pub fn badge(&self, id: Id) -> Option<usize> {
        self.markers.iter().position(|m| m.id == id).map(|i| i + 1)
    }

    /// The image box changed (responsive layout); percent geometry is
    /// unaffected, only pointer conversion.
    pub fn set_frame(&mut self, frame: ImageFrame) {
        self.frame = frame;
    }

    fn marker(&self, id: Id) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    fn marker_mut(&mut self, id: Id) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }

    /// Change a marker's shape tag. The redundant geometry fields were seeded
    /// from one anchor at creation, so the marker stays put.
    pub fn set_shape(&mut self, id: Id, shape: MarkerShape) {
        if let Some(m) = self.marker_mut(id) {
            m.shape = shape;
        }
    }

    /// Remove a marker. Any selection or in-flight gesture referring to it is
    /// cleared so no dangling interaction survives.
    pub fn remove(&mut self, id: Id) {
        self.markers.retain(|m| m.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        let interacting = match self.state {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. }
            | Interaction::Resizing { id, .. }
            | Interaction::Rotating { id, .. } => Some(id),
        };
        if interacting == Some(id) {
            self.state = Interaction::Idle;
        }
    }

    // ─── Pointer protocol ────────────────────────────────────────────────

    /// Pointer-down at a pixel position within the image frame.
    pub fn pointer_down(&mut self, p: Point) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        // Handles of the selected marker win over anything underneath.
        if let Some(sel) = self.selected
            && let Some(marker) = self.marker(sel)
            && let Some(handle) = hit_handle(marker, &self.frame, p)
        {
            self.state = self.begin_handle_gesture(marker.clone(), handle, p);
            return;
        }

        if let Some(hit) = hit_test(&self.markers, &self.frame, p) {
            self.begin_drag(hit, p, false);
            return;
        }

        // Empty canvas: create a marker at the click point and start placing it.
        let (x_pct, y_pct) = self.frame.to_pct(p);
        let marker = Marker::at(x_pct, y_pct);
        let id = marker.id;
        debug!("created marker {id} at ({x_pct:.1}%, {y_pct:.1}%)");
        self.markers.push(marker);
        self.selected = Some(id);
        self.begin_drag(id, p, true);
    }

    /// Pointer moved while (possibly) mid-gesture.
    pub fn pointer_move(&mut self, p: Point) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        match self.state {
            Interaction::Idle => {}
            Interaction::Dragging {
                id,
                start_pointer_pct,
                anchor,
                fresh,
                ..
            } => {
                let (px, py) = self.frame.to_pct(p);
                let delta = (px - start_pointer_pct.0, py - start_pointer_pct.1);
                let moved = delta.0 != 0.0 || delta.1 != 0.0;
                self.apply_drag(id, anchor, delta);
                self.state = Interaction::Dragging {
                    id,
                    start_pointer_pct,
                    anchor,
                    moved,
                    fresh,
                };
            }
            Interaction::Resizing { id, gesture } => self.apply_resize(id, gesture, p),
            Interaction::Rotating {
                id,
                center_px,
                offset,
            } => {
                let v = p - center_px;
                if v.hypot2() > 0.0
                    && let Some(m) = self.marker_mut(id)
                {
                    m.rotation = normalize_angle(v.atan2() + offset);
                    m.sanitize();
                }
            }
        }
    }

    /// Pointer released: finish the gesture and settle selection. A click
    /// (down + up without movement) toggles the single editable selection.
    pub fn pointer_up(&mut self) {
        if let Interaction::Dragging {
            id, moved, fresh, ..
        } = self.state
        {
            if fresh || moved {
                self.selected = Some(id);
            } else if self.selected == Some(id) {
                self.selected = None;
            } else {
                self.selected = Some(id);
            }
        }
        self.state = Interaction::Idle;
    }

    /// Pointer left the image: cancel whatever was in flight. The marker
    /// keeps the geometry it reached; only the gesture ends.
    pub fn pointer_leave(&mut self) {
        self.state = Interaction::Idle;
    }

    // ─── Gesture start ───────────────────────────────────────────────────

    fn begin_drag(&mut self, id: Id, p: Point, fresh: bool) {
        let Some(marker) = self.marker(id) else {
            return;
        };
        let anchor = match marker.shape {
            MarkerShape::Line => DragAnchor::Segment {
                x1: marker.x1,
                y1: marker.y1,
                x2: marker.x2,
                y2: marker.y2,
            },
            _ => DragAnchor::Point {
                x: marker.x,
                y: marker.y,
            },
        };
        self.state = Interaction::Dragging {
            id,
            start_pointer_pct: self.frame.to_pct(p),
            anchor,
            moved: false,
            fresh,
        };
    }

    fn begin_handle_gesture(&self, marker: Marker, handle: Handle, p: Point) -> Interaction {
        let id = marker.id;
        match handle {
            Handle::DotSize => {
                let center = self.frame.to_px(marker.x, marker.y);
                let offset = p - center;
                // The axis with the larger initial offset stays locked for
                // the whole gesture.
                let axis = if offset.x.abs() >= offset.y.abs() {
                    Axis::X
                } else {
                    Axis::Y
                };
                Interaction::Resizing {
                    id,
                    gesture: ResizeGesture::Dot {
                        axis,
                        start_pointer: p,
                        start_size: marker.size,
                    },
                }
            }
            Handle::RectCorner(corner) => Interaction::Resizing {
                id,
                gesture: ResizeGesture::Rect { corner },
            },
            Handle::ArrowEnd => Interaction::Resizing {
                id,
                gesture: ResizeGesture::Arrow {
                    start_pointer: p,
                    start_length: marker.length,
                    rotation: marker.rotation,
                },
            },
            Handle::ArrowRotate => {
                let center = self.frame.to_px(marker.x, marker.y);
                let v = p - center;
                let pointer_angle = if v.hypot2() > 0.0 { v.atan2() } else { 0.0 };
                Interaction::Rotating {
                    id,
                    center_px: center,
                    offset: marker.rotation - pointer_angle,
                }
            }
            Handle::LineEndpoint(end) => {
                let (moving, anchor) = match end {
                    LineEnd::Start => (
                        Point::new(marker.x1, marker.y1),
                        Point::new(marker.x2, marker.y2),
                    ),
                    LineEnd::End => (
                        Point::new(marker.x2, marker.y2),
                        Point::new(marker.x1, marker.y1),
                    ),
                };
                let span = moving - anchor;
                // Degenerate (zero-length) lines resize horizontally.
                let dir = if span.hypot2() > f64::EPSILON {
                    span.normalize()
                } else {
                    Vec2::new(1.0, 0.0)
                };
                Interaction::Resizing {
                    id,
                    gesture: ResizeGesture::Line { end, anchor, dir },
                }
            }
            Handle::LineRotate => {
                let (mx, my) = marker.line_midpoint();
                let center = self.frame.to_px(mx, my);
                let v = p - center;
                let pointer_angle = if v.hypot2() > 0.0 { v.atan2() } else { 0.0 };
                Interaction::Rotating {
                    id,
                    center_px: center,
                    offset: marker.rotation - pointer_angle,
                }
            }
        }
    }

    // ─── Gesture application ─────────────────────────────────────────────

    fn apply_drag(&mut self, id: Id, anchor: DragAnchor, delta: (f64, f64)) {
        let Some(m) = self.marker_mut(id) else {
            return;
        };
        match anchor {
            DragAnchor::Point { x, y } => {
                m.x = x + delta.0;
                m.y = y + delta.1;
            }
            DragAnchor::Segment { x1, y1, x2, y2 } => {
                // Clamp the delta jointly so both endpoints stay in range and
                // the segment keeps its shape instead of squashing on an edge.
                let dx = delta
                    .0
                    .clamp(-x1.min(x2), 100.0 - x1.max(x2));
                let dy = delta
                    .1
                    .clamp(-y1.min(y2), 100.0 - y1.max(y2));
                m.x1 = x1 + dx;
                m.y1 = y1 + dy;
                m.x2 = x2 + dx;
                m.y2 = y2 + dy;
                // Keep the shared anchor in step with the midpoint so a later
                // shape switch stays coherent.
                let (mx, my) = m.line_midpoint();
                m.x = mx;
                m.y = my;
            }
        }
        m.sanitize();
    }

    fn apply_resize(&mut self, id: Id, gesture: ResizeGesture, p: Point) {
        match gesture {
            ResizeGesture::Dot {
                axis,
                start_pointer,
                start_size,
            } => {
                let d = p - start_pointer;
                let axis_delta = match axis {
                    Axis::X => d.x,
                    Axis::Y => d.y,
                };
                if let Some(m) = self.marker_mut(id) {
                    m.size = (start_size + axis_delta * DOT_RESIZE_SENSITIVITY)
                        .clamp(DOT_SIZE_MIN, DOT_SIZE_MAX);
                    m.sanitize();
                }
            }
            ResizeGesture::Rect { corner } => {
                let (px, py) = self.frame.to_pct(p);
                if let Some(m) = self.marker_mut(id) {
                    let mut dx = px - m.x;
                    let mut dy = py - m.y;
                    if corner.flips_x() {
                        dx = -dx;
                    }
                    if corner.flips_y() {
                        dy = -dy;
                    }
                    m.width = (dx * 2.0).max(RECT_MIN_EXTENT);
                    m.height = (dy * 2.0).max(RECT_MIN_EXTENT);
                    m.sanitize();
                }
            }
            ResizeGesture::Arrow {
                start_pointer,
                start_length,
                rotation,
            } => {
                // Only motion colinear with the shaft changes the length;
                // perpendicular motion is ignored.
                let along = Vec2::from_angle(rotation);
                let projection = (p - start_pointer).dot(along);
                if let Some(m) = self.marker_mut(id) {
                    m.length = (start_length + projection * ARROW_RESIZE_SENSITIVITY)
                        .clamp(ARROW_LENGTH_MIN, ARROW_LENGTH_MAX);
                    m.sanitize();
                }
            }
            ResizeGesture::Line { end, anchor, dir } => {
                let (px, py) = self.frame.to_pct(p);
                let v = Point::new(px, py) - anchor;
                let mut t = v.dot(dir);
                // Stay inside the image: clamp the travel parameter rather
                // than the resulting point, so the segment never bends.
                let (lo, hi) = travel_bounds(anchor, dir);
                t = t.clamp(lo, hi);
                if t.abs() < LINE_MIN_LENGTH {
                    let sign = if t < 0.0 { -1.0 } else { 1.0 };
                    t = (sign * LINE_MIN_LENGTH).clamp(lo, hi);
                }
                let endpoint = anchor + dir * t;
                if let Some(m) = self.marker_mut(id) {
                    match end {
                        LineEnd::Start => {
                            m.x1 = endpoint.x;
                            m.y1 = endpoint.y;
                        }
                        LineEnd::End => {
                            m.x2 = endpoint.x;
                            m.y2 = endpoint.y;
                        }
                    }
                    let (mx, my) = m.line_midpoint();
                    m.x = mx;
                    m.y = my;
                    m.sanitize();
                }
            }
        }
    }
}

/// The signed travel range `t` such that `anchor + dir * t` stays inside
/// [0, 100] on both axes.
fn travel_bounds(anchor: Point, dir: Vec2) -> (f64, f64) {
    let mut lo = f64::NEG_INFINITY;
    let mut hi = f64::INFINITY;
    for (a, d) in [(anchor.x, dir.x), (anchor.y, dir.y)] {
        if d.abs() < 1e-12 {
            continue;
        }
        let t0 = (0.0 - a) / d;
        let t1 = (100.0 - a) / d;
        lo = lo.max(t0.min(t1));
        hi = hi.min(t0.max(t1));
    }
    if lo > hi { (0.0, 0.0) } else { (lo, hi) }
}
