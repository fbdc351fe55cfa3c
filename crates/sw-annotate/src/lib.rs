//! Geometry and pointer interaction for annotated-image blocks.
//!
//! `sw-core` owns the marker data model; this crate owns everything that
//! happens between a pointer event and a committed marker mutation:
//! pixel/percent conversion, hit testing, and the drag/resize/rotate state
//! machine.

pub mod geometry;
pub mod hit;
pub mod interaction;

pub use geometry::ImageFrame;
pub use hit::{Corner, Handle, LineEnd, hit_handle, hit_test};
pub use interaction::AnnotationEditor;
