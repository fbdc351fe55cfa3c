pub mod collection;
pub mod document;
pub mod id;
pub mod lint;
pub mod marker;
pub mod model;

pub use collection::BlockPatch;
pub use id::Id;
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use marker::{Marker, MarkerShape, clamp_pct, normalize_angle};
pub use model::*;
