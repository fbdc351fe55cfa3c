//! Decision tree engine: builder model, live preview walker, and graph
//! diagnostics.

pub mod lint;
pub mod model;
pub mod walker;

pub use lint::lint_tree;
pub use model::{Answer, DecisionTree, ROOT_ID, TreeCollection, TreeNode};
pub use walker::{PathEntry, PreviewWalker};
