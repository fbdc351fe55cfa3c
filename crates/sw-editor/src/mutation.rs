//! The mutation command vocabulary.
//!
//! Every edit the builder UI can make is expressed as one `DocMutation`
//! value and funneled through `EditorSession::apply`, which gives the
//! session a single place to route through the collection engines, mark
//! dirtiness, and arm the autosave.

use sw_core::{BlockData, BlockKind, BlockSettings, DocumentStatus, Id, Marker};

#[derive(Debug, Clone)]
pub enum DocMutation {
    // Block operations, scoped to one step.
    AddBlock {
        step: Id,
        kind: BlockKind,
        /// Insert immediately after this position; `-1` prepends.
        after_index: isize,
    },
    UpdateBlockData {
        step: Id,
        block: Id,
        data: BlockData,
    },
    UpdateBlockSettings {
        step: Id,
        block: Id,
        settings: BlockSettings,
    },
    DeleteBlock {
        step: Id,
        block: Id,
    },
    DuplicateBlock {
        step: Id,
        block: Id,
    },
    MoveBlock {
        step: Id,
        from: Id,
        to: Id,
    },
    /// Commit an annotation gesture's result onto its block.
    SetMarkers {
        step: Id,
        block: Id,
        markers: Vec<Marker>,
    },

    // Step operations.
    AddStep {
        /// Insert after this step; `None` appends.
        after: Option<Id>,
    },
    DeleteStep {
        step: Id,
    },
    MoveStep {
        from: Id,
        to: Id,
    },
    SetStepTitle {
        step: Id,
        title: String,
    },
    SetStepContent {
        step: Id,
        content: String,
    },

    // Document metadata.
    SetTitle(String),
    SetDescription(String),
    SetStatus(DocumentStatus),
}

impl DocMutation {
    /// Short label for logging.
    pub fn describe(&self) -> &'static str {
        match self {
            DocMutation::AddBlock { .. } => "add block",
            DocMutation::UpdateBlockData { .. } => "update block data",
            DocMutation::UpdateBlockSettings { .. } => "update block settings",
            DocMutation::DeleteBlock { .. } => "delete block",
            DocMutation::DuplicateBlock { .. } => "duplicate block",
            DocMutation::MoveBlock { .. } => "move block",
            DocMutation::SetMarkers { .. } => "set markers",
            DocMutation::AddStep { .. } => "add step",
            DocMutation::DeleteStep { .. } => "delete step",
            DocMutation::MoveStep { .. } => "move step",
            DocMutation::SetStepTitle { .. } => "set step title",
            DocMutation::SetStepContent { .. } => "set step content",
            DocMutation::SetTitle(_) => "set title",
            DocMutation::SetDescription(_) => "set description",
            DocMutation::SetStatus(_) => "set status",
        }
    }
}
