//! Core document model for Stepwise walkthroughs.
//!
//! A walkthrough `Document` is an ordered sequence of `Step`s; each step owns
//! an ordered sequence of typed `Block`s. The block union is closed: a block's
//! payload shape is fully determined by its variant, so UI dispatch is an
//! exhaustive match rather than a stringly-typed switch. Every structural
//! change goes through the collection engine (`collection`, `document`) —
//! nothing mutates a step's block list in place.

use crate::id::Id;
use crate::marker::Marker;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

// ─── Block settings ──────────────────────────────────────────────────────

/// Horizontal alignment of a block within the step column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Per-side spacing in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Spacing {
    pub const fn uniform(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Optional block border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: f32,
    /// Hex color string, e.g. `#E2E8F0`.
    pub color: String,
    pub radius: f32,
}

/// Presentation settings shared by every block variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockSettings {
    pub alignment: Alignment,
    pub padding: Spacing,
    pub margin: Spacing,
    pub border: Option<Border>,
    /// Hex color string; `None` means transparent.
    pub background_color: Option<String>,
}

// ─── Variant payload pieces ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    /// Direct file or CDN URL.
    #[default]
    Url,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Advance to the next step.
    #[default]
    Next,
    Previous,
    /// Open `url` instead of navigating steps.
    Link,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutVariant {
    #[default]
    Tip,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedProvider {
    #[default]
    Youtube,
    Vimeo,
    Loom,
    Figma,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStyle {
    #[default]
    Checkbox,
    Button,
}

/// One slide of a carousel block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CarouselSlide {
    pub url: String,
    pub caption: String,
}

/// One item of a checklist block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Id,
    pub text: String,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Id::generate("chk"),
            text: text.into(),
        }
    }
}

// ─── The block union ─────────────────────────────────────────────────────

/// Discriminant-only view of the block union, used by the factory and by
/// UI palettes that enumerate insertable block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Text,
    Image,
    Video,
    File,
    Button,
    Divider,
    Spacer,
    Problem,
    Carousel,
    Checklist,
    Callout,
    AnnotatedImage,
    Embed,
    Section,
    Confirmation,
    ExternalLink,
    Code,
    Columns,
    Html,
}

impl BlockKind {
    /// Every variant, in palette order.
    pub const ALL: [BlockKind; 20] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::File,
        BlockKind::Button,
        BlockKind::Divider,
        BlockKind::Spacer,
        BlockKind::Problem,
        BlockKind::Carousel,
        BlockKind::Checklist,
        BlockKind::Callout,
        BlockKind::AnnotatedImage,
        BlockKind::Embed,
        BlockKind::Section,
        BlockKind::Confirmation,
        BlockKind::ExternalLink,
        BlockKind::Code,
        BlockKind::Columns,
        BlockKind::Html,
    ];
}

/// The closed set of block payloads. Serialized adjacently tagged so the wire
/// shape is `{"type": "...", "data": {...}}`, matching the stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BlockData {
    Heading {
        content: String,
        level: u8,
    },
    Text {
        content: String,
    },
    Image {
        url: String,
        alt: String,
        caption: String,
    },
    Video {
        url: String,
        source: VideoSource,
    },
    File {
        url: String,
        name: String,
        size: u64,
        mime: String,
    },
    Button {
        text: String,
        action: ButtonAction,
        style: ButtonStyle,
        url: String,
    },
    Divider {
        style: DividerStyle,
    },
    Spacer {
        /// Height in pixels.
        height: f32,
    },
    Problem {
        title: String,
        explanation: String,
        link: String,
    },
    Carousel {
        slides: Vec<CarouselSlide>,
    },
    Checklist {
        items: Vec<ChecklistItem>,
    },
    Callout {
        variant: CalloutVariant,
        content: String,
    },
    AnnotatedImage {
        url: String,
        alt: String,
        markers: Vec<Marker>,
    },
    Embed {
        provider: EmbedProvider,
        url: String,
        aspect_ratio: String,
    },
    Section {
        title: String,
        collapsible: bool,
        blocks: Vec<Block>,
    },
    Confirmation {
        message: String,
        button_text: String,
        style: ConfirmationStyle,
    },
    ExternalLink {
        text: String,
        url: String,
        open_in_new_tab: bool,
    },
    Code {
        code: String,
        language: String,
        show_line_numbers: bool,
    },
    Columns {
        count: u8,
        blocks: Vec<Vec<Block>>,
    },
    Html {
        content: String,
    },
}

impl BlockData {
    /// The documented default payload for a variant.
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Heading => BlockData::Heading {
                content: String::new(),
                level: 2,
            },
            BlockKind::Text => BlockData::Text {
                content: String::new(),
            },
            BlockKind::Image => BlockData::Image {
                url: String::new(),
                alt: String::new(),
                caption: String::new(),
            },
            BlockKind::Video => BlockData::Video {
                url: String::new(),
                source: VideoSource::Url,
            },
            BlockKind::File => BlockData::File {
                url: String::new(),
                name: String::new(),
                size: 0,
                mime: String::new(),
            },
            BlockKind::Button => BlockData::Button {
                text: "Next Step".to_string(),
                action: ButtonAction::Next,
                style: ButtonStyle::Primary,
                url: String::new(),
            },
            BlockKind::Divider => BlockData::Divider {
                style: DividerStyle::Solid,
            },
            BlockKind::Spacer => BlockData::Spacer { height: 32.0 },
            BlockKind::Problem => BlockData::Problem {
                title: String::new(),
                explanation: String::new(),
                link: String::new(),
            },
            BlockKind::Carousel => BlockData::Carousel { slides: Vec::new() },
            BlockKind::Checklist => BlockData::Checklist { items: Vec::new() },
            BlockKind::Callout => BlockData::Callout {
                variant: CalloutVariant::Tip,
                content: String::new(),
            },
            BlockKind::AnnotatedImage => BlockData::AnnotatedImage {
                url: String::new(),
                alt: String::new(),
                markers: Vec::new(),
            },
            BlockKind::Embed => BlockData::Embed {
                provider: EmbedProvider::Youtube,
                url: String::new(),
                aspect_ratio: "16:9".to_string(),
            },
            BlockKind::Section => BlockData::Section {
                title: String::new(),
                collapsible: false,
                blocks: Vec::new(),
            },
            BlockKind::Confirmation => BlockData::Confirmation {
                message: String::new(),
                button_text: "I understand".to_string(),
                style: ConfirmationStyle::Checkbox,
            },
            BlockKind::ExternalLink => BlockData::ExternalLink {
                text: "Learn more".to_string(),
                url: String::new(),
                open_in_new_tab: true,
            },
            BlockKind::Code => BlockData::Code {
                code: String::new(),
                language: "bash".to_string(),
                show_line_numbers: false,
            },
            BlockKind::Columns => BlockData::Columns {
                count: 2,
                blocks: vec![Vec::new(), Vec::new()],
            },
            BlockKind::Html => BlockData::Html {
                content: String::new(),
            },
        }
    }

    /// The variant discriminant.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockData::Heading { .. } => BlockKind::Heading,
            BlockData::Text { .. } => BlockKind::Text,
            BlockData::Image { .. } => BlockKind::Image,
            BlockData::Video { .. } => BlockKind::Video,
            BlockData::File { .. } => BlockKind::File,
            BlockData::Button { .. } => BlockKind::Button,
            BlockData::Divider { .. } => BlockKind::Divider,
            BlockData::Spacer { .. } => BlockKind::Spacer,
            BlockData::Problem { .. } => BlockKind::Problem,
            BlockData::Carousel { .. } => BlockKind::Carousel,
            BlockData::Checklist { .. } => BlockKind::Checklist,
            BlockData::Callout { .. } => BlockKind::Callout,
            BlockData::AnnotatedImage { .. } => BlockKind::AnnotatedImage,
            BlockData::Embed { .. } => BlockKind::Embed,
            BlockData::Section { .. } => BlockKind::Section,
            BlockData::Confirmation { .. } => BlockKind::Confirmation,
            BlockData::ExternalLink { .. } => BlockKind::ExternalLink,
            BlockData::Code { .. } => BlockKind::Code,
            BlockData::Columns { .. } => BlockKind::Columns,
            BlockData::Html { .. } => BlockKind::Html,
        }
    }
}

// ─── Block ───────────────────────────────────────────────────────────────

/// A single typed content unit within a step.
///
/// `id` is assigned once at creation and is the sole stable handle used by
/// update/delete/reorder. Renderers never mutate a block in place; they hand
/// a full replacement payload to the collection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: Id,
    #[serde(flatten)]
    pub data: BlockData,
    #[serde(default)]
    pub settings: BlockSettings,
}

impl Block {
    /// Factory: a new block of `kind` with the variant's documented defaults.
    pub fn new(kind: BlockKind) -> Self {
        Self::with_data(BlockData::default_for(kind))
    }

    /// Factory with an explicit payload (the override path).
    pub fn with_data(data: BlockData) -> Self {
        Self {
            id: Id::generate("blk"),
            data,
            settings: BlockSettings::default(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.data.kind()
    }

    /// Clone with a freshly generated id. Used by duplicate.
    pub fn cloned_with_new_id(&self) -> Self {
        Self {
            id: Id::generate("blk"),
            data: self.data.clone(),
            settings: self.settings.clone(),
        }
    }
}

// ─── Step ────────────────────────────────────────────────────────────────

/// How the presenter advances past this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepNavigation {
    /// Plain next/previous.
    #[default]
    Linear,
    /// Branch target chosen by a button or decision block.
    Branching,
}

/// A troubleshooting entry attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonProblem {
    pub id: Id,
    pub title: String,
    pub explanation: String,
    pub link: String,
}

/// An ordered page within a walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: Id,
    pub title: String,
    /// Legacy plain/HTML fallback for steps authored before blocks existed.
    #[serde(default)]
    pub content: String,
    pub blocks: Vec<Block>,
    /// Array position, renumbered 0..n-1 on every structural change.
    pub order: u32,
    #[serde(default)]
    pub navigation: StepNavigation,
    #[serde(default)]
    pub common_problems: Vec<CommonProblem>,
}

impl Step {
    /// A new empty step with a client-side temporary id (server assigns the
    /// real one on first upsert).
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Id::temp(),
            title: title.into(),
            content: String::new(),
            blocks: Vec::new(),
            order: 0,
            navigation: StepNavigation::default(),
            common_problems: Vec::new(),
        }
    }

    pub fn block(&self, id: Id) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

// ─── Document ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Visible to workspace members only.
    #[default]
    Private,
    Public,
}

/// Presenter chrome toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    pub show_progress: bool,
    pub allow_back: bool,
    pub show_step_list: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            show_progress: true,
            allow_back: true,
            show_step_list: true,
        }
    }
}

/// The top-level authored artifact: an ordered sequence of steps.
///
/// The runtime presenter requires at least one step; the builder tolerates
/// zero transiently (during initial load), but `delete_step` refuses to
/// remove the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: DocumentStatus,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub category_ids: HashSet<Id>,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub navigation: NavigationSettings,
}

impl Document {
    /// A fresh draft with a single empty step.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Id::generate("doc"),
            title: title.into(),
            description: String::new(),
            status: DocumentStatus::Draft,
            steps: vec![Step::new("Step 1")],
            category_ids: HashSet::new(),
            privacy: Privacy::default(),
            navigation: NavigationSettings::default(),
        }
    }

    pub fn step(&self, id: Id) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn step_mut(&mut self, id: Id) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.id == id)
    }

    /// Step ids in presentation order (the payload of a reorder call).
    pub fn step_ids(&self) -> SmallVec<[Id; 8]> {
        self.steps.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn factory_defaults_per_kind() {
        for kind in BlockKind::ALL {
            let block = Block::new(kind);
            assert_eq!(block.kind(), kind);
            assert_eq!(block.data, BlockData::default_for(kind));
            assert_eq!(block.settings, BlockSettings::default());
        }
    }

    #[test]
    fn factory_ids_are_distinct() {
        let a = Block::new(BlockKind::Heading);
        let b = Block::new(BlockKind::Heading);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn button_defaults() {
        match BlockData::default_for(BlockKind::Button) {
            BlockData::Button {
                text,
                action,
                style,
                ..
            } => {
                assert_eq!(text, "Next Step");
                assert_eq!(action, ButtonAction::Next);
                assert_eq!(style, ButtonStyle::Primary);
            }
            other => panic!("expected Button, got {other:?}"),
        }
    }

    #[test]
    fn columns_default_has_two_empty_columns() {
        match BlockData::default_for(BlockKind::Columns) {
            BlockData::Columns { count, blocks } => {
                assert_eq!(count, 2);
                assert_eq!(blocks, vec![Vec::new(), Vec::new()]);
            }
            other => panic!("expected Columns, got {other:?}"),
        }
    }

    #[test]
    fn block_wire_shape_is_tagged() {
        let block = Block::new(BlockKind::Heading);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["data"]["level"], 2);
        assert_eq!(json["data"]["content"], "");
    }

    #[test]
    fn block_json_roundtrip_annotated_image() {
        let block = Block::new(BlockKind::AnnotatedImage);
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn new_document_has_one_step() {
        let doc = Document::new("Onboarding");
        assert_eq!(doc.steps.len(), 1);
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert!(doc.steps[0].id.is_temp());
    }
}
