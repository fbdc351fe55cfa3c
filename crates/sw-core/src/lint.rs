//! Lint diagnostics for walkthrough documents.
//!
//! Reports structural issues without modifying the document. The builder
//! saves any shape; these feed the publish-readiness panel in the UI.

use crate::id::Id;
use crate::model::{Block, BlockData, Document};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed — likely a mistake.
    Warning,
    /// Informational — authoring suggestion.
    Info,
}

/// A single lint diagnostic for a document entity (step, block, or marker).
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The entity this diagnostic refers to.
    pub entity: Id,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "empty-step", "marker-out-of-range").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over a document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_no_steps(doc, &mut diags);
    for step in &doc.steps {
        if step.blocks.is_empty() && step.content.trim().is_empty() {
            diags.push(LintDiagnostic {
                entity: step.id,
                message: format!("Step \"{}\" has no content yet.", step.title),
                severity: LintSeverity::Info,
                rule: "empty-step",
            });
        }
        for block in &step.blocks {
            lint_block(block, &mut diags);
        }
    }
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

fn lint_no_steps(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    if doc.steps.is_empty() {
        diags.push(LintDiagnostic {
            entity: doc.id,
            message: "A walkthrough needs at least one step before it can be presented.".into(),
            severity: LintSeverity::Warning,
            rule: "no-steps",
        });
    }
}

/// Block rules, recursing into section and column containers.
fn lint_block(block: &Block, diags: &mut Vec<LintDiagnostic>) {
    match &block.data {
        BlockData::AnnotatedImage { url, markers, .. } => {
            if url.is_empty() && !markers.is_empty() {
                diags.push(LintDiagnostic {
                    entity: block.id,
                    message: format!(
                        "Annotated image has {} marker(s) but no image URL.",
                        markers.len()
                    ),
                    severity: LintSeverity::Warning,
                    rule: "missing-image",
                });
            }
            for marker in markers {
                let coords = [
                    marker.x, marker.y, marker.x1, marker.y1, marker.x2, marker.y2,
                ];
                let bad = coords
                    .iter()
                    .any(|v| !v.is_finite() || !(0.0..=100.0).contains(v));
                if bad || !marker.rotation.is_finite() {
                    diags.push(LintDiagnostic {
                        entity: marker.id,
                        message: "Marker geometry is outside the image bounds.".into(),
                        severity: LintSeverity::Warning,
                        rule: "marker-out-of-range",
                    });
                }
            }
        }
        BlockData::Image { url, .. } if url.is_empty() => {
            diags.push(LintDiagnostic {
                entity: block.id,
                message: "Image block has no URL.".into(),
                severity: LintSeverity::Info,
                rule: "missing-image",
            });
        }
        BlockData::Section { blocks, .. } => {
            for b in blocks {
                lint_block(b, diags);
            }
        }
        BlockData::Columns { blocks, .. } => {
            for column in blocks {
                for b in column {
                    lint_block(b, diags);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;
    use crate::model::{Block, BlockKind, Document};

    #[test]
    fn empty_step_reported_as_info() {
        let doc = Document::new("Guide");
        let diags = lint_document(&doc);
        assert!(diags.iter().any(|d| d.rule == "empty-step"));
        assert!(diags.iter().all(|d| d.severity == LintSeverity::Info));
    }

    #[test]
    fn zero_steps_is_a_warning() {
        let mut doc = Document::new("Guide");
        doc.steps.clear();
        let diags = lint_document(&doc);
        assert!(
            diags
                .iter()
                .any(|d| d.rule == "no-steps" && d.severity == LintSeverity::Warning)
        );
    }

    #[test]
    fn markers_without_image_url_flagged() {
        let mut doc = Document::new("Guide");
        let mut block = Block::new(BlockKind::AnnotatedImage);
        if let BlockData::AnnotatedImage { markers, .. } = &mut block.data {
            markers.push(Marker::at(50.0, 50.0));
        }
        doc.steps[0].blocks.push(block);
        let diags = lint_document(&doc);
        assert!(diags.iter().any(|d| d.rule == "missing-image"));
    }

    #[test]
    fn out_of_range_marker_flagged_inside_section() {
        let mut doc = Document::new("Guide");
        let mut image = Block::new(BlockKind::AnnotatedImage);
        if let BlockData::AnnotatedImage { url, markers, .. } = &mut image.data {
            *url = "https://example.com/a.png".into();
            let mut m = Marker::at(50.0, 50.0);
            m.x = 140.0; // bypasses sanitize on purpose
            markers.push(m);
        }
        let mut section = Block::new(BlockKind::Section);
        if let BlockData::Section { blocks, .. } = &mut section.data {
            blocks.push(image);
        }
        doc.steps[0].blocks.push(section);
        let diags = lint_document(&doc);
        assert!(diags.iter().any(|d| d.rule == "marker-out-of-range"));
    }

    #[test]
    fn clean_document_only_empty_step_info() {
        let mut doc = Document::new("Guide");
        doc.steps[0].blocks.push(Block::new(BlockKind::Text));
        let diags = lint_document(&doc);
        assert!(diags.is_empty());
    }
}
