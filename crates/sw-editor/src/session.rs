//! The editing session: one open document, its dirtiness, and its saves.
//!
//! `EditorSession` owns the authoritative in-memory `Document`. Mutations
//! route through the `sw-core` collection engines (snapshot in, snapshot
//! out), mark the touched step dirty, and arm the debounced autosave.
//! Saving is optimistic: the local document is always ahead of the store,
//! and a failed save keeps the dirty flags so the next flush retries.
//!
//! Time is host-supplied monotonic milliseconds throughout; the session
//! never reads a clock, which keeps every timing path testable.

use crate::autosave::Autosave;
use crate::commands::CommandStack;
use crate::mutation::DocMutation;
use crate::store::{DocumentMeta, DocumentStore, StoreError};
use log::{debug, warn};
use std::collections::HashSet;
use sw_core::{collection, document as steps, Block, BlockPatch, Document, Id, Step};

pub struct EditorSession {
    doc: Document,
    history: CommandStack,
    autosave: Autosave,
    dirty_steps: HashSet<Id>,
    /// Server-known steps deleted locally and not yet deleted remotely.
    deleted_steps: HashSet<Id>,
    meta_dirty: bool,
    order_dirty: bool,
}

impl EditorSession {
    pub fn new(doc: Document) -> Self {
        Self::with_autosave(doc, Autosave::default())
    }

    pub fn with_autosave(doc: Document, autosave: Autosave) -> Self {
        // Steps with temporary ids exist nowhere but here; a document that
        // has any was never saved, so its metadata is unsaved too.
        let dirty_steps: HashSet<Id> = doc
            .steps
            .iter()
            .filter(|s| s.id.is_temp())
            .map(|s| s.id)
            .collect();
        let meta_dirty = !dirty_steps.is_empty();
        Self {
            doc,
            history: CommandStack::new(),
            autosave,
            dirty_steps,
            deleted_steps: HashSet::new(),
            meta_dirty,
            order_dirty: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn is_dirty(&self) -> bool {
        self.meta_dirty
            || self.order_dirty
            || !self.dirty_steps.is_empty()
            || !self.deleted_steps.is_empty()
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.pending()
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply one mutation at `now_ms`. Unknown targets degrade to no-ops in
    /// the collection engines; history and the autosave deadline move only
    /// when the document actually changed.
    pub fn apply(&mut self, mutation: DocMutation, now_ms: u64) {
        let before = self.doc.clone();
        debug!("apply: {}", mutation.describe());
        self.route(mutation);
        if self.doc == before {
            return;
        }
        self.history.record(&before);
        self.autosave.mark(now_ms);
    }

    fn route(&mut self, mutation: DocMutation) {
        match mutation {
            DocMutation::AddBlock {
                step,
                kind,
                after_index,
            } => self.with_blocks(step, |blocks| {
                collection::insert_after(blocks, Block::new(kind), after_index)
            }),
            DocMutation::UpdateBlockData { step, block, data } => {
                self.with_blocks(step, |blocks| {
                    collection::update_by_id(blocks, block, &BlockPatch::data(data.clone()))
                })
            }
            DocMutation::UpdateBlockSettings {
                step,
                block,
                settings,
            } => self.with_blocks(step, |blocks| {
                collection::update_by_id(blocks, block, &BlockPatch::settings(settings.clone()))
            }),
            DocMutation::DeleteBlock { step, block } => {
                self.with_blocks(step, |blocks| collection::delete_by_id(blocks, block))
            }
            DocMutation::DuplicateBlock { step, block } => {
                self.with_blocks(step, |blocks| collection::duplicate(blocks, block))
            }
            DocMutation::MoveBlock { step, from, to } => {
                self.with_blocks(step, |blocks| collection::move_by_id(blocks, from, to))
            }
            DocMutation::SetMarkers {
                step,
                block,
                mut markers,
            } => {
                for m in &mut markers {
                    m.sanitize();
                }
                self.with_blocks(step, |blocks| {
                    blocks
                        .iter()
                        .map(|b| {
                            let mut b = b.clone();
                            if b.id == block
                                && let sw_core::BlockData::AnnotatedImage {
                                    markers: slot, ..
                                } = &mut b.data
                            {
                                *slot = markers.clone();
                            }
                            b
                        })
                        .collect()
                })
            }
            DocMutation::AddStep { after } => {
                let step = Step::new(format!("Step {}", self.doc.steps.len() + 1));
                let id = step.id;
                self.doc.steps = match after.and_then(|a| {
                    self.doc.steps.iter().position(|s| s.id == a)
                }) {
                    Some(i) => steps::insert_step_after(&self.doc.steps, step, i as isize),
                    None => steps::add_step(&self.doc.steps, step),
                };
                self.dirty_steps.insert(id);
                self.order_dirty = true;
            }
            DocMutation::DeleteStep { step } => {
                let before_len = self.doc.steps.len();
                self.doc.steps = steps::delete_step(&self.doc.steps, step);
                if self.doc.steps.len() < before_len {
                    self.dirty_steps.remove(&step);
                    if !step.is_temp() {
                        self.deleted_steps.insert(step);
                    }
                    self.order_dirty = true;
                }
            }
            DocMutation::MoveStep { from, to } => {
                let before = self.doc.step_ids();
                self.doc.steps = steps::move_step(&self.doc.steps, from, to);
                if self.doc.step_ids() != before {
                    self.order_dirty = true;
                }
            }
            DocMutation::SetStepTitle { step, title } => {
                if let Some(s) = self.doc.step_mut(step) {
                    s.title = title;
                    self.dirty_steps.insert(step);
                }
            }
            DocMutation::SetStepContent { step, content } => {
                if let Some(s) = self.doc.step_mut(step) {
                    s.content = content;
                    self.dirty_steps.insert(step);
                }
            }
            DocMutation::SetTitle(title) => {
                self.doc.title = title;
                self.meta_dirty = true;
            }
            DocMutation::SetDescription(description) => {
                self.doc.description = description;
                self.meta_dirty = true;
            }
            DocMutation::SetStatus(status) => {
                self.doc.status = status;
                self.meta_dirty = true;
            }
        }
    }

    /// Run a collection operation over one step's blocks and swap in the
    /// resulting snapshot. Missing step id is a no-op.
    fn with_blocks<F>(&mut self, step: Id, op: F)
    where
        F: Fn(&[Block]) -> Vec<Block>,
    {
        let Some(s) = self.doc.step(step) else {
            return;
        };
        let blocks = op(&s.blocks);
        if blocks != s.blocks {
            self.doc.steps = steps::replace_blocks(&self.doc.steps, step, blocks);
            self.dirty_steps.insert(step);
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Fold the following mutations into one undo step, until `end_gesture`.
    pub fn begin_gesture(&mut self) {
        self.history.begin_batch(&self.doc);
    }

    pub fn end_gesture(&mut self) {
        self.history.end_batch();
    }

    pub fn undo(&mut self, now_ms: u64) -> bool {
        self.history_jump(now_ms, CommandStack::undo)
    }

    pub fn redo(&mut self, now_ms: u64) -> bool {
        self.history_jump(now_ms, CommandStack::redo)
    }

    fn history_jump(
        &mut self,
        now_ms: u64,
        jump: fn(&mut CommandStack, &mut Document) -> bool,
    ) -> bool {
        if !jump(&mut self.history, &mut self.doc) {
            return false;
        }
        // A restored snapshot can differ anywhere; mark everything dirty
        // rather than diffing.
        self.dirty_steps.extend(self.doc.step_ids());
        self.meta_dirty = true;
        self.order_dirty = true;
        self.autosave.mark(now_ms);
        true
    }

    // ─── Saving ──────────────────────────────────────────────────────────

    /// Flush the autosave if its quiet period elapsed. Returns whether a
    /// save ran.
    pub fn poll(
        &mut self,
        store: &mut dyn DocumentStore,
        now_ms: u64,
    ) -> Result<bool, StoreError> {
        if !self.autosave.due(now_ms) {
            return Ok(false);
        }
        self.flush(store)?;
        Ok(true)
    }

    /// Save everything dirty now, bypassing the debounce. Partial failure
    /// keeps the unfinished flags; completed pieces are not re-sent.
    pub fn flush(&mut self, store: &mut dyn DocumentStore) -> Result<(), StoreError> {
        let result = self.flush_inner(store);
        if let Err(e) = &result {
            warn!("save failed, keeping local changes dirty: {e}");
        } else {
            self.autosave.clear();
        }
        result
    }

    fn flush_inner(&mut self, store: &mut dyn DocumentStore) -> Result<(), StoreError> {
        for id in self.deleted_steps.clone() {
            store.delete_step(self.doc.id, id)?;
            self.deleted_steps.remove(&id);
        }
        if self.meta_dirty {
            store.save_metadata(&DocumentMeta::of(&self.doc))?;
            self.meta_dirty = false;
        }
        // Dirty steps go up in presentation order; temp ids come back as
        // server-assigned ids and are swapped in before the reorder call.
        for id in self.doc.step_ids() {
            if !self.dirty_steps.contains(&id) {
                continue;
            }
            let Some(step) = self.doc.step(id) else {
                self.dirty_steps.remove(&id);
                continue;
            };
            let assigned = store.upsert_step(self.doc.id, step)?;
            self.dirty_steps.remove(&id);
            if assigned != id
                && let Some(s) = self.doc.step_mut(id)
            {
                debug!("step {id} assigned server id {assigned}");
                s.id = assigned;
            }
        }
        if self.order_dirty {
            store.reorder_steps(self.doc.id, &self.doc.step_ids())?;
            self.order_dirty = false;
        }
        Ok(())
    }
}
