//! Snapshot-based undo/redo.
//!
//! Undo restores whole-document JSON snapshots rather than inverting
//! individual mutations: the collection engines already hand out fresh
//! snapshots on every edit, so capturing state is cheap and inversion logic
//! has nothing to get wrong. Gesture batching folds a burst of mutations
//! (a drag, a typing run) into a single undo step.

use log::warn;
use serde_json::Value;
use sw_core::Document;

/// Snapshots kept before the oldest undo falls off.
const MAX_UNDO_DEPTH: usize = 100;

#[derive(Debug, Default)]
pub struct CommandStack {
    undo: Vec<Value>,
    redo: Vec<Value>,
    /// Snapshot taken at `begin_batch`, waiting for `end_batch`.
    batch: Option<Value>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(doc: &Document) -> Option<Value> {
        match serde_json::to_value(doc) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("undo snapshot failed: {e}");
                None
            }
        }
    }

    fn push_undo(&mut self, snapshot: Value) {
        if self.undo.len() >= MAX_UNDO_DEPTH {
            self.undo.remove(0);
        }
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Record the pre-mutation state. While a batch is open, intermediate
    /// states are not recorded; the batch's opening snapshot stands for the
    /// whole gesture.
    pub fn record(&mut self, doc: &Document) {
        if self.batch.is_some() {
            return;
        }
        if let Some(s) = Self::snapshot(doc) {
            self.push_undo(s);
        }
    }

    /// Open a gesture: everything until `end_batch` undoes as one step.
    pub fn begin_batch(&mut self, doc: &Document) {
        if self.batch.is_none() {
            self.batch = Self::snapshot(doc);
        }
    }

    pub fn end_batch(&mut self) {
        if let Some(s) = self.batch.take() {
            self.push_undo(s);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Restore the previous snapshot into `doc`. Returns whether anything
    /// changed.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        match serde_json::from_value::<Document>(previous) {
            Ok(restored) => {
                if let Some(current) = Self::snapshot(doc) {
                    self.redo.push(current);
                }
                *doc = restored;
                true
            }
            Err(e) => {
                warn!("undo restore failed: {e}");
                false
            }
        }
    }

    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        match serde_json::from_value::<Document>(next) {
            Ok(restored) => {
                if let Some(current) = Self::snapshot(doc) {
                    self.undo.push(current);
                }
                *doc = restored;
                true
            }
            Err(e) => {
                warn!("redo restore failed: {e}");
                false
            }
        }
    }
}
