//! The persistence boundary.
//!
//! The session saves whole dirty steps and document metadata through these
//! traits; documents cross the boundary as opaque JSON snapshots, so the
//! in-memory implementation round-trips through `serde_json` on purpose.
//! Steps created client-side carry temporary ids; `upsert_step` returns the
//! id the backend actually stored, and the session swaps it in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use sw_core::{Document, DocumentStatus, Id, NavigationSettings, Privacy, Step};

// ─── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    NotFound(Id),
    Serialization(serde_json::Error),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "not found: {id}"),
            StoreError::Serialization(e) => write!(f, "serialization failed: {e}"),
            StoreError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}

// ─── Document store ──────────────────────────────────────────────────────

/// Document fields saved separately from the step bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub status: DocumentStatus,
    pub privacy: Privacy,
    pub navigation: NavigationSettings,
    pub category_ids: Vec<Id>,
}

impl DocumentMeta {
    pub fn of(doc: &Document) -> Self {
        let mut category_ids: Vec<Id> = doc.category_ids.iter().copied().collect();
        category_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Self {
            id: doc.id,
            title: doc.title.clone(),
            description: doc.description.clone(),
            status: doc.status,
            privacy: doc.privacy,
            navigation: doc.navigation.clone(),
            category_ids,
        }
    }
}

pub trait DocumentStore {
    fn load_document(&self, id: Id) -> Result<Document, StoreError>;
    fn save_metadata(&mut self, meta: &DocumentMeta) -> Result<(), StoreError>;
    /// Create or update one step. Returns the stored id, which differs from
    /// `step.id` exactly when the step was temporary.
    fn upsert_step(&mut self, document: Id, step: &Step) -> Result<Id, StoreError>;
    fn delete_step(&mut self, document: Id, step: Id) -> Result<(), StoreError>;
    fn reorder_steps(&mut self, document: Id, order: &[Id]) -> Result<(), StoreError>;
}

// ─── Media store ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Uploaded,
    Processing,
}

/// What an upload hands back to the block that requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaHandle {
    pub url: String,
    pub file_id: String,
    pub status: MediaStatus,
}

pub trait MediaStore {
    fn upload(&mut self, filename: &str, bytes: &[u8]) -> Result<MediaHandle, StoreError>;
}

// ─── In-memory implementation ────────────────────────────────────────────

/// Backing store for tests: steps live as JSON values keyed per document,
/// exercising the same serialize/deserialize seam a remote backend would.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    metas: HashMap<Id, DocumentMeta>,
    /// Per document, stored steps in presentation order.
    steps: HashMap<Id, Vec<(Id, Value)>>,
    next_step: u64,
    next_file: u64,
    /// Test hook: the next write fails once.
    pub fail_next: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_failure(&mut self) -> Result<(), StoreError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(StoreError::Backend("injected failure".to_string()));
        }
        Ok(())
    }

    /// How many steps are stored for `document`.
    pub fn step_count(&self, document: Id) -> usize {
        self.steps.get(&document).map_or(0, Vec::len)
    }
}

impl DocumentStore for InMemoryStore {
    fn load_document(&self, id: Id) -> Result<Document, StoreError> {
        let meta = self.metas.get(&id).ok_or(StoreError::NotFound(id))?;
        let mut steps = Vec::new();
        for (_, value) in self.steps.get(&id).map_or(&[][..], Vec::as_slice) {
            steps.push(serde_json::from_value::<Step>(value.clone())?);
        }
        steps.sort_by_key(|s| s.order);
        Ok(Document {
            id: meta.id,
            title: meta.title.clone(),
            description: meta.description.clone(),
            status: meta.status,
            steps,
            category_ids: meta.category_ids.iter().copied().collect(),
            privacy: meta.privacy,
            navigation: meta.navigation.clone(),
        })
    }

    fn save_metadata(&mut self, meta: &DocumentMeta) -> Result<(), StoreError> {
        self.check_failure()?;
        self.metas.insert(meta.id, meta.clone());
        Ok(())
    }

    fn upsert_step(&mut self, document: Id, step: &Step) -> Result<Id, StoreError> {
        self.check_failure()?;
        let assigned = if step.id.is_temp() {
            self.next_step += 1;
            Id::intern(&format!("stp_srv_{}", self.next_step))
        } else {
            step.id
        };
        let mut value = serde_json::to_value(step)?;
        value["id"] = Value::String(assigned.as_str().to_string());
        let entries = self.steps.entry(document).or_default();
        match entries.iter_mut().find(|(id, _)| *id == assigned) {
            Some(entry) => entry.1 = value,
            None => entries.push((assigned, value)),
        }
        Ok(assigned)
    }

    fn delete_step(&mut self, document: Id, step: Id) -> Result<(), StoreError> {
        self.check_failure()?;
        if let Some(entries) = self.steps.get_mut(&document) {
            entries.retain(|(id, _)| *id != step);
        }
        Ok(())
    }

    fn reorder_steps(&mut self, document: Id, order: &[Id]) -> Result<(), StoreError> {
        self.check_failure()?;
        if let Some(entries) = self.steps.get_mut(&document) {
            entries.sort_by_key(|(id, _)| {
                order.iter().position(|o| o == id).unwrap_or(usize::MAX)
            });
            for (i, (_, value)) in entries.iter_mut().enumerate() {
                value["order"] = Value::from(i as u64);
            }
        }
        Ok(())
    }
}

impl MediaStore for InMemoryStore {
    fn upload(&mut self, filename: &str, _bytes: &[u8]) -> Result<MediaHandle, StoreError> {
        self.check_failure()?;
        self.next_file += 1;
        let file_id = format!("file_{}", self.next_file);
        Ok(MediaHandle {
            url: format!("mem://{file_id}/{filename}"),
            file_id,
            status: MediaStatus::Uploaded,
        })
    }
}
