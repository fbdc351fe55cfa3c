//! The editing session layer: mutation routing, undo/redo, debounced
//! autosave, and the persistence boundary.

pub mod autosave;
pub mod commands;
pub mod mutation;
pub mod session;
pub mod store;

pub use autosave::Autosave;
pub use commands::CommandStack;
pub use mutation::DocMutation;
pub use session::EditorSession;
pub use store::{
    DocumentMeta, DocumentStore, InMemoryStore, MediaHandle, MediaStatus, MediaStore, StoreError,
};
