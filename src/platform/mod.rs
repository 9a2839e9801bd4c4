//! Platform-facing collaborators
//!
//! Input events and persistent storage cross into the simulation through
//! these types. Browser-specific pieces are gated on `wasm32`.

pub mod input;
pub mod storage;

pub use input::{Direction, InputState, Key};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
