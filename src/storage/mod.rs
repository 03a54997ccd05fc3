//! Persistence module
//!
//! The timer only ever sees an opaque key-value store; the backends here
//! decide where the bytes live.

pub mod file;
pub mod preferences;
pub mod store;

// Re-export main types
pub use file::JsonFileStore;
pub use preferences::{TimerPreferences, DEFAULT_NAMESPACE};
pub use store::{KeyValueStore, MemoryStore};
