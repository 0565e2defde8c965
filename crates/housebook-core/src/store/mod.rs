//! Local storage for the member roster.
//!
//! Storage is a plain key-value store (`KeyValueStore`) holding raw JSON
//! strings, with the roster repository layered on top of it:
//!
//! - `FileStore`: one JSON file per key in a data directory
//! - `MemoryStore`: in-memory map, used by tests
//! - `KeyValueRepository`: loads and saves the whole roster under one key

pub mod kv;
pub mod repository;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{KeyValueRepository, RosterRepository, ROSTER_KEY};
