//! # Persistent Storage
//!
//! Disk-backed implementations of `QuestionStore`.

mod redb_store;

pub use redb_store::RedbStore;
