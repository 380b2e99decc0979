//! # trivia-core
//!
//! The question bank engine for the trivia backend - THE LOGIC.
//!
//! This crate owns the retrieval and selection rules:
//! - `pagination`: fixed 10-item pages, 1-based, clamped
//! - `search`: case-insensitive substring match over question text
//! - `categories`: id -> label index and per-page label aggregation
//! - `quiz`: uniform random pick of an unseen question
//! - `listing`: the shared formatting path with an explicit paginate flag
//!
//! Storage sits behind the `QuestionStore` trait, with an in-memory
//! backend and a redb-backed one. `QuestionBank` wraps either.
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Holds no session state: quiz rounds are described by the caller
//! - Takes randomness from the caller, so selection is reproducible in tests

// =============================================================================
// MODULES
// =============================================================================

pub mod bank;
pub mod catalog;
pub mod categories;
pub mod listing;
pub mod pagination;
pub mod primitives;
pub mod quiz;
pub mod search;
pub mod storage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Category, CategoryId, NewQuestion, Question, QuestionId, TriviaError};

// =============================================================================
// RE-EXPORTS: Retrieval & Selection
// =============================================================================

pub use categories::{CategoryIndex, aggregate};
pub use listing::{Listing, ListingOptions, format_listing};
pub use pagination::{PageNumber, paginate};
pub use quiz::{ExclusionSet, QuizOutcome, QuizScope, QuizSelector};
pub use search::{SearchTerm, search};

// =============================================================================
// RE-EXPORTS: Storage
// =============================================================================

pub use bank::{BankStats, QuestionBank, QuestionPage, StorageBackend};
pub use catalog::{Catalog, CatalogCategory, ImportReport};
pub use storage::RedbStore;
pub use store::{MemoryStore, QuestionStore};
