//! # Bank Primitives
//!
//! Fixed runtime constants for the question bank.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Number of questions per listing page.
///
/// Pages are indexed from 1: page `p` covers positions
/// `(p - 1) * QUESTIONS_PER_PAGE .. p * QUESTIONS_PER_PAGE`.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// Page served when the caller supplies none (or an unusable one).
pub const DEFAULT_PAGE: u32 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for question text, in bytes.
pub const MAX_QUESTION_LENGTH: usize = 4096;

/// Maximum length for answer text, in bytes.
pub const MAX_ANSWER_LENGTH: usize = 4096;

/// Maximum length for a category label, in bytes.
pub const MAX_CATEGORY_LABEL_LENGTH: usize = 256;

/// Maximum length for a search term after trimming, in bytes.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

/// Maximum number of ids in a quiz exclusion set.
///
/// A round can never legitimately exceed the number of stored questions;
/// this bounds the cost of a hostile request.
pub const MAX_EXCLUSION_SET_SIZE: usize = 10_000;

/// Maximum number of questions accepted in a single catalog import.
pub const MAX_CATALOG_QUESTIONS: usize = 100_000;
