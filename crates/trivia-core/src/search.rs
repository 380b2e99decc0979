//! # Search Filter
//!
//! Case-insensitive substring search over question text.
//!
//! Only the `question` field is searched; answers never match.
//! An empty (or whitespace-only) term is a no-op filter.

use crate::primitives::MAX_SEARCH_TERM_LENGTH;
use crate::{Question, TriviaError};

/// A normalized search term: trimmed, with a lowercase form for matching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm {
    trimmed: String,
    folded: String,
}

impl SearchTerm {
    /// Normalize a raw term.
    ///
    /// Returns `LimitExceeded` if the trimmed term is longer than
    /// `MAX_SEARCH_TERM_LENGTH` bytes.
    pub fn new(raw: &str) -> Result<Self, TriviaError> {
        let trimmed = raw.trim();
        if trimmed.len() > MAX_SEARCH_TERM_LENGTH {
            return Err(TriviaError::LimitExceeded(format!(
                "search term length {} exceeds maximum {} bytes",
                trimmed.len(),
                MAX_SEARCH_TERM_LENGTH
            )));
        }
        Ok(Self {
            trimmed: trimmed.to_string(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// The trimmed term as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.trimmed
    }

    /// True when the term matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trimmed.is_empty()
    }

    /// Whether `question`'s text contains this term, ignoring case.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        self.is_empty() || question.question.to_lowercase().contains(&self.folded)
    }
}

/// Return the questions whose text contains `term`, ascending by id.
///
/// The result is never paginated.
#[must_use]
pub fn search(all: &[Question], term: &SearchTerm) -> Vec<Question> {
    let mut matching: Vec<Question> = all.iter().filter(|q| term.matches(q)).cloned().collect();
    matching.sort_by_key(|q| q.id);
    matching
}

// =============================================================================
// TESTS
// =============================================================================
