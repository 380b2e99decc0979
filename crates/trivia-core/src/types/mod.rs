//! # Core Type Definitions
//!
//! This module contains the record types of the question bank:
//! - Identifiers (`QuestionId`, `CategoryId`)
//! - Stored records (`Question`, `Category`)
//! - Insert payloads (`NewQuestion`)
//! - Error types (`TriviaError`)
//!
//! ## Ordering Guarantees
//!
//! Identifiers implement `Ord` so that every collection keyed by them
//! (`BTreeMap`/`BTreeSet`) iterates in ascending id order. All listings
//! produced by the bank rely on this.

use crate::primitives::{MAX_ANSWER_LENGTH, MAX_QUESTION_LENGTH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier of a stored question.
/// Assigned by the store on insert, starting at 1, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u64);

/// Unique identifier of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u64);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// QUESTION
// =============================================================================

/// A single trivia item.
///
/// The serialized form is the formatted-question shape used on the wire:
/// `{id, question, answer, category, difficulty}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    /// Expected to reference an existing category. Not checked on insert.
    pub category: CategoryId,
    /// Expected range 1-5. Not checked.
    pub difficulty: i64,
}

/// Payload for inserting a question. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i64,
}

impl NewQuestion {
    /// Create a new question payload.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: CategoryId,
        difficulty: i64,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category,
            difficulty,
        }
    }

    /// Check that the text fields are present and bounded.
    ///
    /// Only presence and length are checked; category and difficulty
    /// are accepted as given.
    pub fn validate(&self) -> Result<(), TriviaError> {
        if self.question.trim().is_empty() {
            return Err(TriviaError::InvalidQuestion(
                "question text is empty".to_string(),
            ));
        }
        if self.answer.trim().is_empty() {
            return Err(TriviaError::InvalidQuestion(
                "answer text is empty".to_string(),
            ));
        }
        if self.question.len() > MAX_QUESTION_LENGTH {
            return Err(TriviaError::InvalidQuestion(format!(
                "question length {} exceeds maximum {} bytes",
                self.question.len(),
                MAX_QUESTION_LENGTH
            )));
        }
        if self.answer.len() > MAX_ANSWER_LENGTH {
            return Err(TriviaError::InvalidQuestion(format!(
                "answer length {} exceeds maximum {} bytes",
                self.answer.len(),
                MAX_ANSWER_LENGTH
            )));
        }
        Ok(())
    }

    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

// =============================================================================
// CATEGORY
// =============================================================================

/// A labeled grouping of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display label, serialized as `type` for client compatibility.
    #[serde(rename = "type")]
    pub label: String,
}

impl Category {
    /// Create a new category record.
    #[must_use]
    pub fn new(id: CategoryId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the question bank.
///
/// Running out of quiz questions is NOT represented here; see
/// `quiz::QuizOutcome::NoMoreQuestions`.
#[derive(Debug, Error)]
pub enum TriviaError {
    /// A question payload is missing text or exceeds a limit.
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    /// A category label is empty or too long.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// The requested question does not exist.
    #[error("Question not found: {0}")]
    QuestionNotFound(QuestionId),

    /// A question references a category id with no label.
    #[error("No label for category {0}")]
    CategoryLabelMissing(CategoryId),

    /// A request parameter is outside the accepted bounds.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
