//! # Question Store
//!
//! The storage contract for the question bank and its in-memory backend.
//!
//! All listings come back in ascending id order. Both `MemoryStore` and
//! `storage::RedbStore` implement `QuestionStore`, so the bank treats them
//! uniformly.

use crate::primitives::MAX_CATEGORY_LABEL_LENGTH;
use crate::{Category, CategoryId, NewQuestion, Question, QuestionId, TriviaError};
use std::collections::BTreeMap;

// =============================================================================
// QUESTIONSTORE TRAIT
// =============================================================================

/// Storage operations for questions and categories.
///
/// All fallible operations return `Result<T, TriviaError>` to support both
/// in-memory and persistent backends uniformly.
pub trait QuestionStore {
    /// Insert a question and return it with its assigned id.
    fn insert_question(&mut self, question: NewQuestion) -> Result<Question, TriviaError>;

    /// Delete a question. Returns `false` if it did not exist.
    fn delete_question(&mut self, id: QuestionId) -> Result<bool, TriviaError>;

    /// Insert a category and return it with its assigned id.
    fn insert_category(&mut self, label: &str) -> Result<Category, TriviaError>;

    /// Look up a single question.
    fn question(&self, id: QuestionId) -> Result<Option<Question>, TriviaError>;

    /// All questions, ascending by id.
    fn questions(&self) -> Result<Vec<Question>, TriviaError>;

    /// Questions of one category, ascending by id.
    fn questions_in_category(&self, category: CategoryId) -> Result<Vec<Question>, TriviaError>;

    /// All categories, ascending by id.
    fn categories(&self) -> Result<Vec<Category>, TriviaError>;

    /// Number of stored questions.
    fn question_count(&self) -> Result<usize, TriviaError>;

    /// All questions and all categories, read as one consistent view.
    fn snapshot(&self) -> Result<(Vec<Question>, Vec<Category>), TriviaError> {
        Ok((self.questions()?, self.categories()?))
    }
}

/// Check a category label before it is stored.
pub(crate) fn validate_category_label(label: &str) -> Result<(), TriviaError> {
    if label.trim().is_empty() {
        return Err(TriviaError::InvalidCategory(
            "category label is empty".to_string(),
        ));
    }
    if label.len() > MAX_CATEGORY_LABEL_LENGTH {
        return Err(TriviaError::InvalidCategory(format!(
            "category label length {} exceeds maximum {} bytes",
            label.len(),
            MAX_CATEGORY_LABEL_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory question store.
///
/// Uses `BTreeMap` so iteration is already id-ordered.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    questions: BTreeMap<QuestionId, Question>,
    categories: BTreeMap<CategoryId, Category>,
    /// Highest question id ever assigned (ids are not reused).
    last_question_id: u64,
    /// Highest category id ever assigned.
    last_category_id: u64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest question id assigned so far (0 when none).
    #[must_use]
    pub fn last_question_id(&self) -> u64 {
        self.last_question_id
    }
}

impl QuestionStore for MemoryStore {
    fn insert_question(&mut self, question: NewQuestion) -> Result<Question, TriviaError> {
        question.validate()?;
        let id = QuestionId(self.last_question_id.saturating_add(1));
        self.last_question_id = id.0;
        let stored = question.with_id(id);
        self.questions.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_question(&mut self, id: QuestionId) -> Result<bool, TriviaError> {
        Ok(self.questions.remove(&id).is_some())
    }

    fn insert_category(&mut self, label: &str) -> Result<Category, TriviaError> {
        validate_category_label(label)?;
        let id = CategoryId(self.last_category_id.saturating_add(1));
        self.last_category_id = id.0;
        let category = Category::new(id, label);
        self.categories.insert(id, category.clone());
        Ok(category)
    }

    fn question(&self, id: QuestionId) -> Result<Option<Question>, TriviaError> {
        Ok(self.questions.get(&id).cloned())
    }

    fn questions(&self) -> Result<Vec<Question>, TriviaError> {
        Ok(self.questions.values().cloned().collect())
    }

    fn questions_in_category(&self, category: CategoryId) -> Result<Vec<Question>, TriviaError> {
        Ok(self
            .questions
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    fn categories(&self) -> Result<Vec<Category>, TriviaError> {
        Ok(self.categories.values().cloned().collect())
    }

    fn question_count(&self) -> Result<usize, TriviaError> {
        Ok(self.questions.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut store = MemoryStore::new();
        let a = store
            .insert_question(NewQuestion::new("a?", "a", CategoryId(1), 1))
            .expect("insert");
        let b = store
            .insert_question(NewQuestion::new("b?", "b", CategoryId(1), 1))
            .expect("insert");
        assert_eq!(a.id, QuestionId(1));
        assert_eq!(b.id, QuestionId(2));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut store = MemoryStore::new();
        let a = store
            .insert_question(NewQuestion::new("a?", "a", CategoryId(1), 1))
            .expect("insert");
        assert!(store.delete_question(a.id).expect("delete"));
        assert!(!store.delete_question(a.id).expect("delete again"));

        let b = store
            .insert_question(NewQuestion::new("b?", "b", CategoryId(1), 1))
            .expect("insert");
        assert_eq!(b.id, QuestionId(2));
        assert_eq!(store.question_count().expect("count"), 1);
        assert_eq!(store.last_question_id(), 2);
    }

    #[test]
    fn category_filter_is_ordered() {
        let mut store = MemoryStore::new();
        for (i, cat) in [2u64, 1, 2, 3, 2].iter().enumerate() {
            store
                .insert_question(NewQuestion::new(format!("q{i}"), "a", CategoryId(*cat), 1))
                .expect("insert");
        }
        let ids: Vec<u64> = store
            .questions_in_category(CategoryId(2))
            .expect("filter")
            .iter()
            .map(|q| q.id.0)
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn invalid_question_not_stored() {
        let mut store = MemoryStore::new();
        let result = store.insert_question(NewQuestion::new("", "a", CategoryId(1), 1));
        assert!(matches!(result, Err(TriviaError::InvalidQuestion(_))));
        assert_eq!(store.question_count().expect("count"), 0);
        assert_eq!(store.last_question_id(), 0);
    }

    #[test]
    fn categories_round_trip() {
        let mut store = MemoryStore::new();
        store.insert_category("Science").expect("insert");
        store.insert_category("Art").expect("insert");
        let labels: Vec<String> = store
            .categories()
            .expect("list")
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Science", "Art"]);
        assert!(matches!(
            store.insert_category("  "),
            Err(TriviaError::InvalidCategory(_))
        ));
    }
}
