//! # Category Index
//!
//! Maps category ids to display labels, and derives the set of labels
//! present in a page of questions.
//!
//! A question whose category id has no label is a data inconsistency.
//! Aggregation reports it as `TriviaError::CategoryLabelMissing` instead
//! of skipping the question.

use crate::{Category, CategoryId, Question, TriviaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lookup table from category id to label, built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryIndex {
    labels: BTreeMap<CategoryId, String>,
}

impl CategoryIndex {
    /// Build the index from category records.
    #[must_use]
    pub fn from_categories(categories: &[Category]) -> Self {
        Self {
            labels: categories
                .iter()
                .map(|c| (c.id, c.label.clone()))
                .collect(),
        }
    }

    /// Label for `id`, or `CategoryLabelMissing`.
    pub fn label(&self, id: CategoryId) -> Result<&str, TriviaError> {
        self.labels
            .get(&id)
            .map(String::as_str)
            .ok_or(TriviaError::CategoryLabelMissing(id))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no categories exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate `(id, label)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.labels.iter().map(|(id, label)| (*id, label.as_str()))
    }
}

/// Collect the distinct labels of the categories used in `page`.
///
/// Fails on the first question whose category has no label.
pub fn aggregate(page: &[Question], index: &CategoryIndex) -> Result<BTreeSet<String>, TriviaError> {
    let mut labels = BTreeSet::new();
    for question in page {
        labels.insert(index.label(question.category)?.to_string());
    }
    Ok(labels)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewQuestion, QuestionId};

    fn index() -> CategoryIndex {
        CategoryIndex::from_categories(&[
            Category::new(CategoryId(1), "Science"),
            Category::new(CategoryId(2), "Art"),
            Category::new(CategoryId(3), "Geography"),
        ])
    }

    fn question(id: u64, category: u64) -> Question {
        NewQuestion::new("q", "a", CategoryId(category), 1).with_id(QuestionId(id))
    }

    #[test]
    fn duplicate_labels_collapse() {
        let page = vec![question(1, 1), question(2, 3), question(3, 1)];
        let labels = aggregate(&page, &index()).expect("aggregate");

        let expected: BTreeSet<String> = ["Science", "Geography"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn empty_page_has_no_labels() {
        assert!(aggregate(&[], &index()).expect("aggregate").is_empty());
    }

    #[test]
    fn missing_label_is_an_error() {
        let page = vec![question(1, 1), question(2, 42)];
        let result = aggregate(&page, &index());
        assert!(matches!(
            result,
            Err(TriviaError::CategoryLabelMissing(CategoryId(42)))
        ));
    }

    #[test]
    fn index_lookup() {
        let idx = index();
        assert_eq!(idx.label(CategoryId(2)).expect("label"), "Art");
        assert!(idx.label(CategoryId(4)).is_err());
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn index_serializes_as_id_to_label_map() {
        let json = serde_json::to_value(index()).expect("serialize");
        assert_eq!(json["1"], "Science");
        assert_eq!(json["3"], "Geography");
    }
}
