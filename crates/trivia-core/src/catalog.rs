//! # Catalog Import/Export
//!
//! A JSON document holding categories and questions, used to seed a bank
//! and to dump one.
//!
//! ```json
//! {
//!   "categories": [{"id": 1, "type": "Science"}],
//!   "questions": [{"question": "...", "answer": "...", "category": 1, "difficulty": 3}]
//! }
//! ```
//!
//! Question `category` values refer to the catalog's own category ids.
//! Categories without an `id` are numbered by position, starting at 1,
//! and every catalog id must be distinct. The bank assigns fresh ids on
//! import and questions are remapped. A question whose category is not in
//! the catalog keeps its id as-is, the same as a question created with a
//! dangling category.

use crate::bank::QuestionBank;
use crate::primitives::MAX_CATALOG_QUESTIONS;
use crate::{CategoryId, NewQuestion, TriviaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A category entry in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub label: String,
}

/// A portable set of categories and questions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CatalogCategory>,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}

/// Counts of what an import wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub categories: usize,
    pub questions: usize,
}

impl Catalog {
    /// Parse a catalog from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TriviaError> {
        serde_json::from_slice(bytes).map_err(|e| TriviaError::SerializationError(e.to_string()))
    }

    /// Render the catalog as pretty JSON.
    pub fn to_json(&self) -> Result<String, TriviaError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TriviaError::SerializationError(e.to_string()))
    }

    /// Snapshot a bank as a catalog.
    pub fn from_bank(bank: &QuestionBank) -> Result<Self, TriviaError> {
        let categories = bank
            .categories()?
            .into_iter()
            .map(|c| CatalogCategory {
                id: Some(c.id.0),
                label: c.label,
            })
            .collect();
        let questions = bank
            .questions()?
            .into_iter()
            .map(|q| NewQuestion::new(q.question, q.answer, q.category, q.difficulty))
            .collect();
        Ok(Self {
            categories,
            questions,
        })
    }

    /// Catalog id of each category entry.
    fn catalog_ids(&self) -> Vec<u64> {
        self.categories
            .iter()
            .enumerate()
            .map(|(pos, c)| c.id.unwrap_or(pos as u64 + 1))
            .collect()
    }

    /// Check the whole catalog before anything is written.
    pub fn validate(&self) -> Result<(), TriviaError> {
        if self.questions.len() > MAX_CATALOG_QUESTIONS {
            return Err(TriviaError::LimitExceeded(format!(
                "catalog holds {} questions, maximum is {}",
                self.questions.len(),
                MAX_CATALOG_QUESTIONS
            )));
        }
        let mut seen = BTreeSet::new();
        for (id, category) in self.catalog_ids().into_iter().zip(&self.categories) {
            crate::store::validate_category_label(&category.label)?;
            if !seen.insert(id) {
                return Err(TriviaError::InvalidCategory(format!(
                    "catalog id {} is used by more than one category",
                    id
                )));
            }
        }
        for question in &self.questions {
            question.validate()?;
        }
        Ok(())
    }

    /// Write the catalog into `bank`.
    ///
    /// Validation runs first, so a rejected catalog writes nothing.
    pub fn import_into(&self, bank: &mut QuestionBank) -> Result<ImportReport, TriviaError> {
        self.validate()?;

        let mut remap: BTreeMap<u64, CategoryId> = BTreeMap::new();
        for (catalog_id, category) in self.catalog_ids().into_iter().zip(&self.categories) {
            let stored = bank.add_category(&category.label)?;
            remap.insert(catalog_id, stored.id);
        }

        for question in &self.questions {
            let category = remap
                .get(&question.category.0)
                .copied()
                .unwrap_or(question.category);
            bank.add_question(NewQuestion {
                category,
                ..question.clone()
            })?;
        }

        Ok(ImportReport {
            categories: self.categories.len(),
            questions: self.questions.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionId;

    const SAMPLE: &str = r#"{
        "categories": [
            {"id": 5, "type": "Entertainment"},
            {"id": 6, "type": "Sports"}
        ],
        "questions": [
            {"question": "Which team won?", "answer": "Brazil", "category": 6, "difficulty": 3},
            {"question": "Who starred?", "answer": "Tom Hanks", "category": 5, "difficulty": 4}
        ]
    }"#;

    #[test]
    fn import_remaps_category_ids() {
        let mut bank = QuestionBank::new();
        let catalog = Catalog::from_json(SAMPLE.as_bytes()).expect("parse");
        let report = catalog.import_into(&mut bank).expect("import");

        assert_eq!(report, ImportReport { categories: 2, questions: 2 });
        let sports = bank.question(QuestionId(1)).expect("get").expect("exists");
        assert_eq!(sports.category, CategoryId(2));
        let index = bank.category_index().expect("index");
        assert_eq!(index.label(sports.category).expect("label"), "Sports");
    }

    #[test]
    fn positional_category_ids() {
        let json = r#"{
            "categories": [{"type": "Science"}, {"type": "Art"}],
            "questions": [{"question": "Q?", "answer": "A", "category": 2, "difficulty": 1}]
        }"#;
        let mut bank = QuestionBank::new();
        Catalog::from_json(json.as_bytes())
            .expect("parse")
            .import_into(&mut bank)
            .expect("import");
        let q = bank.question(QuestionId(1)).expect("get").expect("exists");
        assert_eq!(q.category, CategoryId(2));
    }

    #[test]
    fn invalid_question_rejects_whole_catalog() {
        let json = r#"{
            "categories": [{"id": 1, "type": "Science"}],
            "questions": [
                {"question": "Fine?", "answer": "Yes", "category": 1, "difficulty": 1},
                {"question": "Broken?", "answer": "  ", "category": 1, "difficulty": 1}
            ]
        }"#;
        let mut bank = QuestionBank::new();
        let result = Catalog::from_json(json.as_bytes())
            .expect("parse")
            .import_into(&mut bank);
        assert!(matches!(result, Err(TriviaError::InvalidQuestion(_))));
        assert_eq!(bank.question_count().expect("count"), 0);
        assert!(bank.categories().expect("categories").is_empty());
    }

    #[test]
    fn positional_id_colliding_with_explicit_id_is_rejected() {
        let json = r#"{
            "categories": [{"type": "Science"}, {"id": 1, "type": "Art"}],
            "questions": [{"question": "H2O?", "answer": "Water", "category": 1, "difficulty": 1}]
        }"#;
        let mut bank = QuestionBank::new();
        let result = Catalog::from_json(json.as_bytes())
            .expect("parse")
            .import_into(&mut bank);
        assert!(matches!(result, Err(TriviaError::InvalidCategory(_))));
        assert_eq!(bank.question_count().expect("count"), 0);
        assert!(bank.categories().expect("categories").is_empty());
    }

    #[test]
    fn unlisted_category_id_is_kept() {
        let json = r#"{
            "categories": [{"id": 1, "type": "Science"}],
            "questions": [{"question": "Orphan?", "answer": "Yes", "category": 8, "difficulty": 1}]
        }"#;
        let mut bank = QuestionBank::new();
        Catalog::from_json(json.as_bytes())
            .expect("parse")
            .import_into(&mut bank)
            .expect("import");
        let q = bank.question(QuestionId(1)).expect("get").expect("exists");
        assert_eq!(q.category, CategoryId(8));
    }

    #[test]
    fn export_then_import_preserves_content() {
        let mut source = QuestionBank::new();
        Catalog::from_json(SAMPLE.as_bytes())
            .expect("parse")
            .import_into(&mut source)
            .expect("import");
        source
            .add_question(NewQuestion::new("Dangling?", "Yes", CategoryId(99), 1))
            .expect("dangling question");

        let exported = Catalog::from_bank(&source).expect("export");
        let mut copy = QuestionBank::new();
        exported.import_into(&mut copy).expect("reimport");

        assert_eq!(Catalog::from_bank(&copy).expect("export"), exported);
        assert_eq!(exported.questions.len(), 3);
        let dangling = copy.question(QuestionId(3)).expect("get").expect("exists");
        assert_eq!(dangling.category, CategoryId(99));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            Catalog::from_json(b"{not json"),
            Err(TriviaError::SerializationError(_))
        ));
    }
}
