//! # Question Bank
//!
//! The facade the HTTP and CLI layers talk to.
//!
//! ## Storage Backends
//!
//! `QuestionBank` supports two storage backends:
//! - `InMemory`: Uses `MemoryStore` (fast, volatile)
//! - `Persistent`: Uses `RedbStore` for disk-backed ACID storage
//!
//! Every read operation is a pure query over the store: the bank holds no
//! per-request or per-round state.

use crate::categories::{CategoryIndex, aggregate};
use crate::listing::{Listing, ListingOptions, format_listing};
use crate::pagination::PageNumber;
use crate::quiz::{ExclusionSet, QuizOutcome, QuizScope, QuizSelector};
use crate::search::{SearchTerm, search};
use crate::storage::RedbStore;
use crate::store::{MemoryStore, QuestionStore};
use crate::{Category, CategoryId, NewQuestion, Question, QuestionId, TriviaError};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Storage backend for a bank.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

/// The general listing: one page plus the display metadata around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPage {
    /// The page of questions (possibly empty).
    pub listing: Listing,
    /// Every category, id -> label.
    pub categories: CategoryIndex,
    /// Distinct labels of the categories on this page.
    pub current_category: BTreeSet<String>,
}

/// Summary counts for status output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BankStats {
    pub question_count: usize,
    pub category_count: usize,
    /// Questions per category id, including ids with no label.
    pub per_category: BTreeMap<CategoryId, usize>,
}

/// A question bank over some storage backend.
#[derive(Debug, Default)]
pub struct QuestionBank {
    backend: StorageBackend,
}

impl QuestionBank {
    /// Create a new empty bank with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bank with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, TriviaError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
        })
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    fn store(&self) -> &dyn QuestionStore {
        match &self.backend {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
        }
    }

    fn store_mut(&mut self) -> &mut dyn QuestionStore {
        match &mut self.backend {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Build the id -> label index of every category.
    pub fn category_index(&self) -> Result<CategoryIndex, TriviaError> {
        Ok(CategoryIndex::from_categories(&self.store().categories()?))
    }

    /// All categories, ascending by id.
    pub fn categories(&self) -> Result<Vec<Category>, TriviaError> {
        self.store().categories()
    }

    /// All questions, ascending by id.
    pub fn questions(&self) -> Result<Vec<Question>, TriviaError> {
        self.store().questions()
    }

    /// Look up a single question.
    pub fn question(&self, id: QuestionId) -> Result<Option<Question>, TriviaError> {
        self.store().question(id)
    }

    /// Number of stored questions.
    pub fn question_count(&self) -> Result<usize, TriviaError> {
        self.store().question_count()
    }

    /// The paginated general listing.
    ///
    /// Questions and categories come from one store snapshot.
    ///
    /// An out-of-range page yields an empty listing. A question on the page
    /// whose category has no label fails with `CategoryLabelMissing`.
    pub fn list_questions(&self, page: PageNumber) -> Result<QuestionPage, TriviaError> {
        let (questions, categories) = self.store().snapshot()?;
        let listing = format_listing(questions, ListingOptions::paged(page));
        let categories = CategoryIndex::from_categories(&categories);
        let current_category = aggregate(&listing.questions, &categories)?;
        Ok(QuestionPage {
            listing,
            categories,
            current_category,
        })
    }

    /// Questions whose text contains `term`, unpaginated.
    pub fn search(&self, term: &SearchTerm) -> Result<Listing, TriviaError> {
        let matching = search(&self.store().questions()?, term);
        Ok(format_listing(matching, ListingOptions::unpaged()))
    }

    /// Every question of one category, unpaginated.
    pub fn questions_in_category(&self, category: CategoryId) -> Result<Listing, TriviaError> {
        let selection = self.store().questions_in_category(category)?;
        Ok(format_listing(selection, ListingOptions::unpaged()))
    }

    /// Pick the next quiz question with the given random source.
    pub fn next_quiz_question<R: Rng>(
        &self,
        rng: R,
        exclusion: &ExclusionSet,
        scope: QuizScope,
    ) -> Result<QuizOutcome, TriviaError> {
        let candidates = match scope {
            QuizScope::All => self.store().questions()?,
            QuizScope::Category(id) => self.store().questions_in_category(id)?,
        };
        Ok(QuizSelector::new(rng).next(&candidates, exclusion, scope))
    }

    /// Summary counts.
    pub fn stats(&self) -> Result<BankStats, TriviaError> {
        let questions = self.store().questions()?;
        let mut per_category: BTreeMap<CategoryId, usize> = BTreeMap::new();
        for q in &questions {
            *per_category.entry(q.category).or_default() += 1;
        }
        Ok(BankStats {
            question_count: questions.len(),
            category_count: self.store().categories()?.len(),
            per_category,
        })
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Insert a question.
    pub fn add_question(&mut self, question: NewQuestion) -> Result<Question, TriviaError> {
        self.store_mut().insert_question(question)
    }

    /// Delete a question, failing with `QuestionNotFound` if it is absent.
    pub fn delete_question(&mut self, id: QuestionId) -> Result<(), TriviaError> {
        if self.store_mut().delete_question(id)? {
            Ok(())
        } else {
            Err(TriviaError::QuestionNotFound(id))
        }
    }

    /// Insert a category.
    pub fn add_category(&mut self, label: &str) -> Result<Category, TriviaError> {
        self.store_mut().insert_category(label)
    }
}

// =============================================================================
// TESTS
// =============================================================================
