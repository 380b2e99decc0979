//! # redb-backed Question Storage
//!
//! A disk-backed question store using the redb embedded database.
//!
//! redb provides:
//! - ACID transactions (every insert/delete is one write transaction)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! Every listing is served from a single read transaction, so a request
//! sees one consistent snapshot of the bank.
//!
//! Rows are postcard-encoded `Question`/`Category` records keyed by id.
//! u64 keys iterate in ascending order, which gives id ordering for free.

use crate::store::{QuestionStore, validate_category_label};
use crate::{Category, CategoryId, NewQuestion, Question, QuestionId, TriviaError};
use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition,
};
use std::path::Path;

/// Table for questions: QuestionId(u64) -> serialized Question bytes
const QUESTIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("questions");

/// Table for categories: CategoryId(u64) -> serialized Category bytes
const CATEGORIES: TableDefinition<u64, &[u8]> = TableDefinition::new("categories");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const LAST_QUESTION_ID: &str = "last_question_id";
const LAST_CATEGORY_ID: &str = "last_category_id";

#[inline]
fn io_err(e: impl std::fmt::Display) -> TriviaError {
    TriviaError::IoError(e.to_string())
}

/// A disk-backed question store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a question database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TriviaError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(QUESTIONS).map_err(io_err)?;
            let _ = write_txn.open_table(CATEGORIES).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Highest question id assigned so far (0 when none).
    pub fn last_question_id(&self) -> Result<u64, TriviaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let meta = read_txn.open_table(METADATA).map_err(io_err)?;
        Ok(meta
            .get(LAST_QUESTION_ID)
            .map_err(io_err)?
            .map(|v| v.value())
            .unwrap_or(0))
    }

    /// Decode every row of a record table, in key order.
    fn read_all<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<'static, u64, &'static [u8]>,
    ) -> Result<Vec<T>, TriviaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        read_rows(&read_txn, table)
    }
}

/// Decode every row of `table` within an open read transaction.
fn read_rows<T: serde::de::DeserializeOwned>(
    read_txn: &ReadTransaction,
    table: TableDefinition<'static, u64, &'static [u8]>,
) -> Result<Vec<T>, TriviaError> {
    let table = read_txn.open_table(table).map_err(io_err)?;
    let mut rows = Vec::new();
    for entry in table.iter().map_err(io_err)? {
        let (_, value) = entry.map_err(io_err)?;
        let row = postcard::from_bytes::<T>(value.value())
            .map_err(|e| TriviaError::SerializationError(e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

impl QuestionStore for RedbStore {
    fn insert_question(&mut self, question: NewQuestion) -> Result<Question, TriviaError> {
        question.validate()?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        let stored = {
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            let last = meta
                .get(LAST_QUESTION_ID)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0);
            let id = QuestionId(last.saturating_add(1));
            meta.insert(LAST_QUESTION_ID, id.0).map_err(io_err)?;

            let stored = question.with_id(id);
            let bytes = postcard::to_allocvec(&stored)
                .map_err(|e| TriviaError::SerializationError(e.to_string()))?;
            let mut questions = write_txn.open_table(QUESTIONS).map_err(io_err)?;
            questions.insert(id.0, bytes.as_slice()).map_err(io_err)?;
            stored
        };
        write_txn.commit().map_err(io_err)?;

        Ok(stored)
    }

    fn delete_question(&mut self, id: QuestionId) -> Result<bool, TriviaError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let existed = {
            let mut questions = write_txn.open_table(QUESTIONS).map_err(io_err)?;
            let removed = questions.remove(id.0).map_err(io_err)?;
            removed.is_some()
        };
        write_txn.commit().map_err(io_err)?;
        Ok(existed)
    }

    fn insert_category(&mut self, label: &str) -> Result<Category, TriviaError> {
        validate_category_label(label)?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        let category = {
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            let last = meta
                .get(LAST_CATEGORY_ID)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0);
            let id = CategoryId(last.saturating_add(1));
            meta.insert(LAST_CATEGORY_ID, id.0).map_err(io_err)?;

            let category = Category::new(id, label);
            let bytes = postcard::to_allocvec(&category)
                .map_err(|e| TriviaError::SerializationError(e.to_string()))?;
            let mut categories = write_txn.open_table(CATEGORIES).map_err(io_err)?;
            categories.insert(id.0, bytes.as_slice()).map_err(io_err)?;
            category
        };
        write_txn.commit().map_err(io_err)?;

        Ok(category)
    }

    fn question(&self, id: QuestionId) -> Result<Option<Question>, TriviaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let questions = read_txn.open_table(QUESTIONS).map_err(io_err)?;
        match questions.get(id.0).map_err(io_err)? {
            Some(data) => {
                let question = postcard::from_bytes::<Question>(data.value())
                    .map_err(|e| TriviaError::SerializationError(e.to_string()))?;
                Ok(Some(question))
            }
            None => Ok(None),
        }
    }

    fn questions(&self) -> Result<Vec<Question>, TriviaError> {
        self.read_all(QUESTIONS)
    }

    fn questions_in_category(&self, category: CategoryId) -> Result<Vec<Question>, TriviaError> {
        let mut questions: Vec<Question> = self.read_all(QUESTIONS)?;
        questions.retain(|q| q.category == category);
        Ok(questions)
    }

    fn categories(&self) -> Result<Vec<Category>, TriviaError> {
        self.read_all(CATEGORIES)
    }

    fn question_count(&self) -> Result<usize, TriviaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let questions = read_txn.open_table(QUESTIONS).map_err(io_err)?;
        let count = questions.len().map_err(io_err)?;
        Ok(count as usize)
    }

    fn snapshot(&self) -> Result<(Vec<Question>, Vec<Category>), TriviaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        Ok((
            read_rows(&read_txn, QUESTIONS)?,
            read_rows(&read_txn, CATEGORIES)?,
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
