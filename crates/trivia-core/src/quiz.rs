//! # Quiz Selector
//!
//! Picks the next question of a quiz round uniformly at random from the
//! questions the player has not yet seen.
//!
//! ## Statelessness
//!
//! The bank keeps no record of rounds. The caller supplies the full
//! `ExclusionSet` (every id already served this round) on each call, so
//! two calls with equal inputs and equally-seeded generators return the
//! same question.
//!
//! ## Exhaustion
//!
//! An empty pool is an expected end-of-round condition and is returned as
//! `QuizOutcome::NoMoreQuestions`, never as an error.

use crate::primitives::MAX_EXCLUSION_SET_SIZE;
use crate::{CategoryId, Question, QuestionId, TriviaError};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;

// =============================================================================
// SCOPE
// =============================================================================

/// Which questions a round draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizScope {
    /// Every category ("All" mode).
    #[default]
    All,
    /// A single category.
    Category(CategoryId),
}

impl QuizScope {
    /// Interpret a raw category id: anything `<= 0` or absent means `All`.
    #[must_use]
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(id) if id > 0 => Self::Category(CategoryId(id as u64)),
            _ => Self::All,
        }
    }

    /// Interpret a client-supplied JSON id.
    ///
    /// Integers and integer strings are accepted. Anything else
    /// (null, non-numeric text, objects) selects `All`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let raw = match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX))),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        Self::from_raw(raw)
    }

    /// Whether `question` belongs to this scope.
    #[must_use]
    pub fn admits(&self, question: &Question) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => question.category == *id,
        }
    }
}

// =============================================================================
// EXCLUSION SET
// =============================================================================

/// Ids already served in the current round.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExclusionSet {
    ids: BTreeSet<QuestionId>,
}

impl ExclusionSet {
    /// An empty set (start of a round).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from client-supplied ids.
    ///
    /// Duplicates collapse. More than `MAX_EXCLUSION_SET_SIZE` ids
    /// (before deduplication) is rejected.
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Result<Self, TriviaError> {
        let mut set = BTreeSet::new();
        for (count, id) in ids.into_iter().enumerate() {
            if count >= MAX_EXCLUSION_SET_SIZE {
                return Err(TriviaError::LimitExceeded(format!(
                    "exclusion set exceeds maximum {} ids",
                    MAX_EXCLUSION_SET_SIZE
                )));
            }
            set.insert(QuestionId(id));
        }
        Ok(Self { ids: set })
    }

    /// Record a served question.
    pub fn insert(&mut self, id: QuestionId) {
        self.ids.insert(id);
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of asking for the next quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// An unseen question from the requested scope.
    Question(Question),
    /// The pool is empty: the round is complete.
    NoMoreQuestions,
}

impl QuizOutcome {
    /// The selected question, if any.
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        match self {
            Self::Question(q) => Some(q),
            Self::NoMoreQuestions => None,
        }
    }

    /// Consume the outcome, yielding the selected question, if any.
    #[must_use]
    pub fn into_question(self) -> Option<Question> {
        match self {
            Self::Question(q) => Some(q),
            Self::NoMoreQuestions => None,
        }
    }

    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        matches!(self, Self::NoMoreQuestions)
    }
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Candidates for the next pick: in scope and not yet served.
#[must_use]
pub fn pool<'a>(
    questions: &'a [Question],
    exclusion: &ExclusionSet,
    scope: QuizScope,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| scope.admits(q) && !exclusion.contains(q.id))
        .collect()
}

/// Uniform random selection over the quiz pool.
///
/// Generic over the random source so tests can inject a seeded
/// generator (`StdRng::seed_from_u64`) and production code can pass
/// `rand::rng()`.
#[derive(Debug)]
pub struct QuizSelector<R> {
    rng: R,
}

impl<R: Rng> QuizSelector<R> {
    /// Create a selector drawing from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Pick one question uniformly from the pool.
    pub fn next(
        &mut self,
        questions: &[Question],
        exclusion: &ExclusionSet,
        scope: QuizScope,
    ) -> QuizOutcome {
        let candidates = pool(questions, exclusion, scope);
        match candidates.choose(&mut self.rng) {
            Some(question) => QuizOutcome::Question((*question).clone()),
            None => QuizOutcome::NoMoreQuestions,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
