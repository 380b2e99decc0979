//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Every response body carries a boolean `success`. Failures share one
//! shape: `{"success": false, "error": <status code>, "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use trivia_core::{
    CategoryId, CategoryIndex, NewQuestion, Question, QuizOutcome, QuizScope, TriviaError,
};

// =============================================================================
// API ERROR
// =============================================================================

/// Error categories surfaced by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Unprocessable,
    TooManyRequests,
    Internal,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::NotFound => "resource not found",
            Self::MethodNotAllowed => "method not allowed",
            Self::Unprocessable => "unprocessable",
            Self::TooManyRequests => "too many requests",
            Self::Internal => "internal server error",
        }
    }
}

impl From<TriviaError> for ApiError {
    fn from(err: TriviaError) -> Self {
        match err {
            TriviaError::InvalidQuestion(_) | TriviaError::InvalidCategory(_) => {
                tracing::debug!("Rejected input: {}", err);
                Self::Unprocessable
            }
            TriviaError::QuestionNotFound(_) => Self::NotFound,
            TriviaError::LimitExceeded(_) => {
                tracing::debug!("Rejected input: {}", err);
                Self::BadRequest
            }
            TriviaError::CategoryLabelMissing(id) => {
                tracing::error!(category_id = id.0, "Question refers to a category with no label");
                Self::Internal
            }
            TriviaError::SerializationError(_) | TriviaError::IoError(_) => {
                tracing::error!("Storage failure: {}", err);
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::from(self))).into_response()
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            success: false,
            error: err.status().as_u16(),
            message: err.message().to_string(),
        }
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// Render a category index as the wire-level id -> label map.
pub fn category_map(index: &CategoryIndex) -> BTreeMap<u64, String> {
    index
        .iter()
        .map(|(id, label)| (id.0, label.to_string()))
        .collect()
}

/// `GET /categories` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: BTreeMap<u64, String>,
}

// =============================================================================
// LISTINGS
// =============================================================================

/// Query string of paged endpoints. `page` is kept raw so that
/// non-numeric values fall back to page 1 instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `GET /questions` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: BTreeMap<u64, String>,
    pub current_category: Vec<String>,
    pub page: u32,
}

/// `POST /questions` search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// `POST /questions` search response. `current_category` is always null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<String>,
}

/// `GET /categories/{id}/questions` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// `POST /questions/new` request.
///
/// Fields are optional at the serde level so that a missing field is
/// reported as unprocessable rather than as a malformed body.
/// `category` and `difficulty` accept integers or integer strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub difficulty: Option<Value>,
}

/// Integer or integer string.
fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl CreateQuestionRequest {
    /// Check that every required field is present and convert.
    pub fn to_new_question(&self) -> Result<NewQuestion, ApiError> {
        let question = self.question.as_deref().ok_or(ApiError::Unprocessable)?;
        let answer = self.answer.as_deref().ok_or(ApiError::Unprocessable)?;
        let category = integer(self.category.as_ref())
            .filter(|id| *id > 0)
            .ok_or(ApiError::Unprocessable)?;
        let difficulty = integer(self.difficulty.as_ref()).ok_or(ApiError::Unprocessable)?;

        let new = NewQuestion::new(question, answer, CategoryId(category as u64), difficulty);
        new.validate()?;
        Ok(new)
    }
}

/// `POST /questions/new` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionResponse {
    pub success: bool,
    pub created: u64,
    pub question: String,
    pub answer: String,
    pub category: u64,
    pub difficulty: i64,
    /// First page of questions after the insert.
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

/// `DELETE /questions/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteQuestionResponse {
    pub success: bool,
    pub deleted: u64,
    pub current_questions: Vec<Question>,
    pub total_questions: usize,
}

// =============================================================================
// QUIZ
// =============================================================================

/// `POST /quizzes` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Ids already served this round. Absent means a fresh round.
    #[serde(default)]
    pub previous_questions: Option<Vec<u64>>,
    /// `{"id": ..., "type": ...}` from the client. A bare id is accepted too.
    #[serde(default)]
    pub quiz_category: Option<Value>,
}

impl QuizRequest {
    /// The category scope; anything unusable means all categories.
    pub fn scope(&self) -> QuizScope {
        match &self.quiz_category {
            Some(Value::Object(obj)) => obj.get("id").map(QuizScope::from_json).unwrap_or_default(),
            Some(other) => QuizScope::from_json(other),
            None => QuizScope::All,
        }
    }

    pub fn previous(&self) -> &[u64] {
        self.previous_questions.as_deref().unwrap_or_default()
    }
}

/// `POST /quizzes` response.
///
/// When the pool is empty `question` is null and `round_complete` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    pub question: Option<Question>,
    pub round_complete: bool,
}

impl From<QuizOutcome> for QuizResponse {
    fn from(outcome: QuizOutcome) -> Self {
        let round_complete = outcome.is_round_complete();
        Self {
            success: true,
            question: outcome.into_question(),
            round_complete,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
