//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Read handlers take the bank's read lock; create and delete take the
//! write lock. Extractor rejections are mapped onto `ApiError` so every
//! failure carries the shared JSON error body.

use super::{
    AppState,
    types::{
        ApiError, CategoriesResponse, CategoryQuestionsResponse, CreateQuestionRequest,
        CreateQuestionResponse, DeleteQuestionResponse, HealthResponse, PageQuery,
        QuestionsResponse, QuizRequest, QuizResponse, SearchRequest, SearchResponse,
        category_map,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::IntoResponse,
};
use trivia_core::{CategoryId, ExclusionSet, PageNumber, QuestionId, SearchTerm, paginate};

/// Page requested in the query string; malformed queries are rejected.
fn requested_page(query: Result<Query<PageQuery>, QueryRejection>) -> Result<PageNumber, ApiError> {
    let Query(params) = query.map_err(|_| ApiError::BadRequest)?;
    Ok(PageNumber::parse(params.page.as_deref()))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATEGORY HANDLERS
// =============================================================================

/// Every category as an id -> label map.
pub async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let bank = state.bank.read().await;
    let index = bank.category_index()?;
    if index.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(&index),
    }))
}

/// Every question of one category, unpaginated.
pub async fn category_questions_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<CategoryQuestionsResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    let bank = state.bank.read().await;
    let listing = bank.questions_in_category(CategoryId(id))?;
    if listing.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions: listing.questions,
        total_questions: listing.total_questions,
    }))
}

// =============================================================================
// LISTING & SEARCH HANDLERS
// =============================================================================

/// The paginated general listing.
pub async fn list_questions_handler(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let page = requested_page(query)?;

    let bank = state.bank.read().await;
    let result = bank.list_questions(page)?;
    if result.listing.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsResponse {
        success: true,
        questions: result.listing.questions,
        total_questions: result.listing.total_questions,
        categories: category_map(&result.categories),
        current_category: result.current_category.into_iter().collect(),
        page: page.get(),
    }))
}

/// Substring search over question text, unpaginated.
pub async fn search_questions_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest)?;
    let term = SearchTerm::new(request.search_term.as_deref().unwrap_or_default())?;

    let bank = state.bank.read().await;
    let listing = bank.search(&term)?;
    if listing.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(SearchResponse {
        success: true,
        questions: listing.questions,
        total_questions: listing.total_questions,
        current_category: None,
    }))
}

// =============================================================================
// MUTATION HANDLERS
// =============================================================================

/// Insert a question and return the first page of the new listing.
pub async fn create_question_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<Json<CreateQuestionResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest)?;
    let new = request.to_new_question()?;

    let mut bank = state.bank.write().await;
    let created = bank.add_question(new)?;
    let all = bank.questions()?;
    tracing::info!(id = created.id.0, category = created.category.0, "Question created");

    Ok(Json(CreateQuestionResponse {
        success: true,
        created: created.id.0,
        question: created.question,
        answer: created.answer,
        category: created.category.0,
        difficulty: created.difficulty,
        questions: paginate(&all, PageNumber::default()).to_vec(),
        total_questions: all.len(),
    }))
}

/// Delete a question and return the requested page of what remains.
pub async fn delete_question_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<DeleteQuestionResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let page = requested_page(query)?;

    let mut bank = state.bank.write().await;
    bank.delete_question(QuestionId(id))?;
    let all = bank.questions()?;
    tracing::info!(id, "Question deleted");

    Ok(Json(DeleteQuestionResponse {
        success: true,
        deleted: id,
        current_questions: paginate(&all, page).to_vec(),
        total_questions: all.len(),
    }))
}

// =============================================================================
// QUIZ HANDLER
// =============================================================================

/// Next question of a quiz round.
///
/// The round state is the client's `previous_questions`; an empty pool
/// is answered with `round_complete: true`, not an error.
pub async fn quiz_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest)?;
    let exclusion = ExclusionSet::from_ids(request.previous().iter().copied())?;
    let scope = request.scope();

    let bank = state.bank.read().await;
    let outcome = state.draw_quiz_question(&bank, &exclusion, scope)?;
    tracing::debug!(
        excluded = exclusion.len(),
        ?scope,
        round_complete = outcome.is_round_complete(),
        "Quiz draw"
    );

    Ok(Json(QuizResponse::from(outcome)))
}

// =============================================================================
// FALLBACKS
// =============================================================================

/// Unknown path.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

/// Known path, wrong verb.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
