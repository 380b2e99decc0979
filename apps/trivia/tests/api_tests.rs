//! Integration tests for the trivia HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use trivia::api::{
    AppState, CategoriesResponse, CategoryQuestionsResponse, CreateQuestionResponse,
    DeleteQuestionResponse, ErrorResponse, HealthResponse, QuestionsResponse, QuizResponse,
    SearchResponse, create_router,
};
use trivia::config::ServerConfig;
use trivia_core::{CategoryId, NewQuestion, QuestionBank};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn test_config() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

/// Create a test server over `bank` with a seeded quiz RNG.
fn server_for(bank: QuestionBank) -> TestServer {
    let state = AppState::with_seed(bank, 42);
    TestServer::new(create_router(state, &test_config())).unwrap()
}

/// Create a test server with an empty in-memory bank.
fn create_test_server() -> TestServer {
    server_for(QuestionBank::new())
}

/// Bank with questions 1-15. Ids 2, 5, 9 are in category 3 (Geography),
/// the rest in category 1 (Science). Question 7 mentions "title" in its
/// text; question 8 only in its answer.
fn populated_bank() -> QuestionBank {
    let mut bank = QuestionBank::new();
    bank.add_category("Science").unwrap();
    bank.add_category("Art").unwrap();
    bank.add_category("Geography").unwrap();

    for id in 1..=15u64 {
        let category = if [2, 5, 9].contains(&id) { 3 } else { 1 };
        let (text, answer) = match id {
            7 => (
                "What was the title of the 1990 fantasy directed by Tim Burton?".to_string(),
                "Edward Scissorhands".to_string(),
            ),
            8 => (
                "Which novel opens with a famous first line?".to_string(),
                "Its Title Is Moby Dick".to_string(),
            ),
            _ => (format!("Question number {id}"), format!("Answer {id}")),
        };
        bank.add_question(NewQuestion::new(text, answer, CategoryId(category), 2))
            .unwrap();
    }
    bank
}

fn create_populated_test_server() -> TestServer {
    server_for(populated_bank())
}

fn ids(questions: &[trivia_core::Question]) -> Vec<u64> {
    questions.iter().map(|q| q.id.0).collect()
}

fn assert_error_body(response: &axum_test::TestResponse, code: u16, message: &str) {
    let body: ErrorResponse = response.json();
    assert!(!body.success);
    assert_eq!(body.error, code);
    assert_eq!(body.message, message);
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// CATEGORY ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_categories_listed_by_id() {
    let server = create_populated_test_server();

    let response = server.get("/categories").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["categories"],
        json!({"1": "Science", "2": "Art", "3": "Geography"})
    );
    let typed: CategoriesResponse = response.json();
    assert!(typed.success);
    assert_eq!(typed.categories.len(), 3);
}

#[tokio::test]
async fn test_categories_empty_is_not_found() {
    let server = create_test_server();

    let response = server.get("/categories").await;

    response.assert_status_not_found();
    assert_error_body(&response, 404, "resource not found");
}

#[tokio::test]
async fn test_category_three_questions() {
    let server = create_populated_test_server();

    let response = server.get("/categories/3/questions").await;

    response.assert_status_ok();
    let body: CategoryQuestionsResponse = response.json();
    assert!(body.success);
    assert_eq!(ids(&body.questions), vec![2, 5, 9]);
    assert_eq!(body.total_questions, 3);
}

#[tokio::test]
async fn test_category_without_questions_is_not_found() {
    let server = create_populated_test_server();

    server.get("/categories/2/questions").await.assert_status_not_found();
    server.get("/categories/99/questions").await.assert_status_not_found();
}

#[tokio::test]
async fn test_category_non_numeric_id_is_not_found() {
    let server = create_populated_test_server();

    let response = server.get("/categories/abc/questions").await;

    response.assert_status_not_found();
    assert_error_body(&response, 404, "resource not found");
}

// =============================================================================
// LISTING ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_list_second_page() {
    let server = create_populated_test_server();

    let response = server.get("/questions").add_query_param("page", 2).await;

    response.assert_status_ok();
    let body: QuestionsResponse = response.json();
    assert!(body.success);
    assert_eq!(ids(&body.questions), vec![11, 12, 13, 14, 15]);
    assert_eq!(body.total_questions, 15);
    assert_eq!(body.page, 2);
    assert_eq!(body.current_category, vec!["Science".to_string()]);
    assert_eq!(body.categories.len(), 3);
}

#[tokio::test]
async fn test_list_defaults_to_first_page() {
    let server = create_populated_test_server();

    let response = server.get("/questions").await;

    response.assert_status_ok();
    let body: QuestionsResponse = response.json();
    assert_eq!(ids(&body.questions), (1..=10).collect::<Vec<u64>>());
    assert_eq!(body.page, 1);
    let labels: BTreeSet<String> = body.current_category.into_iter().collect();
    assert_eq!(
        labels,
        BTreeSet::from(["Science".to_string(), "Geography".to_string()])
    );
}

#[tokio::test]
async fn test_list_clamps_and_ignores_bad_pages() {
    let server = create_populated_test_server();

    for raw in ["0", "-4", "abc"] {
        let response = server.get("/questions").add_query_param("page", raw).await;
        response.assert_status_ok();
        let body: QuestionsResponse = response.json();
        assert_eq!(body.page, 1, "page={raw}");
        assert_eq!(body.questions.len(), 10);
    }
}

#[tokio::test]
async fn test_list_past_the_end_is_not_found() {
    let server = create_populated_test_server();

    let response = server.get("/questions").add_query_param("page", 3).await;

    response.assert_status_not_found();
    assert_error_body(&response, 404, "resource not found");
}

#[tokio::test]
async fn test_list_with_dangling_category_is_internal_error() {
    let mut bank = populated_bank();
    bank.add_question(NewQuestion::new("Orphan?", "Yes", CategoryId(77), 1))
        .unwrap();
    let server = server_for(bank);

    let response = server.get("/questions").add_query_param("page", 2).await;

    assert_eq!(response.status_code().as_u16(), 500);
    assert_error_body(&response, 500, "internal server error");
}

// =============================================================================
// SEARCH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_search_is_case_insensitive_on_question_text() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions")
        .json(&json!({"searchTerm": "TITLE"}))
        .await;

    response.assert_status_ok();
    let body: SearchResponse = response.json();
    assert!(body.success);
    assert_eq!(ids(&body.questions), vec![7]);
    assert_eq!(body.total_questions, 1);
    assert!(body.current_category.is_none());

    let raw: Value = response.json();
    assert!(raw["current_category"].is_null());
}

#[tokio::test]
async fn test_search_empty_term_returns_everything_unpaginated() {
    let server = create_populated_test_server();

    for body in [json!({"searchTerm": "   "}), json!({})] {
        let response = server.post("/questions").json(&body).await;
        response.assert_status_ok();
        let result: SearchResponse = response.json();
        assert_eq!(result.questions.len(), 15);
        assert_eq!(result.total_questions, 15);
    }
}

#[tokio::test]
async fn test_search_without_matches_is_not_found() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions")
        .json(&json!({"searchTerm": "zeppelin"}))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_search_term_too_long_is_bad_request() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions")
        .json(&json!({"searchTerm": "x".repeat(300)}))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    assert_error_body(&response, 400, "bad request");
}

// =============================================================================
// CREATE / DELETE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_create_question() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions/new")
        .json(&json!({
            "question": "Which planet is known as the Red Planet?",
            "answer": "Mars",
            "category": 1,
            "difficulty": 2
        }))
        .await;

    response.assert_status_ok();
    let body: CreateQuestionResponse = response.json();
    assert!(body.success);
    assert_eq!(body.created, 16);
    assert_eq!(body.answer, "Mars");
    assert_eq!(body.total_questions, 16);
    assert_eq!(body.questions.len(), 10);

    let last_page: QuestionsResponse = server
        .get("/questions")
        .add_query_param("page", 2)
        .await
        .json();
    assert_eq!(ids(&last_page.questions).last(), Some(&16));
}

#[tokio::test]
async fn test_create_question_returns_first_page() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions/new")
        .add_query_param("page", 2)
        .json(&json!({
            "question": "What is the largest ocean?",
            "answer": "Pacific",
            "category": 3,
            "difficulty": 1
        }))
        .await;

    response.assert_status_ok();
    let body: CreateQuestionResponse = response.json();
    assert_eq!(ids(&body.questions), (1..=10).collect::<Vec<u64>>());
    assert_eq!(body.total_questions, 16);
}

#[tokio::test]
async fn test_create_question_missing_field_is_unprocessable() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions/new")
        .json(&json!({"question": "No answer?", "category": 1, "difficulty": 1}))
        .await;

    assert_eq!(response.status_code().as_u16(), 422);
    assert_error_body(&response, 422, "unprocessable");
}

#[tokio::test]
async fn test_create_question_blank_text_is_unprocessable() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions/new")
        .json(&json!({"question": "  ", "answer": "A", "category": 1, "difficulty": 1}))
        .await;

    assert_eq!(response.status_code().as_u16(), 422);
}

#[tokio::test]
async fn test_delete_question() {
    let server = create_populated_test_server();

    let response = server.delete("/questions/5").await;

    response.assert_status_ok();
    let body: DeleteQuestionResponse = response.json();
    assert!(body.success);
    assert_eq!(body.deleted, 5);
    assert_eq!(body.total_questions, 14);
    assert!(!ids(&body.current_questions).contains(&5));

    let category: CategoryQuestionsResponse =
        server.get("/categories/3/questions").await.json();
    assert_eq!(ids(&category.questions), vec![2, 9]);
}

#[tokio::test]
async fn test_delete_unknown_question_is_not_found() {
    let server = create_populated_test_server();

    let response = server.delete("/questions/404").await;

    response.assert_status_not_found();
    assert_error_body(&response, 404, "resource not found");
}

// =============================================================================
// QUIZ ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_quiz_exhausted_category_is_round_complete() {
    let server = create_populated_test_server();

    let response = server
        .post("/quizzes")
        .json(&json!({
            "previous_questions": [2, 5, 9],
            "quiz_category": {"type": "Geography", "id": 3}
        }))
        .await;

    response.assert_status_ok();
    let body: QuizResponse = response.json();
    assert!(body.success);
    assert!(body.question.is_none());
    assert!(body.round_complete);
}

#[tokio::test]
async fn test_quiz_category_scope() {
    let server = create_populated_test_server();

    let response = server
        .post("/quizzes")
        .json(&json!({
            "previous_questions": [2, 9],
            "quiz_category": {"type": "Geography", "id": "3"}
        }))
        .await;

    response.assert_status_ok();
    let body: QuizResponse = response.json();
    assert!(!body.round_complete);
    assert_eq!(body.question.map(|q| q.id.0), Some(5));
}

#[tokio::test]
async fn test_quiz_full_round_never_repeats() {
    let server = create_populated_test_server();
    let mut previous: Vec<u64> = Vec::new();

    loop {
        let body: QuizResponse = server
            .post("/quizzes")
            .json(&json!({
                "previous_questions": previous,
                "quiz_category": {"type": "click", "id": 0}
            }))
            .await
            .json();
        match body.question {
            Some(q) => {
                assert!(!previous.contains(&q.id.0), "question {} repeated", q.id);
                previous.push(q.id.0);
            }
            None => {
                assert!(body.round_complete);
                break;
            }
        }
    }

    previous.sort_unstable();
    assert_eq!(previous, (1..=15).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_quiz_without_fields_draws_from_everything() {
    let server = create_populated_test_server();

    let response = server.post("/quizzes").json(&json!({})).await;

    response.assert_status_ok();
    let body: QuizResponse = response.json();
    assert!(body.question.is_some());
}

#[tokio::test]
async fn test_quiz_malformed_previous_questions_is_bad_request() {
    let server = create_populated_test_server();

    let response = server
        .post("/quizzes")
        .json(&json!({"previous_questions": "2,5", "quiz_category": {"id": 0}}))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    assert_error_body(&response, 400, "bad request");
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let server = create_test_server();

    let response = server.get("/unknown").await;

    response.assert_status_not_found();
    assert_error_body(&response, 404, "resource not found");
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_populated_test_server();

    // /quizzes is POST only
    let response = server.get("/quizzes").await;

    assert_eq!(response.status_code().as_u16(), 405);
    assert_error_body(&response, 405, "method not allowed");
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = create_populated_test_server();

    let response = server
        .post("/questions")
        .bytes(bytes::Bytes::from("not valid json"))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    assert_error_body(&response, 400, "bad request");
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let config = ServerConfig {
        rate_limit: 2,
        ..ServerConfig::default()
    };
    let state = AppState::with_seed(QuestionBank::new(), 1);
    let server = TestServer::new(create_router(state, &config)).unwrap();

    server.get("/health").await.assert_status_ok();
    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    assert_eq!(response.status_code().as_u16(), 429);
    assert_error_body(&response, 429, "too many requests");
}

// =============================================================================
// PERSISTENT BACKEND TESTS
// =============================================================================

#[tokio::test]
async fn test_redb_backend_serves_same_listing() {
    let dir = tempfile::tempdir().unwrap();
    let mut bank = QuestionBank::with_redb(dir.path().join("api.redb")).unwrap();
    bank.add_category("Science").unwrap();
    for i in 1..=12 {
        bank.add_question(NewQuestion::new(
            format!("Question {i}"),
            "Answer",
            CategoryId(1),
            1,
        ))
        .unwrap();
    }
    let server = server_for(bank);

    let body: QuestionsResponse = server
        .get("/questions")
        .add_query_param("page", 2)
        .await
        .json();

    assert_eq!(ids(&body.questions), vec![11, 12]);
    assert_eq!(body.total_questions, 12);
}
