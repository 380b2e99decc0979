//! # Trivia HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /categories` - All categories (id -> label)
//! - `GET /questions?page=N` - Paginated listing, 10 per page
//! - `POST /questions` - Search question text (`{"searchTerm": ...}`)
//! - `POST /questions/new` - Create a question
//! - `DELETE /questions/{id}` - Delete a question
//! - `GET /categories/{id}/questions` - Questions of one category
//! - `POST /quizzes` - Next random question of a quiz round
//!
//! ## Security Configuration
//!
//! Read from `ServerConfig` (file or `TRIVIA_*` environment):
//! - `cors_origins`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `rate_limit`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use middleware::{GlobalRateLimiter, create_rate_limiter};
// Re-export handlers and types for integration tests (via `trivia::api::*`)
pub use handlers::{
    categories_handler, category_questions_handler, create_question_handler,
    delete_question_handler, health_handler, list_questions_handler, method_not_allowed_handler,
    not_found_handler, quiz_handler, search_questions_handler,
};
pub use types::{
    ApiError, CategoriesResponse, CategoryQuestionsResponse, CreateQuestionRequest,
    CreateQuestionResponse, DeleteQuestionResponse, ErrorResponse, HealthResponse, PageQuery,
    QuestionsResponse, QuizRequest, QuizResponse, SearchRequest, SearchResponse, category_map,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use trivia_core::{ExclusionSet, QuestionBank, QuizOutcome, QuizScope, TriviaError};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// The bank sits behind an async `RwLock`. The quiz RNG is behind a
/// plain `Mutex` that is only ever locked inside synchronous code.
#[derive(Clone)]
pub struct AppState {
    /// The question bank.
    pub bank: Arc<RwLock<QuestionBank>>,
    /// Random source for quiz draws.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Create app state with an OS-seeded quiz RNG.
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_rng(bank, StdRng::from_os_rng())
    }

    /// Create app state with a fixed quiz seed (reproducible rounds).
    #[must_use]
    pub fn with_seed(bank: QuestionBank, seed: u64) -> Self {
        Self::with_rng(bank, StdRng::seed_from_u64(seed))
    }

    /// Create app state with a caller-built RNG.
    #[must_use]
    pub fn with_rng(bank: QuestionBank, rng: StdRng) -> Self {
        Self {
            bank: Arc::new(RwLock::new(bank)),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Create app state honoring `quiz_seed` from the config.
    #[must_use]
    pub fn from_config(bank: QuestionBank, config: &ServerConfig) -> Self {
        match config.quiz_seed {
            Some(seed) => {
                tracing::info!(seed, "Quiz RNG seeded from configuration");
                Self::with_seed(bank, seed)
            }
            None => Self::new(bank),
        }
    }

    /// Draw the next quiz question from `bank` with the shared RNG.
    ///
    /// A poisoned lock still holds a usable generator, so it is recovered.
    pub fn draw_quiz_question(
        &self,
        bank: &QuestionBank,
        exclusion: &ExclusionSet,
        scope: QuizScope,
    ) -> Result<QuizOutcome, TriviaError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        bank.next_quiz_question(&mut *rng, exclusion, scope)
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// Build CORS layer from the configured origins.
///
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (cors_origins = \"*\"). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects against floods (if enabled)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let rate_limiter = if config.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        Some(create_rate_limiter(config.rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/categories", get(handlers::categories_handler))
        .route(
            "/categories/{id}/questions",
            get(handlers::category_questions_handler),
        )
        .route(
            "/questions",
            get(handlers::list_questions_handler).post(handlers::search_questions_handler),
        )
        .route("/questions/new", post(handlers::create_question_handler))
        .route("/questions/{id}", delete(handlers::delete_question_handler))
        .route("/quizzes", post(handlers::quiz_handler))
        .fallback(handlers::not_found_handler)
        .method_not_allowed_fallback(handlers::method_not_allowed_handler);

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config.cors_origins.as_deref())),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Resolve on Ctrl+C so in-flight requests can finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Start the HTTP server.
pub async fn run_server(config: &ServerConfig, bank: QuestionBank) -> Result<(), TriviaError> {
    let state = AppState::from_config(bank, config);
    let router = create_router(state, config);
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TriviaError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Trivia HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TriviaError::IoError(format!("Server error: {}", e)))
}
