//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Every command opens the bank described by the resolved `ServerConfig`,
//! runs one `QuestionBank` operation and prints the result, as JSON when
//! `--json-mode` is set.

use crate::api;
use crate::config::{BackendKind, ServerConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use trivia_core::{
    Catalog, CategoryId, ExclusionSet, Listing, NewQuestion, PageNumber, Question, QuestionBank,
    QuestionId, QuizOutcome, QuizScope, SearchTerm, TriviaError,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum catalog file size for seeding (50 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_CATALOG_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TriviaError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TriviaError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TriviaError::LimitExceeded(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it
/// names an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, TriviaError> {
    let canonical = path.canonicalize().map_err(|e| {
        TriviaError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TriviaError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: its parent must be an existing directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, TriviaError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TriviaError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(TriviaError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TriviaError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn print_question(q: &Question) {
    println!(
        "[{}] {} (category {}, difficulty {})",
        q.id, q.question, q.category, q.difficulty
    );
    println!("      Answer: {}", q.answer);
}

fn print_listing(heading: &str, listing: &Listing, json_mode: bool) {
    if json_mode {
        print_json(&serde_json::json!({
            "questions": listing.questions,
            "total_questions": listing.total_questions,
            "page": listing.page.map(PageNumber::get),
        }));
        return;
    }

    println!("{}", heading);
    println!("{}", "=".repeat(heading.len()));
    if listing.is_empty() {
        println!("(no questions)");
    }
    for q in &listing.questions {
        print_question(q);
    }
    println!();
    println!("Total: {}", listing.total_questions);
}

/// Parse a comma-separated id list such as "2,5,9".
pub fn parse_id_list(raw: &str) -> Result<Vec<u64>, TriviaError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>().map_err(|_| {
                TriviaError::SerializationError(format!("Invalid question id '{}'", s))
            })
        })
        .collect()
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &ServerConfig, catalog: Option<&Path>) -> Result<(), TriviaError> {
    let mut bank = load_bank(config)?;
    if let Some(path) = catalog {
        let report = import_catalog(&mut bank, path)?;
        tracing::info!(
            categories = report.categories,
            questions = report.questions,
            "Catalog imported"
        );
    }

    println!("Trivia Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.host);
    println!("  Port:     {}", config.port);
    println!("  Backend:  {}", config.backend);
    println!("  Database: {:?}", config.database);
    println!();
    println!("Endpoints:");
    println!("  GET    /questions?page=N          - Paginated listing");
    println!("  POST   /questions                 - Search question text");
    println!("  POST   /questions/new             - Create a question");
    println!("  DELETE /questions/{{id}}            - Delete a question");
    println!("  GET    /categories                - All categories");
    println!("  GET    /categories/{{id}}/questions - Questions of a category");
    println!("  POST   /quizzes                   - Next quiz question");
    println!("  GET    /health                    - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config, bank).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show question bank status.
pub fn cmd_status(config: &ServerConfig, json_mode: bool) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let stats = bank.stats()?;
    let index = bank.category_index()?;

    if json_mode {
        let per_category: serde_json::Map<String, serde_json::Value> = stats
            .per_category
            .iter()
            .map(|(id, count)| (id.to_string(), serde_json::json!(count)))
            .collect();
        print_json(&serde_json::json!({
            "database": config.database.to_string_lossy(),
            "backend": config.backend.to_string(),
            "question_count": stats.question_count,
            "category_count": stats.category_count,
            "per_category": per_category,
        }));
        return Ok(());
    }

    println!("Trivia Bank Status");
    println!("==================");
    println!("Database: {:?}", config.database);
    println!("Backend:  {}", config.backend);
    println!();
    println!("Questions:  {}", stats.question_count);
    println!("Categories: {}", stats.category_count);
    for (id, count) in &stats.per_category {
        let label = index.label(*id).unwrap_or("<no label>");
        println!("  {:>4} {:<20} {}", id, label, count);
    }

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database.
pub fn cmd_init(config: &ServerConfig, force: bool) -> Result<(), TriviaError> {
    if config.backend == BackendKind::Memory {
        return Err(TriviaError::IoError(
            "The memory backend has no database to initialize".to_string(),
        ));
    }

    let db_path = &config.database;
    if db_path.exists() {
        if !force {
            return Err(TriviaError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| TriviaError::IoError(format!("Remove existing database: {}", e)))?;
    }

    let _bank = QuestionBank::with_redb(db_path)?;
    println!("Initialized new redb database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// SEED / EXPORT COMMANDS
// =============================================================================

/// Read, validate and import a catalog file.
fn import_catalog(
    bank: &mut QuestionBank,
    file: &Path,
) -> Result<trivia_core::ImportReport, TriviaError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_CATALOG_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| TriviaError::IoError(format!("Read file: {}", e)))?;
    Catalog::from_json(&contents)?.import_into(bank)
}

/// Import a JSON catalog into the bank.
pub fn cmd_seed(config: &ServerConfig, json_mode: bool, file: &Path) -> Result<(), TriviaError> {
    tracing::info!("Seeding from {:?}", file);

    let mut bank = load_bank(config)?;
    let report = import_catalog(&mut bank, file)?;

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "categories": report.categories,
            "questions": report.questions,
        }));
    } else {
        println!(
            "Imported {} categories and {} questions",
            report.categories, report.questions
        );
    }
    Ok(())
}

/// Export the bank as a JSON catalog.
pub fn cmd_export(config: &ServerConfig, output: &Path) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let validated_output = validate_output_path(output)?;

    let catalog = Catalog::from_bank(&bank)?;
    let data = catalog.to_json()?;
    std::fs::write(&validated_output, data)
        .map_err(|e| TriviaError::IoError(format!("Write file: {}", e)))?;

    println!(
        "Exported {} categories and {} questions to {:?}",
        catalog.categories.len(),
        catalog.questions.len(),
        validated_output
    );
    Ok(())
}

// =============================================================================
// READ COMMANDS
// =============================================================================

/// Show one page of the general listing.
pub fn cmd_list(config: &ServerConfig, json_mode: bool, page: i64) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let page = bank.list_questions(PageNumber::new(page))?;

    if json_mode {
        print_json(&serde_json::json!({
            "questions": page.listing.questions,
            "total_questions": page.listing.total_questions,
            "categories": api::category_map(&page.categories),
            "current_category": page.current_category,
            "page": page.listing.page.map(PageNumber::get),
        }));
        return Ok(());
    }

    let number = page.listing.page.unwrap_or_default();
    print_listing(&format!("Questions - page {}", number), &page.listing, false);
    if !page.current_category.is_empty() {
        let labels: Vec<&str> = page.current_category.iter().map(String::as_str).collect();
        println!("Categories on this page: {}", labels.join(", "));
    }
    Ok(())
}

/// Search question text.
pub fn cmd_search(config: &ServerConfig, json_mode: bool, term: &str) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let term = SearchTerm::new(term)?;
    let listing = bank.search(&term)?;
    print_listing(
        &format!("Search results for '{}'", term.as_str()),
        &listing,
        json_mode,
    );
    Ok(())
}

/// List the questions of one category.
pub fn cmd_category(config: &ServerConfig, json_mode: bool, id: u64) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let listing = bank.questions_in_category(CategoryId(id))?;
    print_listing(&format!("Category {}", id), &listing, json_mode);
    Ok(())
}

/// List all categories.
pub fn cmd_categories(config: &ServerConfig, json_mode: bool) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let index = bank.category_index()?;

    if json_mode {
        print_json(&serde_json::json!({ "categories": api::category_map(&index) }));
        return Ok(());
    }

    println!("Categories");
    println!("==========");
    if index.is_empty() {
        println!("(no categories)");
    }
    for (id, label) in index.iter() {
        println!("  {:>4} {}", id, label);
    }
    Ok(())
}

// =============================================================================
// QUIZ COMMAND
// =============================================================================

/// Draw the next quiz question.
pub fn cmd_quiz(
    config: &ServerConfig,
    json_mode: bool,
    category: Option<i64>,
    exclude: Option<&str>,
    seed: Option<u64>,
) -> Result<(), TriviaError> {
    let bank = load_bank(config)?;
    let excluded = exclude.map(parse_id_list).transpose()?.unwrap_or_default();
    let exclusion = ExclusionSet::from_ids(excluded)?;
    let scope = QuizScope::from_raw(category);

    let rng = match seed.or(config.quiz_seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let outcome = bank.next_quiz_question(rng, &exclusion, scope)?;

    if json_mode {
        print_json(&serde_json::json!({
            "question": outcome.question(),
            "round_complete": outcome.is_round_complete(),
        }));
        return Ok(());
    }

    match outcome {
        QuizOutcome::Question(q) => print_question(&q),
        QuizOutcome::NoMoreQuestions => println!("Round complete: no questions remain"),
    }
    Ok(())
}

// =============================================================================
// MUTATION COMMANDS
// =============================================================================

/// Add a question.
pub fn cmd_add(
    config: &ServerConfig,
    json_mode: bool,
    question: &str,
    answer: &str,
    category: u64,
    difficulty: i64,
) -> Result<(), TriviaError> {
    let mut bank = load_bank(config)?;
    let new = NewQuestion::new(question, answer, CategoryId(category), difficulty);
    new.validate()?;
    let created = bank.add_question(new)?;

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "created": created }));
    } else {
        println!("Created question {}", created.id);
    }
    Ok(())
}

/// Delete a question.
pub fn cmd_delete(config: &ServerConfig, json_mode: bool, id: u64) -> Result<(), TriviaError> {
    let mut bank = load_bank(config)?;
    bank.delete_question(QuestionId(id))?;

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "deleted": id }));
    } else {
        println!("Deleted question {}", id);
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the bank described by the config.
pub fn load_bank(config: &ServerConfig) -> Result<QuestionBank, TriviaError> {
    match config.backend {
        BackendKind::Redb => QuestionBank::with_redb(&config.database),
        BackendKind::Memory => {
            tracing::warn!("Using the memory backend: changes are lost on exit");
            Ok(QuestionBank::new())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
