//! # trivia
//!
//! The trivia application: HTTP API, CLI and configuration on top of
//! `trivia-core`. The binary in `main.rs` is a thin entry point; the
//! modules live here so integration tests can reach them as `trivia::*`.

pub mod api;
pub mod cli;
pub mod config;
