// ABOUTME: Application-wide error types.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability host error: {0}")]
    Host(#[from] lingo_core::CapabilityError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown language: {code}\n\nAvailable targets: {available}")]
    UnknownLanguage { code: String, available: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
