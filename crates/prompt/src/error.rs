//! Error types for prompt operations.

use std::path::PathBuf;
use thiserror::Error;

use promptd_core::AppError;

/// Result type for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur while validating, rendering, or loading prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The caller's argument map failed validation. Carries the complete
    /// picture: every missing required argument and every unbound-variable
    /// diagnostic, never just the first.
    #[error("validation failed: missing required arguments [{}]; errors: [{}]", .missing.join(", "), .errors.join("; "))]
    Validation {
        missing: Vec<String>,
        errors: Vec<String>,
    },

    /// Template compilation or evaluation failed; the engine error is kept
    /// as the source.
    #[error("template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),

    /// No registered rendering strategy accepted the message body.
    /// Unreachable with the shipped strategy set, which ends in a catch-all.
    #[error("no rendering strategy accepts the message body")]
    NoStrategy,

    /// Lookup by name against the loaded collection missed.
    #[error("prompt '{0}' not found")]
    NotFound(String),

    /// A prompt file could not be parsed into a template.
    #[error("failed to parse prompt file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// I/O error while reading prompt files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err.to_string())
    }
}
