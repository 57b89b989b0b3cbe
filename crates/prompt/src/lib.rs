//! Prompt system for promptd.
//!
//! This crate provides the prompt-serving pipeline:
//! - JSON/YAML/Markdown prompt definitions loaded from disk
//! - Strategy-dispatched template rendering (legacy `$ARGUMENTS` bodies and
//!   Handlebars logic templates with custom helpers)
//! - Argument validation with complete diagnostics
//! - An atomically reloadable in-memory registry

mod engine;

pub mod error;
pub mod loader;
pub mod processor;
pub mod registry;
pub mod schema;
pub mod strategy;
pub mod types;
pub mod validate;

// Re-export main types
pub use error::PromptError;
pub use processor::process;
pub use registry::PromptRegistry;
pub use schema::{argument_schema, Requirement};
pub use strategy::{select_strategy, RenderStrategy, ARGUMENTS_KEY, ARGUMENTS_MARKER};
pub use types::{
    ArgumentMap, MessageContent, MessageRole, PromptArgument, PromptInfo, PromptMessage,
    PromptTemplate, RenderedMessage, RenderedPrompt, RenderedRole, ValidationReport,
};
pub use validate::validate;
