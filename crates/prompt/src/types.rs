//! Prompt types for promptd.
//!
//! This module defines the domain entities for the prompt system: the
//! template definitions loaded from disk and the rendered output handed to
//! the serving boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-supplied argument bindings, keyed by argument name.
///
/// Keys that are not declared by the template are tolerated: validation
/// ignores them, but they remain available for substitution if a message
/// body references them.
pub type ArgumentMap = HashMap<String, serde_json::Value>;

/// Role of a message inside a template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Role of a rendered message.
///
/// The serving protocol only knows `user` and `assistant`; `system` messages
/// are collapsed into `user` at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderedRole {
    User,
    Assistant,
}

impl From<MessageRole> for RenderedRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::Assistant => RenderedRole::Assistant,
            MessageRole::User | MessageRole::System => RenderedRole::User,
        }
    }
}

/// Message payload. Only text content is supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
}

impl MessageContent {
    /// The raw text body of this content.
    pub fn text(&self) -> &str {
        match self {
            MessageContent::Text { text } => text,
        }
    }
}

/// A declared template argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name, unique within a template
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Whether a caller must supply this argument
    pub required: bool,
}

/// A single role-tagged message within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

/// A prompt template definition loaded from disk.
///
/// Templates are immutable once loaded; the in-memory collection is replaced
/// wholesale on reload, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Unique name, used as the lookup key
    pub name: String,

    /// Human-readable description (may be empty; rendering falls back to
    /// `Prompt: <name>`)
    pub description: String,

    /// Declared arguments, in declaration order
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,

    /// Ordered message list
    pub messages: Vec<PromptMessage>,
}

/// A fully rendered, role-normalized message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub role: RenderedRole,
    pub content: MessageContent,
}

/// The result of rendering one template against one argument map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub description: String,
    pub messages: Vec<RenderedMessage>,
}

/// Outcome of validating an argument map against a template.
///
/// Both lists are fully computed; validation never short-circuits on the
/// first miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,

    /// Names of declared-required arguments absent from the map, in
    /// declaration order
    pub missing_args: Vec<String>,

    /// Diagnostics for template variables with no binding and no declaration
    pub errors: Vec<String>,
}

/// Introspection metadata for one loaded template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptInfo {
    pub name: String,
    pub description: String,
    pub argument_count: usize,
    pub message_count: usize,
    pub arguments: Vec<PromptArgument>,
}
