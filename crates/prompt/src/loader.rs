//! Prompt loader.
//!
//! Walks the configured prompt directories and parses each supported file
//! into a [`PromptTemplate`]. Parsing is strategy-dispatched on the file
//! extension: JSON, YAML, and Markdown. One malformed file never prevents
//! the rest of the collection from loading.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PromptError;
use crate::strategy::{ARGUMENTS_KEY, ARGUMENTS_MARKER};
use crate::types::{MessageContent, MessageRole, PromptArgument, PromptMessage, PromptTemplate};

/// Pattern for `$1, $2, ...` positional parameters in Markdown bodies.
static NUMBERED_PARAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("numbered param pattern is valid"));

/// A file-format parser producing a template from raw file content.
pub trait ParseStrategy: Send + Sync {
    /// Extensions (lowercase, with leading dot) this strategy accepts.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse file content into a template. `stem` is the file name without
    /// its extension, used by formats that derive the template name from
    /// the file.
    fn parse(&self, content: &str, stem: &str) -> Result<PromptTemplate, String>;
}

/// JSON prompt files: the template structure is spelled out verbatim.
pub struct JsonParseStrategy;

impl ParseStrategy for JsonParseStrategy {
    fn extensions(&self) -> &'static [&'static str] {
        &[".json"]
    }

    fn parse(&self, content: &str, _stem: &str) -> Result<PromptTemplate, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

/// YAML prompt files: same structure as JSON.
pub struct YamlParseStrategy;

impl ParseStrategy for YamlParseStrategy {
    fn extensions(&self) -> &'static [&'static str] {
        &[".yaml", ".yml"]
    }

    fn parse(&self, content: &str, _stem: &str) -> Result<PromptTemplate, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}

/// Markdown prompt files: the whole document becomes a single user message.
///
/// The template name is the file stem and the description is the first
/// non-empty line with Markdown formatting stripped. A body containing
/// `$ARGUMENTS` declares one optional `arguments` argument; otherwise any
/// `$1, $2, ...` references declare optional numeric-named arguments.
pub struct MarkdownParseStrategy;

impl ParseStrategy for MarkdownParseStrategy {
    fn extensions(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn parse(&self, content: &str, stem: &str) -> Result<PromptTemplate, String> {
        if stem.is_empty() {
            return Err("markdown prompts need a file name to derive the template name".to_string());
        }

        let name = stem.to_string();
        let description = extract_description(content, &name);

        let arguments = if content.contains(ARGUMENTS_MARKER) {
            vec![PromptArgument {
                name: ARGUMENTS_KEY.to_string(),
                description: "Arguments for the prompt".to_string(),
                required: false,
            }]
        } else {
            numbered_arguments(content)
        };

        Ok(PromptTemplate {
            name,
            description,
            arguments,
            messages: vec![PromptMessage {
                role: MessageRole::User,
                content: MessageContent::Text {
                    text: content.trim().to_string(),
                },
            }],
        })
    }
}

/// Collect `$1, $2, ...` references as optional arguments, deduplicated and
/// sorted numerically.
fn numbered_arguments(content: &str) -> Vec<PromptArgument> {
    let mut numbers: Vec<u32> = NUMBERED_PARAM_PATTERN
        .captures_iter(content)
        .filter_map(|capture| capture[1].parse().ok())
        .collect();
    numbers.sort_unstable();
    numbers.dedup();

    numbers
        .into_iter()
        .map(|num| PromptArgument {
            name: num.to_string(),
            description: format!("Parameter {}", num),
            required: false,
        })
        .collect()
}

/// Markdown stripping passes applied to a candidate description line.
static MD_CLEANUP: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let pattern = |p: &str| Regex::new(p).expect("markdown cleanup pattern is valid");
    vec![
        // Headers
        (pattern(r"^#+\s*"), ""),
        // Bold and italics
        (pattern(r"\*\*(.*?)\*\*"), "$1"),
        (pattern(r"__(.*?)__"), "$1"),
        (pattern(r"\*(.*?)\*"), "$1"),
        (pattern(r"_(.*?)_"), "$1"),
        // Inline code
        (pattern(r"`([^`]+)`"), "$1"),
        // Images, then links
        (pattern(r"!\[([^\]]*)\]\([^)]+\)"), "$1"),
        (pattern(r"\[([^\]]+)\]\([^)]+\)"), "$1"),
        // List markers and blockquotes
        (pattern(r"^\s*[-*+]\s+"), ""),
        (pattern(r"^\s*\d+\.\s+"), ""),
        (pattern(r"^>\s*"), ""),
        // Collapse whitespace
        (pattern(r"\s+"), " "),
    ]
});

/// Use the first meaningful line of the document as the description,
/// falling back to the template name.
fn extract_description(content: &str, fallback: &str) -> String {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let cleaned = clean_markdown_line(trimmed);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    fallback.to_string()
}

fn clean_markdown_line(line: &str) -> String {
    let mut text = line.to_string();
    for (pattern, replacement) in MD_CLEANUP.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    text.trim().to_string()
}

/// Registered parse strategies.
static PARSE_STRATEGIES: LazyLock<Vec<Box<dyn ParseStrategy>>> = LazyLock::new(|| {
    vec![
        Box::new(JsonParseStrategy),
        Box::new(YamlParseStrategy),
        Box::new(MarkdownParseStrategy),
    ]
});

/// All file extensions the loader understands.
pub fn supported_extensions() -> Vec<&'static str> {
    PARSE_STRATEGIES
        .iter()
        .flat_map(|strategy| strategy.extensions().iter().copied())
        .collect()
}

fn strategy_for(path: &Path) -> Option<&'static dyn ParseStrategy> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))?;

    PARSE_STRATEGIES
        .iter()
        .find(|strategy| strategy.extensions().contains(&extension.as_str()))
        .map(|boxed| boxed.as_ref())
}

/// Load a single prompt file.
pub fn load_file(path: &Path) -> Result<PromptTemplate, PromptError> {
    let strategy = strategy_for(path).ok_or_else(|| PromptError::Parse {
        path: path.to_path_buf(),
        reason: "unsupported file extension".to_string(),
    })?;

    let content = std::fs::read_to_string(path)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

    let template = strategy
        .parse(&content, stem)
        .and_then(|template| {
            validate_structure(&template)?;
            Ok(template)
        })
        .map_err(|reason| PromptError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;

    Ok(template)
}

/// Structural checks the rest of the pipeline assumes have already passed.
fn validate_structure(template: &PromptTemplate) -> Result<(), String> {
    if template.name.trim().is_empty() {
        return Err("template name must not be empty".to_string());
    }

    for arg in &template.arguments {
        if arg.name.trim().is_empty() {
            return Err("argument names must not be empty".to_string());
        }
    }

    Ok(())
}

/// Load every supported prompt file from the given directories.
///
/// Directories are scanned non-recursively, in deterministic file-name
/// order. Malformed files are logged and skipped; a name collision keeps the
/// first occurrence and warns about the rest.
pub fn load_prompts(dirs: &[PathBuf]) -> Vec<PromptTemplate> {
    let mut prompts: Vec<PromptTemplate> = Vec::new();

    for dir in dirs {
        if !dir.exists() {
            tracing::warn!("Prompt directory {:?} does not exist, skipping", dir);
            continue;
        }

        for entry in walkdir::WalkDir::new(dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || strategy_for(path).is_none() {
                continue;
            }

            match load_file(path) {
                Ok(template) => {
                    if prompts.iter().any(|p| p.name == template.name) {
                        tracing::warn!(
                            "Duplicate prompt name '{}' in {:?}, keeping the first occurrence",
                            template.name,
                            path
                        );
                        continue;
                    }
                    tracing::debug!("Loaded prompt '{}' from {:?}", template.name, path);
                    prompts.push(template);
                }
                Err(e) => {
                    tracing::warn!("Skipping prompt file {:?}: {}", path, e);
                }
            }
        }
    }

    tracing::info!("Loaded {} prompt template(s)", prompts.len());
    prompts
}
