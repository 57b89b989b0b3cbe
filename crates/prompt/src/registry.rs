//! Prompt registry.
//!
//! Owns the in-memory collection of loaded templates. The collection is
//! only ever replaced wholesale: readers take an `Arc` snapshot, so a render
//! in flight during a reload observes either the fully-old or the fully-new
//! set, never a partial one. Templates themselves are immutable once
//! constructed.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::PromptError;
use crate::loader;
use crate::processor;
use crate::types::{ArgumentMap, PromptInfo, PromptTemplate, RenderedPrompt};
use crate::validate;

/// Holder of the currently loaded prompt templates.
///
/// No other component mutates the collection; all writes go through
/// [`PromptRegistry::install`].
pub struct PromptRegistry {
    prompts: RwLock<Arc<Vec<PromptTemplate>>>,
}

impl PromptRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            prompts: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create a registry pre-populated from the given directories.
    pub fn from_dirs(dirs: &[PathBuf]) -> Self {
        let registry = Self::new();
        registry.reload(dirs);
        registry
    }

    /// Replace the collection with a new set of templates, as a unit.
    pub fn install(&self, templates: Vec<PromptTemplate>) {
        let count = templates.len();
        let mut guard = self.prompts.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(templates);
        tracing::info!("Installed {} prompt template(s)", count);
    }

    /// Current snapshot of the loaded collection.
    ///
    /// The snapshot stays valid across later reloads; callers holding it
    /// keep observing the set that was current when they grabbed it.
    pub fn snapshot(&self) -> Arc<Vec<PromptTemplate>> {
        self.prompts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of loaded templates.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Names of all loaded templates, in load order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot().iter().map(|p| p.name.clone()).collect()
    }

    /// Fetch a template by name.
    pub fn get(&self, name: &str) -> Option<PromptTemplate> {
        self.snapshot().iter().find(|p| p.name == name).cloned()
    }

    /// Introspection metadata for one named template.
    pub fn info(&self, name: &str) -> Option<PromptInfo> {
        self.get(name).map(|template| PromptInfo {
            name: template.name.clone(),
            description: template.description.clone(),
            argument_count: template.arguments.len(),
            message_count: template.messages.len(),
            arguments: template.arguments,
        })
    }

    /// Validate and render a template by name.
    ///
    /// Fails with [`PromptError::NotFound`] on a lookup miss, and with
    /// [`PromptError::Validation`] (carrying every missing argument name
    /// and every unbound-reference diagnostic) when the argument map does
    /// not satisfy the template's contract. Rendering is never attempted on
    /// arguments that failed validation.
    pub fn render(&self, name: &str, args: &ArgumentMap) -> Result<RenderedPrompt, PromptError> {
        let snapshot = self.snapshot();
        let template = snapshot
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))?;

        let report = validate::validate(template, args);
        if !report.is_valid {
            return Err(PromptError::Validation {
                missing: report.missing_args,
                errors: report.errors,
            });
        }

        processor::process(template, args)
    }

    /// Reload the collection from the given directories and return the new
    /// template count.
    ///
    /// The freshly loaded set replaces the old one atomically; snapshots
    /// taken before the reload keep observing the old set.
    pub fn reload(&self, dirs: &[PathBuf]) -> usize {
        let templates = loader::load_prompts(dirs);
        let count = templates.len();
        self.install(templates);
        count
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageContent, MessageRole, PromptArgument, PromptMessage};
    use serde_json::json;
    use std::collections::HashMap;

    fn greet(description: &str, body: &str) -> PromptTemplate {
        PromptTemplate {
            name: "greet".to_string(),
            description: description.to_string(),
            arguments: vec![PromptArgument {
                name: "who".to_string(),
                description: "Recipient".to_string(),
                required: true,
            }],
            messages: vec![PromptMessage {
                role: MessageRole::User,
                content: MessageContent::Text {
                    text: body.to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_names_and_lookup() {
        let registry = PromptRegistry::new();
        registry.install(vec![greet("Greets someone", "Hello {{who}}!")]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["greet"]);
        assert!(registry.get("greet").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_info() {
        let registry = PromptRegistry::new();
        registry.install(vec![greet("Greets someone", "Hello {{who}}!")]);

        let info = registry.info("greet").unwrap();
        assert_eq!(info.name, "greet");
        assert_eq!(info.description, "Greets someone");
        assert_eq!(info.argument_count, 1);
        assert_eq!(info.message_count, 1);
        assert_eq!(info.arguments[0].name, "who");
    }

    #[test]
    fn test_render_success() {
        let registry = PromptRegistry::new();
        registry.install(vec![greet("", "Hello {{who}}!")]);

        let mut args = HashMap::new();
        args.insert("who".to_string(), json!("World"));

        let rendered = registry.render("greet", &args).unwrap();
        assert_eq!(rendered.description, "Prompt: greet");
        assert_eq!(rendered.messages[0].content.text(), "Hello World!");
    }

    #[test]
    fn test_render_missing_template() {
        let registry = PromptRegistry::new();
        let result = registry.render("nope", &HashMap::new());
        assert!(matches!(result, Err(PromptError::NotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_render_refuses_invalid_arguments() {
        let registry = PromptRegistry::new();
        registry.install(vec![greet("", "Hello {{who}}!")]);

        let result = registry.render("greet", &HashMap::new());
        match result {
            Err(PromptError::Validation { missing, .. }) => {
                assert_eq!(missing, vec!["who"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_reload_is_atomic_for_held_snapshots() {
        let registry = PromptRegistry::new();
        registry.install(vec![greet("Before reload", "Hello {{who}}!")]);

        let before = registry.snapshot();
        registry.install(vec![greet("After reload", "Hi {{who}}!")]);
        let after = registry.snapshot();

        assert_eq!(before[0].description, "Before reload");
        assert_eq!(after[0].description, "After reload");
        assert_eq!(before[0].messages[0].content.text(), "Hello {{who}}!");
    }

    #[test]
    fn test_install_replaces_wholesale() {
        let registry = PromptRegistry::new();
        registry.install(vec![greet("One", "a {{who}}")]);

        let mut other = greet("Two", "b {{who}}");
        other.name = "other".to_string();
        registry.install(vec![other]);

        assert_eq!(registry.names(), vec!["other"]);
        assert!(registry.get("greet").is_none());
    }
}
