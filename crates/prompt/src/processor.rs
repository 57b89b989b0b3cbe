//! Template processor.
//!
//! Converts a full template definition plus an argument map into the final
//! ordered list of rendered, role-normalized messages.

use crate::error::PromptError;
use crate::strategy::select_strategy;
use crate::types::{ArgumentMap, MessageContent, PromptTemplate, RenderedMessage, RenderedPrompt};

/// Render a template against an argument map.
///
/// Messages render in declaration order, 1:1. Empty bodies are skipped with
/// a warning; a rendering failure aborts the whole call, since rendering errors
/// are caller errors (bad argument, malformed template logic), not
/// best-effort skips.
///
/// Callers must run [`crate::validate::validate`] first; invoking this on an
/// argument map that failed validation is a programmer error in the
/// orchestrating layer, and this function does not re-check it.
pub fn process(
    template: &PromptTemplate,
    args: &ArgumentMap,
) -> Result<RenderedPrompt, PromptError> {
    tracing::debug!("Processing prompt template '{}'", template.name);

    let description = if template.description.is_empty() {
        format!("Prompt: {}", template.name)
    } else {
        template.description.clone()
    };

    let mut messages = Vec::with_capacity(template.messages.len());
    for (index, message) in template.messages.iter().enumerate() {
        let body = message.content.text();
        if body.is_empty() {
            tracing::warn!(
                "Skipping empty message {} in prompt '{}'",
                index,
                template.name
            );
            continue;
        }

        let strategy = select_strategy(body)?;
        let rendered = strategy.render(body, args).map_err(|e| {
            tracing::error!(
                "Rendering message {} of prompt '{}' failed: {}",
                index,
                template.name,
                e
            );
            e
        })?;

        messages.push(RenderedMessage {
            role: message.role.into(),
            content: MessageContent::Text { text: rendered },
        });
    }

    tracing::debug!(
        "Processed prompt '{}': {} of {} messages rendered",
        template.name,
        messages.len(),
        template.messages.len()
    );

    Ok(RenderedPrompt {
        description,
        messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageRole, PromptArgument, RenderedRole};
    use serde_json::json;
    use std::collections::HashMap;

    fn message(role: MessageRole, body: &str) -> crate::types::PromptMessage {
        crate::types::PromptMessage {
            role,
            content: MessageContent::Text {
                text: body.to_string(),
            },
        }
    }

    fn greet_template(description: &str) -> PromptTemplate {
        PromptTemplate {
            name: "greet".to_string(),
            description: description.to_string(),
            arguments: vec![PromptArgument {
                name: "who".to_string(),
                description: "x".to_string(),
                required: true,
            }],
            messages: vec![message(MessageRole::User, "Hello {{who}}!")],
        }
    }

    #[test]
    fn test_end_to_end_greet() {
        let template = greet_template("");
        let mut args = HashMap::new();
        args.insert("who".to_string(), json!("World"));

        let rendered = process(&template, &args).unwrap();
        assert_eq!(rendered.description, "Prompt: greet");
        assert_eq!(rendered.messages.len(), 1);
        assert_eq!(rendered.messages[0].role, RenderedRole::User);
        assert_eq!(rendered.messages[0].content.text(), "Hello World!");
    }

    #[test]
    fn test_declared_description_is_kept() {
        let template = greet_template("Greets someone");
        let mut args = HashMap::new();
        args.insert("who".to_string(), json!("World"));

        let rendered = process(&template, &args).unwrap();
        assert_eq!(rendered.description, "Greets someone");
    }

    #[test]
    fn test_system_role_collapses_to_user() {
        let template = PromptTemplate {
            name: "roles".to_string(),
            description: "Role check".to_string(),
            arguments: vec![],
            messages: vec![
                message(MessageRole::System, "Be concise."),
                message(MessageRole::User, "Hi."),
                message(MessageRole::Assistant, "Hello."),
            ],
        };

        let rendered = process(&template, &HashMap::new()).unwrap();
        let roles: Vec<RenderedRole> = rendered.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![RenderedRole::User, RenderedRole::User, RenderedRole::Assistant]
        );
    }

    #[test]
    fn test_empty_bodies_are_skipped_not_fatal() {
        let template = PromptTemplate {
            name: "gaps".to_string(),
            description: "Has an empty message".to_string(),
            arguments: vec![],
            messages: vec![
                message(MessageRole::User, "First."),
                message(MessageRole::User, ""),
                message(MessageRole::User, "Last."),
            ],
        };

        let rendered = process(&template, &HashMap::new()).unwrap();
        assert_eq!(rendered.messages.len(), 2);
        assert_eq!(rendered.messages[0].content.text(), "First.");
        assert_eq!(rendered.messages[1].content.text(), "Last.");
    }

    #[test]
    fn test_render_failure_aborts_the_whole_call() {
        let template = PromptTemplate {
            name: "broken".to_string(),
            description: "Second message is malformed".to_string(),
            arguments: vec![],
            messages: vec![
                message(MessageRole::User, "Fine."),
                message(MessageRole::User, "{{#eq a}}unterminated"),
            ],
        };

        let result = process(&template, &HashMap::new());
        assert!(matches!(result, Err(PromptError::Render(_))));
    }

    #[test]
    fn test_ordering_is_preserved() {
        let template = PromptTemplate {
            name: "ordered".to_string(),
            description: "Three messages".to_string(),
            arguments: vec![],
            messages: vec![
                message(MessageRole::User, "one"),
                message(MessageRole::Assistant, "two"),
                message(MessageRole::User, "three"),
            ],
        };

        let rendered = process(&template, &HashMap::new()).unwrap();
        let bodies: Vec<&str> = rendered
            .messages
            .iter()
            .map(|m| m.content.text())
            .collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_mixed_strategies_within_one_template() {
        let template = PromptTemplate {
            name: "mixed".to_string(),
            description: "Legacy and logic bodies side by side".to_string(),
            arguments: vec![],
            messages: vec![
                message(MessageRole::User, "Task: $ARGUMENTS"),
                message(MessageRole::User, "Language: {{language}}"),
            ],
        };

        let mut args = HashMap::new();
        args.insert("arguments".to_string(), json!("review this"));
        args.insert("language".to_string(), json!("Rust"));

        let rendered = process(&template, &args).unwrap();
        assert_eq!(rendered.messages[0].content.text(), "Task: review this");
        assert_eq!(rendered.messages[1].content.text(), "Language: Rust");
    }
}
