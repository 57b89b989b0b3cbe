//! Argument validation.
//!
//! Checks a caller's argument map against a template before rendering is
//! attempted. Validation never short-circuits: every missing required
//! argument and every unbound variable reference is collected so the caller
//! gets the complete picture in one round trip.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::strategy::{LegacyArgumentsStrategy, RenderStrategy};
use crate::types::{ArgumentMap, PromptTemplate, ValidationReport};

/// Pattern for `{{name}}` variable references in message bodies.
static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("variable pattern is valid"));

/// Validate an argument map against a template.
///
/// Two independent checks:
/// - every argument declared `required` must be present with a non-null
///   value; misses are reported in declaration order;
/// - every `{{name}}` reference in a message body must be either supplied in
///   the map or declared as an argument (caller-supplied-but-undeclared
///   values are tolerated).
///
/// The reference diagnostics are advisory: whether they are warnings or hard
/// failures is the caller's policy choice. This function only reports.
pub fn validate(template: &PromptTemplate, args: &ArgumentMap) -> ValidationReport {
    let missing_args = missing_required_arguments(template, args);
    let errors = unbound_variable_errors(template, args);

    let is_valid = missing_args.is_empty() && errors.is_empty();
    if is_valid {
        tracing::debug!("Validation passed for prompt '{}'", template.name);
    } else {
        tracing::warn!(
            "Validation failed for prompt '{}': missing [{}], {} unbound reference(s)",
            template.name,
            missing_args.join(", "),
            errors.len()
        );
    }

    ValidationReport {
        is_valid,
        missing_args,
        errors,
    }
}

/// Collect every declared-required argument absent from the map.
fn missing_required_arguments(template: &PromptTemplate, args: &ArgumentMap) -> Vec<String> {
    template
        .arguments
        .iter()
        .filter(|arg| arg.required && is_argument_missing(args, &arg.name))
        .map(|arg| arg.name.clone())
        .collect()
}

fn is_argument_missing(args: &ArgumentMap, name: &str) -> bool {
    match args.get(name) {
        None => true,
        Some(value) => value.is_null(),
    }
}

/// Scan message bodies for `{{name}}` references with no binding and no
/// declaration.
///
/// Bodies handled by the legacy `$ARGUMENTS` strategy are not scanned: the
/// marker is not a `{{name}}` reference. Each unbound name is reported once.
fn unbound_variable_errors(template: &PromptTemplate, args: &ArgumentMap) -> Vec<String> {
    let legacy = LegacyArgumentsStrategy;
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for message in &template.messages {
        let body = message.content.text();
        if legacy.applies(body) {
            continue;
        }

        for reference in extract_variables(body) {
            if !seen.insert(reference.clone()) {
                continue;
            }

            let supplied = args.contains_key(&reference);
            let declared = template.arguments.iter().any(|arg| arg.name == reference);
            if !supplied && !declared {
                errors.push(format!(
                    "no argument declared for template variable '{}'",
                    reference
                ));
            }
        }
    }

    errors
}

/// Extract `{{name}}` variable references from a body, deduplicated, in
/// order of first appearance.
pub fn extract_variables(body: &str) -> Vec<String> {
    let mut variables = Vec::new();
    for capture in VARIABLE_PATTERN.captures_iter(body) {
        let name = capture[1].to_string();
        if !variables.contains(&name) {
            variables.push(name);
        }
    }
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageContent, MessageRole, PromptArgument, PromptMessage};
    use serde_json::json;
    use std::collections::HashMap;

    fn argument(name: &str, required: bool) -> PromptArgument {
        PromptArgument {
            name: name.to_string(),
            description: format!("{} argument", name),
            required,
        }
    }

    fn user_message(body: &str) -> PromptMessage {
        PromptMessage {
            role: MessageRole::User,
            content: MessageContent::Text {
                text: body.to_string(),
            },
        }
    }

    fn template(arguments: Vec<PromptArgument>, bodies: &[&str]) -> PromptTemplate {
        PromptTemplate {
            name: "test".to_string(),
            description: "Test".to_string(),
            arguments,
            messages: bodies.iter().map(|b| user_message(b)).collect(),
        }
    }

    #[test]
    fn test_all_missing_required_reported_in_declaration_order() {
        let t = template(
            vec![
                argument("alpha", true),
                argument("beta", false),
                argument("gamma", true),
            ],
            &["{{alpha}} {{beta}} {{gamma}}"],
        );

        let report = validate(&t, &HashMap::new());
        assert!(!report.is_valid);
        assert_eq!(report.missing_args, vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let t = template(vec![argument("who", true)], &["Hello {{who}}"]);
        let mut args = HashMap::new();
        args.insert("who".to_string(), json!(null));

        let report = validate(&t, &args);
        assert_eq!(report.missing_args, vec!["who"]);
    }

    #[test]
    fn test_valid_when_required_supplied() {
        let t = template(vec![argument("who", true)], &["Hello {{who}}"]);
        let mut args = HashMap::new();
        args.insert("who".to_string(), json!("World"));

        let report = validate(&t, &args);
        assert!(report.is_valid);
        assert!(report.missing_args.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_unbound_reference_is_flagged() {
        let t = template(vec![], &["Hello {{nobody}}"]);
        let report = validate(&t, &HashMap::new());

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("nobody"));
    }

    #[test]
    fn test_declared_but_unsupplied_is_not_flagged() {
        // An optional declared argument may be absent; the engine renders it
        // as an empty string.
        let t = template(vec![argument("tone", false)], &["Be {{tone}}"]);
        let report = validate(&t, &HashMap::new());
        assert!(report.is_valid);
    }

    #[test]
    fn test_supplied_but_undeclared_is_tolerated() {
        let t = template(vec![], &["Hello {{extra}}"]);
        let mut args = HashMap::new();
        args.insert("extra".to_string(), json!("value"));

        let report = validate(&t, &args);
        assert!(report.is_valid);
    }

    #[test]
    fn test_legacy_bodies_are_not_scanned() {
        let t = template(vec![], &["Summarize: $ARGUMENTS with {{style}}"]);
        let report = validate(&t, &HashMap::new());
        assert!(report.is_valid);
    }

    #[test]
    fn test_duplicate_references_reported_once() {
        let t = template(vec![], &["{{ghost}} and {{ghost}}", "{{ghost}} again"]);
        let report = validate(&t, &HashMap::new());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_extract_variables_order_and_dedup() {
        let vars = extract_variables("{{b}} {{a}} {{b}} {{c}}");
        assert_eq!(vars, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_both_lists_computed_together() {
        let t = template(vec![argument("who", true)], &["{{who}} meets {{ghost}}"]);
        let report = validate(&t, &HashMap::new());

        assert!(!report.is_valid);
        assert_eq!(report.missing_args, vec!["who"]);
        assert_eq!(report.errors.len(), 1);
    }
}
