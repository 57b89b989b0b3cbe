//! Template rendering strategies.
//!
//! Each strategy declares whether it can process a raw message body and, if
//! so, renders it against an argument map. Strategies are tried in a fixed
//! precedence order: the legacy `$ARGUMENTS` style first, then the
//! Handlebars catch-all. Precedence lives in code, not configuration:
//! `$ARGUMENTS` bodies would otherwise be mis-parsed as an unresolvable bare
//! variable by the default engine.

use std::sync::LazyLock;

use crate::engine;
use crate::error::PromptError;
use crate::types::ArgumentMap;

/// Marker sequence that selects the legacy single-placeholder strategy.
pub const ARGUMENTS_MARKER: &str = "$ARGUMENTS";

/// Conventional argument key read by the legacy strategy.
pub const ARGUMENTS_KEY: &str = "arguments";

/// Instructional text substituted when no value is bound for the marker.
const MISSING_ARGUMENTS_FALLBACK: &str =
    "$ARGUMENTS (The user did not provide input. Ask the user for the value, or infer it and fill it in.)";

/// A self-contained rendering algorithm.
///
/// `render` is only ever invoked after `applies` returned true for the same
/// body.
pub trait RenderStrategy: Send + Sync {
    /// Whether this strategy can process the given raw body.
    fn applies(&self, body: &str) -> bool;

    /// Render the body against the argument map.
    fn render(&self, body: &str, args: &ArgumentMap) -> Result<String, PromptError>;
}

/// Legacy single-placeholder strategy.
///
/// Replaces every `$ARGUMENTS` occurrence with the value bound under the
/// `arguments` key. A missing value is not an error: it degrades to an
/// instructional placeholder asking for the input. Never errors.
pub struct LegacyArgumentsStrategy;

impl RenderStrategy for LegacyArgumentsStrategy {
    fn applies(&self, body: &str) -> bool {
        body.contains(ARGUMENTS_MARKER)
    }

    fn render(&self, body: &str, args: &ArgumentMap) -> Result<String, PromptError> {
        let value = match args.get(ARGUMENTS_KEY) {
            Some(value) if !value.is_null() => value_to_text(value),
            _ => MISSING_ARGUMENTS_FALLBACK.to_string(),
        };

        tracing::debug!("Substituting {} with {:?}", ARGUMENTS_MARKER, value);
        Ok(body.replace(ARGUMENTS_MARKER, &value))
    }
}

fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Logic-enabled strategy backed by the shared Handlebars engine.
///
/// Catch-all: must stay last in the strategy list.
pub struct HandlebarsStrategy;

impl RenderStrategy for HandlebarsStrategy {
    fn applies(&self, _body: &str) -> bool {
        true
    }

    fn render(&self, body: &str, args: &ArgumentMap) -> Result<String, PromptError> {
        engine::render(body, args).map_err(|e| {
            tracing::error!("Handlebars rendering failed: {}", e);
            PromptError::Render(e)
        })
    }
}

/// Registered strategies, in precedence order.
static STRATEGIES: LazyLock<Vec<Box<dyn RenderStrategy>>> = LazyLock::new(|| {
    vec![
        Box::new(LegacyArgumentsStrategy),
        Box::new(HandlebarsStrategy),
    ]
});

/// Pick the first strategy whose `applies` accepts the body.
///
/// The strategy list is open for extension, so the miss case is a genuine
/// fail-fast check even though the shipped set ends in a catch-all.
pub fn select_strategy(body: &str) -> Result<&'static dyn RenderStrategy, PromptError> {
    STRATEGIES
        .iter()
        .find(|strategy| strategy.applies(body))
        .map(|boxed| boxed.as_ref())
        .ok_or(PromptError::NoStrategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn args_with(key: &str, value: serde_json::Value) -> ArgumentMap {
        let mut args = HashMap::new();
        args.insert(key.to_string(), value);
        args
    }

    #[test]
    fn test_legacy_applies_only_to_marker_bodies() {
        let legacy = LegacyArgumentsStrategy;
        assert!(legacy.applies("Summarize: $ARGUMENTS"));
        assert!(!legacy.applies("Summarize: {{input}}"));
    }

    #[test]
    fn test_handlebars_is_catch_all() {
        let handlebars = HandlebarsStrategy;
        assert!(handlebars.applies("anything at all"));
        assert!(handlebars.applies(""));
    }

    #[test]
    fn test_legacy_substitution() {
        let legacy = LegacyArgumentsStrategy;
        let result = legacy
            .render(
                "Summarize: $ARGUMENTS",
                &args_with(ARGUMENTS_KEY, json!("the report")),
            )
            .unwrap();
        assert_eq!(result, "Summarize: the report");
    }

    #[test]
    fn test_legacy_replaces_every_occurrence() {
        let legacy = LegacyArgumentsStrategy;
        let result = legacy
            .render(
                "$ARGUMENTS and again: $ARGUMENTS",
                &args_with(ARGUMENTS_KEY, json!("x")),
            )
            .unwrap();
        assert_eq!(result, "x and again: x");
    }

    #[test]
    fn test_legacy_fallback_when_unbound() {
        let legacy = LegacyArgumentsStrategy;
        let result = legacy
            .render("Summarize: $ARGUMENTS", &HashMap::new())
            .unwrap();
        assert_eq!(
            result,
            "Summarize: $ARGUMENTS (The user did not provide input. Ask the user for the value, or infer it and fill it in.)"
        );
    }

    #[test]
    fn test_legacy_treats_null_as_unbound() {
        let legacy = LegacyArgumentsStrategy;
        let result = legacy
            .render("$ARGUMENTS", &args_with(ARGUMENTS_KEY, json!(null)))
            .unwrap();
        assert!(result.contains("The user did not provide input"));
    }

    #[test]
    fn test_selector_precedence() {
        // A marker body goes to the legacy strategy even though the
        // catch-all would also accept it.
        let strategy = select_strategy("Do it: $ARGUMENTS").unwrap();
        let rendered = strategy
            .render("Do it: $ARGUMENTS", &args_with(ARGUMENTS_KEY, json!("now")))
            .unwrap();
        assert_eq!(rendered, "Do it: now");
    }

    #[test]
    fn test_selector_falls_back_to_handlebars() {
        let strategy = select_strategy("Hello {{who}}").unwrap();
        let rendered = strategy
            .render("Hello {{who}}", &args_with("who", json!("World")))
            .unwrap();
        assert_eq!(rendered, "Hello World");
    }

    #[test]
    fn test_plain_body_renders_unchanged_and_idempotent() {
        let body = "No placeholders here.";
        let strategy = select_strategy(body).unwrap();
        let args = HashMap::new();

        let once = strategy.render(body, &args).unwrap();
        assert_eq!(once, body);

        let twice = strategy.render(&once, &args).unwrap();
        assert_eq!(twice, once);
    }
}
