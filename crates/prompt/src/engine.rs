//! Handlebars engine configuration.
//!
//! One process-wide registry, built once on first use, carrying the fixed
//! helper table the logic-enabled rendering strategy depends on: `eq`,
//! `eqIgnoreCase`, `neq`, `in`, `inIgnoreCase`, `startsWith`, and `raw`.
//! The registry is immutable after construction.

use std::sync::LazyLock;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonRender, Output, RenderContext,
    RenderErrorReason, Renderable,
};
use serde_json::Value;

use crate::types::ArgumentMap;

static ENGINE: LazyLock<Handlebars<'static>> = LazyLock::new(build_engine);

/// Render a template body against an argument map.
///
/// Missing variables render as empty strings; compile and evaluation
/// failures surface as errors.
pub(crate) fn render(body: &str, args: &ArgumentMap) -> Result<String, handlebars::RenderError> {
    ENGINE.render_template(body, args)
}

fn build_engine() -> Handlebars<'static> {
    let mut engine = Handlebars::new();

    // Prompt bodies are plain text, not HTML
    engine.register_escape_fn(handlebars::no_escape);

    engine.register_helper("eq", Box::new(EqHelper));
    engine.register_helper("eqIgnoreCase", Box::new(EqIgnoreCaseHelper));
    engine.register_helper("neq", Box::new(NeqHelper));
    engine.register_helper("in", Box::new(InHelper));
    engine.register_helper("inIgnoreCase", Box::new(InIgnoreCaseHelper));
    engine.register_helper("startsWith", Box::new(StartsWithHelper));
    engine.register_helper("raw", Box::new(RawHelper));

    tracing::debug!(
        "Handlebars engine initialized with helpers: eq, eqIgnoreCase, neq, in, inIgnoreCase, startsWith, raw"
    );
    engine
}

/// Render the main or inverse block of a conditional helper.
fn render_branch<'reg: 'rc, 'rc>(
    truthy: bool,
    h: &Helper<'rc>,
    r: &'reg Handlebars<'reg>,
    ctx: &'rc Context,
    rc: &mut RenderContext<'reg, 'rc>,
    out: &mut dyn Output,
) -> HelperResult {
    let branch = if truthy { h.template() } else { h.inverse() };
    match branch {
        Some(t) => t.render(r, ctx, rc, out),
        None => Ok(()),
    }
}

fn param_value<'a>(
    h: &'a Helper<'_>,
    helper_name: &'static str,
    index: usize,
) -> Result<&'a Value, RenderErrorReason> {
    h.param(index)
        .map(|p| p.value())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper_name, index))
}

/// Interpret a collection parameter: either a literal array or a string the
/// engine parses as a JSON array.
fn collection_items(
    collection: &Value,
    helper_name: &'static str,
) -> Result<Vec<Value>, RenderErrorReason> {
    match collection {
        Value::Array(items) => Ok(items.clone()),
        Value::String(raw) => serde_json::from_str(raw).map_err(|e| {
            RenderErrorReason::Other(format!(
                "{}: collection is not a JSON array: {}",
                helper_name, e
            ))
        }),
        other => Err(RenderErrorReason::Other(format!(
            "{}: expected an array or a JSON array string, got {}",
            helper_name, other
        ))),
    }
}

/// `{{#eq a b}}yes{{else}}no{{/eq}}`: exact equality.
struct EqHelper;

impl HelperDef for EqHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let a = param_value(h, "eq", 0)?;
        let b = param_value(h, "eq", 1)?;
        render_branch(a == b, h, r, ctx, rc, out)
    }
}

/// `{{#eqIgnoreCase a b}}`: case-insensitive comparison of the operands'
/// string forms.
struct EqIgnoreCaseHelper;

impl HelperDef for EqIgnoreCaseHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let a = param_value(h, "eqIgnoreCase", 0)?;
        let b = param_value(h, "eqIgnoreCase", 1)?;
        let truthy = a.render().to_lowercase() == b.render().to_lowercase();
        render_branch(truthy, h, r, ctx, rc, out)
    }
}

/// `{{#neq a b}}`: exact inequality.
struct NeqHelper;

impl HelperDef for NeqHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let a = param_value(h, "neq", 0)?;
        let b = param_value(h, "neq", 1)?;
        render_branch(a != b, h, r, ctx, rc, out)
    }
}

/// `{{#in val collection}}`: membership test.
struct InHelper;

impl HelperDef for InHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let val = param_value(h, "in", 0)?;
        let collection = param_value(h, "in", 1)?;
        let items = collection_items(collection, "in")?;
        render_branch(items.contains(val), h, r, ctx, rc, out)
    }
}

/// `{{#inIgnoreCase val collection}}`: case-insensitive membership test.
struct InIgnoreCaseHelper;

impl HelperDef for InIgnoreCaseHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let val = param_value(h, "inIgnoreCase", 0)?;
        let collection = param_value(h, "inIgnoreCase", 1)?;
        let items = collection_items(collection, "inIgnoreCase")?;
        let needle = val.render().to_lowercase();
        let truthy = items
            .iter()
            .any(|item| item.render().to_lowercase() == needle);
        render_branch(truthy, h, r, ctx, rc, out)
    }
}

/// `{{#startsWith str prefix}}`: string-prefix test. Non-string operands
/// take the inverse branch rather than erroring.
struct StartsWithHelper;

impl HelperDef for StartsWithHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let a = param_value(h, "startsWith", 0)?;
        let b = param_value(h, "startsWith", 1)?;
        let truthy = match (a.as_str(), b.as_str()) {
            (Some(s), Some(prefix)) => s.starts_with(prefix),
            _ => false,
        };
        render_branch(truthy, h, r, ctx, rc, out)
    }
}

/// `{{{{raw}}}}...{{{{/raw}}}}`: emits the enclosed block verbatim, without
/// evaluation.
struct RawHelper;

impl HelperDef for RawHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match h.template() {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}
