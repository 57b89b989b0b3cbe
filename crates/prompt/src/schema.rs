//! Argument schema builder.
//!
//! Derives a per-argument required/optional classifier from a template's
//! declared argument list. The serving boundary uses the schema to shape
//! input validation; `None` tells it to skip input validation entirely.

use std::collections::HashMap;

use crate::types::PromptTemplate;

/// Requirement marker for one declared argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

impl Requirement {
    pub fn is_required(self) -> bool {
        matches!(self, Requirement::Required)
    }
}

/// Build the argument schema for a template.
///
/// Returns `None` when the template declares no arguments, otherwise a map
/// from argument name to its requirement marker. Pure and infallible:
/// malformed argument lists are rejected earlier, by the loader.
pub fn argument_schema(template: &PromptTemplate) -> Option<HashMap<String, Requirement>> {
    if template.arguments.is_empty() {
        return None;
    }

    let schema = template
        .arguments
        .iter()
        .map(|arg| {
            let requirement = if arg.required {
                Requirement::Required
            } else {
                Requirement::Optional
            };
            (arg.name.clone(), requirement)
        })
        .collect();

    Some(schema)
}
