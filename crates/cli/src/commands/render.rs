//! Render command handler.
//!
//! Validates the supplied arguments against the named prompt and prints the
//! rendered messages. Validation failure reports every missing argument and
//! unbound reference at once.

use clap::Args;
use promptd_core::{config::AppConfig, AppResult};
use promptd_prompt::{ArgumentMap, PromptRegistry, RenderedRole};
use serde_json::Value;

/// Render a prompt against supplied arguments
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Name of the prompt to render
    pub name: String,

    /// Argument binding as key=value (repeatable)
    #[arg(short, long = "arg", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("invalid argument '{}', expected key=value", raw))
}

impl RenderCommand {
    /// Execute the render command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let registry = PromptRegistry::from_dirs(&config.prompts_dirs);

        let args: ArgumentMap = self
            .args
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        tracing::debug!("Rendering '{}' with {} argument(s)", self.name, args.len());
        let rendered = registry.render(&self.name, &args)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            return Ok(());
        }

        println!("Description: {}", rendered.description);
        for message in &rendered.messages {
            let role = match message.role {
                RenderedRole::User => "user",
                RenderedRole::Assistant => "assistant",
            };
            println!();
            println!("[{}]", role);
            println!("{}", message.content.text());
        }

        Ok(())
    }
}
