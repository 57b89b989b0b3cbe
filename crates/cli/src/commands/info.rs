//! Info command handler.
//!
//! Prints the metadata of one named prompt: description, argument count and
//! list, message count.

use clap::Args;
use promptd_core::{config::AppConfig, AppError, AppResult};
use promptd_prompt::PromptRegistry;

/// Show metadata for one prompt
#[derive(Args, Debug)]
pub struct InfoCommand {
    /// Name of the prompt to inspect
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InfoCommand {
    /// Execute the info command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let registry = PromptRegistry::from_dirs(&config.prompts_dirs);

        let info = registry
            .info(&self.name)
            .ok_or_else(|| AppError::Prompt(format!("prompt '{}' not found", self.name)))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }

        println!("Name: {}", info.name);
        println!("Description: {}", info.description);
        println!("Arguments: {}", info.argument_count);
        println!("Messages: {}", info.message_count);

        if !info.arguments.is_empty() {
            println!();
            println!("Argument list:");
            for arg in &info.arguments {
                let requirement = if arg.required { "required" } else { "optional" };
                println!("  - {}: {} ({})", arg.name, arg.description, requirement);
            }
        }

        Ok(())
    }
}
