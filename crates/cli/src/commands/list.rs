//! List command handler.
//!
//! Prints the names of every prompt loaded from the configured directories.

use clap::Args;
use promptd_core::{config::AppConfig, AppResult};
use promptd_prompt::PromptRegistry;

/// List all available prompt names
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::debug!("Listing prompts from {:?}", config.prompts_dirs);

        let registry = PromptRegistry::from_dirs(&config.prompts_dirs);
        let names = registry.names();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&names)?);
            return Ok(());
        }

        println!("Available prompts ({}):", names.len());
        for name in names {
            println!("{}", name);
        }

        Ok(())
    }
}
