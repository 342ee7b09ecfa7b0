//! Prompt management command handler.
//!
//! Handles `pp prompt list` and `pp prompt update`.

use crate::completion::ShellCompletionInstaller;
use clap::{Args, Parser, Subcommand};
use pp_core::{config::AppConfig, AppResult};
use pp_prompt::{render, Snapshot};

/// List prompts and refresh shell completion
#[derive(Parser, Debug)]
pub struct PromptCommand {
    #[command(subcommand)]
    pub action: PromptAction,
}

#[derive(Subcommand, Debug)]
pub enum PromptAction {
    /// List configured prompts
    List(PromptListCommand),
    /// Reload prompts and (re)install shell completion
    Update,
}

/// List configured prompts
#[derive(Args, Debug)]
pub struct PromptListCommand {
    /// Show descriptions next to names
    #[arg(short, long)]
    pub long: bool,
}

impl PromptCommand {
    pub fn execute(&self, config: &AppConfig, snapshot: &Snapshot) -> AppResult<()> {
        match &self.action {
            PromptAction::List(cmd) => cmd.execute(snapshot),
            PromptAction::Update => self.update(config),
        }
    }

    fn update(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Reloading prompts from {:?}", config.config_file);

        let installer = ShellCompletionInstaller::from_env();
        let (snapshot, registry) = pp_prompt::update(&config.config_file, &installer)?;

        println!(
            "Loaded {} prompts ({} runnable) from {}",
            snapshot.len(),
            registry.prompt_count(),
            config.config_file.display()
        );
        println!("Command completion updated successfully");

        Ok(())
    }
}

impl PromptListCommand {
    pub fn execute(&self, snapshot: &Snapshot) -> AppResult<()> {
        tracing::debug!("Listing prompts (long: {})", self.long);

        for line in render(snapshot, self.long) {
            println!("{}", line);
        }

        Ok(())
    }
}
