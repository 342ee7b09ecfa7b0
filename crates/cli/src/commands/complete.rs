//! Hidden completion helper used by the installed shell scripts.

use crate::completion::Shell;
use clap::Parser;
use pp_core::AppResult;
use pp_prompt::CommandRegistry;

/// Print command names for shell completion
#[derive(Parser, Debug)]
pub struct CompleteCommand {
    /// Print the completion script for a shell instead of command names
    #[arg(long, value_enum)]
    pub script: Option<Shell>,
}

impl CompleteCommand {
    pub fn execute(&self, registry: &CommandRegistry) -> AppResult<()> {
        match self.script {
            Some(shell) => print!("{}", shell.script()),
            None => {
                for name in registry.list() {
                    println!("{}", name);
                }
            }
        }
        Ok(())
    }
}
