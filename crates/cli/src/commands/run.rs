//! Handler for commands generated from prompts.
//!
//! Fills the prompt with the input and streams the model's reply to stdout.

use super::ServiceArgs;
use clap::Parser;
use pp_core::{config::AppConfig, AppResult};
use pp_llm::client_from_config;
use pp_prompt::{read_input, run, ExecuteOptions, PromptDefinition};
use std::io::{IsTerminal, Write};
use std::time::Duration;

/// Run a configured prompt
#[derive(Parser, Debug)]
pub struct RunCommand {
    /// Text for the {pipe} placeholder (default: piped stdin)
    pub input: Option<String>,

    #[command(flatten)]
    pub service: ServiceArgs,
}

impl RunCommand {
    pub async fn execute(&self, config: &AppConfig, def: &PromptDefinition) -> AppResult<()> {
        tracing::info!("Executing prompt '{}'", def.name);
        tracing::debug!("Run options: {:?}", self);

        let config = &self.service.apply(config.clone());
        config.validate()?;

        let input = read_input(self.input.clone())?;
        tracing::debug!("Input: {} bytes", input.len());

        let client = client_from_config(config)?;
        let options = ExecuteOptions {
            dump_path: Some(config.dump_path.clone()),
            timeout: config.timeout_secs.map(Duration::from_secs),
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let result = run(client.as_ref(), def, &input, &options, &mut out).await;

        // Keep the shell prompt off the last line; piped output stays exact
        if out.is_terminal() {
            writeln!(out)?;
        }

        let written = result?;
        tracing::debug!("Streamed {} bytes", written);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_input() {
        let cmd = RunCommand::try_parse_from(["summarize", "hello world"]).unwrap();
        assert_eq!(cmd.input.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_input_optional() {
        let cmd = RunCommand::try_parse_from(["summarize"]).unwrap();
        assert!(cmd.input.is_none());
        assert_eq!(cmd.service, ServiceArgs::default());
    }

    #[test]
    fn test_service_flags_after_command_name() {
        let cmd = RunCommand::try_parse_from([
            "fix", "--timeout", "5", "-p", "ollama", "--endpoint", "http://localhost:8080/v1", "teh text",
        ])
        .unwrap();

        assert_eq!(cmd.input.as_deref(), Some("teh text"));
        assert_eq!(cmd.service.timeout, Some(5));
        assert_eq!(cmd.service.provider.as_deref(), Some("ollama"));
        assert_eq!(
            cmd.service.endpoint.as_deref(),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn test_logging_flags_stay_global_only() {
        assert!(RunCommand::try_parse_from(["fix", "--verbose", "x"]).is_err());
    }
}
