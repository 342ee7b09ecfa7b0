//! pp CLI
//!
//! Main entry point for the `pp` command-line tool. Every prompt declared in
//! `~/.pp/config.toml` becomes a subcommand that fills its template with
//! piped input and streams the model's reply.

mod commands;
mod completion;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use commands::ServiceArgs;
use pp_core::{config::AppConfig, logging, AppError, AppResult};
use pp_prompt::{load_snapshot, CommandRegistry};

/// pp - pipe text into configurable LLM prompts
#[derive(Parser, Debug)]
#[command(name = "pp")]
#[command(about = "Pipe text into configurable LLM prompts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Route>,
}

#[derive(Subcommand, Debug)]
enum Route {
    /// A built-in or prompt command, resolved through the registry
    #[command(external_subcommand)]
    Run(Vec<String>),
}

/// The `pp` command with the registered commands listed in its help.
fn cli_command(registry: &CommandRegistry) -> clap::Command {
    Cli::command().after_help(commands::commands_help(registry))
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Help needs the registry, so it is deferred until prompts are loaded
    let cli = match Cli::try_parse() {
        Ok(cli) => Some(cli),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => None,
        Err(e) => e.exit(),
    };

    let mut config = AppConfig::load()?;
    if let Some(ref cli) = cli {
        config = cli.service.apply(config).with_overrides(
            None,
            None,
            None,
            cli.log_level.clone(),
            cli.verbose,
            cli.no_color,
        );
    }

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Provider: {}", config.provider);

    config.ensure_config_dir()?;

    // Invalid prompts stop the process before anything is dispatched
    let snapshot = load_snapshot(&config.config_file).inspect_err(|e| tracing::error!("{}", e))?;
    let registry = CommandRegistry::build(&snapshot);

    let Some(Route::Run(args)) = cli.and_then(|cli| cli.command) else {
        cli_command(&registry).print_help()?;
        return Ok(());
    };

    let Some(name) = args.first() else {
        return Err(AppError::Other("Missing command name".to_string()));
    };

    let entry = match registry.get(name) {
        Ok(entry) => entry,
        Err(AppError::CommandNotFound(name)) => Cli::command()
            .error(
                ErrorKind::InvalidSubcommand,
                format!("unrecognized command '{}'\n\n{}", name, commands::commands_help(&registry)),
            )
            .exit(),
        Err(e) => return Err(e),
    };

    let _span = tracing::info_span!("command", name = entry.name.as_str()).entered();

    let result = commands::dispatch(entry, &args, &config, &snapshot, &registry).await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_prompt::Snapshot;

    fn registry() -> CommandRegistry {
        let snapshot = Snapshot::from_toml_str(concat!(
            "[summarize]\n",
            "content = \"Summarize: {pipe}\"\n",
            "base_model = \"gpt-4o-mini\"\n",
            "description = \"Summarize text\"\n",
        ))
        .unwrap();
        CommandRegistry::build(&snapshot)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_is_deferred_to_registry() {
        let err = Cli::try_parse_from(["pp", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_help_lists_prompt_commands() {
        let help = cli_command(&registry()).render_help().to_string();

        assert!(help.contains("Commands:"));
        assert!(help.contains("summarize"));
        assert!(help.contains("Summarize text"));
        assert!(help.contains("prompt"));
        assert!(!help.contains("__complete"));
    }

    #[test]
    fn test_global_flags_before_command() {
        let cli = Cli::try_parse_from(["pp", "--timeout", "5", "-v", "summarize", "hi"]).unwrap();

        assert_eq!(cli.service.timeout, Some(5));
        assert!(cli.verbose);
        match cli.command {
            Some(Route::Run(args)) => assert_eq!(args, vec!["summarize", "hi"]),
            other => panic!("Expected external command, got {:?}", other),
        }
    }
}
