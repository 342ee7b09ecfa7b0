//! Command handlers for the pp CLI.
//!
//! Every invocation is looked up in the [`CommandRegistry`] and routed to
//! the handler its entry names.

pub mod complete;
pub mod prompt;
pub mod run;

// Re-export command types for convenience
pub use complete::CompleteCommand;
pub use prompt::PromptCommand;
pub use run::RunCommand;

use clap::{Args, CommandFactory, FromArgMatches, Parser};
use pp_core::{config::AppConfig, AppResult};
use pp_prompt::{Builtin, CommandEntry, CommandHandler, CommandRegistry, Snapshot};

/// Completion-service flags.
///
/// Accepted before any command name, and again after a prompt command's
/// name (`pp fix --timeout 5 "text"`). Their environment variables are read
/// by [`AppConfig::load`].
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceArgs {
    /// Completion provider (openai, ollama) [env: PP_PROVIDER]
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Provider base URL [env: OPENAI_BASE_URL]
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Abort a response that takes longer than this many seconds [env: PP_TIMEOUT]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl ServiceArgs {
    /// Layer the flags that were given over `config`.
    pub fn apply(&self, config: AppConfig) -> AppConfig {
        config.with_overrides(
            self.provider.clone(),
            self.endpoint.clone(),
            self.timeout,
            None,
            false,
            false,
        )
    }
}

/// Parse an entry's own arguments; `args[0]` is the command name.
///
/// Prints help or a usage error and exits, like any clap parser.
fn parse_entry<T: Parser>(entry: &CommandEntry, args: &[String]) -> T {
    let mut command = T::command().bin_name(format!("pp {}", entry.name));
    if !entry.help_text.is_empty() {
        command = command.about(entry.help_text.clone());
    }
    let matches = command.get_matches_from(args);
    T::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Run the command bound to `entry`.
pub async fn dispatch(
    entry: &CommandEntry,
    args: &[String],
    config: &AppConfig,
    snapshot: &Snapshot,
    registry: &CommandRegistry,
) -> AppResult<()> {
    match &entry.handler {
        CommandHandler::Builtin(Builtin::PromptGroup) => {
            parse_entry::<PromptCommand>(entry, args).execute(config, snapshot)
        }
        CommandHandler::Builtin(Builtin::Complete) => {
            parse_entry::<CompleteCommand>(entry, args).execute(registry)
        }
        CommandHandler::Prompt(def) => {
            parse_entry::<RunCommand>(entry, args)
                .execute(config, def)
                .await
        }
    }
}

/// Aligned "name  help" lines for the visible commands.
pub fn commands_help(registry: &CommandRegistry) -> String {
    let width = registry
        .visible()
        .map(|entry| entry.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut help = String::from("Commands:\n");
    for entry in registry.visible() {
        help.push_str(&format!("  {:<width$}  {}\n", entry.name, entry.help_text));
    }
    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_prompt::RawPrompt;

    #[test]
    fn test_commands_help_lists_visible_sorted() {
        let raw = RawPrompt {
            content: Some("{pipe}".to_string()),
            base_model: Some("m".to_string()),
            description: Some("Fix grammar".to_string()),
            ..RawPrompt::default()
        };
        let snapshot = Snapshot::from_entries(vec![("fix", raw)]).unwrap();
        let registry = CommandRegistry::build(&snapshot);

        let help = commands_help(&registry);
        let lines: Vec<_> = help.lines().collect();
        assert_eq!(lines[0], "Commands:");
        assert_eq!(lines[1], "  fix     Fix grammar");
        assert!(lines[2].starts_with("  prompt  "));
        assert!(!help.contains("__complete"));
    }

    #[test]
    fn test_service_args_override_config() {
        let config = AppConfig {
            timeout_secs: Some(30),
            ..AppConfig::default()
        };
        let args = ServiceArgs {
            provider: Some("ollama".to_string()),
            endpoint: None,
            timeout: Some(5),
        };

        let config = args.apply(config);
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.timeout_secs, Some(5));
        assert!(config.endpoint.is_none());

        let untouched = ServiceArgs::default().apply(config.clone());
        assert_eq!(untouched.provider, config.provider);
        assert_eq!(untouched.timeout_secs, config.timeout_secs);
        assert_eq!(untouched.log_level, config.log_level);
    }
}
