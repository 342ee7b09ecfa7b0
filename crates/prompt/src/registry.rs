//! Command registry: built-in commands merged with one command per prompt.

use crate::loader::load_snapshot;
use crate::snapshot::Snapshot;
use crate::types::PromptDefinition;
use pp_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Name of the prompt-management group (`prompt list`, `prompt update`).
pub const PROMPT_GROUP: &str = "prompt";

/// Name of the hidden helper used by installed shell completion.
pub const COMPLETE: &str = "__complete";

/// Commands that exist regardless of configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Prompt management group
    PromptGroup,
    /// Completion helper
    Complete,
}

impl Builtin {
    /// Every built-in, in registration order.
    pub const ALL: [Builtin; 2] = [Builtin::PromptGroup, Builtin::Complete];

    pub fn name(&self) -> &'static str {
        match self {
            Self::PromptGroup => PROMPT_GROUP,
            Self::Complete => COMPLETE,
        }
    }

    pub fn help_text(&self) -> &'static str {
        match self {
            Self::PromptGroup => "List prompts and refresh shell completion",
            Self::Complete => "Print command names for shell completion",
        }
    }

    pub fn hidden(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// What runs when a command is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandHandler {
    /// A built-in handled by the CLI host
    Builtin(Builtin),
    /// The execution pipeline bound to a prompt
    Prompt(Arc<PromptDefinition>),
}

/// A dispatchable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub help_text: String,
    /// Excluded from listings, still reachable by exact name
    pub hidden: bool,
    pub handler: CommandHandler,
}

impl CommandEntry {
    fn builtin(builtin: Builtin) -> Self {
        Self {
            name: builtin.name().to_string(),
            help_text: builtin.help_text().to_string(),
            hidden: builtin.hidden(),
            handler: CommandHandler::Builtin(builtin),
        }
    }

    fn prompt(def: &Arc<PromptDefinition>) -> Self {
        Self {
            name: def.name.clone(),
            help_text: def.description.clone(),
            hidden: false,
            handler: CommandHandler::Prompt(Arc::clone(def)),
        }
    }
}

/// Dispatch table built once from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRegistry {
    entries: BTreeMap<String, CommandEntry>,
}

impl CommandRegistry {
    /// Register the built-ins, then one command per enabled prompt.
    ///
    /// A prompt named like a built-in is skipped; the built-in stays.
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut entries: BTreeMap<String, CommandEntry> = Builtin::ALL
            .iter()
            .map(|builtin| (builtin.name().to_string(), CommandEntry::builtin(*builtin)))
            .collect();

        for def in snapshot.enabled() {
            if entries.contains_key(&def.name) {
                tracing::warn!(
                    "Prompt '{}' clashes with a built-in command and is not registered",
                    def.name
                );
                continue;
            }
            entries.insert(def.name.clone(), CommandEntry::prompt(def));
        }

        tracing::debug!("Registered {} commands", entries.len());
        Self { entries }
    }

    /// Look up a command by exact name, hidden ones included.
    pub fn get(&self, name: &str) -> AppResult<&CommandEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| AppError::CommandNotFound(name.to_string()))
    }

    /// Visible command names, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.visible().map(|entry| entry.name.as_str()).collect()
    }

    /// Visible entries, sorted by name.
    pub fn visible(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values().filter(|entry| !entry.hidden)
    }

    /// Number of commands bound to prompts.
    pub fn prompt_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry.handler, CommandHandler::Prompt(_)))
            .count()
    }
}

/// Capability that wires `pp` completion into the user's shell.
pub trait CompletionInstaller {
    fn install(&self) -> std::io::Result<()>;
}

/// Reload prompts from disk into a new snapshot and registry, then
/// reinstall shell completion.
pub fn update(
    config_file: &Path,
    installer: &dyn CompletionInstaller,
) -> AppResult<(Snapshot, CommandRegistry)> {
    let snapshot = load_snapshot(config_file)?;
    let registry = CommandRegistry::build(&snapshot);
    installer.install()?;
    Ok((snapshot, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawPrompt;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn prompt(description: &str) -> RawPrompt {
        RawPrompt {
            content: Some("{pipe}".to_string()),
            base_model: Some("m".to_string()),
            description: Some(description.to_string()),
            ..RawPrompt::default()
        }
    }

    fn snapshot() -> Snapshot {
        let off = RawPrompt {
            enabled: Some(false),
            ..RawPrompt::default()
        };
        Snapshot::from_entries(vec![
            ("summarize", prompt("Summarize text")),
            ("fix", prompt("Fix grammar")),
            ("draft", off),
        ])
        .unwrap()
    }

    #[test]
    fn test_builtins_always_present() {
        let registry = CommandRegistry::build(&Snapshot::empty());
        assert_eq!(registry.list(), vec![PROMPT_GROUP]);
        assert_eq!(registry.prompt_count(), 0);
        assert!(registry.get(COMPLETE).unwrap().hidden);
    }

    #[test]
    fn test_one_command_per_enabled_prompt() {
        let registry = CommandRegistry::build(&snapshot());
        assert_eq!(registry.list(), vec!["fix", PROMPT_GROUP, "summarize"]);
        assert_eq!(registry.prompt_count(), 2);

        let entry = registry.get("summarize").unwrap();
        assert_eq!(entry.help_text, "Summarize text");
        assert!(!entry.hidden);
        match &entry.handler {
            CommandHandler::Prompt(def) => assert_eq!(def.name, "summarize"),
            other => panic!("Expected prompt handler, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_and_unknown_not_found() {
        let registry = CommandRegistry::build(&snapshot());
        assert!(matches!(
            registry.get("draft"),
            Err(AppError::CommandNotFound(ref name)) if name == "draft"
        ));
        assert!(matches!(
            registry.get("nope"),
            Err(AppError::CommandNotFound(_))
        ));
    }

    #[test]
    fn test_builtin_wins_collision() {
        let snapshot = Snapshot::from_entries(vec![
            (PROMPT_GROUP, prompt("shadow")),
            (COMPLETE, prompt("shadow")),
            ("list", prompt("a prompt called list")),
        ])
        .unwrap();
        let registry = CommandRegistry::build(&snapshot);

        let group = registry.get(PROMPT_GROUP).unwrap();
        assert_eq!(group.handler, CommandHandler::Builtin(Builtin::PromptGroup));
        assert_eq!(
            registry.get(COMPLETE).unwrap().handler,
            CommandHandler::Builtin(Builtin::Complete)
        );
        assert!(matches!(
            registry.get("list").unwrap().handler,
            CommandHandler::Prompt(_)
        ));
        assert_eq!(registry.prompt_count(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let snapshot = snapshot();
        let first = CommandRegistry::build(&snapshot);
        let second = CommandRegistry::build(&snapshot);

        assert_eq!(first.list(), second.list());
        let attrs = |r: &CommandRegistry| -> Vec<(String, String, bool)> {
            r.entries
                .values()
                .map(|e| (e.name.clone(), e.help_text.clone(), e.hidden))
                .collect()
        };
        assert_eq!(attrs(&first), attrs(&second));
        assert_eq!(first, second);
    }

    struct CountingInstaller(Cell<usize>);

    impl CompletionInstaller for CountingInstaller {
        fn install(&self) -> std::io::Result<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_update_rebuilds_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let installer = CountingInstaller(Cell::new(0));

        let (_, before) = update(&path, &installer).unwrap();
        assert_eq!(before.prompt_count(), 0);

        std::fs::write(&path, "[fix]\ncontent = \"{pipe}\"\nbase_model = \"m\"\n").unwrap();
        let (snapshot, after) = update(&path, &installer).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(after.list(), vec!["fix", PROMPT_GROUP]);
        assert_eq!(installer.0.get(), 2);
    }

    #[test]
    fn test_update_stops_on_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[bad]\ncontent = \"{x}\"\nbase_model = \"m\"\n").unwrap();
        let installer = CountingInstaller(Cell::new(0));

        assert!(update(&path, &installer).is_err());
        assert_eq!(installer.0.get(), 0);
    }
}
