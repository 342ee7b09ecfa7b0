//! Prompt types for pp.
//!
//! This module defines the domain entities for declared prompts.

use serde::Deserialize;

/// The only placeholder name a template may use; replaced by piped input.
pub const PIPE_PLACEHOLDER: &str = "pipe";

/// The placeholder as it appears in a template.
pub const PIPE_TOKEN: &str = "{pipe}";

/// One prompt entry exactly as declared in the configuration file.
///
/// Every field is optional so that "absent" can be told apart from
/// "present but empty" during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPrompt {
    /// Template text
    pub content: Option<String>,

    /// Target model
    pub base_model: Option<String>,

    /// Alias of `base_model`
    pub model: Option<String>,

    /// Help text shown in listings
    pub description: Option<String>,

    /// Defaults to true when absent
    pub enabled: Option<bool>,

    /// Legacy execution mode; accepted but never run
    pub command: Option<String>,
}

impl RawPrompt {
    /// The declared model, preferring `base_model` over its alias.
    pub fn declared_model(&self) -> Option<&str> {
        self.base_model.as_deref().or(self.model.as_deref())
    }
}

/// A named prompt ready to be registered as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDefinition {
    /// Unique name; also the CLI command name
    pub name: String,

    /// Template, possibly containing `{pipe}`
    pub content: String,

    /// Target model; only guaranteed present on enabled prompts
    pub model: Option<String>,

    /// Free-text description, empty when not declared
    pub description: String,

    /// Whether the prompt is runnable
    pub enabled: bool,
}

impl PromptDefinition {
    /// Build a definition from its raw declaration, applying defaults.
    pub fn from_raw(name: impl Into<String>, raw: &RawPrompt) -> Self {
        Self {
            name: name.into(),
            content: raw.content.clone().unwrap_or_default(),
            model: raw.declared_model().map(str::to_string),
            description: raw.description.clone().unwrap_or_default(),
            enabled: raw.enabled.unwrap_or(true),
        }
    }
}
