//! Immutable, validated view of every declared prompt.

use crate::types::{PromptDefinition, RawPrompt};
use crate::validator::validate;
use pp_core::{AppResult, ValidationError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Point-in-time materialization of the prompt declarations.
///
/// Every enabled prompt held by a snapshot has passed validation; the only
/// way to build one is through [`Snapshot::from_entries`] or its wrappers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    prompts: BTreeMap<String, Arc<PromptDefinition>>,
}

impl Snapshot {
    /// A snapshot with no prompts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and collect raw declarations.
    ///
    /// A repeated name replaces the earlier entry. The first invalid entry
    /// aborts construction.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, RawPrompt)>,
        S: Into<String>,
    {
        let mut prompts = BTreeMap::new();
        for (name, raw) in entries {
            let def = PromptDefinition::from_raw(name, &raw);
            validate(&def, &raw)?;

            if raw.command.is_some() {
                tracing::warn!(
                    "Prompt '{}' declares a legacy 'command'; it is ignored",
                    def.name
                );
            }

            if let Some(previous) = prompts.insert(def.name.clone(), Arc::new(def)) {
                tracing::debug!("Prompt '{}' redeclared; keeping the later entry", previous.name);
            }
        }
        Ok(Self { prompts })
    }

    /// Parse a TOML document keyed by prompt name.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let entries: BTreeMap<String, RawPrompt> = toml::from_str(contents)?;
        Ok(Self::from_entries(entries)?)
    }

    /// Look up a prompt by name, enabled or not.
    pub fn get(&self, name: &str) -> Option<&Arc<PromptDefinition>> {
        self.prompts.get(name)
    }

    /// All prompts, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PromptDefinition>> {
        self.prompts.values()
    }

    /// Runnable prompts, sorted by name.
    pub fn enabled(&self) -> impl Iterator<Item = &Arc<PromptDefinition>> {
        self.iter().filter(|def| def.enabled)
    }

    /// Number of declared prompts, including disabled ones.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
