//! Load-time validation of prompt declarations.

use crate::types::{PromptDefinition, RawPrompt, PIPE_PLACEHOLDER};
use pp_core::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Non-greedy `{name}` matcher; braces outside this shape are not checked.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}").expect("placeholder pattern compiles"));

/// Extract every placeholder name from a template, in order of appearance.
pub fn placeholders(content: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Validate one prompt against the rules for enabled entries.
///
/// `raw` is the declaration `def` was built from; it tells absent fields
/// apart from empty ones. Disabled prompts always pass.
pub fn validate(def: &PromptDefinition, raw: &RawPrompt) -> Result<(), ValidationError> {
    if !def.enabled {
        return Ok(());
    }

    let mut missing = Vec::new();
    if raw.content.as_deref().map_or(true, str::is_empty) {
        missing.push("content");
    }
    if raw.declared_model().is_none() {
        missing.push("base_model");
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields {
            prompt: def.name.clone(),
            fields: missing,
        });
    }

    if let Some(name) = placeholders(&def.content)
        .into_iter()
        .find(|name| *name != PIPE_PLACEHOLDER)
    {
        return Err(ValidationError::InvalidPlaceholder {
            prompt: def.name.clone(),
            placeholder: name.to_string(),
            allowed: PIPE_PLACEHOLDER,
        });
    }

    Ok(())
}
