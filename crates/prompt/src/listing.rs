//! Rendering of the prompt set for `prompt list` and shell completion.

use crate::snapshot::Snapshot;

/// Shown by the long listing when no prompt carries a description.
pub const NO_DESCRIPTIONS: &str = "No prompts with descriptions found.";

/// Render the runnable prompts, one line each, sorted by name.
///
/// The long form keeps only described prompts and aligns descriptions in a
/// column after the longest name.
pub fn render(snapshot: &Snapshot, long: bool) -> Vec<String> {
    if !long {
        return snapshot.enabled().map(|def| def.name.clone()).collect();
    }

    let described: Vec<_> = snapshot
        .enabled()
        .filter(|def| !def.description.is_empty())
        .collect();

    if described.is_empty() {
        return vec![NO_DESCRIPTIONS.to_string()];
    }

    let width = described
        .iter()
        .map(|def| def.name.chars().count())
        .max()
        .unwrap_or(0);

    described
        .iter()
        .map(|def| format!("{:<width$}  {}", def.name, def.description))
        .collect()
}
