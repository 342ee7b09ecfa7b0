//! Prompt system for pp.
//!
//! Turns the user's prompt declarations into runnable commands:
//! - TOML loading into an immutable, validated [`Snapshot`]
//! - Placeholder validation (`{pipe}` only)
//! - The command registry shared by built-ins and prompts
//! - The substitution → completion → streamed output pipeline
//! - Sorted listings for `prompt list` and shell completion

pub mod listing;
pub mod loader;
pub mod pipeline;
pub mod registry;
pub mod snapshot;
pub mod types;
pub mod validator;

// Re-export main types
pub use listing::render;
pub use loader::load_snapshot;
pub use pipeline::{execute, read_input, relay, run, substitute, ExecuteOptions, OutputStream};
pub use registry::{
    update, Builtin, CommandEntry, CommandHandler, CommandRegistry, CompletionInstaller,
};
pub use snapshot::Snapshot;
pub use types::{PromptDefinition, RawPrompt, PIPE_PLACEHOLDER};
pub use validator::validate;
