//! Execution of a prompt: input resolution, template substitution, and the
//! streamed completion relayed to an output sink.

use crate::types::{PromptDefinition, PIPE_TOKEN};
use futures::{future, Stream, StreamExt};
use pp_core::{AppError, AppResult, ValidationError};
use pp_llm::{ChatRequest, LlmClient};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

/// Lazy sequence of non-empty text deltas, in delivery order.
///
/// Finite and not restartable; it ends after the first error.
pub type OutputStream = Pin<Box<dyn Stream<Item = AppResult<String>> + Send>>;

/// Per-invocation execution settings.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Where the substituted message is written before dispatch
    pub dump_path: Option<PathBuf>,

    /// Bound on consuming the whole response
    pub timeout: Option<Duration>,
}

/// Pick the input for a prompt.
///
/// An explicit argument wins. Otherwise non-interactive stdin is read to
/// the end and trimmed; an interactive terminal yields empty input.
pub fn resolve_input<R: Read>(
    explicit: Option<String>,
    mut stdin: R,
    stdin_is_terminal: bool,
) -> AppResult<String> {
    if let Some(input) = explicit {
        return Ok(input);
    }

    if stdin_is_terminal {
        return Ok(String::new());
    }

    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    Ok(buffer.trim().to_string())
}

/// Resolve input against the process's standard input.
pub fn read_input(explicit: Option<String>) -> AppResult<String> {
    let stdin = std::io::stdin();
    let is_terminal = stdin.is_terminal();
    resolve_input(explicit, stdin.lock(), is_terminal)
}

/// Replace every `{pipe}` in `content` with `input`.
///
/// Single pass: a `{pipe}` inside `input` is left as is.
pub fn substitute(content: &str, input: &str) -> String {
    content.replace(PIPE_TOKEN, input)
}

/// Write the message that is about to be sent. Failure only warns.
fn dump_message(path: &Path, message: &str) {
    let result = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::write(path, message));

    match result {
        Ok(()) => tracing::debug!("Wrote prompt message to {:?}", path),
        Err(e) => tracing::warn!("Failed to write prompt message to {:?}: {}", path, e),
    }
}

/// Send `def` filled with `input` and return its streamed output.
pub async fn execute(
    client: &dyn LlmClient,
    def: &PromptDefinition,
    input: &str,
    options: &ExecuteOptions,
) -> AppResult<OutputStream> {
    let model = def.model.as_deref().ok_or_else(|| ValidationError::MissingFields {
        prompt: def.name.clone(),
        fields: vec!["base_model"],
    })?;

    let message = substitute(&def.content, input);
    tracing::debug!("Prompt '{}' message is {} bytes", def.name, message.len());

    if let Some(ref path) = options.dump_path {
        dump_message(path, &message);
    }

    let request = ChatRequest::single(model, message).with_streaming();
    tracing::info!(
        "Sending prompt '{}' to {} ({})",
        def.name,
        client.provider_name(),
        model
    );

    let chunks = client.stream(&request).await?;

    let deltas = chunks
        .scan(false, |failed, item| {
            let next = if *failed {
                None
            } else {
                match item {
                    Ok(chunk) if chunk.done => None,
                    Ok(chunk) => Some(Ok(chunk.content)),
                    Err(e) => {
                        *failed = true;
                        Some(Err(e))
                    }
                }
            };
            future::ready(next)
        })
        .filter(|item| future::ready(!matches!(item, Ok(text) if text.is_empty())));

    Ok(Box::pin(deltas))
}

/// Write each delta to `writer` as it arrives, flushing after every one.
///
/// Returns the number of bytes written. On error, what was already written
/// stays written. The stream, and with it the connection, is dropped on
/// every path.
pub async fn relay<W: Write>(
    output: OutputStream,
    writer: &mut W,
    timeout: Option<Duration>,
) -> AppResult<usize> {
    let consume = drain(output, writer);

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, consume).await.unwrap_or_else(|_| {
            Err(AppError::Completion(format!(
                "Response timed out after {:?}",
                limit
            )))
        }),
        None => consume.await,
    };

    tracing::debug!("Completion stream closed");
    result
}

async fn drain<W: Write>(mut output: OutputStream, writer: &mut W) -> AppResult<usize> {
    let mut written = 0;
    while let Some(delta) = output.next().await {
        let delta = delta?;
        writer.write_all(delta.as_bytes())?;
        writer.flush()?;
        written += delta.len();
    }
    Ok(written)
}

/// Execute a prompt and relay its output to `writer`.
pub async fn run<W: Write>(
    client: &dyn LlmClient,
    def: &PromptDefinition,
    input: &str,
    options: &ExecuteOptions,
    writer: &mut W,
) -> AppResult<usize> {
    let output = execute(client, def, input, options).await?;
    relay(output, writer, options.timeout).await
}
