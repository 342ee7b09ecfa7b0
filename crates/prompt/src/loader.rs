//! Loader for the prompt configuration file.

use crate::snapshot::Snapshot;
use pp_core::{AppError, AppResult};
use std::io::ErrorKind;
use std::path::Path;

/// Load and validate the prompt file at `path`.
///
/// A missing or unreadable file yields an empty snapshot so the tool still
/// starts with its built-in commands. Malformed TOML and invalid prompts are
/// errors.
///
/// # Example
/// ```no_run
/// use pp_prompt::load_snapshot;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let snapshot = load_snapshot(Path::new("/home/me/.pp/config.toml"))?;
/// println!("{} prompts", snapshot.len());
/// # Ok(())
/// # }
/// ```
pub fn load_snapshot(path: &Path) -> AppResult<Snapshot> {
    tracing::debug!("Loading prompts from: {:?}", path);

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Config file not found at: {:?}", path);
            return Ok(Snapshot::empty());
        }
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            return Ok(Snapshot::empty());
        }
    };

    let snapshot = Snapshot::from_toml_str(&contents).map_err(|e| match e {
        AppError::Config(msg) => {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, msg))
        }
        other => other,
    })?;

    tracing::info!("Loaded {} prompts from {:?}", snapshot.len(), path);

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::ValidationError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = load_snapshot(&temp_dir.path().join("config.toml")).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_directory_path_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = load_snapshot(temp_dir.path()).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[fix]\ncontent = \"Fix grammar: {pipe}\"\nmodel = \"gpt-4o-mini\"\n",
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        let def = snapshot.get("fix").unwrap();
        assert_eq!(def.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "not toml at all [").unwrap();

        match load_snapshot(&path) {
            Err(AppError::Config(msg)) => assert!(msg.contains("config.toml")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[lonely]\ndescription = \"no content\"\n").unwrap();

        assert!(matches!(
            load_snapshot(&path),
            Err(AppError::Validation(ValidationError::MissingFields { .. }))
        ));
    }
}
