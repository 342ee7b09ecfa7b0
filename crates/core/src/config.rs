//! Application settings for the pp CLI.
//!
//! Settings are resolved from, in increasing precedence:
//! - Built-in defaults (`~/.pp/config.toml`, OpenAI provider)
//! - Environment variables
//! - Command-line flags
//!
//! The prompt declarations themselves live in the TOML file at
//! `config_file` and are loaded by `pp-prompt`, not here.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the per-user directory holding the prompt file and dump artifact.
pub const APP_DIR: &str = ".pp";

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the TOML file declaring prompts
    pub config_file: PathBuf,

    /// Completion provider ("openai" or "ollama")
    pub provider: String,

    /// Override for the provider's base URL
    pub endpoint: Option<String>,

    /// API key for the completion provider
    pub api_key: Option<String>,

    /// Where the last substituted message is written before dispatch
    pub dump_path: PathBuf,

    /// Upper bound on a whole streamed response, in seconds
    pub timeout_secs: Option<u64>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let app_dir = default_app_dir();
        Self {
            config_file: app_dir.join("config.toml"),
            provider: "openai".to_string(),
            endpoint: None,
            api_key: None,
            dump_path: app_dir.join("prompt.txt"),
            timeout_secs: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

/// `~/.pp`, falling back to `./.pp` when no home directory is known.
fn default_app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `PP_CONFIG`: Path to the prompt file
    /// - `PP_PROVIDER`: Completion provider
    /// - `OPENAI_BASE_URL`: Provider endpoint
    /// - `PP_API_KEY` / `OPENAI_API_KEY`: API key (first one set wins)
    /// - `PP_DUMP_PATH`: Path of the substituted-message dump
    /// - `PP_TIMEOUT`: Streaming timeout in seconds
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use pp_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Prompts: {:?}", config.config_file);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_env<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = var("PP_CONFIG") {
            config.config_file = PathBuf::from(path);
        }

        if let Some(provider) = var("PP_PROVIDER") {
            config.provider = provider;
        }

        config.endpoint = var("OPENAI_BASE_URL");
        config.api_key = var("PP_API_KEY").or_else(|| var("OPENAI_API_KEY"));

        if let Some(path) = var("PP_DUMP_PATH") {
            config.dump_path = PathBuf::from(path);
        }

        if let Some(raw) = var("PP_TIMEOUT") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid PP_TIMEOUT value '{}': {}", raw, e))
            })?;
            config.timeout_secs = Some(secs);
        }

        config.log_level = var("RUST_LOG");

        if var("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        endpoint: Option<String>,
        timeout_secs: Option<u64>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = Some(timeout_secs);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Directory containing the prompt file.
    pub fn config_dir(&self) -> &Path {
        self.config_file.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Ensure the directory holding the prompt file exists.
    pub fn ensure_config_dir(&self) -> AppResult<()> {
        let dir = self.config_dir();
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::Config(format!("Failed to create {:?}: {}", dir, e))
            })?;
        }
        Ok(())
    }

    /// Validate the resolved settings.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.timeout_secs == Some(0) {
            return Err(AppError::Config(
                "Timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openai");
        assert!(config.config_file.ends_with(".pp/config.toml"));
        assert!(config.dump_path.ends_with(".pp/prompt.txt"));
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_from_env() {
        let config = AppConfig::from_env(env(&[
            ("PP_CONFIG", "/tmp/prompts.toml"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("PP_TIMEOUT", "30"),
            ("NO_COLOR", "1"),
        ]))
        .unwrap();

        assert_eq!(config.config_file, PathBuf::from("/tmp/prompts.toml"));
        assert_eq!(config.config_dir(), Path::new("/tmp"));
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.no_color);
    }

    #[test]
    fn test_pp_api_key_takes_precedence() {
        let config = AppConfig::from_env(env(&[
            ("PP_API_KEY", "sk-pp"),
            ("OPENAI_API_KEY", "sk-openai"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-pp"));
    }

    #[test]
    fn test_invalid_timeout_env() {
        let result = AppConfig::from_env(env(&[("PP_TIMEOUT", "soon")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("ollama".to_string()),
            Some("http://localhost:8080/v1".to_string()),
            Some(10),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(
            overridden.endpoint.as_deref(),
            Some("http://localhost:8080/v1")
        );
        assert_eq!(overridden.timeout_secs, Some(10));
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = AppConfig::default();
        config.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ensure_config_dir_creates_parent() {
        let base = std::env::temp_dir().join(format!("pp-core-test-{}", std::process::id()));
        let mut config = AppConfig::default();
        config.config_file = base.join("nested").join("config.toml");

        config.ensure_config_dir().unwrap();
        assert!(base.join("nested").is_dir());

        std::fs::remove_dir_all(&base).ok();
    }
}
