//! Shell completion: the scripts served by `pp __complete --script` and the
//! installer that hooks them into the user's shell startup file.

use clap::ValueEnum;
use pp_prompt::CompletionInstaller;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Marker written above the hook line in the rc file.
const MARKER: &str = "# pp completion";

const BASH_SCRIPT: &str = r##"_pp_complete() {
    if [ "$COMP_CWORD" -eq 1 ]; then
        COMPREPLY=( $(compgen -W "$(pp __complete 2>/dev/null)" -- "${COMP_WORDS[1]}") )
    fi
}
complete -o default -F _pp_complete pp
"##;

const ZSH_SCRIPT: &str = r##"(( $+functions[compdef] )) || { autoload -Uz compinit && compinit }
_pp() {
    if (( CURRENT == 2 )); then
        local -a commands
        commands=(${(f)"$(pp __complete 2>/dev/null)"})
        compadd -a commands
    fi
}
compdef _pp pp
"##;

/// Shells with completion support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
}

impl Shell {
    /// Detect the shell from a `$SHELL`-style path.
    pub fn detect(shell: &str) -> Option<Self> {
        match shell.rsplit('/').next().unwrap_or_default() {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
        }
    }

    /// Completion script evaluated by the shell.
    pub fn script(&self) -> &'static str {
        match self {
            Self::Bash => BASH_SCRIPT,
            Self::Zsh => ZSH_SCRIPT,
        }
    }

    /// Startup file relative to the home directory.
    pub fn rc_file(&self, home: &Path) -> PathBuf {
        match self {
            Self::Bash => home.join(".bashrc"),
            Self::Zsh => home.join(".zshrc"),
        }
    }

    /// Line that loads the completion script at shell startup.
    pub fn hook_line(&self) -> String {
        format!("eval \"$(pp __complete --script {})\"", self.name())
    }
}

/// Result of one installation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Added(PathBuf),
    AlreadyPresent(PathBuf),
    Unsupported(String),
}

/// Appends the completion hook to `~/.bashrc` or `~/.zshrc`.
#[derive(Debug, Clone)]
pub struct ShellCompletionInstaller {
    shell: String,
    home: PathBuf,
}

impl ShellCompletionInstaller {
    pub fn new(shell: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
            home: home.into(),
        }
    }

    /// Use `$SHELL` and the user's home directory.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("SHELL").unwrap_or_default(),
            dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        )
    }

    /// Add the hook once; later calls find it and leave the file alone.
    pub fn install_hook(&self) -> io::Result<InstallOutcome> {
        let Some(shell) = Shell::detect(&self.shell) else {
            return Ok(InstallOutcome::Unsupported(self.shell.clone()));
        };

        let rc_file = shell.rc_file(&self.home);
        let hook = shell.hook_line();

        let existing = match std::fs::read_to_string(&rc_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        if existing.contains(&hook) {
            return Ok(InstallOutcome::AlreadyPresent(rc_file));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&rc_file)?;
        write!(file, "\n{}\n{}\n", MARKER, hook)?;

        Ok(InstallOutcome::Added(rc_file))
    }
}

impl CompletionInstaller for ShellCompletionInstaller {
    fn install(&self) -> io::Result<()> {
        match self.install_hook()? {
            InstallOutcome::Added(rc_file) => {
                tracing::info!("Appended completion hook to {:?}", rc_file);
                println!("Added completion script to {}", rc_file.display());
                println!("Restart your shell or run: source {}", rc_file.display());
            }
            InstallOutcome::AlreadyPresent(rc_file) => {
                println!(
                    "Completion script already installed in {}",
                    rc_file.display()
                );
            }
            InstallOutcome::Unsupported(shell) => {
                tracing::warn!("Shell completion not installed for {:?}", shell);
                println!("Unsupported shell: {}", shell);
            }
        }
        Ok(())
    }
}
