//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--order`, `--editor`, `--log-file`)
//! 2. `$FSCLI_CONFIG` environment variable (path to config file)
//! 3. Project-local `.fscli.toml` in the current working directory
//! 4. Global `~/.config/fscli/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::command::CommandPrefixes;
use crate::fs::listing::ListingOrder;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub start_path: Option<String>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    /// Entry order: "name" or "native".
    pub order: Option<String>,
}

/// External editor settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Program to open files with.
    pub command: Option<String>,
    /// Flag passed when opening in a new window.
    pub new_window_flag: Option<String>,
}

/// Search-line command prefixes.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CommandsConfig {
    pub jump: Option<String>,
    pub create: Option<String>,
    pub delete: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path.
    pub file: Option<String>,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub listing: ListingConfig,
    pub editor: EditorConfig,
    pub commands: CommandsConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Editor used when neither config nor environment names one.
pub const DEFAULT_EDITOR: &str = "code";
/// New-window flag understood by the default editor.
pub const DEFAULT_NEW_WINDOW_FLAG: &str = "--new-window";
/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "fscli.log";
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("FSCLI_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".fscli.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("fscli").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
///
/// Runs before the terminal is set up and before logging exists, so stderr
/// is still the right place for the warning.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                start_path: other
                    .general
                    .start_path
                    .clone()
                    .or(self.general.start_path),
            },
            listing: ListingConfig {
                order: other.listing.order.clone().or(self.listing.order),
            },
            editor: EditorConfig {
                command: other.editor.command.clone().or(self.editor.command),
                new_window_flag: other
                    .editor
                    .new_window_flag
                    .clone()
                    .or(self.editor.new_window_flag),
            },
            commands: CommandsConfig {
                jump: other.commands.jump.clone().or(self.commands.jump),
                create: other.commands.create.clone().or(self.commands.create),
                delete: other.commands.delete.clone().or(self.commands.delete),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Configured start directory with a leading `~` expanded.
    pub fn start_path(&self) -> Option<PathBuf> {
        self.general.start_path.as_deref().map(expand_tilde)
    }

    /// Listing order. Unknown values fall back to name order.
    pub fn listing_order(&self) -> ListingOrder {
        self.listing
            .order
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Editor program: config, then `$VISUAL`, then `$EDITOR`, then `code`.
    pub fn editor_command(&self) -> String {
        self.editor
            .command
            .clone()
            .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    /// Flag for opening in a new window. Only the default editor gets one
    /// without explicit configuration.
    pub fn new_window_flag(&self, command: &str) -> Option<String> {
        match &self.editor.new_window_flag {
            Some(flag) if flag.is_empty() => None,
            Some(flag) => Some(flag.clone()),
            None if command == DEFAULT_EDITOR => Some(DEFAULT_NEW_WINDOW_FLAG.to_string()),
            None => None,
        }
    }

    /// Command prefixes for the search line.
    pub fn command_prefixes(&self) -> CommandPrefixes {
        let defaults = CommandPrefixes::default();
        CommandPrefixes {
            jump: self.commands.jump.clone().unwrap_or(defaults.jump),
            create: self.commands.create.clone().unwrap_or(defaults.create),
            delete: self.commands.delete.clone().unwrap_or(defaults.delete),
        }
    }

    /// Log file path.
    pub fn log_file(&self) -> PathBuf {
        expand_tilde(self.log.file.as_deref().unwrap_or(DEFAULT_LOG_FILE))
    }

    /// Default log filter directive.
    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Expand a leading `~` or `~/` to the home directory.
fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

// ── Tests ────────────────────────────────────────────────────────────────────
