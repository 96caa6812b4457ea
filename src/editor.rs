use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;

use crate::error::{AppError, Result};

/// Launches the configured external editor and waits for it to exit.
#[derive(Debug, Clone)]
pub struct EditorLauncher {
    program: String,
    base_args: Vec<String>,
    new_window_flag: Option<String>,
}

impl EditorLauncher {
    /// `command` may carry its own arguments, e.g. `"code --wait"`.
    pub fn new(command: &str, new_window_flag: Option<String>) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            base_args: parts.collect(),
            new_window_flag,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for opening `path`.
    pub fn args(&self, path: &Path, new_window: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.base_args.iter().map(OsString::from).collect();
        if new_window {
            if let Some(flag) = &self.new_window_flag {
                args.push(OsString::from(flag));
            }
        }
        args.push(path.as_os_str().to_os_string());
        args
    }

    /// Run the editor on `path` and wait for it to exit.
    pub async fn open(&self, path: &Path, new_window: bool) -> Result<()> {
        if self.program.is_empty() {
            return Err(AppError::Editor("no editor configured".into()));
        }
        tracing::info!(program = %self.program, path = %path.display(), new_window, "launching editor");
        let status = Command::new(&self.program)
            .args(self.args(path, new_window))
            .status()
            .await
            .map_err(|e| AppError::Editor(format!("{}: {}", self.program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(AppError::Editor(format!("{} exited with {}", self.program, status)))
        }
    }
}
