mod app;
mod command;
mod components;
mod config;
mod editor;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod tui;
mod ui;
mod view;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::app::{App, Effect, Intent};
use crate::config::{AppConfig, EditorConfig, ListingConfig, LogConfig};
use crate::editor::EditorLauncher;
use crate::error::{AppError, Result};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};
use crate::view::Viewport;

/// Browse a directory in the terminal and open files in an external editor.
#[derive(Parser, Debug)]
#[command(name = "fscli", version, about)]
struct Cli {
    /// Directory to start in (defaults to config `start_path`, then `.`)
    path: Option<PathBuf>,

    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listing order: name or native
    #[arg(long, value_name = "ORDER")]
    order: Option<String>,

    /// Editor command used to open files
    #[arg(long, value_name = "CMD")]
    editor: Option<String>,

    /// Log file path
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        AppConfig {
            listing: ListingConfig {
                order: self.order.clone(),
            },
            editor: EditorConfig {
                command: self.editor.clone(),
                new_window_flag: None,
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                level: None,
            },
            ..AppConfig::default()
        }
    }
}

/// Canonicalize the start directory, rejecting missing and non-directory paths.
fn resolve_start(path: &Path) -> Result<PathBuf> {
    let resolved = path
        .canonicalize()
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", path.display())))?;
    if !resolved.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(resolved)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides();
    let config = AppConfig::load(cli.config.as_deref(), Some(&overrides));

    let start = cli
        .path
        .clone()
        .or_else(|| config.start_path())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = resolve_start(&start)?;

    let log_result = logging::init(&config.log_file(), config.log_level());

    install_panic_hook();

    let mut tui = Tui::new()?;
    let viewport = Viewport::from_terminal_height(tui.height()?);
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    let mut app = App::new(
        &path,
        viewport,
        config.listing_order(),
        config.command_prefixes(),
        home,
    )?;
    if let Err(e) = log_result {
        app.report_error(&e);
    }

    let editor_command = config.editor_command();
    let launcher = EditorLauncher::new(
        &editor_command,
        config.new_window_flag(&editor_command),
    );
    let mut events = EventHandler::new(Duration::from_millis(250));

    tracing::info!(path = %path.display(), editor = launcher.program(), "fscli started");

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => {
                let effect = handler::key_to_intent(&app.mode, key)
                    .and_then(|intent| app.dispatch(intent));
                if let Some(Effect::OpenEditor { path, new_window }) = effect {
                    events.pause().await;
                    tui.suspend()?;
                    let opened = launcher.open(&path, new_window).await;
                    tui.resume()?;
                    events.resume();
                    if let Err(e) = opened {
                        app.report_error(&e);
                    }
                }
            }
            Event::Resize(width, height) => {
                app.dispatch(Intent::Resize(width, height));
            }
            Event::Tick => app.clear_expired_status(),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("fscli stopped");
    Ok(())
}
