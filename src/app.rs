use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::command::{self, Command, CommandPrefixes};
use crate::error::{AppError, Result};
use crate::fs::listing::ListingOrder;
use crate::fs::operations;
use crate::view::{Direction, Navigation, ViewState, Viewport};

/// Discrete user intents produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    EnterChild,
    GoParent,
    TypeChar(char),
    Backspace,
    SubmitLine,
    /// Open the selection in the editor's current window.
    OpenInPlace,
    Resize(u16, u16),
    Quit,
    ConfirmYes,
    ConfirmNo,
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Waiting for y/n before removing `target`.
    PendingConfirm { target: PathBuf },
}

/// Work the event loop has to carry out outside the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenEditor { path: PathBuf, new_window: bool },
}

/// Main application state.
pub struct App {
    /// The real directory view; the only one kept across directory changes.
    pub base: ViewState,
    /// Derived view, present only while a filter query is active.
    pub filtered: Option<ViewState>,
    /// Search-line contents.
    pub query: String,
    pub mode: AppMode,
    /// Message, error flag, creation time.
    pub status_message: Option<(String, bool, Instant)>,
    pub should_quit: bool,
    prefixes: CommandPrefixes,
    home: PathBuf,
}

impl App {
    /// Create a new App showing `path`.
    pub fn new(
        path: &Path,
        viewport: Viewport,
        order: ListingOrder,
        prefixes: CommandPrefixes,
        home: PathBuf,
    ) -> Result<Self> {
        let base = ViewState::open(path, viewport, order)?;
        Ok(Self {
            base,
            filtered: None,
            query: String::new(),
            mode: AppMode::Normal,
            status_message: None,
            should_quit: false,
            prefixes,
            home,
        })
    }

    /// Whether the query is filter text (non-empty and not a command).
    pub fn is_filter_active(&self) -> bool {
        !self.query.is_empty() && !self.prefixes.is_command(&self.query)
    }

    /// The view that cursor movement and rendering go to.
    pub fn active_view(&self) -> &ViewState {
        match &self.filtered {
            Some(filtered) if self.is_filter_active() => filtered,
            _ => &self.base,
        }
    }

    fn active_view_mut(&mut self) -> &mut ViewState {
        let active = self.is_filter_active();
        match &mut self.filtered {
            Some(filtered) if active => filtered,
            _ => &mut self.base,
        }
    }

    /// Text for the search line while a confirmation is pending.
    pub fn prompt(&self) -> Option<String> {
        match &self.mode {
            AppMode::PendingConfirm { target } => {
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| target.display().to_string());
                Some(format!("Confirm delete {} y/n", name))
            }
            AppMode::Normal => None,
        }
    }

    /// Run one intent through the state machine.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Effect> {
        match intent {
            Intent::Quit => {
                self.quit();
                return None;
            }
            Intent::Resize(_, height) => {
                self.resize(height);
                return None;
            }
            _ => {}
        }

        if let AppMode::PendingConfirm { .. } = self.mode {
            match intent {
                Intent::ConfirmYes => self.confirm_delete(),
                Intent::ConfirmNo => self.cancel_delete(),
                _ => {}
            }
            return None;
        }

        match intent {
            Intent::MoveUp => self.active_view_mut().move_cursor(Direction::Up),
            Intent::MoveDown => self.active_view_mut().move_cursor(Direction::Down),
            Intent::EnterChild => {
                self.navigate(Navigation::Child);
            }
            Intent::GoParent => {
                self.navigate(Navigation::Parent);
            }
            Intent::TypeChar(c) => {
                self.status_message = None;
                self.query.push(c);
                self.refilter();
            }
            Intent::Backspace => {
                self.status_message = None;
                self.query.pop();
                self.refilter();
            }
            Intent::SubmitLine => return self.submit(),
            Intent::OpenInPlace => return self.open_selected(false),
            _ => {}
        }
        None
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Re-derive the viewport from a new terminal height.
    pub fn resize(&mut self, height: u16) {
        let viewport = Viewport::from_terminal_height(height);
        self.base.set_viewport(viewport);
        if let Some(filtered) = &mut self.filtered {
            filtered.set_viewport(viewport);
        }
    }

    /// Rebuild the filtered view from scratch for the current query.
    fn refilter(&mut self) {
        self.filtered = if self.is_filter_active() {
            Some(self.base.filtered(&self.query))
        } else {
            None
        };
    }

    fn clear_query(&mut self) {
        self.query.clear();
        self.filtered = None;
    }

    /// Change directory starting from the active view. Success leaves filter
    /// mode; failure leaves everything as it was and returns `false`.
    fn navigate(&mut self, navigation: Navigation) -> bool {
        let Some(target) = self.active_view().target(&navigation) else {
            return true;
        };
        match self.base.load(&target) {
            Ok(()) => {
                tracing::debug!(?navigation, path = %self.base.path().display(), "navigated");
                self.clear_query();
                true
            }
            Err(e) => {
                self.report_error(&e);
                false
            }
        }
    }

    /// Re-read the base directory after a mutation. `message` is only shown
    /// when the listing is current again.
    fn refresh_after(&mut self, message: String) {
        if self.navigate(Navigation::Refresh) {
            self.set_status_message(message);
        }
    }

    /// Jump to `home`-relative `rest`, resolving `..` and symlinks first so
    /// the base path is always the real directory.
    fn jump(&mut self, rest: &str) {
        let requested = command::jump_path(&self.home, rest);
        match requested.canonicalize() {
            Ok(path) => {
                self.navigate(Navigation::Jump(path));
            }
            Err(e) => self.report_error(&AppError::from_io(e, &requested)),
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        match self.prefixes.parse(&self.query) {
            Command::Open => return self.open_selected(true),
            Command::Jump(rest) => self.jump(&rest),
            Command::Create(name) => self.create(&name),
            Command::Delete => self.request_delete(),
            Command::Unknown(head) => {
                self.report_error(&AppError::InvalidTarget(format!("unknown command {}", head)));
            }
        }
        None
    }

    /// Open the selection: directories are entered, files go to the editor.
    fn open_selected(&mut self, new_window: bool) -> Option<Effect> {
        let Some(entry) = self.active_view().selected() else {
            self.report_error(&AppError::InvalidTarget("nothing selected".into()));
            return None;
        };
        if entry.path.is_dir() {
            self.navigate(Navigation::Child);
            return None;
        }
        Some(Effect::OpenEditor {
            path: entry.path.clone(),
            new_window,
        })
    }

    fn create(&mut self, name: &str) {
        match operations::create_entry(self.base.path(), name) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "entry created");
                self.clear_query();
                self.refresh_after(format!("Created {}", name));
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// First step of delete: remember the entry under the cursor.
    fn request_delete(&mut self) {
        let Some(entry) = self.base.selected() else {
            self.report_error(&AppError::InvalidTarget("nothing to delete".into()));
            return;
        };
        let target = entry.path.clone();
        self.clear_query();
        self.mode = AppMode::PendingConfirm { target };
    }

    fn confirm_delete(&mut self) {
        let AppMode::PendingConfirm { target } = std::mem::take(&mut self.mode) else {
            return;
        };
        match operations::remove_entry(&target) {
            Ok(()) => {
                tracing::info!(path = %target.display(), "entry deleted");
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.refresh_after(format!("Deleted {}", name));
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn cancel_delete(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, false, Instant::now()));
    }

    /// Log a failed transition and show it on the status line.
    pub fn report_error(&mut self, err: &AppError) {
        tracing::warn!(error = %err, "transition failed");
        self.status_message = Some((err.to_string(), true, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        File::create(dir.path().join("readme.md")).unwrap();
        File::create(dir.path().join("report.txt")).unwrap();
        File::create(dir.path().join("beta").join("inner.rs")).unwrap();
        let app = App::new(
            dir.path(),
            Viewport::new(10),
            ListingOrder::Name,
            CommandPrefixes::default(),
            dir.path().to_path_buf(),
        )
        .unwrap();
        (dir, app)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.dispatch(Intent::TypeChar(c));
        }
    }

    fn names(view: &ViewState) -> Vec<String> {
        view.entries().iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn move_down_and_up() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Intent::MoveDown);
        assert_eq!(app.base.cursor(), 1);
        app.dispatch(Intent::MoveUp);
        app.dispatch(Intent::MoveUp);
        assert_eq!(app.base.cursor(), 0);
    }

    #[test]
    fn typing_filters_and_resets_cursor() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Intent::MoveDown);
        type_str(&mut app, "re");
        assert!(app.is_filter_active());
        assert_eq!(names(app.active_view()), vec!["readme.md", "report.txt"]);
        assert_eq!(app.active_view().cursor(), 0);
        // base is untouched
        assert_eq!(app.base.cursor(), 1);
    }

    #[test]
    fn backspace_to_empty_restores_base_view() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "rep");
        assert_eq!(names(app.active_view()), vec!["report.txt"]);
        app.dispatch(Intent::Backspace);
        assert_eq!(names(app.active_view()), vec!["readme.md", "report.txt"]);
        app.dispatch(Intent::Backspace);
        app.dispatch(Intent::Backspace);
        assert!(!app.is_filter_active());
        assert!(app.filtered.is_none());
        assert_eq!(app.active_view().entries().len(), 4);
    }

    #[test]
    fn movement_goes_to_filtered_view_while_active() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "re");
        app.dispatch(Intent::MoveDown);
        assert_eq!(app.active_view().selected().unwrap().name, "report.txt");
        assert_eq!(app.base.cursor(), 0);
    }

    #[test]
    fn command_text_does_not_filter() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "/n x");
        assert!(!app.is_filter_active());
        assert_eq!(app.active_view().entries().len(), 4);
    }

    #[test]
    fn enter_child_from_filtered_view_clears_query() {
        let (dir, mut app) = setup_app();
        type_str(&mut app, "bet");
        app.dispatch(Intent::EnterChild);
        assert_eq!(app.base.path(), dir.path().join("beta"));
        assert!(app.query.is_empty());
        assert!(app.filtered.is_none());
        assert_eq!(names(&app.base), vec!["inner.rs"]);
    }

    #[test]
    fn go_parent_returns_to_exited_child() {
        let (dir, mut app) = setup_app();
        app.dispatch(Intent::MoveDown);
        app.dispatch(Intent::EnterChild);
        app.dispatch(Intent::GoParent);
        assert_eq!(app.base.path(), dir.path());
        assert_eq!(app.base.selected().unwrap().name, "beta");
    }

    #[test]
    fn failed_child_reports_error_and_keeps_state() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Intent::MoveDown);
        app.dispatch(Intent::MoveDown);
        let before = app.base.clone();
        app.dispatch(Intent::EnterChild);
        assert_eq!(app.base, before);
        let (msg, is_error, _) = app.status_message.as_ref().unwrap();
        assert!(*is_error);
        assert!(msg.starts_with("Not a directory"));
    }

    #[test]
    fn submit_empty_query_on_file_opens_editor_in_new_window() {
        let (dir, mut app) = setup_app();
        app.dispatch(Intent::MoveDown);
        app.dispatch(Intent::MoveDown);
        let effect = app.dispatch(Intent::SubmitLine);
        assert_eq!(
            effect,
            Some(Effect::OpenEditor {
                path: dir.path().join("readme.md"),
                new_window: true,
            })
        );
    }

    #[test]
    fn open_in_place_uses_same_window() {
        let (dir, mut app) = setup_app();
        type_str(&mut app, "report");
        let effect = app.dispatch(Intent::OpenInPlace);
        assert_eq!(
            effect,
            Some(Effect::OpenEditor {
                path: dir.path().join("report.txt"),
                new_window: false,
            })
        );
    }

    #[test]
    fn submit_on_directory_descends() {
        let (dir, mut app) = setup_app();
        assert!(app.dispatch(Intent::SubmitLine).is_none());
        assert_eq!(app.base.path(), dir.path().join("alpha"));
    }

    #[test]
    fn submit_with_nothing_selected_reports_error() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "zzz");
        assert!(app.dispatch(Intent::SubmitLine).is_none());
        assert!(app.status_message.as_ref().unwrap().1);
    }

    #[test]
    fn jump_command_resolves_against_home() {
        let (dir, mut app) = setup_app();
        type_str(&mut app, "/ beta");
        app.dispatch(Intent::SubmitLine);
        assert_eq!(app.base.path(), dir.path().canonicalize().unwrap().join("beta"));
        assert!(app.query.is_empty());
    }

    #[test]
    fn jump_through_dotdot_then_parent_goes_up() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let me = root.join("home").join("me");
        fs::create_dir_all(&me).unwrap();
        let mut app = App::new(
            &me,
            Viewport::new(10),
            ListingOrder::Name,
            CommandPrefixes::default(),
            me.clone(),
        )
        .unwrap();

        type_str(&mut app, "/ ..");
        app.dispatch(Intent::SubmitLine);
        assert_eq!(app.base.path(), root.join("home"));
        assert_eq!(app.base.selected().unwrap().name, "me");

        app.dispatch(Intent::GoParent);
        assert_eq!(app.base.path(), root);
        assert_eq!(app.base.selected().unwrap().name, "home");
    }

    #[test]
    fn failed_jump_keeps_query_and_state() {
        let (_dir, mut app) = setup_app();
        let before = app.base.clone();
        type_str(&mut app, "/ nowhere");
        app.dispatch(Intent::SubmitLine);
        assert_eq!(app.base, before);
        assert_eq!(app.query, "/ nowhere");
        assert!(app.status_message.as_ref().unwrap().0.starts_with("Not found"));
    }

    #[test]
    fn create_command_makes_file_and_refreshes() {
        let (dir, mut app) = setup_app();
        type_str(&mut app, "/n todo.txt");
        app.dispatch(Intent::SubmitLine);
        assert!(dir.path().join("todo.txt").is_file());
        assert!(names(&app.base).contains(&"todo.txt".to_string()));
        assert!(app.query.is_empty());
    }

    #[test]
    fn failed_refresh_after_mutation_is_reported() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        let mut app = App::new(
            &work,
            Viewport::new(10),
            ListingOrder::Name,
            CommandPrefixes::default(),
            dir.path().to_path_buf(),
        )
        .unwrap();

        fs::remove_dir(&work).unwrap();
        app.refresh_after("Created x".into());
        let (msg, is_error, _) = app.status_message.as_ref().unwrap();
        assert!(is_error);
        assert!(msg.starts_with("Not found"));
        assert_eq!(app.base.path(), work);
    }

    #[test]
    fn successful_refresh_after_mutation_shows_message() {
        let (_dir, mut app) = setup_app();
        app.refresh_after("Deleted x".into());
        let (msg, is_error, _) = app.status_message.as_ref().unwrap();
        assert!(!is_error);
        assert_eq!(msg, "Deleted x");
    }

    #[test]
    fn create_command_makes_directory() {
        let (dir, mut app) = setup_app();
        type_str(&mut app, "/n gamma");
        app.dispatch(Intent::SubmitLine);
        assert!(dir.path().join("gamma").is_dir());
    }

    #[test]
    fn create_existing_reports_error() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "/n alpha");
        app.dispatch(Intent::SubmitLine);
        let (msg, is_error, _) = app.status_message.as_ref().unwrap();
        assert!(*is_error);
        assert!(msg.starts_with("Already exists"));
    }

    #[test]
    fn unknown_command_reports_error() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "/zap");
        app.dispatch(Intent::SubmitLine);
        assert!(app.status_message.as_ref().unwrap().0.contains("unknown command /zap"));
    }

    #[test]
    fn delete_then_no_changes_nothing() {
        let (dir, mut app) = setup_app();
        for _ in 0..3 {
            app.dispatch(Intent::MoveDown);
        }
        let before = app.base.clone();
        type_str(&mut app, "/d");
        app.dispatch(Intent::SubmitLine);
        assert_eq!(
            app.mode,
            AppMode::PendingConfirm {
                target: dir.path().join("report.txt")
            }
        );
        assert_eq!(app.prompt().unwrap(), "Confirm delete report.txt y/n");

        app.dispatch(Intent::ConfirmNo);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.base, before);
        assert!(dir.path().join("report.txt").exists());
    }

    #[test]
    fn delete_then_yes_removes_entry_under_cursor() {
        let (dir, mut app) = setup_app();
        for _ in 0..3 {
            app.dispatch(Intent::MoveDown);
        }
        type_str(&mut app, "/d");
        app.dispatch(Intent::SubmitLine);
        // movement is ignored while confirming
        app.dispatch(Intent::MoveUp);
        app.dispatch(Intent::ConfirmYes);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!dir.path().join("report.txt").exists());
        assert!(dir.path().join("readme.md").exists());
        assert_eq!(names(&app.base), vec!["alpha", "beta", "readme.md"]);
        assert_eq!(app.base.cursor(), 0);
    }

    #[test]
    fn deleting_non_empty_directory_fails_cleanly() {
        let (dir, mut app) = setup_app();
        app.dispatch(Intent::MoveDown);
        type_str(&mut app, "/d");
        app.dispatch(Intent::SubmitLine);
        let before = app.base.clone();
        app.dispatch(Intent::ConfirmYes);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.base, before);
        assert!(dir.path().join("beta").join("inner.rs").exists());
        assert!(app.status_message.as_ref().unwrap().0.starts_with("Directory not empty"));
    }

    #[test]
    fn delete_on_empty_listing_is_invalid_target() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Intent::EnterChild); // alpha is empty
        type_str(&mut app, "/d");
        app.dispatch(Intent::SubmitLine);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.as_ref().unwrap().0.starts_with("Invalid target"));
    }

    #[test]
    fn typing_clears_status_message() {
        let (_dir, mut app) = setup_app();
        app.set_status_message("hello".into());
        app.dispatch(Intent::TypeChar('a'));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn resize_updates_both_views() {
        let (_dir, mut app) = setup_app();
        type_str(&mut app, "r");
        app.dispatch(Intent::Resize(80, 5));
        assert_eq!(app.base.viewport().rows, 2);
        assert_eq!(app.filtered.as_ref().unwrap().viewport().rows, 2);
    }

    #[test]
    fn quit_sets_flag_in_any_mode() {
        let (_dir, mut app) = setup_app();
        app.mode = AppMode::PendingConfirm {
            target: PathBuf::from("/x"),
        };
        app.dispatch(Intent::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn clear_expired_status_removes_old() {
        let (_dir, mut app) = setup_app();
        app.set_status_message("fresh".to_string());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some((
            "old".to_string(),
            false,
            Instant::now() - std::time::Duration::from_secs(5),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }
}
