//! Cursor, scroll and directory-change state for one directory listing.
//!
//! A [`ViewState`] always satisfies:
//! - `scroll_offset + highlight_row == cursor`
//! - `highlight_row < viewport.rows`
//! - `scroll_offset <= max(0, entries.len() - viewport.rows)`
//!
//! `highlight_row` is relative to the first listing row. The renderer adds
//! `viewport.top_offset` to get the screen row.

pub mod filter;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::listing::{self, Entry, Listing, ListingOrder};

/// Rows above the listing (current path header).
pub const HEADER_ROWS: usize = 1;

/// Rows not available to the listing: header, separator rule and search line.
pub const CHROME_ROWS: usize = HEADER_ROWS + 2;

/// Rows available for listing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: usize,
    pub top_offset: usize,
}

impl Viewport {
    /// A viewport with `rows` listing rows (at least one).
    pub fn new(rows: usize) -> Self {
        Self {
            rows: rows.max(1),
            top_offset: HEADER_ROWS,
        }
    }

    /// Derive the viewport from the full terminal height.
    pub fn from_terminal_height(height: u16) -> Self {
        Self::new((height as usize).saturating_sub(CHROME_ROWS))
    }
}

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Directory transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Go to the parent, landing on the directory just left.
    Parent,
    /// Descend into the entry under the cursor.
    Child,
    /// Re-read the current directory.
    Refresh,
    /// Load an arbitrary directory.
    Jump(PathBuf),
}

/// A directory to load and the child path to land on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub highlight: Option<PathBuf>,
}

/// Listing plus cursor and viewport mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    path: PathBuf,
    entries: Vec<Entry>,
    cursor: usize,
    scroll_offset: usize,
    highlight_row: usize,
    viewport: Viewport,
    order: ListingOrder,
}

impl ViewState {
    /// Read `path` and build a view with the cursor on the first entry.
    pub fn open(path: &Path, viewport: Viewport, order: ListingOrder) -> Result<Self> {
        let listing = listing::read(path, None, order)?;
        Ok(Self::from_listing(listing, viewport, order))
    }

    /// Build a view from an already read listing.
    pub fn from_listing(listing: Listing, viewport: Viewport, order: ListingOrder) -> Self {
        let mut state = Self {
            path: listing.base,
            entries: listing.entries,
            cursor: 0,
            scroll_offset: 0,
            highlight_row: 0,
            viewport,
            order,
        };
        state.place_cursor(listing.highlighted);
        state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn highlight_row(&self) -> usize {
        self.highlight_row
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The entry under the cursor, if any.
    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    /// Entries currently inside the viewport.
    pub fn visible(&self) -> &[Entry] {
        let start = self.scroll_offset.min(self.entries.len());
        let end = (start + self.viewport.rows).min(self.entries.len());
        &self.entries[start..end]
    }

    /// Move the cursor one entry. No-op at either end of the listing.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Down if self.cursor + 1 < self.entries.len() => {
                self.cursor += 1;
                self.highlight_row += 1;
            }
            Direction::Up if self.cursor > 0 => {
                self.cursor -= 1;
                if self.highlight_row > 0 {
                    self.highlight_row -= 1;
                }
            }
            _ => return,
        }
        self.handle_scroll();
    }

    /// Sticky-edge reconciliation after a one-step move: once the highlight
    /// sits on an edge row the window slides instead.
    fn handle_scroll(&mut self) {
        let bottom = self.viewport.rows - 1;
        if self.highlight_row > bottom {
            self.scroll_offset += 1;
            self.highlight_row -= 1;
        } else if self.cursor < self.scroll_offset {
            self.scroll_offset -= 1;
        }
    }

    /// Apply a new viewport height (terminal resize).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.clamp_window();
    }

    fn max_scroll(&self) -> usize {
        self.entries.len().saturating_sub(self.viewport.rows)
    }

    /// Pull the window over the cursor and back inside the listing, then
    /// re-derive the highlight row.
    fn clamp_window(&mut self) {
        let rows = self.viewport.rows;
        if self.cursor >= self.scroll_offset + rows {
            self.scroll_offset = self.cursor + 1 - rows;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        self.highlight_row = self.cursor - self.scroll_offset;
    }

    /// Put the cursor on `index` after a fresh listing. Indices past the
    /// second-to-last row are centered in the viewport.
    fn place_cursor(&mut self, index: usize) {
        self.cursor = match self.entries.len() {
            0 => 0,
            len => index.min(len - 1),
        };
        let rows = self.viewport.rows;
        self.scroll_offset = if self.cursor + 2 > rows {
            self.cursor.saturating_sub(rows / 2)
        } else {
            0
        };
        self.clamp_window();
    }

    /// Resolve where `navigation` would go from this view.
    ///
    /// `None` means there is nothing to do: the root has no parent, or the
    /// listing is empty when descending.
    pub fn target(&self, navigation: &Navigation) -> Option<Target> {
        match navigation {
            Navigation::Parent => self.path.parent().map(|parent| Target {
                path: parent.to_path_buf(),
                highlight: Some(self.path.clone()),
            }),
            Navigation::Child => self.selected().map(|entry| Target {
                path: entry.path.clone(),
                highlight: None,
            }),
            Navigation::Refresh => Some(Target {
                path: self.path.clone(),
                highlight: None,
            }),
            Navigation::Jump(path) => Some(Target {
                path: path.clone(),
                highlight: None,
            }),
        }
    }

    /// Load `target` into this view. On error the view is left untouched.
    pub fn load(&mut self, target: &Target) -> Result<()> {
        let listing = listing::read(&target.path, target.highlight.as_deref(), self.order)?;
        tracing::debug!(
            path = %listing.base.display(),
            entries = listing.entries.len(),
            highlighted = listing.highlighted,
            "directory loaded"
        );
        self.path = listing.base;
        self.entries = listing.entries;
        self.place_cursor(listing.highlighted);
        Ok(())
    }

    /// Resolve and load `navigation` from this view.
    ///
    /// Returns `false` when the navigation was a no-op.
    pub fn change_directory(&mut self, navigation: &Navigation) -> Result<bool> {
        match self.target(navigation) {
            Some(target) => {
                self.load(&target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
