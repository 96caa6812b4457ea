use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, Result};

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
}

impl Entry {
    /// Build an entry for `name` inside `base`.
    pub fn new(base: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = base.join(&name);
        Self { name, path }
    }

    /// Name-based guess used by the renderer: anything without a dot is
    /// treated as a directory.
    pub fn looks_like_dir(&self) -> bool {
        !self.name.contains('.')
    }
}

/// Order in which entries are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingOrder {
    /// Sorted by file name, byte-wise.
    #[default]
    Name,
    /// Whatever order the OS enumerates in.
    Native,
}

impl FromStr for ListingOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(ListingOrder::Name),
            "native" => Ok(ListingOrder::Native),
            other => Err(AppError::InvalidTarget(format!("unknown listing order {}", other))),
        }
    }
}

/// Result of reading a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub base: PathBuf,
    pub entries: Vec<Entry>,
    /// Index of the entry whose path matched the highlight target, or 0.
    pub highlighted: usize,
}

/// Read the immediate children of `path`.
///
/// `highlight` is matched against each child's full path; the matching index
/// is reported in [`Listing::highlighted`]. Entries that vanish between
/// enumeration and inspection are skipped.
pub fn read(path: &Path, highlight: Option<&Path>, order: ListingOrder) -> Result<Listing> {
    let meta = fs::metadata(path).map_err(|e| AppError::from_io(e, path))?;
    if !meta.is_dir() {
        return Err(AppError::NotADirectory(path.display().to_string()));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| AppError::from_io(e, path))? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let name = entry.file_name().to_string_lossy().to_string();
        entries.push(Entry::new(path, name));
    }

    if order == ListingOrder::Name {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let highlighted = highlight
        .and_then(|target| entries.iter().position(|e| e.path == target))
        .unwrap_or(0);

    Ok(Listing {
        base: path.to_path_buf(),
        entries,
        highlighted,
    })
}
