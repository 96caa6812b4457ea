use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// What a new name will be created as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Names with an extension-like dot become files, everything else a directory.
    pub fn for_name(name: &str) -> Self {
        if name.contains('.') {
            EntryKind::File
        } else {
            EntryKind::Directory
        }
    }
}

/// Reject names that would escape `parent` or aren't a single component.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidTarget(format!("bad entry name {:?}", name)));
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(AppError::InvalidTarget(format!(
            "entry name {:?} contains a path separator",
            name
        )));
    }
    Ok(())
}

/// Create an empty file at the given path. Never truncates an existing file.
pub fn create_file(path: &Path) -> Result<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| AppError::from_io(e, path))?;
    Ok(())
}

/// Create a new directory at the given path.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| AppError::from_io(e, path))
}

/// Create `name` inside `parent` as a file or directory depending on its name.
///
/// Returns the full path of the created entry.
pub fn create_entry(parent: &Path, name: &str) -> Result<PathBuf> {
    validate_name(name)?;
    let path = parent.join(name);
    match EntryKind::for_name(name) {
        EntryKind::File => create_file(&path)?,
        EntryKind::Directory => create_dir(&path)?,
    }
    Ok(path)
}

/// Remove a file or an empty directory. Non-empty directories are refused.
pub fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| AppError::from_io(e, path))?;
    let res = if meta.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    res.map_err(|e| AppError::from_io(e, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_for_name() {
        assert_eq!(EntryKind::for_name("notes.txt"), EntryKind::File);
        assert_eq!(EntryKind::for_name(".env"), EntryKind::File);
        assert_eq!(EntryKind::for_name("build"), EntryKind::Directory);
    }

    #[test]
    fn test_create_entry_file() {
        let tmp = TempDir::new().unwrap();
        let path = create_entry(tmp.path(), "test.txt").unwrap();
        assert_eq!(path, tmp.path().join("test.txt"));
        assert!(path.is_file());
    }

    #[test]
    fn test_create_entry_dir() {
        let tmp = TempDir::new().unwrap();
        let path = create_entry(tmp.path(), "subdir").unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_create_file_does_not_truncate_existing() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("existing.txt");
        fs::write(&file_path, "keep me").unwrap();
        let err = create_entry(tmp.path(), "existing.txt").unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "keep me");
    }

    #[test]
    fn test_create_dir_already_exists_fails() {
        let tmp = TempDir::new().unwrap();
        create_entry(tmp.path(), "dup").unwrap();
        let err = create_entry(tmp.path(), "dup").unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn test_create_entry_rejects_bad_names() {
        let tmp = TempDir::new().unwrap();
        for name in ["", ".", "..", "a/b"] {
            let err = create_entry(tmp.path(), name).unwrap_err();
            assert!(matches!(err, AppError::InvalidTarget(_)), "{name:?}");
        }
    }

    #[test]
    fn test_remove_file() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("delete_me.txt");
        create_file(&file_path).unwrap();
        remove_entry(&file_path).unwrap();
        assert!(!file_path.exists());
    }

    #[test]
    fn test_remove_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let dir_path = tmp.path().join("empty");
        create_dir(&dir_path).unwrap();
        remove_entry(&dir_path).unwrap();
        assert!(!dir_path.exists());
    }

    #[test]
    fn test_remove_non_empty_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let dir_path = tmp.path().join("full");
        create_dir(&dir_path).unwrap();
        create_file(&dir_path.join("inner.txt")).unwrap();
        let err = remove_entry(&dir_path).unwrap_err();
        assert!(matches!(err, AppError::NotEmpty(_)));
        assert!(dir_path.join("inner.txt").exists());
    }

    #[test]
    fn test_remove_nonexistent_fails() {
        let tmp = TempDir::new().unwrap();
        let err = remove_entry(&tmp.path().join("no_such_file.txt")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
