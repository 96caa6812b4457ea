//! Search-line grammar: a query is either filter text or a prefixed command.

use std::path::{Path, PathBuf};

/// Prefixes that turn the search line into a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPrefixes {
    pub jump: String,
    pub create: String,
    pub delete: String,
}

impl Default for CommandPrefixes {
    fn default() -> Self {
        Self {
            jump: "/".to_string(),
            create: "/n".to_string(),
            delete: "/d".to_string(),
        }
    }
}

/// What submitting the search line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the selection of whichever view is active.
    Open,
    /// Jump to `home` joined with the given remainder.
    Jump(String),
    /// Create an entry with the given name in the current directory.
    Create(String),
    /// Ask to delete the entry under the cursor.
    Delete,
    /// Command prefix with an unrecognised head.
    Unknown(String),
}

impl CommandPrefixes {
    /// Whether `query` is being typed as a command (filtering is suspended).
    pub fn is_command(&self, query: &str) -> bool {
        [&self.jump, &self.create, &self.delete]
            .iter()
            .any(|p| !p.is_empty() && query.starts_with(p.as_str()))
    }

    /// Parse the search line at submit time.
    pub fn parse(&self, query: &str) -> Command {
        if !self.is_command(query) {
            return Command::Open;
        }
        let (head, rest) = match query.split_once(' ') {
            Some((head, rest)) => (head, rest.trim()),
            None => (query, ""),
        };
        if head == self.jump {
            Command::Jump(rest.to_string())
        } else if head == self.create {
            Command::Create(rest.to_string())
        } else if head == self.delete {
            Command::Delete
        } else {
            Command::Unknown(head.to_string())
        }
    }
}

/// Resolve a jump remainder against the home directory. Absolute remainders
/// replace the home directory entirely.
pub fn jump_path(home: &Path, rest: &str) -> PathBuf {
    if rest.is_empty() {
        home.to_path_buf()
    } else {
        home.join(rest)
    }
}
