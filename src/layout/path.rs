use std::fmt;
use std::path::PathBuf;
use crate::error::{Error, Result};

/// Underscore-delimited command path, e.g. `goal account new` for
/// `goal_account_new.md`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandPath {
    tokens: Vec<String>,
}

impl CommandPath {
    /// Parse the text before the first `.` into command tokens.
    ///
    /// Works for plain filenames (`goal_account.md`) as well as link targets
    /// carrying a suffix (`goal_account.md#options`).
    pub fn parse(text: &str) -> Result<Self> {
        let stem = text.split('.').next().unwrap_or_default();
        if stem.is_empty() {
            return Err(Error::InvalidFilename(format!("no command name in '{}'", text)));
        }

        let tokens: Vec<String> = stem.split('_').map(str::to_string).collect();
        if tokens.iter().any(String::is_empty) {
            return Err(Error::InvalidFilename(format!("empty command token in '{}'", text)));
        }

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one token
        self.tokens.last().map(String::as_str).unwrap_or_default()
    }

    pub fn prefix(&self) -> &[String] {
        &self.tokens[..self.tokens.len() - 1]
    }

    /// Position of the first token equal to the leaf.
    pub fn leaf_index(&self) -> usize {
        let leaf = self.leaf();
        self.tokens
            .iter()
            .position(|t| t == leaf)
            .unwrap_or(self.tokens.len() - 1)
    }

    /// Tokens joined back with underscores, without extension.
    pub fn stem(&self) -> String {
        self.tokens.join("_")
    }

    /// Human readable name, tokens joined with spaces.
    pub fn title(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_strict_prefix_of(&self, other: &CommandPath) -> bool {
        other.tokens.len() > self.tokens.len() && other.tokens.starts_with(&self.tokens)
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stem())
    }
}

/// One generated markdown page and where it belongs in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub path: CommandPath,
    pub is_root: bool,
}

impl Document {
    pub fn new(filename: impl Into<String>, is_root: bool) -> Result<Self> {
        let filename = filename.into();
        let path = CommandPath::parse(&filename)?;
        Ok(Self { filename, path, is_root })
    }

    /// Last underscore segment of the original name, extension included.
    pub fn leaf_filename(&self) -> &str {
        self.filename.rsplit('_').next().unwrap_or(&self.filename)
    }

    /// Directory tokens: the prefix, plus the leaf itself for roots.
    pub fn directory_tokens(&self) -> &[String] {
        if self.is_root {
            self.path.tokens()
        } else {
            self.path.prefix()
        }
    }

    pub fn relative_dir(&self) -> PathBuf {
        self.directory_tokens().iter().collect()
    }

    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir().join(self.leaf_filename())
    }

    /// Nesting depth used by link rewriting; `-1` for a top-level leaf.
    pub fn depth(&self) -> isize {
        self.directory_tokens().len() as isize - 1
    }

    pub fn title(&self) -> String {
        self.path.title()
    }

    /// Title of the directory this root document owns.
    pub fn directory_title(&self) -> String {
        self.directory_tokens().join(" ")
    }
}
