use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;
use crate::error::{Error, Result};

/// Loose entries found directly inside the output root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootEntries {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

impl RootEntries {
    pub fn scan(root: &Path) -> Result<Self> {
        let mut entries = Self::default();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let file_type = entry.file_type();
            if file_type.is_file() {
                entries.files.push(entry.into_path());
            } else if file_type.is_dir() {
                entries.directories.push(entry.into_path());
            }
        }

        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMismatch {
    Files(usize),
    Directories(usize),
}

impl fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountMismatch::Files(n) => write!(f, "WRONG NUMBER OF FILES IN ROOT PATH: {}", n),
            CountMismatch::Directories(n) => write!(f, "WRONG NUMBER OF DIRECTORIES IN ROOT PATH: {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// Single command: the lone file now sits next to the removed root.
    Promoted { file: PathBuf },
    /// The only subdirectory replaced the root.
    Unwrapped { from: PathBuf },
    /// Nothing was touched.
    CountMismatch(CountMismatch),
}

/// Undo the extra nesting level the decomposition leaves at the top.
pub fn fix_root(processed: usize, root: &Path) -> Result<FixOutcome> {
    let entries = RootEntries::scan(root)?;

    if processed == 1 && entries.files.len() == 1 {
        return promote(root, &entries.files[0]);
    }

    if !entries.files.is_empty() {
        let mismatch = CountMismatch::Files(entries.files.len());
        warn!("{}", mismatch);
        return Ok(FixOutcome::CountMismatch(mismatch));
    }
    if entries.directories.len() != 1 {
        let mismatch = CountMismatch::Directories(entries.directories.len());
        warn!("{}", mismatch);
        return Ok(FixOutcome::CountMismatch(mismatch));
    }

    unwrap_only_child(root, &entries.directories[0])
}

fn promote(root: &Path, file: &Path) -> Result<FixOutcome> {
    let parent = root.parent()
        .ok_or_else(|| Error::InvalidState(format!("'{}' has no parent directory", root.display())))?;
    let name = file.file_name()
        .ok_or_else(|| Error::InvalidState(format!("'{}' has no file name", file.display())))?;
    let target = parent.join(name);
    if target.exists() {
        return Err(Error::InvalidState(format!(
            "'{}' already exists, not replacing it with '{}'", target.display(), file.display()
        )));
    }

    fs::rename(file, &target)?;
    fs::remove_dir_all(root)?;

    info!("Promoted {} out of {}", target.display(), root.display());
    Ok(FixOutcome::Promoted { file: target })
}

fn unwrap_only_child(root: &Path, only_child: &Path) -> Result<FixOutcome> {
    let staging = staging_path(root)?;
    if staging.exists() {
        return Err(Error::InvalidState(format!(
            "Staging path '{}' already exists", staging.display()
        )));
    }

    fs::rename(only_child, &staging)?;
    fs::remove_dir(root)?;
    fs::rename(&staging, root)?;

    info!("Unwrapped {} into {}", only_child.display(), root.display());
    Ok(FixOutcome::Unwrapped { from: only_child.to_path_buf() })
}

fn staging_path(root: &Path) -> Result<PathBuf> {
    let name = root.file_name()
        .ok_or_else(|| Error::InvalidState(format!("'{}' has no directory name", root.display())))?;
    let mut staging = name.to_os_string();
    staging.push(".tmp");
    Ok(root.with_file_name(staging))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_single_command_promoted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("onlycmd");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("onlycmd.md"), "title: onlycmd\n---\n").unwrap();

        let outcome = fix_root(1, &root).unwrap();

        let promoted = temp_dir.path().join("onlycmd.md");
        assert_eq!(outcome, FixOutcome::Promoted { file: promoted.clone() });
        assert!(promoted.is_file());
        assert!(!root.exists());
    }

    #[test]
    fn test_promotion_keeps_existing_page() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("onlycmd");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("onlycmd.md"), "title: onlycmd\n---\n").unwrap();
        fs::write(temp_dir.path().join("onlycmd.md"), "hand written").unwrap();

        let result = fix_root(1, &root);

        assert!(matches!(result, Err(Error::InvalidState(_))));
        assert_eq!(fs::read_to_string(temp_dir.path().join("onlycmd.md")).unwrap(), "hand written");
        assert!(root.join("onlycmd.md").is_file());
    }

    #[test]
    fn test_single_subdirectory_unwrapped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("goal");
        fs::create_dir_all(root.join("goal/account")).unwrap();
        fs::write(root.join("goal/goal.md"), "").unwrap();
        fs::write(root.join("goal/account/new.md"), "").unwrap();

        let outcome = fix_root(2, &root).unwrap();

        assert!(matches!(outcome, FixOutcome::Unwrapped { .. }));
        assert!(root.join("goal.md").is_file());
        assert!(root.join("account/new.md").is_file());
        assert!(!root.join("goal").exists());
        assert!(!temp_dir.path().join("goal.tmp").exists());
    }

    #[test]
    fn test_loose_files_abort_without_changes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("docs");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.md"), "").unwrap();
        fs::write(root.join("b.md"), "").unwrap();

        let outcome = fix_root(2, &root).unwrap();

        assert_eq!(outcome, FixOutcome::CountMismatch(CountMismatch::Files(2)));
        assert!(root.join("a.md").is_file());
        assert!(root.join("b.md").is_file());
    }

    #[test]
    fn test_multiple_directories_abort() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("docs");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();

        let outcome = fix_root(4, &root).unwrap();

        assert_eq!(outcome, FixOutcome::CountMismatch(CountMismatch::Directories(2)));
        assert!(root.join("a").is_dir());
        assert!(root.join("b").is_dir());
    }

    #[test]
    fn test_existing_staging_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("goal");
        fs::create_dir_all(root.join("goal")).unwrap();
        fs::create_dir(temp_dir.path().join("goal.tmp")).unwrap();

        let result = fix_root(3, &root);
        assert!(matches!(result, Err(Error::InvalidState(_))));
        assert!(root.join("goal").is_dir());
    }

    #[test]
    fn test_mismatch_message() {
        assert_eq!(
            CountMismatch::Files(2).to_string(),
            "WRONG NUMBER OF FILES IN ROOT PATH: 2"
        );
        assert_eq!(
            CountMismatch::Directories(0).to_string(),
            "WRONG NUMBER OF DIRECTORIES IN ROOT PATH: 0"
        );
    }
}
