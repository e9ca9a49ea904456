use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::error::{Error, Result};
use super::decompose::Decomposition;
use super::path::Document;

/// Navigation ordering file understood by the mkdocs awesome-pages plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavMarker {
    pub title: String,
    pub arrange: Vec<String>,
}

impl NavMarker {
    pub fn for_root(document: &Document) -> Self {
        Self {
            title: document.directory_title(),
            arrange: vec![document.leaf_filename().to_string()],
        }
    }
}

/// A document after it has been moved into the tree.
#[derive(Debug, Clone)]
pub struct PlacedDocument {
    pub document: Document,
    pub location: PathBuf,
}

/// Moves a flat directory of generated pages into nested command directories.
pub struct Materializer<'a> {
    root: &'a Path,
    marker_file: &'a str,
}

impl<'a> Materializer<'a> {
    pub fn new(root: &'a Path, marker_file: &'a str) -> Self {
        Self { root, marker_file }
    }

    pub fn materialize(&self, decomposition: &Decomposition) -> Result<Vec<PlacedDocument>> {
        let mut placed = Vec::with_capacity(decomposition.documents.len());

        for document in &decomposition.documents {
            placed.push(self.place(document)?);
        }

        info!("Placed {} documents under {}", placed.len(), self.root.display());
        Ok(placed)
    }

    fn place(&self, document: &Document) -> Result<PlacedDocument> {
        let dir = self.root.join(document.relative_dir());
        create_dir_tolerant(&dir)?;

        let source = self.root.join(&document.filename);
        let location = dir.join(document.leaf_filename());
        if source != location {
            fs::rename(&source, &location).map_err(|e| Error::InvalidState(format!(
                "Failed to move '{}' to '{}': {}",
                source.display(), location.display(), e
            )))?;
            debug!("Moved {} -> {}", source.display(), location.display());
        }

        if document.is_root {
            self.write_marker(&dir, document)?;
        }

        Ok(PlacedDocument {
            document: document.clone(),
            location,
        })
    }

    fn write_marker(&self, dir: &Path, document: &Document) -> Result<()> {
        let marker = NavMarker::for_root(document);
        let content = serde_yaml::to_string(&marker)?;
        let path = dir.join(self.marker_file);
        fs::write(&path, content)?;
        debug!("Wrote navigation marker {}", path.display());
        Ok(())
    }
}

/// `create_dir_all` that treats an existing directory as success.
pub fn create_dir_tolerant(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{decompose, RootMatch};
    use tempfile::TempDir;

    fn seed(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), format!("# {}\n", name)).unwrap();
        }
    }

    #[test]
    fn test_materialize_goal_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let names = ["goal.md", "goal_account.md", "goal_account_new.md"];
        seed(root, &names);

        let decomposition = decompose(&names, RootMatch::TokenPrefix).unwrap();
        let placed = Materializer::new(root, ".pages").materialize(&decomposition).unwrap();

        assert_eq!(placed.len(), 3);
        assert!(root.join("goal/goal.md").is_file());
        assert!(root.join("goal/account/account.md").is_file());
        assert!(root.join("goal/account/new.md").is_file());
        assert!(!root.join("goal.md").exists());

        let marker: NavMarker = serde_yaml::from_str(
            &fs::read_to_string(root.join("goal/account/.pages")).unwrap()
        ).unwrap();
        assert_eq!(marker.title, "goal account");
        assert_eq!(marker.arrange, vec!["account.md"]);

        let marker: NavMarker = serde_yaml::from_str(
            &fs::read_to_string(root.join("goal/.pages")).unwrap()
        ).unwrap();
        assert_eq!(marker.arrange, vec!["goal.md"]);
    }

    #[test]
    fn test_leaf_directory_has_no_marker() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        seed(root, &["a_b.md"]);

        let decomposition = decompose(&["a_b.md"], RootMatch::TokenPrefix).unwrap();
        Materializer::new(root, ".pages").materialize(&decomposition).unwrap();

        assert!(root.join("a/b.md").is_file());
        assert!(!root.join("a/.pages").exists());
    }

    #[test]
    fn test_directory_creation_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("x/y");

        create_dir_tolerant(&dir).unwrap();
        create_dir_tolerant(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_materialize_into_existing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("goal/account")).unwrap();
        let names = ["goal.md", "goal_account.md", "goal_account_new.md"];
        seed(root, &names);

        let decomposition = decompose(&names, RootMatch::TokenPrefix).unwrap();
        let placed = Materializer::new(root, ".pages").materialize(&decomposition).unwrap();
        assert_eq!(placed.len(), 3);
    }

    #[test]
    fn test_top_level_leaf_stays_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        seed(root, &["onlycmd.md"]);

        let decomposition = decompose(&["onlycmd.md"], RootMatch::TokenPrefix).unwrap();
        let placed = Materializer::new(root, ".pages").materialize(&decomposition).unwrap();

        assert_eq!(placed[0].location, root.join("onlycmd.md"));
        assert!(root.join("onlycmd.md").is_file());
    }
}
