use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, error};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::layout::create_dir_tolerant;

/// Runs the documented binary to produce a fresh flat directory of pages.
pub struct DocGenerator {
    pub command: PathBuf,
    pub config: GeneratorConfig,
}

impl DocGenerator {
    pub fn new(command: impl Into<PathBuf>, config: GeneratorConfig) -> Self {
        Self {
            command: command.into(),
            config,
        }
    }

    /// Empty `doc_dir` and fill it with `<command> <subcommand> <doc_dir>`.
    ///
    /// The command is checked before the directory is deleted.
    pub fn regenerate(&self, doc_dir: &Path) -> Result<()> {
        if !self.is_available() {
            return Err(Error::Generator(format!(
                "Command not found: {}", self.command.display()
            )));
        }

        if doc_dir.exists() {
            println!("Deleting directory: {}", doc_dir.display());
            fs::remove_dir_all(doc_dir)?;
        }
        create_dir_tolerant(doc_dir)?;

        self.run(doc_dir)
    }

    /// A path must exist, a bare name must resolve through PATH.
    pub fn is_available(&self) -> bool {
        if self.command.components().count() > 1 {
            return self.command.is_file();
        }

        Command::new("which")
            .arg(&self.command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn run(&self, doc_dir: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(&self.config.subcommand).arg(doc_dir);
        debug!("Spawning process: {:?}", cmd);

        let status = cmd.status().map_err(|e| {
            error!("Failed to launch {}: {}", self.command.display(), e);
            Error::Generator(format!("Failed to launch '{}': {}", self.command.display(), e))
        })?;

        if !status.success() {
            return Err(Error::Generator(format!(
                "'{} {}' exited with status: {}",
                self.command.display(), self.config.subcommand, status
            )));
        }

        info!("Generated documentation into {}", doc_dir.display());
        Ok(())
    }
}
