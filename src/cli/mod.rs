pub mod commands;

use clap::Parser;
use crate::error::Result;
use crate::layout::RootMatch;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docs-reformat")]
#[command(about = "Reformat generated command reference markdown for display in mkdocs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// Path to the document directory
    #[arg(long = "doc-dir", value_name = "DIR", required_unless_present = "completions")]
    pub doc_dir: Option<PathBuf>,

    /// Full path to the documented command. The document directory is emptied
    /// and regenerated with '<cmd> generate-docs <doc-dir>' first
    #[arg(long, value_name = "PATH")]
    pub cmd: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "DOCS_REFORMAT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How pages with subcommands are detected
    #[arg(long, value_enum)]
    pub root_match: Option<RootMatch>,

    /// Print the planned layout without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(shell) = self.completions {
            commands::generate_completions(shell);
            return Ok(());
        }

        let mut config = crate::Config::resolve(self.config.as_deref())?;
        if let Some(mode) = self.root_match {
            config.layout.root_match = mode;
        }

        commands::init_logging(self.debug, self.verbose, &config.logging)?;

        let doc_dir = match self.doc_dir {
            Some(dir) => dir,
            None => return Err(crate::Error::Config("--doc-dir is required".to_string())),
        };

        if self.dry_run {
            return commands::dry_run(&doc_dir, &config);
        }

        commands::reformat(&doc_dir, self.cmd.as_deref(), &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_doc_dir() {
        let cli = Cli::try_parse_from(["docs-reformat", "--doc-dir", "goal"]).unwrap();
        assert_eq!(cli.doc_dir, Some(PathBuf::from("goal")));
        assert!(cli.cmd.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_doc_dir_required() {
        assert!(Cli::try_parse_from(["docs-reformat"]).is_err());
        assert!(Cli::try_parse_from(["docs-reformat", "--completions", "bash"]).is_ok());
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "docs-reformat", "--doc-dir", "goal/", "--cmd", "/usr/bin/goal",
            "--root-match", "substring", "--dry-run", "-v",
        ]).unwrap();
        assert_eq!(cli.cmd, Some(PathBuf::from("/usr/bin/goal")));
        assert_eq!(cli.root_match, Some(RootMatch::Substring));
        assert!(cli.dry_run);
        assert!(cli.verbose);
    }
}
