use std::fs;
use std::io;
use std::path::Path;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use crate::generator::DocGenerator;
use crate::layout::{create_dir_tolerant, FixOutcome};
use crate::reformat::{ensure_posix, Reformatter};

/// Regenerate (optionally), restructure and fix links in the document directory
pub fn reformat(doc_dir: &Path, cmd: Option<&Path>, config: &Config) -> Result<()> {
    ensure_posix()?;

    if !doc_dir.is_dir() {
        create_dir_tolerant(doc_dir)?;
        info!("Created document directory: {}", doc_dir.display());
    }

    if let Some(cmd) = cmd {
        DocGenerator::new(cmd, config.generator.clone()).regenerate(doc_dir)?;
    }

    // Resolves trailing slashes and gives the root fixer a real parent
    let doc_dir = fs::canonicalize(doc_dir)?;
    debug!("Using document directory: {}", doc_dir.display());

    let summary = Reformatter::new(config.layout.clone()).run(&doc_dir)?;

    match &summary.outcome {
        FixOutcome::CountMismatch(mismatch) => println!("{}", mismatch),
        FixOutcome::Promoted { file } => info!("Single command page moved to {}", file.display()),
        FixOutcome::Unwrapped { .. } => {}
    }

    info!(
        "{} root pages, {} links rewritten",
        summary.roots, summary.links_rewritten
    );
    println!("Finished formatting {} files.", summary.processed);

    Ok(())
}

/// Print where every page would go, without touching anything
pub fn dry_run(doc_dir: &Path, config: &Config) -> Result<()> {
    ensure_posix()?;

    if !doc_dir.is_dir() {
        return Err(Error::NotFound(format!("Document directory: {}", doc_dir.display())));
    }

    let plan = Reformatter::new(config.layout.clone()).plan(doc_dir)?;

    println!("Planned layout for {} ({} pages):", doc_dir.display(), plan.documents.len());
    for document in &plan.documents {
        let marker = if document.is_root { "  [root]" } else { "" };
        println!(
            "   {} -> {}{}",
            document.filename,
            document.relative_path().display(),
            marker
        );
    }

    if !plan.with_subcommand.is_empty() {
        let names: Vec<&str> = plan.with_subcommand.iter().collect();
        println!("Commands with subcommands: {}", names.join(", "));
    }

    Ok(())
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Initialize logging; diagnostics go to stderr so stdout only carries the report
pub fn init_logging(debug: bool, verbose: bool, logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_new(&logging.level)
            .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", logging.level, e)))?
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug);

    let result = if logging.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized");
    Ok(())
}
