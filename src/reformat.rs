use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, info_span};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::layout::{decompose, fix_root, Decomposition, FixOutcome, Materializer};
use crate::links::LinkRewriter;

/// Pipeline stages, run once each and in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decompose,
    Materialize,
    RewriteLinks,
    FixRoot,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decompose => "decompose",
            Stage::Materialize => "materialize",
            Stage::RewriteLinks => "rewrite-links",
            Stage::FixRoot => "fix-root",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct ReformatSummary {
    pub processed: usize,
    pub roots: usize,
    pub links_rewritten: usize,
    pub outcome: FixOutcome,
}

pub struct Reformatter {
    layout: LayoutConfig,
}

impl Reformatter {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Decompose the pages in `doc_dir` without touching the filesystem.
    pub fn plan(&self, doc_dir: &Path) -> Result<Decomposition> {
        let filenames = list_documents(doc_dir)?;
        decompose(filenames.as_slice(), self.layout.root_match)
    }

    /// Turn the flat directory into the nested site layout.
    ///
    /// A count mismatch in the last stage is reported through the summary's
    /// outcome; moves done before it are kept.
    pub fn run(&self, doc_dir: &Path) -> Result<ReformatSummary> {
        let _span = info_span!("reformat", dir = %doc_dir.display()).entered();

        enter(Stage::Decompose);
        let decomposition = self.plan(doc_dir)?;
        let roots = decomposition.roots().count();

        enter(Stage::Materialize);
        let placed = Materializer::new(doc_dir, &self.layout.marker_file)
            .materialize(&decomposition)?;

        enter(Stage::RewriteLinks);
        let rewriter = LinkRewriter::new(&decomposition.with_subcommand, self.layout.link_depth_offset)?;
        let mut links_rewritten = 0;
        for document in &placed {
            links_rewritten += rewriter.rewrite_document(document)?;
        }

        enter(Stage::FixRoot);
        let outcome = fix_root(placed.len(), doc_dir)?;

        enter(Stage::Done);
        Ok(ReformatSummary {
            processed: placed.len(),
            roots,
            links_rewritten,
            outcome,
        })
    }
}

fn enter(stage: Stage) {
    info!("Stage: {}", stage);
}

/// Names of the markdown pages directly inside `dir`, sorted.
pub fn list_documents(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!("Skipping non UTF-8 entry: {:?}", name);
            continue;
        };

        if entry.file_type()?.is_file() && name.ends_with(".md") {
            names.push(name.to_string());
        } else {
            debug!("Skipping {}", name);
        }
    }

    names.sort();
    Ok(names)
}

/// The layout logic builds `/`-separated paths and URLs.
pub fn ensure_posix() -> Result<()> {
    if std::path::MAIN_SEPARATOR != '/' {
        return Err(Error::UnsupportedPlatform(format!(
            "path separator is '{}', only '/' is supported", std::path::MAIN_SEPARATOR
        )));
    }
    Ok(())
}
