use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{Error, Result};
use super::path::{CommandPath, Document};

/// How a document is recognised as having subcommands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RootMatch {
    /// Another command path starts with all of this path's tokens.
    #[default]
    TokenPrefix,
    /// Another filename contains `<this path>_` anywhere. Can misfire when an
    /// unrelated name shares the character sequence, e.g. `b` vs `ab_c`.
    Substring,
}

impl fmt::Display for RootMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootMatch::TokenPrefix => write!(f, "token-prefix"),
            RootMatch::Substring => write!(f, "substring"),
        }
    }
}

impl FromStr for RootMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token-prefix" | "token_prefix" | "prefix" => Ok(RootMatch::TokenPrefix),
            "substring" => Ok(RootMatch::Substring),
            other => Err(Error::Config(format!("unknown root match mode: {}", other))),
        }
    }
}

/// Leaf names of every root document.
///
/// Links pointing at one of these need the doubled `leaf/leaf/` segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithSubcommand(BTreeSet<String>);

impl WithSubcommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, leaf: impl Into<String>) -> bool {
        self.0.insert(leaf.into())
    }

    pub fn contains(&self, leaf: &str) -> bool {
        self.0.contains(leaf)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WithSubcommand {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct Decomposition {
    pub documents: Vec<Document>,
    pub with_subcommand: WithSubcommand,
}

impl Decomposition {
    pub fn roots(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.is_root)
    }
}

pub fn is_root(candidate: &CommandPath, all: &[CommandPath], mode: RootMatch) -> bool {
    match mode {
        RootMatch::TokenPrefix => all.iter().any(|other| candidate.is_strict_prefix_of(other)),
        RootMatch::Substring => {
            let needle = format!("{}_", candidate.stem());
            all.iter().any(|other| other.stem().contains(&needle))
        }
    }
}

/// Parse every filename and classify it as root or leaf.
///
/// Fails on the first name that is not a command path, or when two pages
/// would land on the same file, before anything on disk has been touched.
pub fn decompose<S: AsRef<str>>(filenames: &[S], mode: RootMatch) -> Result<Decomposition> {
    let mut names: Vec<&str> = filenames.iter().map(AsRef::as_ref).collect();
    names.sort_unstable();
    names.dedup();

    let paths = names
        .iter()
        .map(|name| CommandPath::parse(name))
        .collect::<Result<Vec<_>>>()?;

    let mut documents = Vec::with_capacity(names.len());
    let mut with_subcommand = WithSubcommand::new();

    for (name, path) in names.iter().zip(&paths) {
        let root = is_root(path, &paths, mode);
        if root {
            with_subcommand.insert(path.leaf());
        }

        debug!("{} -> root={}", name, root);
        documents.push(Document {
            filename: name.to_string(),
            path: path.clone(),
            is_root: root,
        });
    }

    ensure_distinct_locations(&documents)?;

    Ok(Decomposition { documents, with_subcommand })
}

/// A root `x_y` lives at `x/y/y.md`, which is also where a child `x_y_y` goes.
fn ensure_distinct_locations(documents: &[Document]) -> Result<()> {
    let mut placed: BTreeMap<PathBuf, &str> = BTreeMap::new();

    for document in documents {
        let location = document.relative_path();
        if let Some(other) = placed.get(&location) {
            return Err(Error::InvalidFilename(format!(
                "'{}' and '{}' would both be placed at {}",
                other, document.filename, location.display()
            )));
        }
        placed.insert(location, &document.filename);
    }

    Ok(())
}
