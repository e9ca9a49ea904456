use std::borrow::Cow;
use std::fs;
use std::io::Write;
use regex::Regex;
use tempfile::NamedTempFile;
use tracing::debug;
use crate::error::{Error, Result};
use crate::layout::{CommandPath, PlacedDocument, WithSubcommand};

/// Directory levels between the generated tree and the site's docs root.
pub const SITE_DEPTH_OFFSET: usize = 2;

const LIST_LINK_PATTERN: &str = r"^(\* \[.*\]\()(.*)(\).*)$";

/// Rewrites `* [label](cmd_sub.md)` list entries into relative directory URLs.
pub struct LinkRewriter<'a> {
    pattern: Regex,
    with_subcommand: &'a WithSubcommand,
    depth_offset: usize,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(with_subcommand: &'a WithSubcommand, depth_offset: usize) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(LIST_LINK_PATTERN)?,
            with_subcommand,
            depth_offset,
        })
    }

    /// Relative URL for `target` seen from a page at `depth`, or `None` when
    /// the target is not a command page.
    pub fn relative_link(&self, target: &str, depth: isize) -> Option<String> {
        if target.contains("://") {
            return None;
        }
        let path = CommandPath::parse(target).ok()?;
        let leaf = path.leaf();

        let climb = depth - path.leaf_index() as isize + self.depth_offset as isize;
        let mut link = "../".repeat(climb.max(0) as usize);
        link.push_str(leaf);
        link.push('/');
        if self.with_subcommand.contains(leaf) {
            link.push_str(leaf);
            link.push('/');
        }
        Some(link)
    }

    /// Rewrite a single line (without its terminator).
    pub fn rewrite_line<'l>(&self, line: &'l str, depth: isize) -> Cow<'l, str> {
        let Some(caps) = self.pattern.captures(line) else {
            return Cow::Borrowed(line);
        };

        match self.relative_link(&caps[2], depth) {
            Some(link) => Cow::Owned(format!("{}{}{}", &caps[1], link, &caps[3])),
            None => Cow::Borrowed(line),
        }
    }

    /// Rewrite the body of a page, keeping every line terminator as it was.
    /// Returns the new text and the number of links changed.
    pub fn rewrite_text(&self, text: &str, depth: isize) -> (String, usize) {
        let mut output = String::with_capacity(text.len());
        let mut rewritten = 0;

        for raw in text.split_inclusive('\n') {
            let (line, ending) = split_line_ending(raw);
            let new_line = self.rewrite_line(line, depth);
            if let Cow::Owned(_) = new_line {
                rewritten += 1;
            }
            output.push_str(&new_line);
            output.push_str(ending);
        }

        (output, rewritten)
    }

    /// Prepend the title header and rewrite links of a placed page in place.
    ///
    /// The new content goes to a temporary file in the same directory which is
    /// then renamed over the original.
    pub fn rewrite_document(&self, placed: &PlacedDocument) -> Result<usize> {
        let location = &placed.location;
        let text = fs::read_to_string(location).map_err(|e| Error::LinkRewrite(format!(
            "Failed to read '{}': {}", location.display(), e
        )))?;

        let (body, rewritten) = self.rewrite_text(&text, placed.document.depth());

        let dir = location.parent().ok_or_else(|| Error::InvalidState(format!(
            "'{}' has no parent directory", location.display()
        )))?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(front_matter(&placed.document.title()).as_bytes())?;
        tmp.write_all(body.as_bytes())?;
        tmp.flush()?;
        // temp files are created 0600, keep the page's original mode
        fs::set_permissions(tmp.path(), fs::metadata(location)?.permissions())?;
        tmp.persist(location)?;

        debug!("Rewrote {} links in {}", rewritten, location.display());
        Ok(rewritten)
    }
}

pub fn front_matter(title: &str) -> String {
    format!("title: {}\n---\n", title)
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, &raw[line.len()..])
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, &raw[line.len()..])
    } else {
        (raw, "")
    }
}
