//! Directory tree rendering in the classic `tree` layout.

use crate::{
    error::{Error, Result},
    filter::ExclusionSet,
};
use std::cmp::Ordering;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Rendered tree plus totals over every included entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeListing {
    /// Output lines, starting with `.` and ending with the summary line
    pub lines: Vec<String>,

    /// Directories below the root
    pub dir_count: usize,

    /// Files below the root
    pub file_count: usize,
}

impl TreeListing {
    /// Joins the lines into the text written to `directory_tree.txt`.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

struct TreeEntry {
    name: OsString,
    path: PathBuf,
    is_dir: bool,
}

impl TreeEntry {
    /// Directories first, then by name.
    fn compare(&self, other: &Self) -> Ordering {
        other
            .is_dir
            .cmp(&self.is_dir)
            .then_with(|| self.name.cmp(&other.name))
    }
}

struct TreeBuilder<'a> {
    exclusions: &'a ExclusionSet,
    lines: Vec<String>,
    dir_count: usize,
    file_count: usize,
}

impl TreeBuilder<'_> {
    fn visit(&mut self, dir: &Path, indent: &str) -> Result<()> {
        let entries = self.read_children(dir)?;
        let last = entries.len().saturating_sub(1);

        for (i, entry) in entries.iter().enumerate() {
            let is_last = i == last;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };

            self.lines
                .push(format!("{indent}{connector}{}", entry.name.to_string_lossy()));

            if entry.is_dir {
                self.dir_count += 1;
                let child_indent = format!(
                    "{indent}{}",
                    if is_last { SPACE_INDENT } else { PIPE_INDENT }
                );
                if let Err(e) = self.visit(&entry.path, &child_indent) {
                    warn!("Cannot list {}: {}", entry.path.display(), e);
                }
            } else {
                self.file_count += 1;
            }
        }

        Ok(())
    }

    fn read_children(&self, dir: &Path) -> Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let name = entry.file_name();

            if self.exclusions.is_excluded(&name.to_string_lossy()) {
                debug!("Tree skips excluded entry: {}", entry.path().display());
                continue;
            }

            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(TreeEntry {
                name,
                path: entry.path(),
                is_dir,
            });
        }

        entries.sort_by(TreeEntry::compare);
        Ok(entries)
    }
}

/// Renders `root` as a box-drawing tree.
///
/// Excluded names are pruned together with their subtrees and do not count
/// towards the totals. Subdirectories that cannot be listed are logged and
/// shown without children.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be listed.
pub fn render_tree(root: &Path, exclusions: &ExclusionSet) -> Result<TreeListing> {
    let mut builder = TreeBuilder {
        exclusions,
        lines: vec![".".to_string()],
        dir_count: 0,
        file_count: 0,
    };

    builder.visit(root, "")?;

    let TreeBuilder {
        mut lines,
        dir_count,
        file_count,
        ..
    } = builder;

    lines.push(String::new());
    lines.push(format!("{dir_count} directories, {file_count} files"));

    Ok(TreeListing {
        lines,
        dir_count,
        file_count,
    })
}
