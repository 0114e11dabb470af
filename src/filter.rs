//! Entry filtering.
//!
//! Decides which directory entries are pruned from every traversal and which
//! files take part in the content pass.

use std::collections::HashSet;
use std::path::Path;

/// Directory names that are always pruned.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 3] = [".terraform", "node_modules", ".git"];

/// File names that never take part in the content pass.
const SKIPPED_FILE_NAMES: [&str; 2] = [".DS_Store", ".env"];

/// Set of entry names pruned wherever they are encountered.
///
/// Matching is on the base name only: no globs, no path prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl ExclusionSet {
    /// Creates the default set extended with `extra` names.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = DEFAULT_EXCLUDED_DIRS
            .iter()
            .map(|name| (*name).to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();

        Self { names }
    }

    /// Returns true if an entry with this base name must be skipped.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns true if the base name of `path` is excluded.
    #[must_use]
    pub fn excludes_path(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.is_excluded(&name.to_string_lossy()))
    }

    /// Number of distinct excluded names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the default names are part of every set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Extension keys chosen for the content pass, normalized to lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSelection {
    keys: HashSet<String>,
}

impl ExtensionSelection {
    /// Creates a selection from raw keys such as `.PY` or `.gitignore`.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|key| key.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if no key was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if `key` was selected.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Decides whether the file called `file_name` takes part in the content pass.
    ///
    /// A file matches when its lowercase extension is selected, or when it has
    /// no extension and its lowercase name is selected (dotfile keys).
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        if SKIPPED_FILE_NAMES.contains(&file_name) {
            return false;
        }

        let ext = file_extension(file_name);
        self.keys.contains(&ext)
            || (ext.is_empty() && self.keys.contains(&file_name.to_lowercase()))
    }

    /// Iterates the selected keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// Returns the lowercase extension of `file_name`, including the leading dot.
///
/// The extension starts at the last `.` unless that dot belongs to the run of
/// leading dots, so `.bashrc` has none and `archive.tar.GZ` yields `.gz`.
#[must_use]
pub fn file_extension(file_name: &str) -> String {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();

    match file_name.rfind('.') {
        Some(dot) if dot >= stem_start => file_name[dot..].to_lowercase(),
        _ => String::new(),
    }
}

/// Returns the catalog key for `file_name`.
///
/// Dotfiles are keyed by their full lowercase name, everything else by its
/// lowercase extension (empty when there is none).
#[must_use]
pub fn extension_key(file_name: &str) -> String {
    if file_name.starts_with('.') {
        file_name.to_lowercase()
    } else {
        file_extension(file_name)
    }
}
