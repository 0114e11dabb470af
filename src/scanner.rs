use crate::{
    error::{Error, Result},
    filter::{extension_key, ExclusionSet},
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Number of files sharing one extension key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    /// Lowercase extension with its dot, a dotfile's full name, or empty
    pub key: String,

    /// Number of files carrying this key
    pub count: usize,
}

impl ExtensionEntry {
    /// Label offered in the interactive selection, e.g. `.rs (12)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.key, self.count)
    }

    /// Recovers the bare key from a label produced by [`ExtensionEntry::label`].
    ///
    /// Only a trailing ` (<digits>)` suffix is stripped; anything else is
    /// returned unchanged.
    #[must_use]
    pub fn key_from_label(label: &str) -> &str {
        label
            .strip_suffix(')')
            .and_then(|rest| rest.rsplit_once(" ("))
            .filter(|(_, count)| !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()))
            .map_or(label, |(key, _)| key)
    }
}

/// Depth-first walk of a directory with excluded names pruned.
///
/// Inside each directory, files come before subdirectories and both are
/// ordered by name, so every traversal of the same tree is identical.
pub(crate) struct Scanner<'a> {
    root_dir: PathBuf,
    exclusions: &'a ExclusionSet,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(root_dir: impl Into<PathBuf>, exclusions: &'a ExclusionSet) -> Self {
        Self {
            root_dir: root_dir.into(),
            exclusions,
        }
    }

    /// Iterates every non-excluded file below the root.
    ///
    /// Entries that cannot be read are yielded as errors so the caller can
    /// decide whether to skip them.
    pub(crate) fn files(&self) -> impl Iterator<Item = Result<DirEntry>> + '_ {
        debug!("Walking {}", self.root_dir.display());

        WalkDir::new(&self.root_dir)
            .follow_links(false)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let excluded = self.exclusions.is_excluded(&entry.file_name().to_string_lossy());
                if excluded {
                    debug!("Skipping excluded entry: {}", entry.path().display());
                }
                !excluded
            })
            .filter_map(|result| match result {
                Ok(entry) if is_file(&entry) => Some(Ok(entry)),
                Ok(_) => None,
                Err(e) => Some(Err(e.into())),
            })
    }
}

/// Regular files, plus symlinks that resolve to one.
fn is_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Counts files per extension key below `root`.
///
/// Entries keep the order in which each key was first seen during the walk.
/// Unreadable entries are logged and skipped.
///
/// # Errors
///
/// Returns [`Error::InputNotADirectory`] if `root` is not a directory.
pub fn discover_extensions(root: &Path, exclusions: &ExclusionSet) -> Result<Vec<ExtensionEntry>> {
    if !root.is_dir() {
        return Err(Error::input_not_a_directory(root));
    }

    let scanner = Scanner::new(root, exclusions);
    let mut entries: Vec<ExtensionEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in scanner.files() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Walk error: {}", e);
                continue;
            }
        };

        let key = extension_key(&entry.file_name().to_string_lossy());
        trace!("Catalog {} -> {:?}", entry.path().display(), key);

        match index.get(&key) {
            Some(&position) => entries[position].count += 1,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push(ExtensionEntry { key, count: 1 });
            }
        }
    }

    debug!("Discovered {} extension keys", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn relative_files(root: &Path, exclusions: &ExclusionSet) -> Vec<String> {
        Scanner::new(root, exclusions)
            .files()
            .map(|entry| {
                let entry = entry.unwrap();
                pathdiff::diff_paths(entry.path(), root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scanner_orders_files_before_subdirectories() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.rs").write_str("").unwrap();
        temp.child("a/z.rs").write_str("").unwrap();
        temp.child("a/inner/y.rs").write_str("").unwrap();
        temp.child("a/m.rs").write_str("").unwrap();
        temp.child("c.rs").write_str("").unwrap();

        let files = relative_files(temp.path(), &ExclusionSet::default());
        assert_eq!(
            files,
            vec!["b.rs", "c.rs", "a/m.rs", "a/z.rs", "a/inner/y.rs"]
        );
    }

    #[test]
    fn test_scanner_prunes_excluded_names_at_any_depth() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/main.go").write_str("").unwrap();
        temp.child("src/.git/config").write_str("").unwrap();
        temp.child("web/node_modules/pkg/index.js").write_str("").unwrap();
        temp.child("build/out.o").write_str("").unwrap();

        let files = relative_files(temp.path(), &ExclusionSet::new(["build"]));
        assert_eq!(files, vec!["src/main.go"]);
    }

    #[test]
    fn test_discover_counts_in_first_seen_order() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("z.py").write_str("").unwrap();
        temp.child("a.md").write_str("").unwrap();
        temp.child("pkg/b.PY").write_str("").unwrap();
        temp.child("pkg/c.rs").write_str("").unwrap();
        temp.child("README").write_str("").unwrap();

        let entries = discover_extensions(temp.path(), &ExclusionSet::default()).unwrap();
        let pairs: Vec<(&str, usize)> =
            entries.iter().map(|e| (e.key.as_str(), e.count)).collect();

        assert_eq!(pairs, vec![("", 1), (".md", 1), (".py", 2), (".rs", 1)]);
    }

    #[test]
    fn test_discover_keys_dotfiles_by_name() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".env").write_str("SECRET=1").unwrap();
        temp.child(".gitignore").write_str("target").unwrap();
        temp.child("sub/.gitignore").write_str("").unwrap();

        let entries = discover_extensions(temp.path(), &ExclusionSet::default()).unwrap();
        assert!(entries.contains(&ExtensionEntry { key: ".env".into(), count: 1 }));
        assert!(entries.contains(&ExtensionEntry { key: ".gitignore".into(), count: 2 }));
    }

    #[test]
    fn test_discover_ignores_excluded_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("main.tf").write_str("").unwrap();
        temp.child(".terraform/providers/lock.json").write_str("").unwrap();

        let entries = discover_extensions(temp.path(), &ExclusionSet::default()).unwrap();
        assert_eq!(entries, vec![ExtensionEntry { key: ".tf".into(), count: 1 }]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let entries = discover_extensions(temp.path(), &ExclusionSet::default()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_discover_missing_root() {
        let err = discover_extensions(Path::new("/nonexistent/root"), &ExclusionSet::default())
            .unwrap_err();
        assert!(matches!(err, Error::InputNotADirectory { .. }));
    }

    #[test]
    fn test_label_round_trip() {
        let entry = ExtensionEntry { key: ".rs".into(), count: 12 };
        assert_eq!(entry.label(), ".rs (12)");
        assert_eq!(ExtensionEntry::key_from_label(&entry.label()), ".rs");

        let empty = ExtensionEntry { key: String::new(), count: 3 };
        assert_eq!(ExtensionEntry::key_from_label(&empty.label()), "");
    }

    #[test]
    fn test_key_from_label_without_count() {
        assert_eq!(ExtensionEntry::key_from_label(".py"), ".py");
        assert_eq!(ExtensionEntry::key_from_label("odd (name)"), "odd (name)");
    }
}
