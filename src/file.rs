use crate::error::{Error, Result};
use crate::filter::file_extension;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-z_\s-]").expect("valid regex"));

static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// A file selected for the content pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path to the file on disk
    pub absolute_path: PathBuf,

    /// Path relative to the input directory
    pub relative_path: PathBuf,

    /// Lowercase extension including the leading dot, empty when absent
    pub extension: String,
}

impl SourceFile {
    /// Creates a source file, deriving the relative path from `root`.
    #[must_use]
    pub fn new(absolute_path: PathBuf, root: &Path) -> Self {
        let relative_path =
            pathdiff::diff_paths(&absolute_path, root).unwrap_or_else(|| absolute_path.clone());
        let extension = absolute_path
            .file_name()
            .map(|name| file_extension(&name.to_string_lossy()))
            .unwrap_or_default();

        Self {
            absolute_path,
            relative_path,
            extension,
        }
    }

    /// Code fence language tag: the extension without its dot.
    #[must_use]
    pub fn language(&self) -> &str {
        self.extension.strip_prefix('.').unwrap_or(&self.extension)
    }

    /// Relative path as displayed in fragment headers.
    #[must_use]
    pub fn display_path(&self) -> String {
        self.relative_path.to_string_lossy().into_owned()
    }

    /// Location of this file's fragment in per-file output mode.
    ///
    /// Mirrors the relative directory and names the file after the
    /// sanitized relative path, e.g. `src/Main.go` → `src/src_main_go.txt`.
    #[must_use]
    pub fn fragment_path(&self, output_dir: &Path) -> PathBuf {
        let file_name = format!("{}.txt", sanitize_filename(&self.display_path()));

        match self.relative_path.parent() {
            Some(parent) => output_dir.join(parent).join(file_name),
            None => output_dir.join(file_name),
        }
    }

    /// Reads the file contents as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtf8`] when the bytes are not valid UTF-8 and
    /// [`Error::Io`] for any other read failure.
    pub fn read_text(&self) -> Result<String> {
        read_text(&self.absolute_path)
    }
}

/// Reads `path` as UTF-8 without altering a single byte.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] for undecodable content, [`Error::Io`] otherwise.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(path))
}

/// Turns an arbitrary (relative path) string into a flat, lowercase token.
///
/// Every character other than ASCII letters, digits, `_`, whitespace and `-`
/// becomes `_`; the result is trimmed and lowercased, then runs of hyphens
/// and whitespace collapse into a single `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "_");
    let lowered = replaced.trim().to_lowercase();
    SEPARATOR_RUNS.replace_all(&lowered, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_filename("src/Main.go"), "src_main_go");
        assert_eq!(sanitize_filename("a/b.py"), "a_b_py");
        assert_eq!(sanitize_filename("My File - v2.txt"), "my_file_v2_txt");
        assert_eq!(sanitize_filename("  padded  "), "padded");
    }

    #[test]
    fn test_sanitize_windows_separators() {
        assert_eq!(sanitize_filename(r"dir\sub\File.RS"), "dir_sub_file_rs");
    }

    #[test]
    fn test_sanitize_only_safe_chars() {
        let inputs = [
            "ünïcödé/ファイル.md",
            "--weird-- name\t\n.tar.gz",
            "~/.config/app (copy).toml",
            "",
            "   ",
        ];

        for input in inputs {
            let out = sanitize_filename(input);
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "unexpected characters in {out:?}"
            );
        }
    }

    #[test]
    fn test_sanitize_idempotent() {
        let inputs = [
            "src/Main.go",
            " -lead and trail- ",
            "a--b  c",
            "ünï/cödé",
            "UPPER/lower.Rs",
        ];

        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_source_file_fields() {
        let root = PathBuf::from("/repo");
        let file = SourceFile::new(PathBuf::from("/repo/src/App.PY"), &root);

        assert_eq!(file.relative_path, PathBuf::from("src/App.PY"));
        assert_eq!(file.extension, ".py");
        assert_eq!(file.language(), "py");
    }

    #[test]
    fn test_source_file_without_extension() {
        let root = PathBuf::from("/repo");
        let file = SourceFile::new(PathBuf::from("/repo/Makefile"), &root);

        assert_eq!(file.extension, "");
        assert_eq!(file.language(), "");
    }

    #[test]
    fn test_fragment_path_mirrors_directory() {
        let root = PathBuf::from("/repo");
        let out = PathBuf::from("/out");

        let nested = SourceFile::new(PathBuf::from("/repo/src/main.go"), &root);
        assert_eq!(
            nested.fragment_path(&out),
            PathBuf::from("/out/src/src_main_go.txt")
        );

        let top = SourceFile::new(PathBuf::from("/repo/README.md"), &root);
        assert_eq!(top.fragment_path(&out), PathBuf::from("/out/readme_md.txt"));
    }

    #[test]
    fn test_read_text_preserves_bytes() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("crlf.txt");
        file.write_str("line1\r\nline2\r\n\n").unwrap();

        assert_eq!(read_text(file.path()).unwrap(), "line1\r\nline2\r\n\n");
    }

    #[test]
    fn test_read_text_invalid_utf8() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("blob.bin");
        file.write_binary(&[0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = read_text(file.path()).unwrap_err();
        assert!(err.is_invalid_utf8());
    }

    #[test]
    fn test_read_text_missing_file() {
        let err = read_text(Path::new("/nonexistent/file.rs")).unwrap_err();
        assert!(err.is_io());
    }
}
