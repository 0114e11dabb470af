use crate::{
    error::{Error, Result},
    file::SourceFile,
    markdown::join_fragments,
    tree::TreeListing,
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Name of the combined document in single-file mode.
pub const COMBINED_FILE_NAME: &str = "all_files.txt";

/// Name of the directory tree listing.
pub const TREE_FILE_NAME: &str = "directory_tree.txt";

/// Persists fragments and the tree listing below the output directory.
pub(crate) struct Writer {
    output_dir: PathBuf,
}

impl Writer {
    pub(crate) fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Creates the output directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub(crate) fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))
    }

    /// Writes one fragment next to its mirrored relative directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the file cannot be written.
    pub(crate) fn write_fragment(&self, source: &SourceFile, fragment: &str) -> Result<PathBuf> {
        let path = source.fragment_path(&self.output_dir);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        write_file_atomic(&path, fragment)?;
        Ok(path)
    }

    /// Writes all fragments into the combined document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub(crate) fn write_combined(&self, fragments: &[String]) -> Result<PathBuf> {
        let path = self.output_dir.join(COMBINED_FILE_NAME);
        write_file_atomic(&path, &join_fragments(fragments))?;
        Ok(path)
    }

    /// Writes the directory tree listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub(crate) fn write_tree(&self, listing: &TreeListing) -> Result<PathBuf> {
        let path = self.output_dir.join(TREE_FILE_NAME);
        write_file_atomic(&path, &listing.render())?;
        Ok(path)
    }
}

/// Writes a file through a temporary sibling and a rename.
///
/// A reader never observes a half-written file; an interrupted write leaves
/// at most the `.tmp` sibling behind.
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}
