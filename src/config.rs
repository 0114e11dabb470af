use crate::error::{Error, Result};
use crate::filter::{ExclusionSet, ExtensionSelection};
use std::path::PathBuf;

/// Configuration for one conversion run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Directory whose files are converted
    pub input_dir: PathBuf,

    /// Directory receiving fragments and the tree listing
    pub output_dir: PathBuf,

    /// Extension keys taking part in the content pass
    pub extensions: ExtensionSelection,

    /// Concatenate all fragments into `all_files.txt`
    pub single_file: bool,

    /// Entry names pruned from every traversal
    pub exclusions: ExclusionSet,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dir2md::Config;
    ///
    /// let config = Config::builder()
    ///     .input_dir("./src")
    ///     .output_dir("./flat")
    ///     .extensions([".rs", ".toml"])
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input directory doesn't exist or is not a directory
    /// - Output directory is empty
    /// - No extension is selected
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(Error::input_not_a_directory(&self.input_dir));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config("output_dir must not be empty"));
        }

        if self.extensions.is_empty() {
            return Err(Error::NoExtensionsSelected);
        }

        Ok(())
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    extensions: Vec<String>,
    single_file: bool,
    exclude_dirs: Vec<String>,
}

impl ConfigBuilder {
    /// Sets the directory to convert.
    #[must_use]
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }

    /// Sets the output directory.
    ///
    /// Defaults to a directory named after the input inside the current
    /// working directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the extension keys to convert, e.g. `.rs` or `.gitignore`.
    #[must_use]
    pub fn extensions<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Enables single-file output.
    #[must_use]
    pub fn single_file(mut self, enabled: bool) -> Self {
        self.single_file = enabled;
        self
    }

    /// Adds directory names excluded on top of the defaults.
    #[must_use]
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInputDirectory`] when no input directory was
    /// set, and any error from [`Config::validate`].
    pub fn build(self) -> Result<Config> {
        let input_dir = self.input_dir.ok_or(Error::MissingInputDirectory)?;
        let output_dir = match self.output_dir {
            Some(dir) => dir,
            None => default_output_dir(&input_dir)?,
        };

        let config = Config {
            input_dir,
            output_dir,
            extensions: ExtensionSelection::new(&self.extensions),
            single_file: self.single_file,
            exclusions: ExclusionSet::new(self.exclude_dirs),
        };

        config.validate()?;
        Ok(config)
    }
}

/// `<cwd>/<basename(input_dir)>`.
///
/// # Errors
///
/// Returns an error if the current directory is unavailable or the input
/// path has no usable base name.
pub fn default_output_dir(input_dir: &std::path::Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;

    let name = match input_dir.file_name() {
        Some(name) => name.to_os_string(),
        None => std::fs::canonicalize(input_dir)
            .ok()
            .and_then(|path| path.file_name().map(std::ffi::OsStr::to_os_string))
            .ok_or_else(|| {
                Error::config(format!(
                    "Cannot derive an output directory name from '{}'",
                    input_dir.display()
                ))
            })?,
    };

    Ok(cwd.join(name))
}
