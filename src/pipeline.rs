use crate::{
    config::Config,
    error::Result,
    file::SourceFile,
    markdown::render_fragment,
    observer::{Observer, PipelineEvent, TracingObserver},
    scanner::Scanner,
    tree::render_tree,
    writer::Writer,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Statistics collected during pipeline execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Files matching the extension selection
    pub files_matched: usize,

    /// Fragments produced (written or queued for the combined file)
    pub files_rendered: usize,

    /// Files skipped because they are not valid UTF-8
    pub files_skipped: usize,

    /// Files that failed to read or write
    pub files_failed: usize,

    /// Directories listed in the tree
    pub tree_dirs: usize,

    /// Files listed in the tree
    pub tree_files: usize,

    /// Total execution time
    pub duration: Duration,

    /// Output directory path
    pub output_directory: String,
}

impl PipelineStats {
    /// Logs a one-line summary of the run.
    pub fn log_summary(&self) {
        info!(
            "✓ Rendered {} of {} matching files ({} skipped, {} failed) in {:.2}s",
            self.files_rendered,
            self.files_matched,
            self.files_skipped,
            self.files_failed,
            self.duration.as_secs_f64()
        );
        info!(
            "  Tree: {} directories, {} files -> {}",
            self.tree_dirs, self.tree_files, self.output_directory
        );
    }
}

/// Converts a directory into markdown fragments and a tree listing.
pub struct Pipeline {
    config: Config,
    writer: Writer,
    observer: Arc<dyn Observer>,
}

impl Pipeline {
    /// Creates a pipeline that reports through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// Creates a pipeline that reports per-file events to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn with_observer(config: Config, observer: Arc<dyn Observer>) -> Result<Self> {
        config.validate()?;

        let writer = Writer::new(&config.output_dir);

        Ok(Self {
            config,
            writer,
            observer,
        })
    }

    /// Executes the run and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Prepare**: creates the output directory
    /// 2. **Render**: walks the input and renders every matching file, either
    ///    writing one fragment per file or collecting them
    /// 3. **Combine**: in single-file mode, writes `all_files.txt`
    /// 4. **Tree**: writes `directory_tree.txt` for the input directory
    ///
    /// Per-file failures are reported to the observer and never stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory, the combined file or the
    /// tree listing cannot be written. Files written before the failure stay
    /// on disk.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dir2md::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .input_dir("./src")
    ///     .output_dir("./flat")
    ///     .extensions([".rs"])
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.log_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(input_dir = %self.config.input_dir.display()))]
    pub fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let mut stats = PipelineStats {
            output_directory: self.config.output_dir.display().to_string(),
            ..PipelineStats::default()
        };

        self.writer.prepare()?;

        let fragments = self.render_files(&mut stats);

        if self.config.single_file {
            let output = self.writer.write_combined(&fragments)?;
            self.observer.notify(&PipelineEvent::CombinedWritten {
                output,
                fragments: fragments.len(),
            });
        }

        let listing = render_tree(&self.config.input_dir, &self.config.exclusions)?;
        stats.tree_dirs = listing.dir_count;
        stats.tree_files = listing.file_count;

        let output = self.writer.write_tree(&listing)?;
        self.observer.notify(&PipelineEvent::TreeWritten { output });

        stats.duration = start_time.elapsed();
        Ok(stats)
    }

    /// Walks the input and renders every selected file.
    ///
    /// Returns the fragments collected for the combined document; the list
    /// stays empty in per-file mode.
    fn render_files(&self, stats: &mut PipelineStats) -> Vec<String> {
        let scanner = Scanner::new(&self.config.input_dir, &self.config.exclusions);
        let mut fragments = Vec::new();

        for result in scanner.files() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    self.observer.notify(&PipelineEvent::WalkFailed {
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !self
                .config
                .extensions
                .matches(&entry.file_name().to_string_lossy())
            {
                continue;
            }

            stats.files_matched += 1;
            let source = SourceFile::new(entry.into_path(), &self.config.input_dir);

            match self.render_file(&source) {
                Ok(fragment) => {
                    stats.files_rendered += 1;
                    if self.config.single_file {
                        fragments.push(fragment);
                        self.observer.notify(&PipelineEvent::FragmentQueued {
                            source: source.absolute_path,
                        });
                    }
                }
                Err(e) if e.is_invalid_utf8() => {
                    stats.files_skipped += 1;
                    self.observer.notify(&PipelineEvent::FileSkipped {
                        source: source.absolute_path,
                    });
                }
                Err(e) => {
                    stats.files_failed += 1;
                    self.observer.notify(&PipelineEvent::FileFailed {
                        source: source.absolute_path,
                        message: e.to_string(),
                    });
                }
            }
        }

        debug!(
            "Matched {} files, rendered {}",
            stats.files_matched, stats.files_rendered
        );
        fragments
    }

    /// Renders one file and, in per-file mode, writes it.
    fn render_file(&self, source: &SourceFile) -> Result<String> {
        let contents = source.read_text()?;
        let fragment = render_fragment(&source.display_path(), &contents, source.language());

        if !self.config.single_file {
            let output = self.writer.write_fragment(source, &fragment)?;
            self.observer.notify(&PipelineEvent::FragmentWritten {
                source: source.absolute_path.clone(),
                output,
            });
        }

        Ok(fragment)
    }
}
