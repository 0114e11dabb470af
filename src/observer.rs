//! Run events and the sinks that receive them.
//!
//! The pipeline never logs per-file outcomes directly; it reports them to an
//! [`Observer`] handed in at construction time.

use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Something that happened while converting a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A fragment file was written in per-file mode.
    FragmentWritten {
        /// Source file
        source: PathBuf,
        /// Written fragment file
        output: PathBuf,
    },

    /// A fragment was queued for the combined document.
    FragmentQueued {
        /// Source file
        source: PathBuf,
    },

    /// A file was skipped because it is not valid UTF-8.
    FileSkipped {
        /// Source file
        source: PathBuf,
    },

    /// Reading or writing a file failed; the run continues.
    FileFailed {
        /// Source file
        source: PathBuf,
        /// Error description
        message: String,
    },

    /// The walker could not read an entry.
    WalkFailed {
        /// Error description
        message: String,
    },

    /// The combined document was written.
    CombinedWritten {
        /// Path of `all_files.txt`
        output: PathBuf,
        /// Number of fragments it holds
        fragments: usize,
    },

    /// The directory tree was written.
    TreeWritten {
        /// Path of `directory_tree.txt`
        output: PathBuf,
    },
}

/// Receives pipeline events.
pub trait Observer: Send + Sync {
    /// Handles one event.
    fn notify(&self, event: &PipelineEvent);
}

/// Forwards events to `tracing` at a level matching their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::FragmentWritten { output, .. } => {
                info!("Markdown file '{}' created successfully.", output.display());
            }
            PipelineEvent::FragmentQueued { source } => {
                debug!("Queued {}", source.display());
            }
            PipelineEvent::FileSkipped { source } => {
                warn!("Skipping {} due to encoding issues.", source.display());
            }
            PipelineEvent::FileFailed { source, message } => {
                error!("Error processing {}: {}", source.display(), message);
            }
            PipelineEvent::WalkFailed { message } => {
                warn!("Walk error: {}", message);
            }
            PipelineEvent::CombinedWritten { output, fragments } => {
                info!(
                    "All markdown content ({} files) written to {}",
                    fragments,
                    output.display()
                );
            }
            PipelineEvent::TreeWritten { output } => {
                info!("Directory tree written to '{}'.", output.display());
            }
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemoryObserver {
    /// Creates an empty observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Counts received events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events
            .lock()
            .map(|events| events.iter().filter(|e| predicate(e)).count())
            .unwrap_or(0)
    }
}

impl Observer for MemoryObserver {
    fn notify(&self, event: &PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
