//! # dir2md
//!
//! Flattens a source tree into readable markdown documents plus a
//! `tree`-style listing of the directory structure.
//!
//! ## Features
//!
//! - Exclusion-aware recursive walking (`.git`, `node_modules`, `.terraform` and more)
//! - Extension discovery with per-extension counts
//! - One markdown fragment per file, or a single combined document
//! - Box-drawing directory tree with directory and file totals
//!
//! ## Quick Start
//!
//! ```no_run
//! use dir2md::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .input_dir("./src")
//!     .output_dir("./flat")
//!     .extensions([".rs", ".toml"])
//!     .single_file(true)
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Scanner**: walks the input, pruning excluded names
//! 2. **Renderer**: turns every selected file into a markdown fragment
//! 3. **Writer**: persists fragments, the combined document and the tree
//! 4. **Tree**: renders the input directory structure

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod filter;
mod markdown;
mod pipeline;
mod scanner;
mod tree;
mod writer;

pub mod observer;
pub mod prompt;
pub mod session;

pub use config::{default_output_dir, Config, ConfigBuilder};
pub use error::{Error, Result};
pub use file::{read_text, sanitize_filename, SourceFile};
pub use filter::{
    extension_key, file_extension, ExclusionSet, ExtensionSelection, DEFAULT_EXCLUDED_DIRS,
};
pub use markdown::{join_fragments, render_fragment, FRAGMENT_SEPARATOR};
pub use observer::{MemoryObserver, Observer, PipelineEvent, TracingObserver};
pub use pipeline::{Pipeline, PipelineStats};
pub use prompt::{Prompter, TerminalPrompter};
pub use scanner::{discover_extensions, ExtensionEntry};
pub use tree::{render_tree, TreeListing};
pub use writer::{COMBINED_FILE_NAME, TREE_FILE_NAME};

/// Runs the complete conversion with the given configuration.
///
/// Per-file events are reported through `tracing`.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Input directory doesn't exist or is not a directory
/// - No extension is selected
/// - Output directory, combined document or tree listing cannot be written
///
/// # Examples
///
/// ```no_run
/// use dir2md::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .input_dir(".")
///     .extensions([".py"])
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<PipelineStats> {
    Pipeline::new(config)?.run()
}
