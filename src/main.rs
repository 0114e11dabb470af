use anyhow::Context;
use clap::Parser;
use dir2md::{
    session::{self, Invocation},
    Pipeline, TerminalPrompter,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "dir2md",
    version,
    author,
    about = "Generate markdown files and directory tree from directory contents",
    long_about = "Generate markdown files and directory tree from directory contents.\n\n\
    Every selected source file becomes a markdown fragment (file name header plus a \
    fenced code block). Fragments are written one per file, mirroring the input \
    layout, or concatenated into all_files.txt. A directory_tree.txt listing of the \
    input is always written.\n\n\
    USAGE EXAMPLES:\n  \
      # Pick everything interactively\n  \
      dir2md\n\n  \
      # Convert Python and Markdown files of a project\n  \
      dir2md ./my-project ./flat --extensions .py .md\n\n  \
      # One combined document, skipping build output\n  \
      dir2md ./src --single-file --exclude-dir target --exclude-dir dist"
)]
struct Cli {
    /// Path to the input directory (prompted for when omitted)
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Path to the output directory (defaults to ./<input dir name>)
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<String>,

    /// File extensions to include (e.g., .py .js .md)
    #[arg(long, num_args = 1.., value_name = "EXT")]
    extensions: Option<Vec<String>>,

    /// Directories to exclude (can be used multiple times)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    exclude_dir: Vec<String>,

    /// Output all content to a single file
    #[arg(long)]
    single_file: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl From<Cli> for Invocation {
    fn from(cli: Cli) -> Self {
        Self {
            input_dir: cli.input_dir,
            output_dir: cli.output_dir,
            extensions: cli.extensions,
            exclude_dirs: cli.exclude_dir,
            single_file: cli.single_file,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = session::resolve(cli.into(), &TerminalPrompter)
        .context("Failed to resolve input")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Pipeline execution failed")?;

    stats.log_summary();
    info!("Markdown generation complete.");

    Ok(())
}

fn setup_tracing(verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("dir2md=info"),
        1 => EnvFilter::new("dir2md=debug"),
        _ => EnvFilter::new("dir2md=trace"),
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .with(file_layer)
        .init();

    Ok(())
}
