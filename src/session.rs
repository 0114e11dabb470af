//! Turns command-line arguments plus interactive answers into a [`Config`].

use crate::{
    config::{default_output_dir, Config},
    error::{Error, Result},
    filter::ExclusionSet,
    prompt::Prompter,
    scanner::{discover_extensions, ExtensionEntry},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What the user passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Input directory; prompted for when absent
    pub input_dir: Option<PathBuf>,

    /// Output directory; blank or absent means `<cwd>/<input name>`
    pub output_dir: Option<String>,

    /// Explicit extension keys; the interactive selection runs when absent
    pub extensions: Option<Vec<String>>,

    /// Extra excluded directory names
    pub exclude_dirs: Vec<String>,

    /// Single-file output
    pub single_file: bool,
}

/// Resolves an invocation into a validated configuration.
///
/// Missing directories are asked for through `prompter`, and so is the
/// extension selection when no extensions were given.
///
/// # Errors
///
/// Returns [`Error::InputNotADirectory`] if the input is not a directory,
/// [`Error::NoExtensionsSelected`] if the selection ends up empty, or the
/// prompter's error. Nothing is written to disk before these checks.
pub fn resolve(invocation: Invocation, prompter: &dyn Prompter) -> Result<Config> {
    let (input_dir, output_answer, single_file) = match invocation.input_dir {
        Some(dir) => (
            dir,
            invocation.output_dir.unwrap_or_default(),
            invocation.single_file,
        ),
        None => (
            prompter.ask_directory_path("Enter the input directory")?,
            prompter.ask_text("Enter the output directory (leave blank to use default)", "")?,
            prompter.ask_confirm("Output all content to a single file?", false)?,
        ),
    };

    if input_dir.as_os_str().is_empty() {
        return Err(Error::MissingInputDirectory);
    }

    if !input_dir.is_dir() {
        return Err(Error::input_not_a_directory(&input_dir));
    }

    let output_dir = if output_answer.trim().is_empty() {
        default_output_dir(&input_dir)?
    } else {
        PathBuf::from(output_answer)
    };

    let exclusions = ExclusionSet::new(invocation.exclude_dirs.iter().cloned());

    let extensions = match invocation.extensions.filter(|list| !list.is_empty()) {
        Some(list) => {
            let list: Vec<String> = list.iter().map(|ext| ext.to_lowercase()).collect();
            info!("Using extensions from arguments: {:?}", list);
            list
        }
        None => select_extensions(&input_dir, &exclusions, prompter)?,
    };

    if extensions.is_empty() {
        info!("No extensions selected. Exiting.");
        return Err(Error::NoExtensionsSelected);
    }

    Config::builder()
        .input_dir(input_dir)
        .output_dir(output_dir)
        .extensions(extensions)
        .exclude_dirs(invocation.exclude_dirs)
        .single_file(single_file)
        .build()
}

/// Offers the discovered extension keys and returns the chosen ones.
///
/// Every key starts out selected. An empty catalog yields an empty selection
/// without prompting.
///
/// # Errors
///
/// Returns an error if discovery or the prompt fails.
pub fn select_extensions(
    input_dir: &Path,
    exclusions: &ExclusionSet,
    prompter: &dyn Prompter,
) -> Result<Vec<String>> {
    let catalog = discover_extensions(input_dir, exclusions)?;

    if catalog.is_empty() {
        warn!("No files with usable extensions were found.");
        return Ok(Vec::new());
    }

    let choices: Vec<String> = catalog.iter().map(ExtensionEntry::label).collect();
    let chosen = prompter.ask_multi_select("Select file extensions to process", &choices, &choices)?;

    Ok(chosen
        .iter()
        .map(|label| ExtensionEntry::key_from_label(label).to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use assert_fs::prelude::*;

    #[test]
    fn test_flags_bypass_prompts() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("main.rs").write_str("").unwrap();
        let prompter = ScriptedPrompter::default();

        let config = resolve(
            Invocation {
                input_dir: Some(temp.path().to_path_buf()),
                output_dir: Some(temp.path().join("out").display().to_string()),
                extensions: Some(vec![".RS".into()]),
                exclude_dirs: vec!["target".into()],
                single_file: true,
            },
            &prompter,
        )
        .unwrap();

        assert!(config.extensions.contains(".rs"));
        assert!(config.exclusions.is_excluded("target"));
        assert!(config.single_file);
        assert_eq!(config.output_dir, temp.path().join("out"));
        assert!(prompter.offered.borrow().is_empty());
    }

    #[test]
    fn test_missing_input_is_prompted() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.py").write_str("").unwrap();
        let prompter = ScriptedPrompter {
            directory: Some(temp.path().to_path_buf()),
            text: temp.path().join("flat").display().to_string(),
            confirm: true,
            ..ScriptedPrompter::default()
        };

        let config = resolve(Invocation::default(), &prompter).unwrap();

        assert_eq!(config.input_dir, temp.path());
        assert_eq!(config.output_dir, temp.path().join("flat"));
        assert!(config.single_file);
        assert!(config.extensions.contains(".py"));
    }

    #[test]
    fn test_blank_output_defaults_to_cwd_and_input_name() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("project");
        input.child("x.go").write_str("").unwrap();

        let config = resolve(
            Invocation {
                input_dir: Some(input.path().to_path_buf()),
                output_dir: Some("  ".into()),
                extensions: Some(vec![".go".into()]),
                ..Invocation::default()
            },
            &ScriptedPrompter::default(),
        )
        .unwrap();

        assert_eq!(
            config.output_dir,
            std::env::current_dir().unwrap().join("project")
        );
    }

    #[test]
    fn test_selection_offers_labels_and_strips_counts() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.rs").write_str("").unwrap();
        temp.child("b.rs").write_str("").unwrap();
        temp.child("c.md").write_str("").unwrap();
        temp.child("node_modules/d.js").write_str("").unwrap();
        let prompter = ScriptedPrompter {
            selection: Some(vec![".rs (2)".into()]),
            ..ScriptedPrompter::default()
        };

        let selected =
            select_extensions(temp.path(), &ExclusionSet::default(), &prompter).unwrap();

        assert_eq!(selected, vec![".rs".to_string()]);
        assert_eq!(
            *prompter.offered.borrow(),
            vec![".rs (2)".to_string(), ".md (1)".to_string()]
        );
    }

    #[test]
    fn test_empty_catalog_selects_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let selected = select_extensions(
            temp.path(),
            &ExclusionSet::default(),
            &ScriptedPrompter::default(),
        )
        .unwrap();

        assert!(selected.is_empty());
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.rs").write_str("").unwrap();
        let prompter = ScriptedPrompter {
            selection: Some(Vec::new()),
            ..ScriptedPrompter::default()
        };

        let result = resolve(
            Invocation {
                input_dir: Some(temp.path().to_path_buf()),
                output_dir: Some("out".into()),
                ..Invocation::default()
            },
            &prompter,
        );

        assert!(matches!(result, Err(Error::NoExtensionsSelected)));
    }

    #[test]
    fn test_nonexistent_input_is_rejected() {
        let result = resolve(
            Invocation {
                input_dir: Some(PathBuf::from("/nonexistent/input/dir")),
                extensions: Some(vec![".rs".into()]),
                ..Invocation::default()
            },
            &ScriptedPrompter::default(),
        );

        assert!(matches!(result, Err(Error::InputNotADirectory { .. })));
    }

    #[test]
    fn test_prompt_failure_propagates() {
        let result = resolve(Invocation::default(), &ScriptedPrompter::default());
        assert!(matches!(result, Err(Error::Prompt { .. })));
    }
}
