//! Markdown fragment rendering.

/// Separator placed between fragments in single-file mode.
pub const FRAGMENT_SEPARATOR: &str = "---\n";

/// Renders one source file as a markdown fragment.
///
/// The fragment starts with a `# File Name:` header and a `# File Contents:`
/// label. Contents are wrapped in a code fence tagged with `language`, or
/// emitted raw when `language` is empty. Both forms end with a blank line.
#[must_use]
pub fn render_fragment(relative_path: &str, contents: &str, language: &str) -> String {
    let mut fragment = String::with_capacity(contents.len() + relative_path.len() + 48);

    fragment.push_str("# File Name: ");
    fragment.push_str(relative_path);
    fragment.push('\n');
    fragment.push_str("# File Contents:\n");

    if language.is_empty() {
        fragment.push_str(contents);
        fragment.push_str("\n\n");
    } else {
        fragment.push_str("```");
        fragment.push_str(language);
        fragment.push('\n');
        fragment.push_str(contents);
        fragment.push_str("\n```\n\n");
    }

    fragment
}

/// Joins fragments into the combined document, without a trailing separator.
#[must_use]
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join(FRAGMENT_SEPARATOR)
}
