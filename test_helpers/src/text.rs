//! Text helpers for assertions on rendered diffs.

/// Strips one layer of matching single or double quotes from a value.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return stripped;
    }
    if let Some(stripped) = trimmed
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        return stripped;
    }
    trimmed
}

/// Joins lines into rendered diff text, each line terminated by `\n`.
///
/// # Examples
///
/// ```
/// use config_reconcile_test_helpers::text::diff_text;
///
/// assert_eq!(diff_text(&[" {", "+  a: 1", " }"]), " {\n+  a: 1\n }\n");
/// ```
#[must_use]
pub fn diff_text(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// The lines of `text` starting with `marker`.
#[must_use]
pub fn marked_lines(text: &str, marker: char) -> Vec<&str> {
    text.lines().filter(|line| line.starts_with(marker)).collect()
}

/// Colours rendered diff text the way a terminal renderer would: removed lines
/// red, added lines green.
#[must_use]
pub fn colourise(text: &str) -> String {
    text.lines()
        .map(|line| match line.chars().next() {
            Some('-') => format!("\u{1b}[31m{line}\u{1b}[39m\n"),
            Some('+') => format!("\u{1b}[32m{line}\u{1b}[39m\n"),
            _ => format!("{line}\n"),
        })
        .collect()
}
