//! Small text helpers used in log output.

/// Truncates a string to at most `max_chars` characters, appending an ellipsis when cut.
///
/// Counts characters rather than bytes so multi-byte text never splits inside a code point.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Renders a msgid for log lines: newlines escaped, long text truncated.
pub fn preview(text: &str) -> String {
    truncate_string(&text.replace('\n', "\\n"), 48)
}
