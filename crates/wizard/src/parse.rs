//! Input and response parsing helpers for the wizard.

/// Split generated template text on the first blank-line boundary: text
/// before it becomes the subject (trailing whitespace dropped), the remainder
/// becomes the body. Without a boundary the subject is empty and the whole
/// text is the body.
pub fn split_subject_body(text: &str) -> (String, String) {
    match text.split_once("\n\n") {
        Some((subject, body)) => (subject.trim_end().to_string(), body.to_string()),
        None => (String::new(), text.to_string()),
    }
}

/// Parse a comma-separated recipient list: entries trimmed, empties dropped.
pub fn parse_recipients(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
