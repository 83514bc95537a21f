//! Reply sanitization
//!
//! Models tend to close with a "Note: ..." disclaimer and to forget (or
//! repeat) the courtesy line. Both are normalized here before the reply
//! reaches the client.

use regex::Regex;
use std::sync::OnceLock;

static NOTE_BLOCK: OnceLock<Regex> = OnceLock::new();

/// First `Note:` (any case) through end of text. Group 1 starts at the note
/// itself, including Markdown emphasis such as `_Note:` or `**Note:**`. The
/// note must not be glued to a preceding letter or digit ("keynote:").
fn note_block() -> &'static Regex {
    NOTE_BLOCK.get_or_init(|| {
        Regex::new(r"(?is)(?:^|[^[:alnum:]_*])([_*]*note:.*)").expect("static pattern")
    })
}

/// Remove the trailing disclaimer block and the newlines before it, if any
pub fn strip_note_block(text: &str) -> &str {
    match note_block().captures(text).and_then(|caps| caps.get(1)) {
        Some(note) => text[..note.start()].trim_end_matches(['\r', '\n']),
        None => text,
    }
}

/// Strip the disclaimer, trim, and make sure the reply ends with exactly
/// one `closing_line`
pub fn sanitize_reply(raw: &str, closing_line: &str) -> String {
    let text = strip_note_block(raw).trim();
    if text.is_empty() {
        closing_line.to_string()
    } else if text.ends_with(closing_line) {
        text.to_string()
    } else {
        format!("{text}\n\n{closing_line}")
    }
}
