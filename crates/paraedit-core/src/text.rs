//! Text validation utilities.
//!
//! Paragraph text is restricted to ASCII letters, the German umlauts,
//! digits, the space character and a fixed punctuation set. Anything else is
//! dropped silently when text enters the store.

/// Punctuation accepted in paragraph text.
pub const ALLOWED_PUNCTUATION: &str = ".,:;-!?'()\"%@+*[]{}/\\&#$";

/// Returns `true` if `ch` may appear in a stored paragraph.
pub const fn is_allowed(ch: char) -> bool {
    matches!(
        ch,
        'A'..='Z'
            | 'a'..='z'
            | '0'..='9'
            | 'ä'
            | 'ö'
            | 'ü'
            | 'Ä'
            | 'Ö'
            | 'Ü'
            | ' '
            | '.'
            | ','
            | ':'
            | ';'
            | '-'
            | '!'
            | '?'
            | '\''
            | '('
            | ')'
            | '"'
            | '%'
            | '@'
            | '+'
            | '*'
            | '['
            | ']'
            | '{'
            | '}'
            | '/'
            | '\\'
            | '&'
            | '#'
            | '$'
    )
}

/// Keep only the allowed characters of `text`, preserving their order.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|&ch| is_allowed(ch)).collect()
}

/// The first `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
