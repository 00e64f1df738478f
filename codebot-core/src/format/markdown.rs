/// Characters that carry meaning in MarkdownV2 and must be escaped in plain text.
pub const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Returns true if `ch` must be preceded by a backslash in MarkdownV2 text.
pub fn is_reserved(ch: char) -> bool {
    MARKDOWN_V2_RESERVED.contains(&ch)
}

/// Escapes every reserved MarkdownV2 character in `text` with a backslash.
///
/// Nothing else is touched: no trimming, no case changes. Escaping already escaped
/// text adds a second backslash before every reserved character, so a segment must
/// be escaped exactly once.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        if is_reserved(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
