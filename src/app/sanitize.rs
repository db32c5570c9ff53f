use scraper::Html;

/// Length of the synopsis blurb in the hero banner, in characters.
pub const HERO_BLURB_CHARS: usize = 150;

/// Turns a catalog synopsis (inline HTML) into plain text.
///
/// The markup goes through an HTML tokenizer, so malformed or nested tags
/// and entities are handled. Text nodes are kept in document order; any
/// stray angle bracket left in the text is dropped.
pub fn strip_tags(markup: &str) -> String {
    if !markup.contains(['<', '>', '&']) {
        return markup.trim().to_string();
    }

    let fragment = Html::parse_fragment(markup);
    let text: String = fragment
        .root_element()
        .text()
        .collect::<String>()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();

    text.trim().to_string()
}

/// First `max_chars` characters of `text` (char based, never splits a code point).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Hero banner text: sanitized synopsis cut to 150 characters, then "...".
pub fn hero_blurb(markup: &str) -> String {
    let plain = strip_tags(markup);
    format!("{}...", truncate_chars(&plain, HERO_BLURB_CHARS))
}
