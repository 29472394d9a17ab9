use alloc::format;
use alloc::string::String;

/// Escapes `&`, `<` and `>` so `text` can be embedded in Pango-style markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Tooltip for the now-playing labels: `<b>artist</b> - title`.
///
/// Only needed when one of the labels is ellipsized; returns `None` otherwise.
pub fn now_playing_tooltip(
    title: &str,
    artist: &str,
    title_ellipsized: bool,
    artist_ellipsized: bool,
) -> Option<String> {
    if !title_ellipsized && !artist_ellipsized {
        return None;
    }
    Some(format!(
        "<b>{}</b> - {}",
        escape_markup(artist),
        escape_markup(title)
    ))
}
