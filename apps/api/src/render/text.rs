//! Text cleanup for rendering, and file naming for written artifacts.

use unicode_normalization::UnicodeNormalization;

use crate::generation::pack::Platform;

/// Max characters of the topic kept in a file name.
pub const SLUG_MAX_CHARS: usize = 40;

/// Smart punctuation the built-in PDF fonts cannot draw, with ASCII stand-ins.
/// Includes the UTF-8-read-as-Latin-1 forms that turn up in pasted text.
const ASCII_FALLBACKS: &[(&str, &str)] = &[
    ("â€¢", "- "),
    ("â€“", "-"),
    ("â€”", "-"),
    ("â€‘", "-"),
    ("\u{2022}", "- "),
    ("\u{2013}", "-"),
    ("\u{2014}", "-"),
    ("\u{2011}", "-"),
    ("\u{2010}", "-"),
];

/// NFKC-normalizes `s`; without a Unicode-capable font, also swaps smart
/// punctuation for ASCII.
pub fn sanitize_for_pdf(s: &str, unicode_font: bool) -> String {
    let normalized: String = s.nfkc().collect();
    if unicode_font {
        return normalized;
    }
    ASCII_FALLBACKS
        .iter()
        .fold(normalized, |text, (from, to)| text.replace(from, to))
}

/// Topic with every char outside `[A-Za-z0-9_-]` replaced by `_`, cut to 40 chars.
pub fn topic_slug(topic: &str) -> String {
    topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(SLUG_MAX_CHARS)
        .collect()
}

/// `<prefix>_<platform>_<slug>`, the stem shared by the .md and .pdf files.
pub fn file_base(prefix: &str, platform: Platform, topic: &str) -> String {
    format!("{prefix}_{}_{}", platform.as_str(), topic_slug(topic))
}

/// True for bare file names made of `[A-Za-z0-9_.-]` with no `..`.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
