//! Slugs and fingerprints: reducing artist/title strings to what lyrics
//! sites put in their URLs and page headings.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());
static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]+").unwrap());
static SPACE_OR_HYPHEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s-]+").unwrap());
static NOT_SLUG_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s_-]+").unwrap());
static SEPARATOR_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Alphanumeric-only, case-folded, ASCII reduction of `s`.
pub fn fingerprint(s: &str) -> String {
    any_ascii(s)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Case-fold and transliterate to the closest ASCII.
pub fn fold(s: &str) -> String {
    any_ascii(&s.to_lowercase()).to_lowercase()
}

/// Punctuation dropped, whitespace and hyphen runs joined with `-`.
pub fn hyphenated(s: &str) -> String {
    let stripped = PUNCTUATION_RE.replace_all(s, "");
    SPACE_OR_HYPHEN_RE
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}

/// Every non-word run replaced by `-`.
pub fn dashed(s: &str) -> String {
    NON_WORD_RE.replace_all(s, "-").trim_matches('-').to_string()
}

/// Every non-word character dropped.
pub fn squashed(s: &str) -> String {
    NON_WORD_RE.replace_all(s, "").to_string()
}

/// Only `[a-z0-9]` kept, separator runs joined with `_`.
pub fn underscored(s: &str) -> String {
    let stripped = NOT_SLUG_CHAR_RE.replace_all(s, "");
    SEPARATOR_RUN_RE
        .replace_all(&stripped, "_")
        .trim_matches('_')
        .to_string()
}

/// Uppercase the first character, leave the rest as is.
pub fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
