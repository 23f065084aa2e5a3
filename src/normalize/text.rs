//! Character- and line-level cleanup: glyphs, whitespace, decoration, blank
//! lines.

use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_SPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\t \u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}]+").unwrap()
});
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|[\r\u{0085}\u{2028}\u{2029}]").unwrap());
static RULE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*_~#=]+( [-*_~#=]+)*$").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// One apostrophe, one double quote, one dash, three dots.
pub fn glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{2035}' | '`'
            | '\u{00B4}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{2036}' => {
                out.push('"')
            }
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Unix line breaks, single spaces, no space at either end of a line.
pub fn whitespace(text: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(text, "\n");
    text.split('\n')
        .map(|line| HORIZONTAL_SPACE_RE.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drops separator rules and lines carrying a URL (site credits, ads).
pub fn decoration(text: &str) -> String {
    text.split('\n')
        .filter(|line| !has_url(line))
        .map(|line| if is_rule_line(line) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A line of nothing but dashes, stars and similar separators.
pub(super) fn is_rule_line(line: &str) -> bool {
    RULE_LINE_RE.is_match(line)
}

fn has_url(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.contains("http://") || lower.contains("https://") || lower.contains("www.")
}

pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").trim().to_string()
}
