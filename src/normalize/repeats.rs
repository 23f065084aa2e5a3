//! Repeat markers: `x2`, `×3`, `[x2]`, `[2x]`, `(x2)`, `(2x)`, and a bare `2x`
//! on its own line.
//!
//! A marker trailing a line repeats that line. A marker on its own line
//! repeats the block above it. A marker with nothing above it to repeat is
//! rewritten as a canonical `xN` line and left in place. A marked label
//! stays a single `[label] xN` line, and a marked separator rule is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::sections::{is_label_line, label_line};
use super::text::is_rule_line;

/// Largest count read as a repeat marker. Anything bigger is text.
pub const MAX_REPEAT: u32 = 99;

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[x×]\s?(\d+)|\[\s*[x×]\s?(\d+)\s*\]|\[\s*(\d+)\s?[x×]\s*\]|\(\s*[x×]\s?(\d+)\s*\)|\(\s*(\d+)\s?[x×]\s*\)|(\d+)\s?[x×])$",
    )
    .unwrap()
});

static TRAILING_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(.*?\S)(?:\s+([x×]\s?\d+)|\s*(\[\s*[x×]\s?\d+\s*\]|\[\s*\d+\s?[x×]\s*\]|\(\s*[x×]\s?\d+\s*\)|\(\s*\d+\s?[x×]\s*\)))$",
    )
    .unwrap()
});

/// Product of the markers in `token` if it is nothing but markers
/// (`x2`, `x2 x3`), capped at `MAX_REPEAT`.
pub(super) fn stacked_count(token: &str) -> Option<u32> {
    let (content, times) = strip_trailing_markers(token.trim());
    marker_count(content, true).map(|n| n.saturating_mul(times).min(MAX_REPEAT))
}

/// Repeat count of `token` if it is exactly one marker. Bare `2x` only
/// counts when `standalone`.
pub(super) fn marker_count(token: &str, standalone: bool) -> Option<u32> {
    let caps = MARKER_RE.captures(token.trim())?;
    if caps.get(6).is_some() && !standalone {
        return None;
    }
    let n: u32 = caps.iter().skip(1).flatten().next()?.as_str().parse().ok()?;
    (1..=MAX_REPEAT).contains(&n).then_some(n)
}

enum Line<'a> {
    Blank,
    Label,
    MarkedLabel(String),
    Marker(u32),
    Text(&'a str, u32),
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(n) = marker_count(line, true) {
        return Line::Marker(n);
    }
    if is_label_line(line) {
        return Line::Label;
    }

    // "x2 x3": nothing left but another marker
    if let Some(n) = stacked_count(line) {
        return Line::Marker(n);
    }
    let (content, times) = strip_trailing_markers(line);
    if content.len() == line.len() {
        return Line::Text(content, times);
    }
    if is_rule_line(content) {
        return Line::Blank;
    }
    match label_line(content) {
        Some(label) if label.ends_with(']') => Line::MarkedLabel(format!("{label} x{times}")),
        Some(label) => Line::MarkedLabel(label),
        None => Line::Text(content, times),
    }
}

/// Peels markers off the end of `line`; stacked markers multiply.
fn strip_trailing_markers(line: &str) -> (&str, u32) {
    let mut content = line;
    let mut times = 1u32;
    while let Some(caps) = TRAILING_MARKER_RE.captures(content) {
        let Some(n) = caps
            .get(2)
            .or_else(|| caps.get(3))
            .and_then(|m| marker_count(m.as_str(), false))
        else {
            break;
        };
        let Some(rest) = caps.get(1) else { break };
        times = times.saturating_mul(n);
        content = rest.as_str();
    }
    (content, times.min(MAX_REPEAT))
}

pub fn expand_repeats(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        match classify(lines[i]) {
            Line::Blank => out.push(String::new()),
            Line::Label => out.push(lines[i].to_string()),
            Line::MarkedLabel(label) => out.push(label),
            Line::Text(content, times) => {
                out.extend(std::iter::repeat_n(content.to_string(), times as usize));
            }
            Line::Marker(mut times) => {
                while let Some(Line::Marker(n)) = lines.get(i + 1).copied().map(classify) {
                    times = times.saturating_mul(n).min(MAX_REPEAT);
                    i += 1;
                }

                let start = out.iter().rposition(String::is_empty).map_or(0, |p| p + 1);
                let block = out.split_off(start);
                if block.iter().all(|l| is_label_line(l)) {
                    out.extend(block);
                    out.push(format!("x{times}"));
                } else {
                    for n in 0..times {
                        if n > 0 {
                            out.push(String::new());
                        }
                        out.extend(block.iter().cloned());
                    }
                    if lines.get(i + 1).is_some_and(|l| !l.trim().is_empty()) {
                        out.push(String::new());
                    }
                }
            }
        }
        i += 1;
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_forms() {
        for token in ["x2", "X2", "x 2", "×2", "[x2]", "[2x]", "(x2)", "(2X)"] {
            assert_eq!(marker_count(token, false), Some(2), "{token}");
        }
        assert_eq!(marker_count("2x", false), None);
        assert_eq!(marker_count("2x", true), Some(2));
        assert_eq!(marker_count("x0", true), None);
        assert_eq!(marker_count("x100", true), None);
        assert_eq!(marker_count("x99", true), Some(99));
        assert_eq!(marker_count("max2", true), None);
    }

    #[test]
    fn trailing_marker_repeats_line() {
        assert_eq!(expand_repeats("La la x3"), "La la\nLa la\nLa la");
        assert_eq!(expand_repeats("Hey (x2)"), "Hey\nHey");
        assert_eq!(expand_repeats("Go x2 x3").lines().count(), 6);
    }

    #[test]
    fn oversized_count_is_text() {
        assert_eq!(expand_repeats("Route x100"), "Route x100");
        assert_eq!(expand_repeats("Relax 2x"), "Relax 2x");
    }

    #[test]
    fn standalone_marker_repeats_block_with_label() {
        assert_eq!(
            expand_repeats("[chorus]\nOne\nTwo\nx2\nThree"),
            "[chorus]\nOne\nTwo\n\n[chorus]\nOne\nTwo\n\nThree"
        );
    }

    #[test]
    fn consecutive_markers_multiply() {
        assert_eq!(expand_repeats("Oh\n2x\n[x2]"), "Oh\n\nOh\n\nOh\n\nOh");
    }

    #[test]
    fn marker_without_content_is_canonical() {
        assert_eq!(expand_repeats("(X2)\nHello"), "x2\nHello");
        assert_eq!(expand_repeats("A\n\n[2x]"), "A\n\nx2");
        assert_eq!(expand_repeats("[chorus]\n2x"), "[chorus]\nx2");
    }

    #[test]
    fn label_lines_are_not_repeated() {
        assert_eq!(expand_repeats("[chorus] x2\nLa"), "[chorus] x2\nLa");
        assert_eq!(expand_repeats("[chorus] x2 x3\nLa"), "[chorus] x6\nLa");
        assert_eq!(expand_repeats("Chorus (x2)"), "[chorus] x2");
    }

    #[test]
    fn marked_rule_line_is_dropped() {
        assert_eq!(expand_repeats("A\n--- x2\nB"), "A\n\nB");
        assert_eq!(expand_repeats("*** (x2)"), "");
    }

    #[test]
    fn stacked_markers_multiply() {
        assert_eq!(stacked_count("x2 x3"), Some(6));
        assert_eq!(stacked_count(" (x2) "), Some(2));
        assert_eq!(stacked_count("x50 x3"), Some(MAX_REPEAT));
        assert_eq!(stacked_count("La x2"), None);
    }
}
