//! Section labels (`[chorus]`, `[verse 2]`) and the parts they name.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::repeats::{marker_count, stacked_count};

static BRACKET_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\[\]]+)\](.*)$").unwrap());
static INLINE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\w+(?:\s+\w+)?\]").unwrap());
static BARE_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\(?(repeat\s+)?(pre-?chorus|chorus|verse|refrain|bridge|intro|outro|hook)(?:\s*(\d+))?\)?:?(.*)$",
    )
    .unwrap()
});
static REPEAT_NOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\(?repeat\)?$").unwrap());

/// A canonical label line: `[name]`, optionally followed by ` xN` or a
/// `(repeat)` note.
static LABEL_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\[\]]+\](?: x\d+| \(repeat\))?$").unwrap());
static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\[\]]+)\]$").unwrap());
static BARE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\(?repeat\)?\s+)?\[([^\[\]]+)\](?:\s+\(?repeat\)?)?$").unwrap()
});

pub(super) fn is_label_line(line: &str) -> bool {
    LABEL_LINE_RE.is_match(line) && marker_count(line, true).is_none()
}

/// Case-folds bracketed labels and short inline tags, and turns bare section
/// names ("Chorus:", "(Verse 2)") into bracketed labels.
pub fn labels(text: &str) -> String {
    text.split('\n')
        .map(|line| match label_line(line) {
            Some(label) => label,
            None => INLINE_TAG_RE
                .replace_all(line, |c: &Captures| c[0].to_lowercase())
                .into_owned(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Canonical form of `line` when it is a section label.
pub(super) fn label_line(line: &str) -> Option<String> {
    if let Some(caps) = BRACKET_LINE_RE.captures(line) {
        let inner = caps[1].trim();
        // "[x2]" is a repeat marker, not a label
        if inner.is_empty() || marker_count(&format!("[{inner}]"), true).is_some() {
            return None;
        }
        return with_suffix(inner.to_lowercase(), &caps[2], false);
    }

    let caps = BARE_SECTION_RE.captures(line)?;
    let mut name = caps[2].to_lowercase();
    if let Some(number) = caps.get(3) {
        name.push(' ');
        name.push_str(number.as_str());
    }
    with_suffix(name, &caps[4], caps.get(1).is_some())
}

fn with_suffix(name: String, rest: &str, repeated: bool) -> Option<String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Some(if repeated {
            format!("[{name}] (repeat)")
        } else {
            format!("[{name}]")
        });
    }
    if REPEAT_NOTE_RE.is_match(rest) {
        return Some(format!("[{name}] (repeat)"));
    }
    stacked_count(rest).map(|n| format!("[{name}] x{n}"))
}

fn definition_label(line: &str) -> Option<&str> {
    DEFINITION_RE.captures(line)?.get(1).map(|m| m.as_str())
}

fn bare_label(line: &str) -> Option<String> {
    BARE_LABEL_RE
        .captures(line)?
        .get(1)
        .map(|m| m.as_str().to_lowercase())
}

/// Expands bare label blocks into the part they name.
///
/// The first `[label]` block with content defines the part. A block that is
/// only `[label]` (or `[label] (repeat)`) is replaced by that definition.
/// Some sites render the label and its lyrics as separate blocks and then
/// the whole part again; when the bare label is followed by the part's
/// content, that content and an identical labeled block right after it are
/// absorbed.
pub fn merge_parts(text: &str) -> String {
    let blocks: Vec<Vec<&str>> = text
        .split('\n')
        .collect::<Vec<_>>()
        .split(|line| line.trim().is_empty())
        .filter(|block| !block.is_empty())
        .map(<[&str]>::to_vec)
        .collect();

    let mut parts: HashMap<&str, &[&str]> = HashMap::new();
    for block in &blocks {
        if block.len() > 1
            && let Some(label) = definition_label(block[0])
        {
            parts.entry(label).or_insert(block.as_slice());
        }
    }

    let mut out: Vec<&[&str]> = Vec::with_capacity(blocks.len());
    let mut i = 0;
    while i < blocks.len() {
        let block = blocks[i].as_slice();
        i += 1;

        let definition = match block {
            [only] => bare_label(only).and_then(|label| parts.get(label.as_str()).copied()),
            _ => None,
        };
        let Some(definition) = definition else {
            out.push(block);
            continue;
        };

        if blocks.get(i).is_some_and(|next| next[..] == definition[1..]) {
            i += 1;
            if blocks.get(i).is_some_and(|next| next[..] == definition[..]) {
                i += 1;
            }
        }
        out.push(definition);
    }

    out.iter()
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
