//! Thin layer over `scraper` with the handful of DOM operations the site
//! scrapers need: select, flatten text with `<br>` as newline, skip noise.

use scraper::{ElementRef, Html, Node, Selector};

use crate::lyrics::slug::fingerprint;

/// Elements whose text never belongs to the lyrics.
const ALWAYS_SKIPPED: &[&str] = &["script", "style", "noscript", "button", "iframe"];

/// How an element's text is flattened.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions<'a> {
    /// Child elements dropped together with their text.
    pub skip: &'a [&'a str],
    /// Inserted between consecutive text nodes.
    pub separator: Option<&'a str>,
}

pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All elements matching `css`. An invalid selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                tracing::debug!(selector = css, error = ?e, "Invalid selector");
                Vec::new()
            }
        }
    }

    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        self.select(css).into_iter().next()
    }

    /// Fingerprints of everything the page displays as its own title: the
    /// document title, `og:title`, and the given heading selectors, one per
    /// element.
    pub fn displayed_fingerprints(&self, headings: &[&str]) -> Vec<String> {
        let mut shown: Vec<String> = self
            .select("title")
            .into_iter()
            .map(|el| el.text().collect())
            .collect();
        for el in self.select(r#"meta[property="og:title"]"#) {
            if let Some(content) = el.value().attr("content") {
                shown.push(content.to_string());
            }
        }
        for css in headings {
            shown.extend(self.select(css).into_iter().map(|el| el.text().collect()));
        }
        shown
            .iter()
            .map(|text| fingerprint(text))
            .filter(|fp| !fp.is_empty())
            .collect()
    }
}

/// Flattened text of `el`: `<br>` becomes a newline, skipped children vanish.
pub fn element_text(el: ElementRef<'_>, opts: &TextOptions<'_>) -> String {
    let mut out = String::new();
    collect_text(el, opts, &mut out);
    out
}

fn collect_text(el: ElementRef<'_>, opts: &TextOptions<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                if let Some(sep) = opts.separator
                    && !out.is_empty()
                    && !text.trim().is_empty()
                {
                    out.push_str(sep);
                }
                if opts.separator.is_some() {
                    out.push_str(text.trim());
                } else {
                    out.push_str(text);
                }
            }
            Node::Element(element) => {
                let name = element.name();
                if name == "br" {
                    out.push('\n');
                } else if ALWAYS_SKIPPED.contains(&name) || opts.skip.contains(&name) {
                    continue;
                } else if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, opts, out);
                }
            }
            _ => {}
        }
    }
}

/// Text of every element, each followed by a blank line, trimmed.
pub fn joined_blocks<'a>(
    elements: impl IntoIterator<Item = ElementRef<'a>>,
    opts: &TextOptions<'_>,
    trim_each: bool,
) -> String {
    let mut lyrics = String::new();
    for el in elements {
        let text = element_text(el, opts);
        lyrics.push_str(if trim_each { text.trim() } else { &text });
        lyrics.push_str("\n\n");
    }
    lyrics.trim().to_string()
}
