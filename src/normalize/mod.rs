//! Lyrics text normalization.
//!
//! `normalize` runs a fixed sequence of passes, each a pure `&str -> String`
//! function. Later passes rely on earlier ones: labels are matched after
//! whitespace is flattened, repeats are expanded after labels are
//! canonical, parts are merged after repeats are expanded. The result is a
//! fixed point: normalizing normalized text changes nothing.

pub mod repeats;
pub mod sections;
pub mod text;

pub use repeats::MAX_REPEAT;

/// A named normalization step.
#[derive(Clone, Copy)]
pub struct Pass {
    pub name: &'static str,
    pub run: fn(&str) -> String,
}

pub const PASSES: &[Pass] = &[
    Pass {
        name: "glyphs",
        run: text::glyphs,
    },
    Pass {
        name: "whitespace",
        run: text::whitespace,
    },
    Pass {
        name: "decoration",
        run: text::decoration,
    },
    Pass {
        name: "labels",
        run: sections::labels,
    },
    Pass {
        name: "repeats",
        run: repeats::expand_repeats,
    },
    Pass {
        name: "merge",
        run: sections::merge_parts,
    },
    Pass {
        name: "blank-lines",
        run: text::collapse_blank_lines,
    },
];

pub fn normalize(raw: &str) -> String {
    PASSES.iter().fold(raw.to_string(), |text, pass| {
        let next = (pass.run)(&text);
        if next != text {
            tracing::trace!(pass = pass.name, "Normalization pass changed text");
        }
        next
    })
}
