//! Language subtags: canonicalizing what the tags declare, detecting what the
//! lyrics actually are, and spotting instrumentals.

use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language not determined.
pub const UNDETERMINED: &str = "und";
/// No linguistic content.
pub const INSTRUMENTAL: &str = "zxx";
/// Lyrics text written for instrumental tracks.
pub const INSTRUMENTAL_LYRICS: &str = "[instrumental]";

pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.9;

/// ISO 639 special-purpose codes isolang doesn't carry as languages.
const SPECIAL_CODES: &[&str] = &[UNDETERMINED, INSTRUMENTAL, "mul", "mis"];

/// Below this many letters a detection is noise.
const MIN_SAMPLE_CHARS: usize = 5;

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());
static BRACKETED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Canonical ISO 639-3 subtag for a declared language, or `und`.
///
/// Accepts 639-3 and 639-1 codes, English language names, and tags with a
/// region or script suffix (`pt-BR`, `zh_Hant`), case-insensitively.
pub fn canonical_subtag(declared: &str) -> String {
    let folded = declared.trim().to_lowercase();
    let folded = SEPARATOR_RE.replace_all(&folded, " ");
    let folded = folded.trim();
    if folded.is_empty() {
        return UNDETERMINED.to_string();
    }

    if let Some(code) = lookup(folded) {
        return code;
    }
    if let Some((primary, _)) = folded.split_once(' ')
        && let Some(code) = lookup(primary)
    {
        return code;
    }
    UNDETERMINED.to_string()
}

fn lookup(folded: &str) -> Option<String> {
    if let Some(special) = SPECIAL_CODES.iter().find(|c| **c == folded) {
        return Some(special.to_string());
    }
    let language = match folded {
        // Retired 639-1 code some taggers still write.
        "iw" => Language::from_639_1("he"),
        code if code.len() == 3 => Language::from_639_3(code),
        code if code.len() == 2 => Language::from_639_1(code),
        _ => None,
    }
    .or_else(|| Language::from_name(&title_case(folded)))?;
    Some(language.to_639_3().to_string())
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two-letter ISO 639-1 code for a canonical subtag, when one exists.
pub fn to_search_code(subtag: &str) -> Option<&'static str> {
    Language::from_639_3(subtag)?.to_639_1()
}

/// True when the whole text reads "instrumental", ignoring case, brackets
/// and punctuation.
pub fn is_instrumental_text(text: &str) -> bool {
    let letters: String = text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    letters == "instrumental"
}

/// Statistical language identification.
pub trait LanguageDetector: Send + Sync {
    /// `(subtag, confidence)` for `text`, `None` when undecided.
    fn detect(&self, text: &str) -> Option<(String, f64)>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<(String, f64)> {
        let info = whatlang::detect(text)?;
        Some((info.lang().code().to_string(), info.confidence()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageVerdict {
    pub subtag: String,
    pub confidence: f64,
}

impl LanguageVerdict {
    fn new(subtag: impl Into<String>, confidence: f64) -> Self {
        Self {
            subtag: subtag.into(),
            confidence,
        }
    }

    fn undetermined() -> Self {
        Self::new(UNDETERMINED, 0.0)
    }

    pub fn is_instrumental(&self) -> bool {
        self.subtag == INSTRUMENTAL
    }

    pub fn is_undetermined(&self) -> bool {
        self.subtag == UNDETERMINED
    }
}

pub struct LanguageResolver {
    detector: Box<dyn LanguageDetector>,
    threshold: f64,
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new(Box::new(WhatlangDetector), DEFAULT_DETECTION_THRESHOLD)
    }
}

impl LanguageResolver {
    pub fn new(detector: Box<dyn LanguageDetector>, threshold: f64) -> Self {
        Self {
            detector,
            threshold,
        }
    }

    /// Detected language of `text` with section labels and punctuation
    /// stripped first.
    pub fn detect(&self, text: &str) -> LanguageVerdict {
        let sample = BRACKETED_RE.replace_all(text, " ");
        let sample = NON_WORD_RE.replace_all(&sample, " ");
        let significant = sample.chars().filter(|c| !c.is_whitespace()).count();
        if significant < MIN_SAMPLE_CHARS {
            return LanguageVerdict::undetermined();
        }

        match self.detector.detect(&sample) {
            Some((code, confidence)) => LanguageVerdict::new(canonical_subtag(&code), confidence),
            None => LanguageVerdict::undetermined(),
        }
    }

    /// Final language for lyrics `text` whose tags declared `declared`.
    ///
    /// Detection overrides the declaration only when nothing usable was
    /// declared or the detector is confident beyond the threshold.
    pub fn resolve(&self, declared: &str, text: &str) -> LanguageVerdict {
        let declared = canonical_subtag(declared);
        if declared == INSTRUMENTAL || is_instrumental_text(text) {
            return LanguageVerdict::new(INSTRUMENTAL, 1.0);
        }

        let detected = self.detect(text);
        if !detected.is_undetermined()
            && (declared == UNDETERMINED || detected.confidence > self.threshold)
        {
            tracing::debug!(declared = %declared, detected = %detected.subtag, confidence = detected.confidence, "Using detected language");
            return detected;
        }
        if declared == UNDETERMINED {
            return LanguageVerdict::undetermined();
        }
        LanguageVerdict::new(declared, 1.0)
    }
}
