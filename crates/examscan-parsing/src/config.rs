use thiserror::Error;

/// Controls how a list of keywords/patterns is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Cover-page/instruction boilerplate: a matching line is dropped.
pub(crate) const DEFAULT_SKIP_KEYWORDS: &[&str] = &[
    "Paper 2",
    "READ THESE INSTRUCTIONS FIRST",
    "Mathematical Formulae",
    "This document consists",
    "BLANK PAGE",
];

/// Answer/marking-scheme onset: a matching line halts the whole parse.
pub(crate) const DEFAULT_STOP_KEYWORDS: &[&str] = &[
    "Marking Scheme",
    "Qn Steps/Answer",
    "Steps/Answer",
    "Remarks",
    "Answer Scheme",
    "Suggested Answers",
];

/// Font-name substrings that mark a span as bold, matched
/// case-insensitively. Rendering backends disagree on naming
/// ("TimesNewRomanPS-BoldMT", "Arial,Bold"), hence a list.
pub(crate) const DEFAULT_BOLD_NAME_SUBSTRINGS: &[&str] = &["bold"];

/// Configuration for the outline extraction pipeline.
///
/// The zone thresholds and the bold predicate are heuristics tuned to one
/// rendering backend's metadata conventions, so everything here is a
/// knob rather than a literal. Use [`OutlineConfigBuilder`] to construct.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Top fraction of page height excluded as the header band (0.0–1.0).
    pub(crate) header_fraction: f32,
    /// Bottom fraction of page height excluded as the footer band (0.0–1.0).
    pub(crate) footer_fraction: f32,
    /// Largest numeral accepted as a question-number candidate.
    pub(crate) max_question_number: u32,
    /// Substrings marking a font name as bold.
    pub(crate) bold_name_substrings: ListOverride<String>,
    /// Line-skip keyword set.
    pub(crate) skip_keywords: ListOverride<String>,
    /// Parse-halt keyword set.
    pub(crate) stop_keywords: ListOverride<String>,
    /// Pages skipped before parsing begins (the source tool hard-coded 2
    /// for cover pages; 0 leaves every page to the keyword gate).
    pub(crate) skip_leading_pages: u32,
    /// Strip leading "(i)".."(v)" markers instead of treating them as
    /// structure.
    pub(crate) strip_roman_markers: bool,
    /// Keep text seen before the first boundary as an outline preamble
    /// instead of discarding it.
    pub(crate) capture_preamble: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            header_fraction: 0.12,
            footer_fraction: 0.12,
            max_question_number: 50,
            bold_name_substrings: ListOverride::Default,
            skip_keywords: ListOverride::Default,
            stop_keywords: ListOverride::Default,
            skip_leading_pages: 0,
            strip_roman_markers: true,
            capture_preamble: false,
        }
    }
}

impl OutlineConfig {
    pub fn header_fraction(&self) -> f32 {
        self.header_fraction
    }

    pub fn footer_fraction(&self) -> f32 {
        self.footer_fraction
    }

    pub fn max_question_number(&self) -> u32 {
        self.max_question_number
    }

    /// Resolved bold-name substrings, lowercased for matching.
    pub(crate) fn resolved_bold_substrings(&self) -> Vec<String> {
        resolve_lowercase(&self.bold_name_substrings, DEFAULT_BOLD_NAME_SUBSTRINGS)
    }

    /// Resolved skip keywords, lowercased for matching.
    pub(crate) fn resolved_skip_keywords(&self) -> Vec<String> {
        resolve_lowercase(&self.skip_keywords, DEFAULT_SKIP_KEYWORDS)
    }

    /// Resolved stop keywords, lowercased for matching.
    pub(crate) fn resolved_stop_keywords(&self) -> Vec<String> {
        resolve_lowercase(&self.stop_keywords, DEFAULT_STOP_KEYWORDS)
    }
}

fn resolve_lowercase(list: &ListOverride<String>, defaults: &[&str]) -> Vec<String> {
    let defaults: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
    list.resolve(&defaults)
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect()
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("zone fraction out of range: {0} (must lie within 0.0..1.0)")]
    FractionOutOfRange(f32),
    #[error("max question number must be at least 1")]
    ZeroMaxQuestionNumber,
}

/// Builder for [`OutlineConfig`]. Fails fast on out-of-range thresholds.
#[derive(Debug, Clone, Default)]
pub struct OutlineConfigBuilder {
    header_fraction: Option<f32>,
    footer_fraction: Option<f32>,
    max_question_number: Option<u32>,
    bold_name_substrings: ListOverride<String>,
    skip_keywords: ListOverride<String>,
    stop_keywords: ListOverride<String>,
    skip_leading_pages: Option<u32>,
    strip_roman_markers: Option<bool>,
    capture_preamble: Option<bool>,
}

impl OutlineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Zone thresholds ──

    pub fn header_fraction(mut self, fraction: f32) -> Self {
        self.header_fraction = Some(fraction);
        self
    }

    pub fn footer_fraction(mut self, fraction: f32) -> Self {
        self.footer_fraction = Some(fraction);
        self
    }

    // ── Boundary detection ──

    pub fn max_question_number(mut self, n: u32) -> Self {
        self.max_question_number = Some(n);
        self
    }

    pub fn set_bold_name_substrings(mut self, substrings: Vec<String>) -> Self {
        self.bold_name_substrings = ListOverride::Replace(substrings);
        self
    }

    pub fn add_bold_name_substring(mut self, substring: String) -> Self {
        extend_override(&mut self.bold_name_substrings, substring);
        self
    }

    // ── Keyword gate ──

    pub fn set_skip_keywords(mut self, keywords: Vec<String>) -> Self {
        self.skip_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_skip_keyword(mut self, keyword: String) -> Self {
        extend_override(&mut self.skip_keywords, keyword);
        self
    }

    pub fn set_stop_keywords(mut self, keywords: Vec<String>) -> Self {
        self.stop_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_stop_keyword(mut self, keyword: String) -> Self {
        extend_override(&mut self.stop_keywords, keyword);
        self
    }

    // ── Policies ──

    pub fn skip_leading_pages(mut self, pages: u32) -> Self {
        self.skip_leading_pages = Some(pages);
        self
    }

    pub fn strip_roman_markers(mut self, strip: bool) -> Self {
        self.strip_roman_markers = Some(strip);
        self
    }

    pub fn capture_preamble(mut self, capture: bool) -> Self {
        self.capture_preamble = Some(capture);
        self
    }

    pub fn build(self) -> Result<OutlineConfig, ConfigError> {
        let check_fraction = |f: f32| -> Result<f32, ConfigError> {
            if (0.0..1.0).contains(&f) {
                Ok(f)
            } else {
                Err(ConfigError::FractionOutOfRange(f))
            }
        };

        let max_question_number = self.max_question_number.unwrap_or(50);
        if max_question_number == 0 {
            return Err(ConfigError::ZeroMaxQuestionNumber);
        }

        Ok(OutlineConfig {
            header_fraction: check_fraction(self.header_fraction.unwrap_or(0.12))?,
            footer_fraction: check_fraction(self.footer_fraction.unwrap_or(0.12))?,
            max_question_number,
            bold_name_substrings: self.bold_name_substrings,
            skip_keywords: self.skip_keywords,
            stop_keywords: self.stop_keywords,
            skip_leading_pages: self.skip_leading_pages.unwrap_or(0),
            strip_roman_markers: self.strip_roman_markers.unwrap_or(true),
            capture_preamble: self.capture_preamble.unwrap_or(false),
        })
    }
}

fn extend_override(list: &mut ListOverride<String>, value: String) {
    match list {
        ListOverride::Extend(v) => v.push(value),
        _ => *list = ListOverride::Extend(vec![value]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OutlineConfig::default();
        assert!((config.header_fraction - 0.12).abs() < f32::EPSILON);
        assert!((config.footer_fraction - 0.12).abs() < f32::EPSILON);
        assert_eq!(config.max_question_number, 50);
        assert_eq!(config.skip_leading_pages, 0);
        assert!(config.strip_roman_markers);
        assert!(!config.capture_preamble);
    }

    #[test]
    fn test_builder_basic() {
        let config = OutlineConfigBuilder::new()
            .header_fraction(0.08)
            .footer_fraction(0.05)
            .max_question_number(30)
            .skip_leading_pages(2)
            .build()
            .unwrap();
        assert!((config.header_fraction - 0.08).abs() < f32::EPSILON);
        assert!((config.footer_fraction - 0.05).abs() < f32::EPSILON);
        assert_eq!(config.max_question_number, 30);
        assert_eq!(config.skip_leading_pages, 2);
    }

    #[test]
    fn test_builder_invalid_fraction() {
        let result = OutlineConfigBuilder::new().footer_fraction(1.3).build();
        assert_eq!(result.unwrap_err(), ConfigError::FractionOutOfRange(1.3));
    }

    #[test]
    fn test_builder_zero_max_question_number() {
        let result = OutlineConfigBuilder::new().max_question_number(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::ZeroMaxQuestionNumber);
    }

    #[test]
    fn test_keyword_extend_keeps_defaults() {
        let config = OutlineConfigBuilder::new()
            .add_stop_keyword("Answer Key".into())
            .build()
            .unwrap();
        let stops = config.resolved_stop_keywords();
        assert!(stops.contains(&"marking scheme".to_string()));
        assert!(stops.contains(&"answer key".to_string()));
    }

    #[test]
    fn test_keyword_replace_drops_defaults() {
        let config = OutlineConfigBuilder::new()
            .set_skip_keywords(vec!["Formula Sheet".into()])
            .build()
            .unwrap();
        assert_eq!(config.resolved_skip_keywords(), vec!["formula sheet"]);
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_bold_substrings_lowercased() {
        let config = OutlineConfigBuilder::new()
            .add_bold_name_substring("Heavy".into())
            .build()
            .unwrap();
        let subs = config.resolved_bold_substrings();
        assert!(subs.contains(&"bold".to_string()));
        assert!(subs.contains(&"heavy".to_string()));
    }
}
