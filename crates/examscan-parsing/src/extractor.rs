use once_cell::sync::Lazy;
use regex::Regex;

use examscan_core::{
    DocumentLayout, DocumentSource, LayoutBackend, LineLayout, PaperOutline, Question, SpanLayout,
    Subpart,
};

use crate::OutlineError;
use crate::config::OutlineConfig;
use crate::sequence::{Acceptance, SequenceTracker};
use crate::zone::{self, Zone};

/// Leading roman-numeral parenthetical, e.g. "(i)", "(iv)". These are
/// continuation markers in the papers this tool targets, not structure.
static ROMAN_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((?:iii|ii|iv|v|i)\)\s*").unwrap());

/// Leading single-lowercase-letter parenthetical, e.g. "(a) Solve ...".
static SUBPART_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([a-z])\)\s*(.*)$").unwrap());

/// A configurable question-outline extraction pipeline.
///
/// Holds an [`OutlineConfig`] with resolved keyword sets; every mutable
/// bit of parse state lives in a per-call [`ParseState`], so one
/// extractor can be reused across documents (and threads) and two runs
/// over the same layout produce identical output.
pub struct OutlineExtractor {
    config: OutlineConfig,
    bold_substrings: Vec<String>,
    skip_keywords: Vec<String>,
    stop_keywords: Vec<String>,
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(OutlineConfig::default())
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: OutlineConfig) -> Self {
        let bold_substrings = config.resolved_bold_substrings();
        let skip_keywords = config.resolved_skip_keywords();
        let stop_keywords = config.resolved_stop_keywords();
        Self {
            config,
            bold_substrings,
            skip_keywords,
            stop_keywords,
        }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Load the document layout via `backend` and extract its outline.
    ///
    /// Only the backend can fail here; the fold itself is total.
    pub fn extract_via_backend(
        &self,
        source: &DocumentSource,
        backend: &dyn LayoutBackend,
    ) -> Result<PaperOutline, OutlineError> {
        let layout = backend.load_layout(source)?;
        Ok(self.extract_from_layout(&layout))
    }

    /// Deterministic fold over an already-materialized layout.
    ///
    /// Layout ambiguity (non-sequential numerals, unmatched sub-part
    /// letters, text before any question) degrades the result per the
    /// documented policies; it never fails. An empty `questions` list
    /// means no boundary was detected, not an error.
    pub fn extract_from_layout(&self, layout: &DocumentLayout) -> PaperOutline {
        let mut state = ParseState::default();

        'pages: for page in &layout.pages {
            if page.number <= self.config.skip_leading_pages {
                continue;
            }
            for block in &page.blocks {
                for line in &block.lines {
                    self.process_line(line, page.number, page.height, &mut state);
                    if state.halted {
                        break 'pages;
                    }
                }
            }
        }

        state.finish(layout.paper_id.clone(), self.config.capture_preamble)
    }

    /// Scan one line's spans: zone-filter, collect candidate numerals,
    /// and assemble the remaining body text.
    fn scan_line(&self, line: &LineLayout, page_height: f32) -> ScannedLine {
        let mut text = String::new();
        let mut candidates = Vec::new();

        for span in &line.spans {
            let trimmed = span.text.trim();
            if trimmed.is_empty() {
                continue;
            }
            match zone::classify(
                span.y0,
                page_height,
                self.config.header_fraction,
                self.config.footer_fraction,
            ) {
                Zone::Header | Zone::Footer => continue,
                Zone::Body => {}
            }

            if self.is_bold(span) {
                if let Some(value) = parse_plain_integer(trimmed) {
                    if value >= 1 && value <= self.config.max_question_number {
                        // Candidate numerals never join the line text:
                        // accepted ones become the identifier, rejected
                        // ones are incidental and dropped.
                        candidates.push(value);
                        continue;
                    }
                }
            }

            push_joined(&mut text, trimmed);
        }

        ScannedLine { text, candidates }
    }

    fn process_line(
        &self,
        line: &LineLayout,
        page_number: u32,
        page_height: f32,
        state: &mut ParseState,
    ) {
        let ScannedLine {
            mut text,
            candidates,
        } = self.scan_line(line, page_height);

        if text.is_empty() && candidates.is_empty() {
            return;
        }

        // Keyword gate runs before anything touches parse state, so a
        // gated line cannot advance the numbering sequence.
        if !text.is_empty() {
            let lower = text.to_lowercase();
            if self.skip_keywords.iter().any(|k| lower.contains(k)) {
                tracing::debug!(page = page_number, "skip keyword matched, line dropped");
                return;
            }
            if self.stop_keywords.iter().any(|k| lower.contains(k)) {
                tracing::debug!(page = page_number, "stop keyword matched, halting parse");
                state.halted = true;
                return;
            }
        }

        // Offer candidates in span order; the first acceptance opens the
        // question and the rest stay suppressed for this line.
        for value in candidates {
            match state.tracker.offer(value, page_number) {
                Acceptance::Accepted(number) => {
                    state.open_question(number, page_number);
                    break;
                }
                Acceptance::Rejected => {
                    tracing::trace!(value, page = page_number, "incidental bold numeral dropped");
                }
            }
        }

        if text.is_empty() {
            return;
        }

        if self.config.strip_roman_markers {
            if let Some(m) = ROMAN_MARKER_RE.find(&text) {
                text = text[m.end()..].to_string();
                if text.is_empty() {
                    return;
                }
            }
        }

        if let Some(caps) = SUBPART_RE.captures(&text) {
            if state.current_question.is_some() {
                // The regex group is a single [a-z] byte, so chars().next()
                // always yields the label.
                if let Some(label) = caps[1].chars().next() {
                    let body = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                    state.open_subpart(label, body);
                    return;
                }
            }
        }

        state.append_text(&text, self.config.capture_preamble);
    }

    fn is_bold(&self, span: &SpanLayout) -> bool {
        if span.bold {
            return true;
        }
        let font = span.font_name.to_lowercase();
        self.bold_substrings.iter().any(|s| font.contains(s))
    }
}

/// Per-line scan result.
struct ScannedLine {
    text: String,
    /// Candidate question numerals in span order.
    candidates: Vec<u32>,
}

/// Mutable state for one extraction call. Created per document and
/// discarded when the fold returns; nothing survives across calls.
#[derive(Default)]
struct ParseState {
    questions: Vec<Question>,
    current_question: Option<Question>,
    current_subpart: Option<Subpart>,
    tracker: SequenceTracker,
    halted: bool,
    preamble: Vec<String>,
}

impl ParseState {
    /// Flush the open question (if any) and open a new one. Runs even
    /// when the boundary line carried no text of its own; continuation
    /// lines fill the body.
    fn open_question(&mut self, number: u32, page: u32) {
        self.close_subpart();
        if let Some(q) = self.current_question.take() {
            self.questions.push(q);
        }
        self.current_question = Some(Question {
            id: format!("Q{number}"),
            text: String::new(),
            page,
            subparts: Vec::new(),
        });
    }

    fn close_subpart(&mut self) {
        if let Some(subpart) = self.current_subpart.take() {
            if let Some(q) = self.current_question.as_mut() {
                q.subparts.push(subpart);
            }
        }
    }

    /// Open a lettered sub-part under the current question. Callers
    /// guarantee a question is open.
    fn open_subpart(&mut self, label: char, body: &str) {
        self.close_subpart();
        let parent_id = self
            .current_question
            .as_ref()
            .map(|q| q.id.as_str())
            .unwrap_or_default();
        self.current_subpart = Some(Subpart {
            id: format!("{parent_id}{label}"),
            label,
            text: body.to_string(),
        });
    }

    /// Continuation text goes to the open sub-part, else the open
    /// question, else the preamble (or nowhere, matching the source
    /// tool's drop-before-first-question policy).
    fn append_text(&mut self, text: &str, capture_preamble: bool) {
        if let Some(subpart) = self.current_subpart.as_mut() {
            push_joined(&mut subpart.text, text);
        } else if let Some(q) = self.current_question.as_mut() {
            push_joined(&mut q.text, text);
        } else if capture_preamble {
            self.preamble.push(text.to_string());
        }
    }

    fn finish(mut self, paper_id: String, capture_preamble: bool) -> PaperOutline {
        self.close_subpart();
        if let Some(q) = self.current_question.take() {
            self.questions.push(q);
        }
        let preamble = if capture_preamble && !self.preamble.is_empty() {
            Some(self.preamble.join(" "))
        } else {
            None
        };
        PaperOutline {
            paper_id,
            questions: self.questions,
            preamble,
        }
    }
}

fn parse_plain_integer(text: &str) -> Option<u32> {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

fn push_joined(buf: &mut String, text: &str) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(text);
}
