use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;

use examscan_core::PaperOutline;
use examscan_parsing::OutlineError;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the per-paper summary after extraction.
pub fn print_summary(
    w: &mut dyn Write,
    outline: &PaperOutline,
    dest: Option<&Path>,
    color: ColorMode,
) -> std::io::Result<()> {
    let subparts: usize = outline.questions.iter().map(|q| q.subparts.len()).sum();

    if outline.questions.is_empty() {
        // An empty outline is a result, not an error: no boundary was
        // ever detected in this paper.
        let msg = format!("{}: no questions found", outline.paper_id);
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{msg}")?;
        }
    } else {
        let first = &outline.questions[0];
        let last = &outline.questions[outline.questions.len() - 1];
        let counts = format!(
            "{} question(s), {} sub-part(s), pages {}-{}",
            outline.questions.len(),
            subparts,
            first.page,
            last.page
        );
        if color.enabled() {
            writeln!(w, "{}: {}", outline.paper_id.bold(), counts.green())?;
        } else {
            writeln!(w, "{}: {}", outline.paper_id, counts)?;
        }
    }

    if let Some(dest) = dest {
        let note = format!("  -> {}", dest.display());
        if color.enabled() {
            writeln!(w, "{}", note.dimmed())?;
        } else {
            writeln!(w, "{note}")?;
        }
    }
    Ok(())
}

/// Print a fatal per-file failure (the document could not be opened or
/// read).
pub fn print_failure(
    w: &mut dyn Write,
    name: &str,
    error: &OutlineError,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}: {}", "ERROR:".red(), name, error)?;
    } else {
        writeln!(w, "ERROR: {name}: {error}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use examscan_core::Question;

    fn outline(questions: Vec<Question>) -> PaperOutline {
        PaperOutline {
            paper_id: "paper.pdf".into(),
            questions,
            preamble: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut buf = Vec::new();
        let q = Question {
            id: "Q1".into(),
            text: "Body.".into(),
            page: 3,
            subparts: vec![],
        };
        print_summary(&mut buf, &outline(vec![q]), None, ColorMode(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1 question(s)"));
        assert!(text.contains("pages 3-3"));
    }

    #[test]
    fn test_summary_empty_outline_is_not_an_error() {
        let mut buf = Vec::new();
        print_summary(&mut buf, &outline(vec![]), None, ColorMode(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("no questions found"));
    }
}
