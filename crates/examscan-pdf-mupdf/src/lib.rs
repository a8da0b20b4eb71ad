use mupdf::Document;
use serde::Deserialize;

use examscan_core::{
    BackendError, BlockLayout, DocumentLayout, DocumentSource, LayoutBackend, LineLayout,
    PageLayout, SpanLayout,
};

/// MuPDF-based implementation of [`LayoutBackend`].
///
/// This crate is the sole AGPL island — it isolates the mupdf dependency
/// (which is AGPL-3.0) so that non-PDF code paths do not transitively
/// depend on it.
///
/// Layout is read from MuPDF's structured-text JSON output, which emits
/// one entry per style-uniform run (spans are preserved), each carrying
/// the font name/weight and a bounding box. Runs sharing a baseline are
/// regrouped into lines so the parser sees the blocks → lines → spans
/// shape the page actually has.
pub struct MupdfBackend {
    /// Scale applied to structured-text coordinates. 1.0 keeps them in
    /// page points, which is what the zone thresholds expect.
    scale: f32,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutBackend for MupdfBackend {
    fn load_layout(&self, source: &DocumentSource) -> Result<DocumentLayout, BackendError> {
        let document = open_document(source)?;

        let mut pages = Vec::new();
        for (index, page_result) in document
            .pages()
            .map_err(|e| BackendError::Layout(e.to_string()))?
            .enumerate()
        {
            let page = page_result.map_err(|e| BackendError::Layout(e.to_string()))?;
            let bounds = page
                .bounds()
                .map_err(|e| BackendError::Layout(e.to_string()))?;

            let json = page
                .stext_page_as_json_from_page(self.scale)
                .map_err(|e| BackendError::Layout(e.to_string()))?;

            pages.push(PageLayout {
                number: index as u32 + 1,
                height: bounds.y1 - bounds.y0,
                blocks: blocks_from_stext_json(&json)?,
            });
        }

        Ok(DocumentLayout {
            paper_id: source.paper_id(),
            pages,
        })
    }
}

fn open_document(source: &DocumentSource) -> Result<Document, BackendError> {
    match source {
        DocumentSource::Path(path) => {
            let path_str = path.to_str().ok_or_else(|| BackendError::Open {
                path: path.display().to_string(),
                message: "invalid path encoding".into(),
            })?;
            Document::open(path_str).map_err(|e| BackendError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
        DocumentSource::Bytes { name, data } => {
            Document::from_bytes(data, "pdf").map_err(|e| BackendError::Open {
                path: name.clone(),
                message: e.to_string(),
            })
        }
    }
}

// ── Structured-text JSON decoding ──
//
// Schema emitted by MuPDF's stext-as-JSON printer: blocks carry a type
// ("text" or "image"); text blocks carry line entries with wmode, bbox,
// font {name, family, weight, style, size}, baseline x/y, and text.
// Only the fields read here are declared; serde skips the rest.

#[derive(Debug, Deserialize)]
struct StextPage {
    #[serde(default)]
    blocks: Vec<StextBlock>,
}

#[derive(Debug, Deserialize)]
struct StextBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    lines: Vec<StextRun>,
}

/// One style-uniform run. MuPDF forces span preservation for this
/// output, so a visual line arrives as several runs on one baseline.
#[derive(Debug, Deserialize)]
struct StextRun {
    #[serde(default)]
    bbox: StextBBox,
    font: Option<StextFont>,
    /// Baseline y; runs with equal baselines belong to the same line.
    y: Option<f32>,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct StextBBox {
    #[serde(default)]
    y: f32,
}

#[derive(Debug, Deserialize)]
struct StextFont {
    #[serde(default)]
    name: String,
    #[serde(default)]
    weight: String,
}

/// Tolerance for treating two baselines as the same visual line.
const BASELINE_TOLERANCE: f32 = 1.0;

fn blocks_from_stext_json(json: &str) -> Result<Vec<BlockLayout>, BackendError> {
    let stext: StextPage = serde_json::from_str(json)
        .map_err(|e| BackendError::Layout(format!("structured text decode: {e}")))?;

    let mut blocks = Vec::new();
    for block in stext.blocks {
        if block.kind != "text" {
            continue;
        }

        let mut lines: Vec<LineLayout> = Vec::new();
        let mut last_baseline: Option<f32> = None;
        for run in block.lines {
            let Some(font) = run.font else {
                continue;
            };
            if run.text.is_empty() {
                continue;
            }

            let baseline = run.y.unwrap_or(run.bbox.y);
            let same_line = last_baseline
                .is_some_and(|prev| (prev - baseline).abs() <= BASELINE_TOLERANCE);
            if !same_line {
                lines.push(LineLayout::default());
                last_baseline = Some(baseline);
            }

            let span = SpanLayout {
                text: run.text,
                font_name: font.name,
                bold: font.weight == "bold",
                y0: run.bbox.y,
            };
            if let Some(line) = lines.last_mut() {
                line.spans.push(span);
            }
        }

        if !lines.is_empty() {
            blocks.push(BlockLayout { lines });
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_on_one_baseline_group_into_a_line() {
        let json = r#"{"blocks":[{"type":"text","bbox":{"x":40,"y":100,"w":500,"h":14},
            "lines":[
              {"wmode":0,"bbox":{"x":40,"y":100,"w":10,"h":14},
               "font":{"name":"Times-Bold","family":"Times","weight":"bold","style":"normal","size":11},
               "x":40,"y":111,"text":"3"},
              {"wmode":0,"bbox":{"x":60,"y":100,"w":300,"h":14},
               "font":{"name":"Times-Roman","family":"Times","weight":"normal","style":"normal","size":11},
               "x":60,"y":111,"text":"The diagram shows a circle."}
            ]}]}"#;
        let blocks = blocks_from_stext_json(json).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 1);
        let spans = &blocks[0].lines[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "3");
        assert!(spans[0].bold);
        assert_eq!(spans[1].text, "The diagram shows a circle.");
        assert!(!spans[1].bold);
    }

    #[test]
    fn test_distinct_baselines_split_lines() {
        let json = r#"{"blocks":[{"type":"text","bbox":{"x":40,"y":100,"w":500,"h":40},
            "lines":[
              {"wmode":0,"bbox":{"x":40,"y":100,"w":200,"h":14},
               "font":{"name":"Times-Roman","family":"Times","weight":"normal","style":"normal","size":11},
               "x":40,"y":111,"text":"first line"},
              {"wmode":0,"bbox":{"x":40,"y":120,"w":200,"h":14},
               "font":{"name":"Times-Roman","family":"Times","weight":"normal","style":"normal","size":11},
               "x":40,"y":131,"text":"second line"}
            ]}]}"#;
        let blocks = blocks_from_stext_json(json).unwrap();
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn test_image_blocks_are_skipped() {
        let json = r#"{"blocks":[
            {"type":"image","bbox":{"x":0,"y":0,"w":200,"h":200}},
            {"type":"text","bbox":{"x":40,"y":300,"w":200,"h":14},
             "lines":[{"wmode":0,"bbox":{"x":40,"y":300,"w":200,"h":14},
               "font":{"name":"Times-Roman","family":"Times","weight":"normal","style":"normal","size":11},
               "x":40,"y":311,"text":"caption text"}]}
        ]}"#;
        let blocks = blocks_from_stext_json(json).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines[0].spans[0].text, "caption text");
    }

    #[test]
    fn test_span_y0_is_bbox_top() {
        let json = r#"{"blocks":[{"type":"text","bbox":{"x":40,"y":700,"w":200,"h":14},
            "lines":[{"wmode":0,"bbox":{"x":40,"y":700,"w":20,"h":14},
              "font":{"name":"Helvetica","family":"Helvetica","weight":"normal","style":"normal","size":9},
              "x":40,"y":711,"text":"12"}]}]}"#;
        let blocks = blocks_from_stext_json(json).unwrap();
        assert!((blocks[0].lines[0].spans[0].y0 - 700.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_malformed_json_is_a_layout_error() {
        let err = blocks_from_stext_json("{not json").unwrap_err();
        assert!(matches!(err, BackendError::Layout(_)));
    }
}
