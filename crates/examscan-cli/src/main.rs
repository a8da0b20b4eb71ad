use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use examscan_core::DocumentSource;
use examscan_parsing::{OutlineConfigBuilder, OutlineExtractor};
use examscan_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// Exam Paper Outliner - Reconstruct question structure from exam-paper PDFs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the question outline from one or more exam-paper PDFs
    Extract {
        /// PDF files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for the .outline.json files (default: next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print outlines to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Header exclusion band as a fraction of page height
        #[arg(long)]
        header_fraction: Option<f32>,

        /// Footer exclusion band as a fraction of page height
        #[arg(long)]
        footer_fraction: Option<f32>,

        /// Largest numeral accepted as a question number
        #[arg(long)]
        max_question_number: Option<u32>,

        /// Skip this many leading pages (cover/instruction pages)
        #[arg(long)]
        skip_leading_pages: Option<u32>,

        /// Additional line-skip keywords
        #[arg(long, value_delimiter = ',')]
        skip_keyword: Vec<String>,

        /// Additional parse-halting keywords
        #[arg(long, value_delimiter = ',')]
        stop_keyword: Vec<String>,

        /// Additional bold font-name substrings
        #[arg(long, value_delimiter = ',')]
        bold_substring: Vec<String>,

        /// Capture text before the first question as a preamble
        #[arg(long)]
        capture_preamble: bool,

        /// Keep roman-numeral markers like "(i)" in body text
        #[arg(long)]
        keep_roman_markers: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            files,
            output,
            stdout,
            pretty,
            no_color,
            header_fraction,
            footer_fraction,
            max_question_number,
            skip_leading_pages,
            skip_keyword,
            stop_keyword,
            bold_substring,
            capture_preamble,
            keep_roman_markers,
        } => extract(ExtractArgs {
            files,
            output,
            stdout,
            pretty,
            no_color,
            header_fraction,
            footer_fraction,
            max_question_number,
            skip_leading_pages,
            skip_keyword,
            stop_keyword,
            bold_substring,
            capture_preamble,
            keep_roman_markers,
        }),
    }
}

struct ExtractArgs {
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    no_color: bool,
    header_fraction: Option<f32>,
    footer_fraction: Option<f32>,
    max_question_number: Option<u32>,
    skip_leading_pages: Option<u32>,
    skip_keyword: Vec<String>,
    stop_keyword: Vec<String>,
    bold_substring: Vec<String>,
    capture_preamble: bool,
    keep_roman_markers: bool,
}

fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > defaults
    let header_fraction = args
        .header_fraction
        .or_else(|| env_parse("EXAMSCAN_HEADER_FRACTION"));
    let footer_fraction = args
        .footer_fraction
        .or_else(|| env_parse("EXAMSCAN_FOOTER_FRACTION"));
    let max_question_number = args
        .max_question_number
        .or_else(|| env_parse("EXAMSCAN_MAX_QUESTION_NUMBER"));

    let mut builder = OutlineConfigBuilder::new();
    if let Some(fraction) = header_fraction {
        builder = builder.header_fraction(fraction);
    }
    if let Some(fraction) = footer_fraction {
        builder = builder.footer_fraction(fraction);
    }
    if let Some(n) = max_question_number {
        builder = builder.max_question_number(n);
    }
    if let Some(pages) = args.skip_leading_pages {
        builder = builder.skip_leading_pages(pages);
    }
    for keyword in args.skip_keyword {
        builder = builder.add_skip_keyword(keyword);
    }
    for keyword in args.stop_keyword {
        builder = builder.add_stop_keyword(keyword);
    }
    for substring in args.bold_substring {
        builder = builder.add_bold_name_substring(substring);
    }
    builder = builder
        .capture_preamble(args.capture_preamble)
        .strip_roman_markers(!args.keep_roman_markers);
    let config = builder.build()?;

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)?;
    }

    let color = ColorMode(!args.no_color && !args.stdout);
    let extractor = OutlineExtractor::with_config(config);
    let backend = MupdfBackend::new();

    let progress = if args.files.len() > 1 && !args.stdout {
        let bar = ProgressBar::new(args.files.len() as u64);
        bar.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")?);
        Some(bar)
    } else {
        None
    };

    let mut failures = 0usize;
    for file in &args.files {
        if let Some(bar) = &progress {
            bar.set_message(file.display().to_string());
        }

        let source = DocumentSource::path(file);
        match extractor.extract_via_backend(&source, &backend) {
            Ok(outline) => {
                let json = if args.pretty {
                    serde_json::to_string_pretty(&outline)?
                } else {
                    serde_json::to_string(&outline)?
                };

                let mut stdout_handle = std::io::stdout();
                if args.stdout {
                    writeln!(stdout_handle, "{json}")?;
                } else {
                    let dest = outline_path(file, args.output.as_deref());
                    std::fs::write(&dest, json)?;
                    output::print_summary(&mut stdout_handle, &outline, Some(&dest), color)?;
                }
            }
            Err(e) => {
                failures += 1;
                output::print_failure(&mut std::io::stderr(), &file.display().to_string(), &e, color)?;
            }
        }

        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} file(s) failed", args.files.len());
    }
    Ok(())
}

/// Destination for one outline: `<stem>.outline.json` next to the input,
/// or inside `--output` when given.
fn outline_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "outline".to_string());
    let file_name = format!("{stem}.outline.json");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_path_next_to_input() {
        let dest = outline_path(Path::new("/papers/midyear.pdf"), None);
        assert_eq!(dest, Path::new("/papers/midyear.outline.json"));
    }

    #[test]
    fn test_outline_path_in_output_dir() {
        let dest = outline_path(Path::new("/papers/midyear.pdf"), Some(Path::new("/out")));
        assert_eq!(dest, Path::new("/out/midyear.outline.json"));
    }
}
