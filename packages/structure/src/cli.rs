//! Command-line interface for statute structure reconstruction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use console::style;
use rayon::prelude::*;

use crate::classify::LineClassifier;
use crate::config::ParserConfig;
use crate::error::{Result, StructureError};
use crate::normalize::normalize_document;
use crate::output::{render, save, Format};
use crate::parser::{ParsedDocument, StructureParser};
use crate::patterns::{PatternLibrary, Vocabulary};
use crate::toc::TocDetector;
use crate::types::DocumentMetadata;

/// Statute structure - rebuild Branch / Chapter / Article trees from extracted statute text.
#[derive(Parser)]
#[command(name = "statute-structure")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one or more text files into a structure tree.
    Parse {
        /// Extracted statute text files (UTF-8)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output directory (default: print to stdout, single file only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document name (default: file stem)
        #[arg(long)]
        name: Option<String>,

        /// Jurisdiction passed through as metadata
        #[arg(long)]
        jurisdiction: Option<String>,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Print the element type of every line (debugging aid).
    Classify {
        /// Extracted statute text file (UTF-8)
        file: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },
}

/// Pattern and heuristic overrides shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct Tuning {
    /// YAML file with extra heading keywords per kind
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// TOC density window in lines
    #[arg(long)]
    toc_window: Option<usize>,

    /// Minimum headings per window for a TOC candidate
    #[arg(long)]
    toc_min_entries: Option<usize>,

    /// Lines to search past a TOC for the body start
    #[arg(long)]
    toc_lookahead: Option<usize>,
}

impl Tuning {
    /// Environment settings with command-line overrides applied.
    fn parser(&self) -> Result<StructureParser> {
        let mut config = ParserConfig::from_env()?;
        if let Some(window) = self.toc_window {
            config = config.with_toc_window_lines(window);
        }
        if let Some(entries) = self.toc_min_entries {
            config = config.with_toc_min_entries(entries);
        }
        if let Some(lookahead) = self.toc_lookahead {
            config = config.with_toc_boundary_lookahead(lookahead);
        }
        config.validate()?;

        let vocabulary = match &self.vocab {
            Some(path) => Vocabulary::load(path)?,
            None => Vocabulary::default(),
        };
        let library = PatternLibrary::with_vocabulary(&vocabulary, config.max_ordinal)?;
        Ok(StructureParser::new(Arc::new(library), config))
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            files,
            format,
            output,
            name,
            jurisdiction,
            tuning,
        } => parse_command(
            &files,
            format,
            output.as_deref(),
            name.as_deref(),
            jurisdiction.as_deref(),
            &tuning,
        ),
        Commands::Classify { file, tuning } => classify_command(&file, &tuning),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Execute the parse command.
fn parse_command(
    files: &[PathBuf],
    format: Format,
    output: Option<&Path>,
    name: Option<&str>,
    jurisdiction: Option<&str>,
    tuning: &Tuning,
) -> Result<()> {
    if files.len() > 1 {
        if output.is_none() {
            return Err(StructureError::InvalidConfig(
                "--output is required when parsing more than one file".to_string(),
            ));
        }
        if name.is_some() {
            return Err(StructureError::InvalidConfig(
                "--name can only be used with a single file".to_string(),
            ));
        }
    }
    if let Some(output_dir) = output {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(StructureError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Output path is not a directory: {}", output_dir.display()),
            )));
        }
    }

    let parser = tuning.parser()?;

    // Independent documents, one shared pattern library
    let results: Vec<(&PathBuf, Result<ParsedDocument>)> = files
        .par_iter()
        .map(|path| {
            let mut metadata =
                DocumentMetadata::new(name.map_or_else(|| file_stem(path), String::from));
            if let Some(jurisdiction) = jurisdiction {
                metadata = metadata.with_jurisdiction(jurisdiction);
            }
            let result = std::fs::read_to_string(path)
                .map_err(StructureError::from)
                .and_then(|text| parser.parse(&text, metadata));
            (path, result)
        })
        .collect();

    let mut first_error = None;
    for (path, result) in results {
        let document = match result {
            Ok(document) => document,
            Err(e) => {
                eprintln!("{} {}: {e}", style("Failed").red().bold(), path.display());
                if first_error.is_none() {
                    first_error = Some(e);
                }
                continue;
            }
        };

        print_summary(path, &document);

        match output {
            Some(output_dir) => {
                let saved = save(&document, format, output_dir, &file_stem(path))?;
                eprintln!("  {} {}", style("Saved to:").green().bold(), saved.display());
            }
            None => print!("{}", render(&document, format)?),
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_summary(path: &Path, document: &ParsedDocument) {
    let stats = &document.stats;
    eprintln!("{} {}", style("Parsed").bold(), style(path.display()).cyan());
    eprintln!(
        "  Branches: {}  Chapters: {}  Articles: {}",
        stats.branch_headers,
        stats.chapter_headers,
        document.articles.len()
    );
    if let Some(toc) = &document.toc {
        eprintln!(
            "  TOC: lines {}-{}{}",
            toc.start_line,
            toc.end_line,
            if toc.is_low_confidence() {
                style(" (coarse)").yellow().to_string()
            } else {
                String::new()
            }
        );
    }
    if !document.diagnostics.is_empty() {
        eprintln!(
            "  Warnings: {}",
            style(document.diagnostics.len()).yellow().bold()
        );
        for diagnostic in &document.diagnostics {
            tracing::info!(kind = ?diagnostic.kind, "{diagnostic}");
        }
    }
}

/// Execute the classify command.
fn classify_command(file: &Path, tuning: &Tuning) -> Result<()> {
    let parser = tuning.parser()?;
    let text = std::fs::read_to_string(file)?;
    let lines = normalize_document(&text);

    let detection = TocDetector::new(parser.library(), parser.config()).detect(&lines);
    if let Some(toc) = &detection.range {
        eprintln!(
            "{} lines {}-{} ({:?}, {:?})",
            style("TOC:").bold(),
            toc.start_line,
            toc.end_line,
            toc.detection_basis,
            toc.boundary
        );
    }

    let classification = LineClassifier::new(parser.library(), detection.range).classify(lines);
    for classified in &classification.lines {
        let number = classified
            .matched_pattern
            .as_ref()
            .map(|m| m.number.as_str())
            .unwrap_or("");
        println!(
            "{:>5}  {:<15} {}",
            classified.line.index,
            classified.element_type.as_str(),
            number
        );
    }
    for diagnostic in detection.diagnostics.iter().chain(&classification.diagnostics) {
        eprintln!("{} {diagnostic}", style("warning:").yellow());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_single_file() {
        let cli = Cli::parse_from(["statute-structure", "parse", "law.txt"]);

        let Commands::Parse {
            files,
            format,
            output,
            name,
            ..
        } = cli.command
        else {
            unreachable!("expected parse command");
        };
        assert_eq!(files, vec![PathBuf::from("law.txt")]);
        assert_eq!(format, Format::Json);
        assert!(output.is_none());
        assert!(name.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::parse_from([
            "statute-structure",
            "parse",
            "a.txt",
            "b.txt",
            "--format",
            "yaml",
            "--output",
            "out",
            "--toc-min-entries",
            "4",
        ]);

        let Commands::Parse {
            files,
            format,
            tuning,
            ..
        } = cli.command
        else {
            unreachable!("expected parse command");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(format, Format::Yaml);
        assert_eq!(tuning.toc_min_entries, Some(4));
    }

    #[test]
    fn test_cli_classify() {
        let cli = Cli::parse_from(["statute-structure", "classify", "law.txt", "--toc-window", "12"]);
        let Commands::Classify { file, tuning } = cli.command else {
            unreachable!("expected classify command");
        };
        assert_eq!(file, PathBuf::from("law.txt"));
        assert_eq!(tuning.toc_window, Some(12));
    }

    #[test]
    fn test_multiple_files_require_output_dir() {
        let files = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
        let err = parse_command(&files, Format::Json, None, None, None, &Tuning::default())
            .unwrap_err();
        assert!(err.to_string().contains("--output"));
    }
}
