//! JSON and YAML rendering of parse results.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::parser::ParsedDocument;

/// Regex for slug generation - matches anything but word chars, spaces and dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Regex for slug generation - matches whitespace and dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_SPACE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Output serialization format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// File-name friendly form of a document name. Arabic letters are kept.
///
/// # Examples
/// ```
/// use statute_structure::output::to_slug;
///
/// assert_eq!(to_slug("Civil Code (1980)"), "civil_code_1980");
/// assert_eq!(to_slug("قانون  العمل"), "قانون_العمل");
/// ```
#[must_use]
pub fn to_slug(name: &str) -> String {
    let text = name.to_lowercase();
    let text = SLUG_NON_WORD.replace_all(&text, "");
    let text = SLUG_SPACE_DASH.replace_all(&text, "_");
    text.trim_matches('_').to_string()
}

/// Serialize a parse result.
pub fn render(document: &ParsedDocument, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            Ok(json)
        }
        Format::Yaml => {
            let yaml = serde_yaml_ng::to_string(document)?;
            Ok(format!("---\n{yaml}"))
        }
    }
}

/// Write a parse result to `<output_dir>/<slug>.<ext>`.
///
/// The slug comes from the document name, or `fallback_stem` when the
/// document has none. Writes to a temp file first, then renames, so a crash
/// never leaves a truncated result behind.
pub fn save(
    document: &ParsedDocument,
    format: Format,
    output_dir: &Path,
    fallback_stem: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let slug = document
        .metadata
        .name
        .as_deref()
        .map(to_slug)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| to_slug(fallback_stem));
    let slug = if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    };

    let output_file = output_dir.join(format!("{slug}.{}", format.extension()));
    let temp_file = output_dir.join(format!(".{slug}.{}.tmp", format.extension()));

    let content = render(document, format)?;
    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;
    tracing::debug!(path = %output_file.display(), "Saved parse result");

    Ok(output_file)
}
