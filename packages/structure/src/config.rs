//! Configuration constants and parser settings.
//!
//! The TOC thresholds below are empirical. A short document that repeats a
//! heading-like phrase three times with trailing numbers outside any table of
//! contents can be misread as one, which is why every threshold can be
//! overridden per parser.

use crate::error::{Result, StructureError};

/// Minimum number of header-like lines inside one window for a TOC candidate.
pub const DEFAULT_TOC_MIN_ENTRIES: usize = 3;

/// Width of the sliding window, in lines, used by the TOC density scan.
pub const DEFAULT_TOC_WINDOW_LINES: usize = 10;

/// How many lines past a TOC candidate to search for the real body start.
pub const DEFAULT_TOC_BOUNDARY_LOOKAHEAD: usize = 20;

/// Maximum distance, in lines, between an explicit "contents" title and the
/// first listing entry it introduces.
pub const DEFAULT_TOC_TITLE_LOOKAHEAD: usize = 5;

/// Highest ordinal value the default pattern library registers.
pub const DEFAULT_MAX_ORDINAL: u16 = 999;

/// Environment variable prefix used by [`ParserConfig::from_env`].
pub const ENV_PREFIX: &str = "STATUTE_";

/// Tunable heuristics for a parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Minimum header-like lines per window for a TOC candidate.
    pub toc_min_entries: usize,

    /// Sliding window width in lines.
    pub toc_window_lines: usize,

    /// Lookahead for TOC boundary refinement.
    pub toc_boundary_lookahead: usize,

    /// Lookahead from an explicit TOC title to the first entry.
    pub toc_title_lookahead: usize,

    /// Highest ordinal value recognised when building a pattern library.
    pub max_ordinal: u16,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            toc_min_entries: DEFAULT_TOC_MIN_ENTRIES,
            toc_window_lines: DEFAULT_TOC_WINDOW_LINES,
            toc_boundary_lookahead: DEFAULT_TOC_BOUNDARY_LOOKAHEAD,
            toc_title_lookahead: DEFAULT_TOC_TITLE_LOOKAHEAD,
            max_ordinal: DEFAULT_MAX_ORDINAL,
        }
    }
}

impl ParserConfig {
    /// Load settings from `STATUTE_*` environment variables, falling back to
    /// the defaults for anything unset.
    ///
    /// # Errors
    /// Returns `StructureError::InvalidConfig` if a variable is set but not a
    /// number, or if the resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            toc_min_entries: read_var(&lookup, "TOC_MIN_ENTRIES", defaults.toc_min_entries)?,
            toc_window_lines: read_var(&lookup, "TOC_WINDOW_LINES", defaults.toc_window_lines)?,
            toc_boundary_lookahead: read_var(
                &lookup,
                "TOC_BOUNDARY_LOOKAHEAD",
                defaults.toc_boundary_lookahead,
            )?,
            toc_title_lookahead: read_var(
                &lookup,
                "TOC_TITLE_LOOKAHEAD",
                defaults.toc_title_lookahead,
            )?,
            max_ordinal: read_var(&lookup, "MAX_ORDINAL", defaults.max_ordinal)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the TOC density threshold.
    #[must_use]
    pub fn with_toc_min_entries(mut self, entries: usize) -> Self {
        self.toc_min_entries = entries;
        self
    }

    /// Set the TOC sliding window width.
    #[must_use]
    pub fn with_toc_window_lines(mut self, lines: usize) -> Self {
        self.toc_window_lines = lines;
        self
    }

    /// Set the TOC boundary refinement lookahead.
    #[must_use]
    pub fn with_toc_boundary_lookahead(mut self, lines: usize) -> Self {
        self.toc_boundary_lookahead = lines;
        self
    }

    /// Set the lookahead from a TOC title to its first entry.
    #[must_use]
    pub fn with_toc_title_lookahead(mut self, lines: usize) -> Self {
        self.toc_title_lookahead = lines;
        self
    }

    /// Set the highest recognised ordinal.
    #[must_use]
    pub fn with_max_ordinal(mut self, max: u16) -> Self {
        self.max_ordinal = max;
        self
    }

    /// Check that the thresholds can produce meaningful detections.
    ///
    /// # Errors
    /// Returns `StructureError::InvalidConfig` describing the first bad value.
    ///
    /// # Examples
    /// ```
    /// use statute_structure::config::ParserConfig;
    ///
    /// assert!(ParserConfig::default().validate().is_ok());
    /// assert!(ParserConfig::default().with_toc_min_entries(1).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.toc_min_entries < 2 {
            return Err(StructureError::InvalidConfig(format!(
                "toc_min_entries must be at least 2, got {}",
                self.toc_min_entries
            )));
        }
        if self.toc_window_lines < self.toc_min_entries {
            return Err(StructureError::InvalidConfig(format!(
                "toc_window_lines ({}) must be >= toc_min_entries ({})",
                self.toc_window_lines, self.toc_min_entries
            )));
        }
        if self.max_ordinal == 0 {
            return Err(StructureError::InvalidConfig(
                "max_ordinal must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    suffix: &str,
    default: T,
) -> Result<T> {
    let name = format!("{ENV_PREFIX}{suffix}");
    match lookup(&name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            StructureError::InvalidConfig(format!("{name}='{value}' is not a valid number"))
        }),
    }
}
