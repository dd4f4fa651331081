//! Configuration options for reading and writing bibliography files.
//!
//! This module provides the [`BibConfig`] struct which controls how outlines are
//! indented, how tolerant record decoding is, and how the written file is laid out.

use crate::error::Result;
use crate::recovery::RecoveryMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of outline indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentUnit {
    /// A single tab character per level.
    Tab,
    /// A fixed number of spaces per level.
    Spaces(usize),
}

impl Default for IndentUnit {
    fn default() -> Self {
        IndentUnit::Spaces(4)
    }
}

impl IndentUnit {
    /// Number of whole indentation levels at the start of `line`.
    ///
    /// Trailing partial groups (e.g. 3 spaces with a 4-space unit) are ignored.
    #[must_use]
    pub fn levels(&self, line: &str) -> usize {
        match *self {
            IndentUnit::Tab => line.chars().take_while(|c| *c == '\t').count(),
            IndentUnit::Spaces(0) => 0,
            IndentUnit::Spaces(n) => line.chars().take_while(|c| *c == ' ').count() / n,
        }
    }

    /// Indentation string for `levels` levels.
    #[must_use]
    pub fn render(&self, levels: usize) -> String {
        self.to_string().repeat(levels)
    }
}

impl fmt::Display for IndentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IndentUnit::Tab => write!(f, "\t"),
            IndentUnit::Spaces(n) => f.write_str(&" ".repeat(n)),
        }
    }
}

/// Configuration for reading and writing bibliography files.
///
/// # Examples
///
/// ```
/// use bibtoc::{BibConfig, IndentUnit, RecoveryMode};
///
/// let config = BibConfig {
///     indent_unit: IndentUnit::Tab,
///     recovery_mode: RecoveryMode::Strict,
///     ..Default::default()
/// };
/// assert!(config.write_group_headers);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibConfig {
    /// Indentation used for outline depth, both when reading and writing.
    pub indent_unit: IndentUnit,

    /// How malformed record blocks are handled while decoding.
    pub recovery_mode: RecoveryMode,

    /// Write `%% - <header>` lines before each group of records.
    pub write_group_headers: bool,
}

impl Default for BibConfig {
    fn default() -> Self {
        BibConfig {
            indent_unit: IndentUnit::default(),
            recovery_mode: RecoveryMode::default(),
            write_group_headers: true,
        }
    }
}

impl BibConfig {
    /// Load a configuration from JSON. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has values of the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
