//! Stream-name pattern handling
//!
//! - [`dialect`]: named-group syntax translation
//! - [`validator`]: compile-or-report, never panics
//! - [`extractor`]: match testing, range extraction and group capture
//! - [`complexity`]: structural cost heuristics for pattern limits

pub mod complexity;
pub mod dialect;
pub mod extractor;
pub(crate) mod offsets;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use complexity::{PatternComplexity, PatternLimits};
pub use dialect::{to_external, to_internal};
pub use extractor::{extract_groups, get_match_ranges, test_match, GroupLocation};
pub use validator::{validate, CompiledPattern, PatternValidator, ValidationResult};

/// Semantic role of a pattern or of a highlighted range.
///
/// `Teams` is the combined extraction field; its `team1` / `team2` named
/// groups produce ranges tagged [`PatternTag::Team1`] and [`PatternTag::Team2`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTag {
    Teams,
    Team1,
    Team2,
    Date,
    Time,
    League,
    Include,
    Exclude,
}

impl PatternTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternTag::Teams => "teams",
            PatternTag::Team1 => "team1",
            PatternTag::Team2 => "team2",
            PatternTag::Date => "date",
            PatternTag::Time => "time",
            PatternTag::League => "league",
            PatternTag::Include => "include",
            PatternTag::Exclude => "exclude",
        }
    }

    /// Extraction fields contribute highlight ranges; include/exclude only filter.
    pub fn is_extraction(&self) -> bool {
        !matches!(self, PatternTag::Include | PatternTag::Exclude)
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured pattern as entered by the user, in the external dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub source: String,
    pub enabled: bool,
    pub tag: PatternTag,
}

impl Pattern {
    pub fn new<S: Into<String>>(tag: PatternTag, source: S) -> Self {
        Self {
            source: source.into(),
            enabled: true,
            tag,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Enabled with non-blank source text. Unconfigured patterns are skipped
    /// rather than validated.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.source.trim().is_empty()
    }
}

/// Half-open character range `[start, end)` within one stream name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl MatchRange {
    pub fn untagged(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            group: None,
        }
    }

    pub fn tagged<S: Into<String>>(start: usize, end: usize, group: S) -> Self {
        Self {
            start,
            end,
            group: Some(group.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
