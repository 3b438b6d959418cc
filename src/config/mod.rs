use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub mod defaults;

use crate::errors::{AppError, AppResult};
use crate::patterns::{GroupLocation, Pattern, PatternLimits, PatternTag};
use defaults::*;

/// Root configuration, read from TOML.
///
/// ```toml
/// [patterns]
/// skip_builtin_filter = false
///
/// [patterns.teams]
/// pattern = "(?P<team1>.+) vs (?P<team2>.+)"
///
/// [patterns.exclude]
/// pattern = "(?i)test"
/// enabled = false
///
/// [engine]
/// parallel_threshold = 1000
/// group_location = "exact"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// One configurable pattern field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub pattern: String,
    #[serde(default = "default_field_enabled")]
    pub enabled: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            enabled: default_field_enabled(),
        }
    }
}

impl FieldConfig {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
            enabled: true,
        }
    }
}

/// Extraction fields plus the include/exclude filters of one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_skip_builtin_filter")]
    pub skip_builtin_filter: bool,
    /// Combined pattern with `team1` and `team2` named groups
    #[serde(default)]
    pub teams: FieldConfig,
    #[serde(default)]
    pub date: FieldConfig,
    #[serde(default)]
    pub time: FieldConfig,
    #[serde(default)]
    pub league: FieldConfig,
    #[serde(default)]
    pub include: FieldConfig,
    #[serde(default)]
    pub exclude: FieldConfig,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            skip_builtin_filter: default_skip_builtin_filter(),
            teams: FieldConfig::default(),
            date: FieldConfig::default(),
            time: FieldConfig::default(),
            league: FieldConfig::default(),
            include: FieldConfig::default(),
            exclude: FieldConfig::default(),
        }
    }
}

impl PatternConfig {
    /// Extraction fields in enumeration order. This order breaks ties when two
    /// fields claim ranges starting at the same character.
    pub fn extraction_patterns(&self) -> Vec<Pattern> {
        [
            (PatternTag::Teams, &self.teams),
            (PatternTag::Date, &self.date),
            (PatternTag::Time, &self.time),
            (PatternTag::League, &self.league),
        ]
        .into_iter()
        .map(|(tag, field)| to_pattern(tag, field))
        .collect()
    }

    pub fn include_pattern(&self) -> Pattern {
        to_pattern(PatternTag::Include, &self.include)
    }

    pub fn exclude_pattern(&self) -> Pattern {
        to_pattern(PatternTag::Exclude, &self.exclude)
    }

    /// Every field, extraction fields first.
    pub fn all_patterns(&self) -> Vec<Pattern> {
        let mut patterns = self.extraction_patterns();
        patterns.push(self.include_pattern());
        patterns.push(self.exclude_pattern());
        patterns
    }
}

fn to_pattern(tag: PatternTag, field: &FieldConfig) -> Pattern {
    Pattern {
        source: field.pattern.clone(),
        enabled: field.enabled,
        tag,
    }
}

/// Evaluation engine tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default)]
    pub group_location: GroupLocation,
    /// Reject patterns scoring above this complexity
    #[serde(default)]
    pub max_complexity: Option<u32>,
    /// Reject patterns with a bounded repetition above this count
    #[serde(default)]
    pub max_repetition: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            group_location: GroupLocation::default(),
            max_complexity: None,
            max_repetition: None,
        }
    }
}

impl EngineConfig {
    pub fn limits(&self) -> PatternLimits {
        PatternLimits {
            max_complexity: self.max_complexity,
            max_repetition: self.max_repetition,
        }
    }
}

fn default_field_enabled() -> bool {
    DEFAULT_FIELD_ENABLED
}

fn default_skip_builtin_filter() -> bool {
    DEFAULT_SKIP_BUILTIN_FILTER
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Config {
    /// Load from `EPG_MATCHER_CONFIG`, falling back to `DEFAULT_CONFIG_FILE`.
    pub fn load() -> AppResult<Self> {
        Self::load_from_file(Self::default_path())
    }

    pub fn default_path() -> String {
        std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
    }

    /// Read `config_file`, or write the default configuration there when it
    /// does not exist yet.
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let path = config_file.as_ref();
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(path, contents)?;
            info!("Created default config file: {}", path.display());
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.engine.max_complexity == Some(0) {
            return Err(AppError::configuration(
                "engine.max_complexity must be greater than 0 (omit it to disable the check)",
            ));
        }
        if self.engine.max_repetition == Some(0) {
            return Err(AppError::configuration(
                "engine.max_repetition must be greater than 0 (omit it to disable the check)",
            ));
        }
        Ok(())
    }
}
