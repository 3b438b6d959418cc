use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::warn;

use super::complexity::{self, PatternComplexity, PatternLimits};
use super::dialect;
use crate::errors::PatternError;

/// A pattern that passed validation, ready for matching.
///
/// Always case-insensitive. Cloning is cheap; the compiled program is shared.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    internal: String,
    pub(crate) regex: Regex,
    group_names: Vec<String>,
    complexity: PatternComplexity,
}

impl CompiledPattern {
    /// Source text as configured (external dialect)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text handed to the regex engine (internal dialect)
    pub fn internal(&self) -> &str {
        &self.internal
    }

    /// Named groups in order of appearance
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn has_named_groups(&self) -> bool {
        !self.group_names.is_empty()
    }

    pub fn complexity(&self) -> PatternComplexity {
        self.complexity
    }
}

/// Outcome of validating one pattern. Exactly one of `compiled` / `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip)]
    pub compiled: Option<CompiledPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    fn ok(compiled: CompiledPattern) -> Self {
        Self {
            valid: true,
            compiled: Some(compiled),
            error: None,
        }
    }

    fn rejected(error: PatternError) -> Self {
        Self {
            valid: false,
            compiled: None,
            error: Some(error.to_string()),
        }
    }
}

/// Compiles patterns, optionally enforcing [`PatternLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternValidator {
    limits: PatternLimits,
}

impl PatternValidator {
    pub fn new(limits: PatternLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> PatternLimits {
        self.limits
    }

    pub fn validate(&self, pattern: &str) -> ValidationResult {
        match self.compile(pattern) {
            Ok(compiled) => ValidationResult::ok(compiled),
            Err(err) => {
                warn!("Rejected pattern '{}': {}", pattern, err);
                ValidationResult::rejected(err)
            }
        }
    }

    /// Like [`validate`](Self::validate) but keeps the structured error.
    pub fn compile(&self, pattern: &str) -> Result<CompiledPattern, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let complexity = complexity::analyze(pattern);
        self.limits.check(&complexity)?;

        let internal = dialect::to_internal(pattern);
        let regex = RegexBuilder::new(&internal)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                if matches!(e, regex::Error::CompiledTooBig(_)) {
                    warn!("Pattern '{}' exceeds the regex size limit", pattern);
                }
                PatternError::from(e)
            })?;

        let group_names = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(CompiledPattern {
            source: pattern.to_string(),
            internal,
            regex,
            group_names,
            complexity,
        })
    }
}

/// Validate a pattern with no limits applied.
pub fn validate(pattern: &str) -> ValidationResult {
    PatternValidator::default().validate(pattern)
}
