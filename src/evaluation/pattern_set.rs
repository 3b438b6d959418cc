use serde::Serialize;
use tracing::warn;

use crate::classification::IncludeMatch;
use crate::config::PatternConfig;
use crate::patterns::{
    CompiledPattern, GroupLocation, MatchRange, Pattern, PatternTag, PatternValidator,
    ValidationResult,
};

/// Validation outcome for one configured field, as a settings form shows it.
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidation {
    pub tag: PatternTag,
    pub enabled: bool,
    /// `None` when the field is disabled or blank and so was not validated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidationResult>,
}

impl FieldValidation {
    pub fn is_rejected(&self) -> bool {
        self.result.as_ref().is_some_and(|r| !r.valid)
    }
}

/// Compiled state of the include or exclude filter.
#[derive(Debug, Clone)]
enum FilterState {
    Unconfigured,
    /// Configured but failed validation; never matches
    Rejected,
    Ready(CompiledPattern),
}

impl FilterState {
    fn matches(&self, text: &str) -> Option<bool> {
        match self {
            FilterState::Unconfigured => None,
            FilterState::Rejected => Some(false),
            FilterState::Ready(compiled) => Some(compiled.is_match(text)),
        }
    }
}

/// All patterns of one configuration, compiled once per evaluation pass.
#[derive(Debug, Clone)]
pub struct PatternSet {
    extraction: Vec<(PatternTag, CompiledPattern)>,
    include: FilterState,
    exclude: FilterState,
    group_location: GroupLocation,
    validations: Vec<FieldValidation>,
}

impl PatternSet {
    pub fn compile(
        config: &PatternConfig,
        validator: &PatternValidator,
        group_location: GroupLocation,
    ) -> Self {
        let mut validations = Vec::new();
        let mut extraction = Vec::new();

        for pattern in config.extraction_patterns() {
            if let Some(compiled) = compile_field(&pattern, validator, &mut validations) {
                extraction.push((pattern.tag, compiled));
            }
        }

        let include = filter_state(&config.include_pattern(), validator, &mut validations);
        let exclude = filter_state(&config.exclude_pattern(), validator, &mut validations);

        Self {
            extraction,
            include,
            exclude,
            group_location,
            validations,
        }
    }

    /// One entry per field, in configuration order.
    pub fn validate_all(&self) -> &[FieldValidation] {
        &self.validations
    }

    pub fn has_errors(&self) -> bool {
        self.validations.iter().any(FieldValidation::is_rejected)
    }

    /// Ranges from every usable extraction field, field by field.
    ///
    /// Ranges without a named group take the field's tag so every highlighted
    /// segment can be attributed to a field.
    pub fn extraction_ranges(&self, text: &str) -> Vec<MatchRange> {
        let mut ranges = Vec::new();
        for (tag, compiled) in &self.extraction {
            ranges.extend(
                compiled
                    .match_ranges_with(text, self.group_location)
                    .into_iter()
                    .map(|mut range| {
                        range.group.get_or_insert_with(|| tag.as_str().to_string());
                        range
                    }),
            );
        }
        ranges
    }

    pub fn include_match(&self, text: &str) -> IncludeMatch {
        match self.include.matches(text) {
            None => IncludeMatch::Unconfigured,
            Some(matched) => IncludeMatch::from_match(matched),
        }
    }

    pub fn exclude_match(&self, text: &str) -> bool {
        self.exclude.matches(text).unwrap_or(false)
    }
}

fn compile_field(
    pattern: &Pattern,
    validator: &PatternValidator,
    validations: &mut Vec<FieldValidation>,
) -> Option<CompiledPattern> {
    if !pattern.is_configured() {
        validations.push(FieldValidation {
            tag: pattern.tag,
            enabled: pattern.enabled,
            result: None,
        });
        return None;
    }

    let result = validator.validate(&pattern.source);
    if let Some(error) = &result.error {
        warn!("Ignoring {} pattern '{}': {}", pattern.tag, pattern.source, error);
    }
    let compiled = result.compiled.clone();
    validations.push(FieldValidation {
        tag: pattern.tag,
        enabled: pattern.enabled,
        result: Some(result),
    });
    compiled
}

fn filter_state(
    pattern: &Pattern,
    validator: &PatternValidator,
    validations: &mut Vec<FieldValidation>,
) -> FilterState {
    let configured = pattern.is_configured();
    match compile_field(pattern, validator, validations) {
        Some(compiled) => FilterState::Ready(compiled),
        None if configured => FilterState::Rejected,
        None => FilterState::Unconfigured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;

    fn compile(config: &PatternConfig) -> PatternSet {
        PatternSet::compile(config, &PatternValidator::default(), GroupLocation::Exact)
    }

    #[test]
    fn test_untagged_ranges_take_field_tag() {
        let config = PatternConfig {
            league: FieldConfig::new("NBA"),
            ..Default::default()
        };
        let set = compile(&config);
        assert_eq!(
            set.extraction_ranges("NBA: Lakers"),
            vec![MatchRange::tagged(0, 3, "league")]
        );
    }

    #[test]
    fn test_ranges_in_field_order() {
        let config = PatternConfig {
            teams: FieldConfig::new("(?P<team1>\\w+) vs (?P<team2>\\w+)"),
            time: FieldConfig::new("\\d{2}:\\d{2}"),
            ..Default::default()
        };
        let set = compile(&config);
        assert_eq!(
            set.extraction_ranges("19:30 Lakers vs Celtics"),
            vec![
                MatchRange::tagged(6, 12, "team1"),
                MatchRange::tagged(16, 23, "team2"),
                MatchRange::tagged(0, 5, "time"),
            ]
        );
    }

    #[test]
    fn test_disabled_field_is_skipped() {
        let config = PatternConfig {
            date: FieldConfig {
                pattern: "\\d+".to_string(),
                enabled: false,
            },
            ..Default::default()
        };
        let set = compile(&config);
        assert!(set.extraction_ranges("2024").is_empty());
        assert!(!set.has_errors());
    }

    #[test]
    fn test_include_tri_state() {
        let unconfigured = compile(&PatternConfig::default());
        assert_eq!(unconfigured.include_match("x"), IncludeMatch::Unconfigured);

        let disabled = compile(&PatternConfig {
            include: FieldConfig {
                pattern: "sport".to_string(),
                enabled: false,
            },
            ..Default::default()
        });
        assert_eq!(disabled.include_match("news"), IncludeMatch::Unconfigured);

        let configured = compile(&PatternConfig {
            include: FieldConfig::new("sport"),
            ..Default::default()
        });
        assert_eq!(configured.include_match("Sports 1"), IncludeMatch::Matched);
        assert_eq!(configured.include_match("News 24"), IncludeMatch::NotMatched);
    }

    #[test]
    fn test_rejected_filters_never_match() {
        let set = compile(&PatternConfig {
            include: FieldConfig::new("(unclosed"),
            exclude: FieldConfig::new("[z-a]"),
            ..Default::default()
        });
        assert!(set.has_errors());
        assert_eq!(set.include_match("anything"), IncludeMatch::NotMatched);
        assert!(!set.exclude_match("anything"));
    }

    #[test]
    fn test_validate_all_reports_every_field() {
        let set = compile(&PatternConfig {
            teams: FieldConfig::new("(?P<team1>.+) vs (?P<team2>.+)"),
            league: FieldConfig::new("(bad"),
            ..Default::default()
        });
        let report = set.validate_all();
        assert_eq!(report.len(), 6);
        assert_eq!(report[0].tag, PatternTag::Teams);
        assert!(report[0].result.as_ref().unwrap().valid);
        assert!(report[1].result.is_none());
        assert_eq!(report[3].tag, PatternTag::League);
        assert!(report[3].is_rejected());
    }
}
