//! Per-stream filter verdicts and batch aggregation
//!
//! A verdict depends only on the item's own record and the batch-wide
//! `skip_builtin_filter` flag, so items classify independently and in any
//! order. Whether an item *has* a builtin filter reason is kept apart from
//! whether that reason currently excludes it: toggling the flag moves items
//! between buckets but never changes `builtin_flagged`.

use serde::{Deserialize, Serialize};

use crate::patterns::MatchRange;

/// Outcome of the include pattern for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeMatch {
    Matched,
    NotMatched,
    /// No include pattern is enabled; nothing is required to match.
    #[default]
    Unconfigured,
}

impl IncludeMatch {
    pub fn from_match(matched: bool) -> Self {
        if matched {
            IncludeMatch::Matched
        } else {
            IncludeMatch::NotMatched
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Included,
    Excluded,
}

/// Everything the aggregator needs to know about one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub extraction_ranges: Vec<MatchRange>,
    pub include_match: IncludeMatch,
    pub exclude_match: bool,
    /// Opaque verdict from the external builtin classifier
    pub builtin_filter_reason: Option<String>,
}

impl ClassificationRecord {
    pub fn verdict(&self, skip_builtin_filter: bool) -> Verdict {
        let builtin_excludes = self.is_builtin_flagged() && !skip_builtin_filter;
        if self.exclude_match
            || builtin_excludes
            || self.include_match == IncludeMatch::NotMatched
        {
            Verdict::Excluded
        } else {
            Verdict::Included
        }
    }

    pub fn is_builtin_flagged(&self) -> bool {
        self.builtin_filter_reason.is_some()
    }

    /// Flagged by the builtin classifier but let through because builtin
    /// filtering is skipped, i.e. it would be dropped if filtering were
    /// re-enabled and nothing else excludes it.
    pub fn would_be_builtin_filtered(&self, skip_builtin_filter: bool) -> bool {
        skip_builtin_filter
            && self.is_builtin_flagged()
            && self.verdict(skip_builtin_filter) == Verdict::Included
    }

    /// At least one range covers text; zero-width matches extract nothing.
    pub fn has_extractions(&self) -> bool {
        self.extraction_ranges.iter().any(|range| !range.is_empty())
    }
}

/// Batch summary for one `skip_builtin_filter` setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total: usize,
    pub included: usize,
    pub excluded: usize,
    pub builtin_flagged: usize,
    /// Included items with at least one non-empty extraction range
    pub with_extractions: usize,
}

impl AggregateStats {
    pub fn record(&mut self, record: &ClassificationRecord, skip_builtin_filter: bool) {
        self.total += 1;
        if record.is_builtin_flagged() {
            self.builtin_flagged += 1;
        }
        match record.verdict(skip_builtin_filter) {
            Verdict::Included => {
                self.included += 1;
                if record.has_extractions() {
                    self.with_extractions += 1;
                }
            }
            Verdict::Excluded => self.excluded += 1,
        }
    }
}

/// Single linear pass over a batch.
pub fn aggregate<'a, I>(records: I, skip_builtin_filter: bool) -> AggregateStats
where
    I: IntoIterator<Item = &'a ClassificationRecord>,
{
    let mut stats = AggregateStats::default();
    for record in records {
        stats.record(record, skip_builtin_filter);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(include: IncludeMatch, exclude: bool, reason: Option<&str>) -> ClassificationRecord {
        ClassificationRecord {
            extraction_ranges: Vec::new(),
            include_match: include,
            exclude_match: exclude,
            builtin_filter_reason: reason.map(str::to_string),
        }
    }

    #[rstest]
    #[case(IncludeMatch::Unconfigured, false, None, false, Verdict::Included)]
    #[case(IncludeMatch::Matched, false, None, false, Verdict::Included)]
    #[case(IncludeMatch::NotMatched, false, None, false, Verdict::Excluded)]
    #[case(IncludeMatch::Matched, true, None, false, Verdict::Excluded)]
    #[case(IncludeMatch::Unconfigured, false, Some("placeholder"), false, Verdict::Excluded)]
    #[case(IncludeMatch::Unconfigured, false, Some("placeholder"), true, Verdict::Included)]
    #[case(IncludeMatch::NotMatched, false, Some("placeholder"), true, Verdict::Excluded)]
    #[case(IncludeMatch::Matched, true, Some("placeholder"), true, Verdict::Excluded)]
    fn test_verdict(
        #[case] include: IncludeMatch,
        #[case] exclude: bool,
        #[case] reason: Option<&str>,
        #[case] skip: bool,
        #[case] expected: Verdict,
    ) {
        assert_eq!(record(include, exclude, reason).verdict(skip), expected);
    }

    #[test]
    fn test_builtin_reason_flagged_independently_of_skip() {
        let placeholder = record(IncludeMatch::Unconfigured, false, Some("placeholder"));

        let filtered = aggregate([&placeholder], false);
        assert_eq!(filtered.excluded, 1);
        assert_eq!(filtered.included, 0);
        assert_eq!(filtered.builtin_flagged, 1);

        let skipped = aggregate([&placeholder], true);
        assert_eq!(skipped.included, 1);
        assert_eq!(skipped.excluded, 0);
        assert_eq!(skipped.builtin_flagged, 1);
    }

    #[test]
    fn test_would_be_builtin_filtered() {
        let placeholder = record(IncludeMatch::Unconfigured, false, Some("placeholder"));
        assert!(placeholder.would_be_builtin_filtered(true));
        assert!(!placeholder.would_be_builtin_filtered(false));

        let also_excluded = record(IncludeMatch::Unconfigured, true, Some("placeholder"));
        assert!(!also_excluded.would_be_builtin_filtered(true));
    }

    #[test]
    fn test_with_extractions_counts_included_only() {
        let mut matched = record(IncludeMatch::Matched, false, None);
        matched.extraction_ranges = vec![MatchRange::tagged(0, 6, "team1")];
        let mut excluded = record(IncludeMatch::Matched, true, None);
        excluded.extraction_ranges = vec![MatchRange::tagged(0, 6, "team1")];
        let bare = record(IncludeMatch::Matched, false, None);

        let stats = aggregate([&matched, &excluded, &bare], false);
        assert_eq!(
            stats,
            AggregateStats {
                total: 3,
                included: 2,
                excluded: 1,
                builtin_flagged: 0,
                with_extractions: 1,
            }
        );
    }

    #[test]
    fn test_zero_width_ranges_are_not_extractions() {
        let mut empty_only = record(IncludeMatch::Unconfigured, false, None);
        empty_only.extraction_ranges = (0..=4).map(|i| MatchRange::tagged(i, i, "date")).collect();
        assert!(!empty_only.has_extractions());

        let mut mixed = empty_only.clone();
        mixed.extraction_ranges.push(MatchRange::tagged(0, 4, "league"));
        assert!(mixed.has_extractions());

        let stats = aggregate([&empty_only, &mixed], false);
        assert_eq!(stats.included, 2);
        assert_eq!(stats.with_extractions, 1);
    }

    #[test]
    fn test_empty_batch() {
        let stats = aggregate(&Vec::<ClassificationRecord>::new(), false);
        assert_eq!(stats, AggregateStats::default());
    }

    #[test]
    fn test_include_match_serializes_as_tri_state() {
        assert_eq!(
            serde_json::to_string(&IncludeMatch::NotMatched).unwrap(),
            "\"not_matched\""
        );
        assert_eq!(
            serde_json::to_string(&IncludeMatch::Unconfigured).unwrap(),
            "\"unconfigured\""
        );
    }
}
