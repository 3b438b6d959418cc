use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::pattern_set::{FieldValidation, PatternSet};
use crate::classification::{aggregate, AggregateStats, ClassificationRecord, Verdict};
use crate::config::{EngineConfig, PatternConfig};
use crate::errors::AppResult;
use crate::highlight::{build_segments, Segment};
use crate::patterns::PatternValidator;

/// One entry of the stream feed supplied by the external classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub name: String,
    #[serde(default)]
    pub builtin_filter_reason: Option<String>,
}

impl StreamRecord {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            builtin_filter_reason: None,
        }
    }

    pub fn with_builtin_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.builtin_filter_reason = Some(reason.into());
        self
    }

    /// Parse a JSON array of `{name, builtin_filter_reason}` objects.
    pub fn parse_feed(contents: &str) -> AppResult<Vec<StreamRecord>> {
        let streams = serde_json::from_str(contents)?;
        Ok(streams)
    }
}

/// Display and classification output for one stream.
#[derive(Debug, Clone, Serialize)]
pub struct StreamEvaluation {
    pub name: String,
    pub segments: Vec<Segment>,
    pub classification: ClassificationRecord,
    pub verdict: Verdict,
    /// Let through only because builtin filtering is skipped
    pub would_be_builtin_filtered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub items: Vec<StreamEvaluation>,
    pub stats: AggregateStats,
}

/// Evaluates stream batches against one compiled pattern configuration.
///
/// Items are independent, so batches at or above the parallel threshold are
/// mapped on the rayon pool; output order always matches input order.
#[derive(Debug, Clone)]
pub struct BatchEvaluator {
    patterns: PatternSet,
    parallel_threshold: usize,
}

impl BatchEvaluator {
    pub fn new(patterns: &PatternConfig, engine: &EngineConfig) -> Self {
        let validator = PatternValidator::new(engine.limits());
        Self {
            patterns: PatternSet::compile(patterns, &validator, engine.group_location),
            parallel_threshold: engine.parallel_threshold,
        }
    }

    pub fn pattern_set(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn field_validations(&self) -> &[FieldValidation] {
        self.patterns.validate_all()
    }

    pub fn classify(&self, stream: &StreamRecord) -> ClassificationRecord {
        ClassificationRecord {
            extraction_ranges: self.patterns.extraction_ranges(&stream.name),
            include_match: self.patterns.include_match(&stream.name),
            exclude_match: self.patterns.exclude_match(&stream.name),
            builtin_filter_reason: stream.builtin_filter_reason.clone(),
        }
    }

    pub fn evaluate_item(
        &self,
        stream: &StreamRecord,
        skip_builtin_filter: bool,
    ) -> StreamEvaluation {
        let classification = self.classify(stream);
        let would_be_builtin_filtered =
            classification.would_be_builtin_filtered(skip_builtin_filter);
        StreamEvaluation {
            name: stream.name.clone(),
            segments: build_segments(&stream.name, &classification.extraction_ranges),
            verdict: classification.verdict(skip_builtin_filter),
            would_be_builtin_filtered,
            classification,
        }
    }

    /// Segments, verdicts and stats for the whole batch.
    pub fn evaluate(&self, streams: &[StreamRecord], skip_builtin_filter: bool) -> BatchReport {
        let started = Instant::now();
        let items = self.map_streams(streams, |stream| {
            self.evaluate_item(stream, skip_builtin_filter)
        });
        let stats = aggregate(items.iter().map(|item| &item.classification), skip_builtin_filter);

        debug!(
            "Evaluated {} streams in {:?}: {} included, {} excluded, {} builtin flagged",
            stats.total,
            started.elapsed(),
            stats.included,
            stats.excluded,
            stats.builtin_flagged
        );
        BatchReport { items, stats }
    }

    /// Classify the batch once; aggregating the same records for both
    /// settings of the skip flag is then a cheap linear pass each.
    pub fn classify_all(&self, streams: &[StreamRecord]) -> Vec<ClassificationRecord> {
        self.map_streams(streams, |stream| self.classify(stream))
    }

    /// Stats only, without building segments.
    pub fn stats(&self, streams: &[StreamRecord], skip_builtin_filter: bool) -> AggregateStats {
        aggregate(&self.classify_all(streams), skip_builtin_filter)
    }

    fn map_streams<T, F>(&self, streams: &[StreamRecord], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&StreamRecord) -> T + Sync + Send,
    {
        if streams.len() >= self.parallel_threshold {
            debug!("Evaluating {} streams in parallel", streams.len());
            streams.par_iter().map(f).collect()
        } else {
            streams.iter().map(f).collect()
        }
    }
}
