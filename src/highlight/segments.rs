use serde::{Deserialize, Serialize};

use crate::patterns::offsets::CharOffsets;
use crate::patterns::MatchRange;

/// A contiguous span of a stream name, optionally tagged for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Character offsets of the span in the original name
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn is_tagged(&self) -> bool {
        self.group.is_some()
    }
}

/// Partition `text` into segments from possibly overlapping, unsorted ranges.
///
/// Ranges are stably sorted by start, so on equal starts the range supplied
/// first wins. Each range is clamped to the unclaimed remainder of the text;
/// whatever part an earlier claim already covered is lost. Untagged ranges and
/// gaps coalesce, so no two adjacent segments are both untagged.
pub fn build_segments(text: &str, ranges: &[MatchRange]) -> Vec<Segment> {
    let offsets = CharOffsets::new(text);
    let len = offsets.char_len();

    let mut sorted: Vec<&MatchRange> = ranges.iter().collect();
    sorted.sort_by_key(|range| range.start);

    let mut builder = SegmentSink {
        text,
        offsets: &offsets,
        segments: Vec::new(),
    };
    let mut cursor = 0usize;

    for range in sorted {
        let start = range.start.max(cursor).min(len);
        let end = range.end.min(len);
        if start >= end {
            continue;
        }
        if start > cursor {
            builder.push(cursor, start, None);
        }
        builder.push(start, end, range.group.as_deref());
        cursor = end;
    }

    if cursor < len {
        builder.push(cursor, len, None);
    }

    builder.segments
}

struct SegmentSink<'a> {
    text: &'a str,
    offsets: &'a CharOffsets,
    segments: Vec<Segment>,
}

impl SegmentSink<'_> {
    fn push(&mut self, start: usize, end: usize, group: Option<&str>) {
        let text = self.text;
        let slice = &text[self.offsets.byte_of_char(start)..self.offsets.byte_of_char(end)];

        if group.is_none() {
            if let Some(last) = self.segments.last_mut() {
                if last.group.is_none() && last.end == start {
                    last.text.push_str(slice);
                    last.end = end;
                    return;
                }
            }
        }

        self.segments.push(Segment {
            text: slice.to_string(),
            group: group.map(str::to_string),
            start,
            end,
        });
    }
}
