//! Match testing and range extraction
//!
//! Every entry point degrades instead of failing: an invalid pattern never
//! matches, yields no ranges and captures no groups.
//!
//! Scanning is strictly left to right. The cursor is a local byte offset
//! threaded through the loop; a zero-width match advances it by one character
//! so a scan over `n` characters performs at most `n + 1` searches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use super::offsets::CharOffsets;
use super::validator::{validate, CompiledPattern};
use super::MatchRange;

/// How a named group's range is located inside its match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupLocation {
    /// Offsets reported by the regex engine for the group itself.
    #[default]
    Exact,
    /// First occurrence of the captured text at or after the start of the
    /// overall match. Mis-locates a group whose value also appears earlier in
    /// the same match, e.g. `(?P<a>x)y(?P<b>x)` on `"xyx"` places `b` at 0.
    SubstringSearch,
}

impl CompiledPattern {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// All non-overlapping match ranges using exact group offsets.
    pub fn match_ranges(&self, text: &str) -> Vec<MatchRange> {
        self.match_ranges_with(text, GroupLocation::Exact)
    }

    pub fn match_ranges_with(&self, text: &str, location: GroupLocation) -> Vec<MatchRange> {
        let offsets = CharOffsets::new(text);
        let mut ranges = Vec::new();
        let mut cursor = 0usize;
        let mut searches = 0usize;

        while cursor <= text.len() {
            searches += 1;
            let Some(captures) = self.regex.captures_at(text, cursor) else {
                break;
            };
            let Some(whole) = captures.get(0) else {
                break;
            };

            if self.has_named_groups() {
                for name in self.group_names() {
                    let Some(group) = captures.name(name) else {
                        continue;
                    };
                    let (start, end) = match location {
                        GroupLocation::Exact => (group.start(), group.end()),
                        GroupLocation::SubstringSearch => {
                            locate_by_search(text, whole.start(), group.as_str())
                                .unwrap_or((group.start(), group.end()))
                        }
                    };
                    ranges.push(MatchRange::tagged(
                        offsets.char_of_byte(start),
                        offsets.char_of_byte(end),
                        name.as_str(),
                    ));
                }
            } else {
                ranges.push(MatchRange::untagged(
                    offsets.char_of_byte(whole.start()),
                    offsets.char_of_byte(whole.end()),
                ));
            }

            cursor = if whole.end() > whole.start() {
                whole.end()
            } else {
                next_char_boundary(text, whole.end())
            };
        }

        trace!(
            "Pattern '{}' produced {} ranges over {} searches",
            self.source(),
            ranges.len(),
            searches
        );
        ranges
    }

    /// Named groups of the first match, skipping groups that did not participate.
    pub fn extract_groups(&self, text: &str) -> BTreeMap<String, String> {
        let Some(captures) = self.regex.captures(text) else {
            return BTreeMap::new();
        };
        self.group_names()
            .iter()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect()
    }
}

/// Byte offset just past the character at `index`; past the end when `index`
/// is already at the end, which terminates the scan.
fn next_char_boundary(text: &str, index: usize) -> usize {
    match text[index..].chars().next() {
        Some(ch) => index + ch.len_utf8(),
        None => text.len() + 1,
    }
}

fn locate_by_search(text: &str, from: usize, value: &str) -> Option<(usize, usize)> {
    text[from..]
        .find(value)
        .map(|offset| (from + offset, from + offset + value.len()))
}

/// Does `pattern` match anywhere in `text`? Invalid patterns never match.
pub fn test_match(pattern: &str, text: &str) -> bool {
    validate(pattern)
        .compiled
        .is_some_and(|compiled| compiled.is_match(text))
}

/// Ranges for every non-overlapping match of `pattern` in `text`.
pub fn get_match_ranges(pattern: &str, text: &str) -> Vec<MatchRange> {
    validate(pattern)
        .compiled
        .map(|compiled| compiled.match_ranges(text))
        .unwrap_or_default()
}

/// Named group captures of the first match of `pattern` in `text`.
pub fn extract_groups(pattern: &str, text: &str) -> BTreeMap<String, String> {
    validate(pattern)
        .compiled
        .map(|compiled| compiled.extract_groups(text))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_ranges() {
        let ranges = get_match_ranges("(?P<team1>.+) vs (?P<team2>.+)", "Lakers vs Celtics");
        assert_eq!(
            ranges,
            vec![
                MatchRange::tagged(0, 6, "team1"),
                MatchRange::tagged(10, 17, "team2"),
            ]
        );
    }

    #[test]
    fn test_untagged_whole_match() {
        assert_eq!(
            get_match_ranges("HD", "Channel HD Feed"),
            vec![MatchRange::untagged(8, 10)]
        );
    }

    #[test]
    fn test_global_scan_finds_every_occurrence() {
        assert_eq!(
            get_match_ranges("hd", "HD one hd two Hd"),
            vec![
                MatchRange::untagged(0, 2),
                MatchRange::untagged(7, 9),
                MatchRange::untagged(14, 16),
            ]
        );
    }

    #[test]
    fn test_invalid_pattern_degrades() {
        assert!(!test_match("(unclosed", "x"));
        assert!(get_match_ranges("(unclosed", "x").is_empty());
        assert!(extract_groups("(unclosed", "x").is_empty());
        assert!(!test_match("", "anything"));
    }

    #[test]
    fn test_zero_width_matches_terminate() {
        let ranges = get_match_ranges("z*", "abc");
        assert_eq!(
            ranges,
            vec![
                MatchRange::untagged(0, 0),
                MatchRange::untagged(1, 1),
                MatchRange::untagged(2, 2),
                MatchRange::untagged(3, 3),
            ]
        );
    }

    #[test]
    fn test_zero_width_on_multibyte_text() {
        let ranges = get_match_ranges("x*", "é◉");
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2], MatchRange::untagged(2, 2));
    }

    #[test]
    fn test_non_participating_group_skipped() {
        let ranges = get_match_ranges("(?P<a>foo)|(?P<b>bar)", "bar foo");
        assert_eq!(
            ranges,
            vec![MatchRange::tagged(0, 3, "b"), MatchRange::tagged(4, 7, "a")]
        );
    }

    #[test]
    fn test_char_offsets_for_multibyte_names() {
        let ranges = get_match_ranges("(?P<league>Ligue 1)", "Télé: Ligue 1");
        assert_eq!(ranges, vec![MatchRange::tagged(6, 13, "league")]);
    }

    #[test]
    fn test_substring_search_mislocates_repeated_value() {
        let compiled = validate("(?P<a>x)y(?P<b>x)").compiled.unwrap();
        assert_eq!(
            compiled.match_ranges_with("xyx", GroupLocation::Exact),
            vec![MatchRange::tagged(0, 1, "a"), MatchRange::tagged(2, 3, "b")]
        );
        assert_eq!(
            compiled.match_ranges_with("xyx", GroupLocation::SubstringSearch),
            vec![MatchRange::tagged(0, 1, "a"), MatchRange::tagged(0, 1, "b")]
        );
    }

    #[test]
    fn test_extract_groups_first_match_only() {
        let groups = extract_groups(
            r"(?P<hour>\d{2}):(?P<minute>\d{2})",
            "Kickoff 19:30, replay 23:15",
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["hour"], "19");
        assert_eq!(groups["minute"], "30");
    }

    #[test]
    fn test_extract_groups_without_named_groups() {
        assert!(extract_groups("HD", "Channel HD").is_empty());
    }
}
