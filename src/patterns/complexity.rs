//! Pattern complexity heuristics
//!
//! The engine has no timeout, so a caller wanting bounded latency on large
//! batches caps pattern complexity before matching. This module scores a
//! pattern the same way regardless of dialect and records the largest bounded
//! repetition it uses.

use serde::{Deserialize, Serialize};

use crate::errors::PatternError;

/// Summary of a pattern's structural cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternComplexity {
    pub score: u32,
    /// Largest explicit bound in a `{n}` / `{n,m}` repetition, if any
    pub max_repetition: Option<usize>,
}

/// Optional ceilings applied by the validator. `None` disables a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLimits {
    pub max_complexity: Option<u32>,
    pub max_repetition: Option<usize>,
}

impl PatternLimits {
    pub fn check(&self, complexity: &PatternComplexity) -> Result<(), PatternError> {
        if let Some(limit) = self.max_complexity {
            if complexity.score > limit {
                return Err(PatternError::ComplexityExceeded {
                    score: complexity.score,
                    limit,
                });
            }
        }
        if let (Some(limit), Some(bound)) = (self.max_repetition, complexity.max_repetition) {
            if bound > limit {
                return Err(PatternError::RepetitionExceeded { bound, limit });
            }
        }
        Ok(())
    }
}

struct Quantifier {
    min: usize,
    max: Option<usize>, // None means unbounded
}

/// Score a pattern: quantifiers, groups, alternation and wildcards add cost.
pub fn analyze(pattern: &str) -> PatternComplexity {
    let mut score = 0u32;
    let mut max_repetition: Option<usize> = None;
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '*' | '+' => score += 3,
            '?' => score += 1,
            '{' => {
                if let Some(quantifier) = parse_quantifier(&mut chars) {
                    score += if quantifier.max.is_none() { 5 } else { 2 };
                    let bound = quantifier.max.unwrap_or(quantifier.min);
                    max_repetition = Some(max_repetition.map_or(bound, |m| m.max(bound)));
                }
            }
            '(' => score += 2,
            '|' => score += 2,
            '.' => score += 2,
            '[' => {
                score += 1;
                // Skip class contents, honouring escapes
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        ']' => break,
                        _ => {}
                    }
                }
            }
            '\\' => {
                chars.next();
                score += 1;
            }
            _ => {}
        }
    }

    PatternComplexity {
        score,
        max_repetition,
    }
}

/// Parse the body of `{n}`, `{n,}` or `{n,m}` after the opening brace. A brace
/// that does not open a repetition (`{abc}`) consumes nothing and yields `None`.
fn parse_quantifier(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<Quantifier> {
    let mut lookahead = chars.clone();
    let mut body = String::new();
    loop {
        match lookahead.next()? {
            '}' => break,
            c if c.is_ascii_digit() || c == ',' => body.push(c),
            _ => return None,
        }
    }

    let quantifier = match body.split_once(',') {
        Some((min, max)) => Quantifier {
            min: min.parse().ok()?,
            max: if max.is_empty() {
                None
            } else {
                Some(max.parse().ok()?)
            },
        },
        None => {
            let count = body.parse().ok()?;
            Quantifier {
                min: count,
                max: Some(count),
            }
        }
    };

    *chars = lookahead;
    Some(quantifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_is_free() {
        assert_eq!(analyze("HD").score, 0);
    }

    #[test]
    fn test_scores_accumulate() {
        // two groups (4), two wildcards (4), two `+` (6)
        let complexity = analyze("(?P<team1>.+) vs (?P<team2>.+)");
        // each `(?` also contributes a `?`
        assert_eq!(complexity.score, 4 + 4 + 6 + 2);
        assert_eq!(complexity.max_repetition, None);
    }

    #[test]
    fn test_repetition_bounds() {
        assert_eq!(analyze(r"\d{2}:\d{2}").max_repetition, Some(2));
        assert_eq!(analyze(r"a{3,250}").max_repetition, Some(250));
        assert_eq!(analyze(r"a{40,}").max_repetition, Some(40));
        assert_eq!(analyze(r"x{abc}").max_repetition, None);
    }

    #[test]
    fn test_limits() {
        let limits = PatternLimits {
            max_complexity: Some(5),
            max_repetition: Some(100),
        };
        assert!(limits.check(&analyze("HD")).is_ok());
        assert_eq!(
            limits.check(&analyze(".+.+")),
            Err(PatternError::ComplexityExceeded { score: 10, limit: 5 })
        );
        assert_eq!(
            limits.check(&analyze("a{500}")),
            Err(PatternError::RepetitionExceeded { bound: 500, limit: 100 })
        );
        assert!(PatternLimits::default().check(&analyze(".+.+.+.+")).is_ok());
    }
}
