use serde::{Deserialize, Serialize};

/// Smallest number of results a search may return.
pub const MIN_LIMIT: usize = 1;
/// Largest number of results a search may return.
pub const MAX_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub author: String,
    pub quote: String,
    pub topics: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
}

impl Quote {
    pub fn new(author: &str, quote: &str, topics: &str) -> Self {
        Self {
            author: author.to_string(),
            quote: quote.to_string(),
            topics: topics.to_string(),
            likes: None,
        }
    }
}

/// Tunables of the matcher.
///
/// The defaults are the production values; the only one exposed as runtime
/// configuration is `fuzzy_scan_cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Edit budget for short comparison targets.
    pub base_threshold: usize,
    /// Edit budget once a target is longer than `relaxed_after_len`.
    pub relaxed_threshold: usize,
    pub relaxed_after_len: usize,
    /// Normalized queries shorter than this never reach the fuzzy phase.
    pub min_fuzzy_query_len: usize,
    /// Maximum number of records loaded for the fuzzy phase, whatever the limit.
    pub fuzzy_scan_cap: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            base_threshold: 2,
            relaxed_threshold: 3,
            relaxed_after_len: 8,
            min_fuzzy_query_len: 4,
            fuzzy_scan_cap: 1000,
        }
    }
}

impl MatchPolicy {
    pub fn with_scan_cap(fuzzy_scan_cap: usize) -> Self {
        Self {
            fuzzy_scan_cap,
            ..Self::default()
        }
    }

    /// Maximum distance allowed against `target` (already normalized).
    pub fn threshold_for(&self, target: &str) -> usize {
        if target.chars().count() > self.relaxed_after_len {
            self.relaxed_threshold
        } else {
            self.base_threshold
        }
    }
}

/// Which phase of the matcher produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Exact,
    Fuzzy,
    /// Both phases missed, or the fuzzy phase was skipped for a short query.
    None,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub phase: MatchPhase,
    pub quotes: Vec<Quote>,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self {
            phase: MatchPhase::None,
            quotes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Parses a raw `limit` parameter and clamps it to `[MIN_LIMIT, MAX_LIMIT]`.
///
/// Mirrors a leading-integer parse: surrounding whitespace and an optional
/// sign are accepted, trailing garbage is ignored (`"10abc"` is 10, `"3.7"` is
/// 3). Absent or digit-less input yields 1.
pub fn parse_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return MIN_LIMIT;
    };

    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let leading: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };

    if leading.is_empty() || negative {
        return MIN_LIMIT;
    }

    let value = leading
        .bytes()
        .fold(0usize, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as usize));

    clamp_limit(value)
}

pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(MIN_LIMIT, MAX_LIMIT)
}
