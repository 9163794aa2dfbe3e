use regex::Regex;
use std::sync::LazyLock;

static STRIPPED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.\s]+").unwrap());

/// Canonical comparison form of a free-text field.
///
/// Lowercases the input and removes every period and whitespace character, so
/// "C. S. Lewis" and "cslewis" both become `"cslewis"`. Idempotent.
pub fn normalize(text: &str) -> String {
    STRIPPED.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Splits an already-normalized topic blob into its comma separated tokens.
///
/// Tokens are trimmed but empty ones are kept; callers decide what an empty
/// token means.
pub fn topic_tokens(normalized_topics: &str) -> impl Iterator<Item = &str> {
    normalized_topics.split(',').map(str::trim)
}
