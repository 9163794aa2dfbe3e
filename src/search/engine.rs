use super::normalizer::{normalize, topic_tokens};
use super::types::{MatchPhase, MatchPolicy, Quote, SearchOutcome, clamp_limit};
use crate::storage::store::{QuoteStore, StoreError};

use rand::seq::SliceRandom;

/// Runs the two-phase search against a store.
///
/// The exact phase is delegated to the store. Only when it comes back empty
/// and the normalized query is at least `policy.min_fuzzy_query_len`
/// characters long is a capped corpus snapshot loaded and scored by edit
/// distance. Storage failures are returned unchanged.
pub async fn search(
    store: &dyn QuoteStore,
    query: &str,
    limit: usize,
    policy: &MatchPolicy,
) -> Result<SearchOutcome, StoreError> {
    let normalized = normalize(query);
    let limit = clamp_limit(limit);

    if normalized.is_empty() {
        tracing::debug!("Query {:?} is empty after normalization", query);
        return Ok(SearchOutcome::empty());
    }

    let exact = store.exact_query(&normalized, limit).await?;
    if !exact.is_empty() {
        tracing::debug!("Exact phase matched {} quote(s) for {:?}", exact.len(), normalized);
        return Ok(SearchOutcome {
            phase: MatchPhase::Exact,
            quotes: exact,
        });
    }

    if normalized.chars().count() < policy.min_fuzzy_query_len {
        tracing::debug!("Exact miss for short query {:?}, skipping fuzzy phase", normalized);
        return Ok(SearchOutcome::empty());
    }

    let corpus = store.scan(policy.fuzzy_scan_cap).await?;
    let fuzzy = fuzzy_search(&corpus, &normalized, limit, policy);
    tracing::debug!(
        "Fuzzy phase matched {} quote(s) for {:?} (scanned {})",
        fuzzy.len(),
        normalized,
        corpus.len()
    );

    Ok(if fuzzy.is_empty() {
        SearchOutcome::empty()
    } else {
        SearchOutcome {
            phase: MatchPhase::Fuzzy,
            quotes: fuzzy,
        }
    })
}

/// Same control flow as [`search`], over a corpus already in memory.
pub fn search_corpus(
    corpus: &[Quote],
    query: &str,
    limit: usize,
    policy: &MatchPolicy,
) -> SearchOutcome {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return SearchOutcome::empty();
    }

    let exact = exact_search(corpus, &normalized, limit);
    if !exact.is_empty() {
        return SearchOutcome {
            phase: MatchPhase::Exact,
            quotes: exact,
        };
    }

    if normalized.chars().count() < policy.min_fuzzy_query_len {
        return SearchOutcome::empty();
    }

    let fuzzy = fuzzy_search(corpus, &normalized, limit, policy);
    if fuzzy.is_empty() {
        SearchOutcome::empty()
    } else {
        SearchOutcome {
            phase: MatchPhase::Fuzzy,
            quotes: fuzzy,
        }
    }
}

/// Substring match of the normalized query against each record's normalized
/// author or its whole normalized topic list.
pub fn exact_search(corpus: &[Quote], query: &str, limit: usize) -> Vec<Quote> {
    let needle = normalize(query);

    let matches = corpus
        .iter()
        .filter(|quote| {
            normalize(&quote.author).contains(&needle) || normalize(&quote.topics).contains(&needle)
        })
        .cloned()
        .collect();

    shuffle_and_truncate(matches, limit)
}

/// Edit-distance match of the normalized query against each record's author
/// and each of its individual topic tokens.
///
/// At most `policy.fuzzy_scan_cap` records are considered. The threshold is
/// chosen per comparison target, so a long author and a short topic on the
/// same record are judged with different budgets.
pub fn fuzzy_search(
    corpus: &[Quote],
    query: &str,
    limit: usize,
    policy: &MatchPolicy,
) -> Vec<Quote> {
    let needle = normalize(query);

    let matches = corpus
        .iter()
        .take(policy.fuzzy_scan_cap)
        .filter(|quote| is_fuzzy_match(&needle, quote, policy))
        .cloned()
        .collect();

    shuffle_and_truncate(matches, limit)
}

fn is_fuzzy_match(needle: &str, quote: &Quote, policy: &MatchPolicy) -> bool {
    let author = normalize(&quote.author);
    if within_threshold(needle, &author, policy) {
        return true;
    }

    let topics = normalize(&quote.topics);
    topic_tokens(&topics).any(|token| within_threshold(needle, token, policy))
}

fn within_threshold(needle: &str, target: &str, policy: &MatchPolicy) -> bool {
    if target.is_empty() {
        return false;
    }
    let max = policy.threshold_for(target);
    if needle.chars().count().abs_diff(target.chars().count()) > max {
        return false;
    }
    levenshtein(needle, target) <= max
}

/// Levenshtein distance over characters; insertion, deletion and
/// substitution each cost 1.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

pub(crate) fn shuffle_and_truncate(mut quotes: Vec<Quote>, limit: usize) -> Vec<Quote> {
    quotes.shuffle(&mut rand::thread_rng());
    quotes.truncate(clamp_limit(limit));
    quotes
}
