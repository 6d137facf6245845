//! Relevance-ranked search over snapshot names.

use serde::Serialize;

/// Relevance score levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceScore {
    /// No match
    None = 0,
    /// Query characters appear in order
    Fuzzy = 10,
    /// Contains substring
    Contains = 20,
    /// A word starts with the query
    WordBoundary = 30,
    /// Name starts with the query
    StartsWith = 40,
    /// Name (without extension) equals the query
    Exact = 50,
}

/// A name that matched a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit<'a> {
    /// Matching snapshot name
    pub name: &'a str,
    /// How well it matched
    pub score: RelevanceScore,
}

/// Score `name` against `query`, ignoring case and the file extension.
pub fn calculate_relevance(name: &str, query: &str) -> RelevanceScore {
    let text_lower = stem(name).to_lowercase();
    let query_lower = query.trim().to_lowercase();

    if query_lower.is_empty() {
        return RelevanceScore::None;
    }

    if text_lower == query_lower {
        return RelevanceScore::Exact;
    }

    if text_lower.starts_with(&query_lower) {
        return RelevanceScore::StartsWith;
    }

    if text_lower
        .split(|c: char| c.is_whitespace() || c == '/' || c == '-' || c == '_')
        .any(|word| word.starts_with(&query_lower))
    {
        return RelevanceScore::WordBoundary;
    }

    if text_lower.contains(&query_lower) {
        return RelevanceScore::Contains;
    }

    if fuzzy_match(&text_lower, &query_lower) {
        return RelevanceScore::Fuzzy;
    }

    RelevanceScore::None
}

/// Rank `names` by relevance to `query`, best first.
///
/// Non-matches are dropped; equal scores keep their catalogue order.
pub fn search<'a, S: AsRef<str>>(names: &'a [S], query: &str) -> Vec<SearchHit<'a>> {
    let mut hits: Vec<SearchHit<'a>> = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            SearchHit {
                name,
                score: calculate_relevance(name, query),
            }
        })
        .filter(|hit| hit.score > RelevanceScore::None)
        .collect();

    // Stable sort keeps catalogue order within a score.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

/// Check if text contains all characters of query in order.
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    let mut text_chars = text.chars();
    query
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|q| text_chars.any(|c| c == q))
}

/// Name without its directory or final extension.
fn stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_extension() {
        assert_eq!(calculate_relevance("Jetpac.z80", "jetpac"), RelevanceScore::Exact);
    }

    #[test]
    fn test_starts_with() {
        assert_eq!(calculate_relevance("Manic Miner.z80", "manic"), RelevanceScore::StartsWith);
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(calculate_relevance("Manic Miner.z80", "miner"), RelevanceScore::WordBoundary);
        assert_eq!(calculate_relevance("ultimate/Sabre-Wulf.z80", "wulf"), RelevanceScore::WordBoundary);
    }

    #[test]
    fn test_contains() {
        assert_eq!(calculate_relevance("Chuckie Egg.z80", "ucki"), RelevanceScore::Contains);
    }

    #[test]
    fn test_fuzzy() {
        assert_eq!(calculate_relevance("Jet Set Willy.z80", "jsw"), RelevanceScore::Fuzzy);
        assert_eq!(calculate_relevance("Jetpac.z80", "xyz"), RelevanceScore::None);
    }

    #[test]
    fn test_extension_is_not_searched() {
        assert_eq!(calculate_relevance("Jetpac.z80", "z80"), RelevanceScore::None);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert_eq!(calculate_relevance("Jetpac.z80", "  "), RelevanceScore::None);
    }

    #[test]
    fn test_search_ranks_best_first() {
        let names = [
            "Jet Set Willy.z80",
            "Jetpac.z80",
            "Manic Miner.z80",
            "Rocket Jet.z80",
            "Turbojet.z80",
        ];

        let hits = search(&names, "jet");
        let ranked: Vec<&str> = hits.iter().map(|h| h.name).collect();

        assert_eq!(
            ranked,
            vec!["Jet Set Willy.z80", "Jetpac.z80", "Rocket Jet.z80", "Turbojet.z80"]
        );
        assert_eq!(hits[0].score, RelevanceScore::StartsWith);
        assert_eq!(hits[2].score, RelevanceScore::WordBoundary);
        assert_eq!(hits[3].score, RelevanceScore::Contains);
    }

    #[test]
    fn test_fuzzy_match_in_order() {
        assert!(fuzzy_match("hello world", "hwo"));
        assert!(!fuzzy_match("hello", "lhe"));
        assert!(fuzzy_match("hello", "hello"));
    }
}
