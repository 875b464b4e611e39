//! Relevance ordering of search results by match strength against the title.

use crate::types::SearchResult;

const EXACT_MATCH: f64 = 100.0;
const PREFIX_MATCH: f64 = 50.0;
const SUBSTRING_MATCH: f64 = 30.0;
const SUBTITLE_MATCH: f64 = 10.0;
/// Scaled by how much of the title the query covers.
const COVERAGE_BONUS: f64 = 10.0;

/// Score a result against a query. Higher is more relevant.
///
/// Title matches are exclusive (exact beats prefix beats substring); a subtitle
/// match and the title coverage bonus stack on top.
pub fn score(result: &SearchResult, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0.0;
    }

    let title = result.title.to_lowercase();
    let mut score = if title == query {
        EXACT_MATCH
    } else if title.starts_with(&query) {
        PREFIX_MATCH
    } else if title.contains(&query) {
        SUBSTRING_MATCH
    } else {
        0.0
    };

    if result
        .subtitle
        .as_ref()
        .is_some_and(|s| s.to_lowercase().contains(&query))
    {
        score += SUBTITLE_MATCH;
    }

    if title.contains(&query) {
        let title_len = title.chars().count() as f64;
        let query_len = query.chars().count() as f64;
        score += COVERAGE_BONUS * (query_len / title_len);
    }

    score
}

/// Sort results by descending score. Ties keep their original order.
pub fn rank_results(results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
    let mut scored: Vec<(f64, SearchResult)> = results
        .into_iter()
        .map(|result| (score(&result, query), result))
        .collect();

    // sort_by is stable
    scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    scored.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultType;
    use serde_json::Map;

    fn result(id: &str, title: &str, subtitle: Option<&str>) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            result_type: ResultType::Company,
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
            badge: None,
            navigation_path: format!("/companies/{id}"),
            metadata: Map::new(),
        }
    }

    #[test]
    fn exact_match_scores_highest() {
        let exact = score(&result("1", "Maria", None), "maria");
        let prefix = score(&result("2", "Mariana", None), "maria");
        let contains = score(&result("3", "Ana Maria", None), "maria");
        let none = score(&result("4", "Pedro", None), "maria");

        assert_eq!(exact, 110.0);
        assert!(exact > prefix);
        assert!(prefix > contains);
        assert!(contains > none);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn title_matches_are_exclusive() {
        // exact title also starts with and contains the query; only 100 applies
        let s = score(&result("1", "acme", None), "ACME");
        assert_eq!(s, 110.0);
    }

    #[test]
    fn subtitle_adds_ten() {
        let without = score(&result("1", "Pedro", None), "sur");
        let with = score(&result("2", "Pedro", Some("Rescate Sur")), "sur");
        assert_eq!(without, 0.0);
        assert_eq!(with, 10.0);
    }

    #[test]
    fn coverage_bonus_prefers_shorter_titles() {
        let short = score(&result("1", "Mar Sur", None), "mar");
        let long = score(&result("2", "Mar Sur Asistencia", None), "mar");
        assert!(short > long);
        assert!(short > PREFIX_MATCH && short < PREFIX_MATCH + COVERAGE_BONUS);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(score(&result("1", "Maria", Some("maria")), "  "), 0.0);
    }

    #[test]
    fn rank_sorts_descending_and_is_stable() {
        let results = vec![
            result("a", "Ana Maria", None),
            result("b", "Pedro", None),
            result("c", "Maria", None),
            result("d", "Pablo", None),
            result("e", "Mariana", None),
        ];

        let ranked = rank_results(results, "maria");
        let ids: Vec<_> = ranked.iter().map(|r| r.id.as_str()).collect();
        // b and d tie at zero and keep their relative order
        assert_eq!(ids, vec!["c", "e", "a", "b", "d"]);
    }
}
