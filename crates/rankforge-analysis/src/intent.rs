//! Search-intent tagging from keyword modifiers.

use rankforge_core::SearchIntent;

const TRANSACTIONAL: &[&str] = &[
    "buy", "price", "prices", "cheap", "deal", "deals", "coupon", "discount",
];
const COMMERCIAL: &[&str] = &[
    "best",
    "top",
    "review",
    "reviews",
    "vs",
    "compare",
    "comparison",
];
const NAVIGATIONAL: &[&str] = &["login", "official", "website", "site"];

/// Intent signalled by a single keyword.
///
/// Checked in order transactional, commercial, navigational, so
/// "buy best running shoes" is transactional.
pub fn keyword_intent(keyword: &str) -> SearchIntent {
    let tokens: Vec<String> = keyword.split_whitespace().map(str::to_lowercase).collect();
    let has = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));

    if has(TRANSACTIONAL) {
        SearchIntent::Transactional
    } else if has(COMMERCIAL) {
        SearchIntent::Commercial
    } else if has(NAVIGATIONAL) {
        SearchIntent::Navigational
    } else {
        SearchIntent::Informational
    }
}

/// Majority intent over a cluster's members. On a tie the intent that
/// appears first in member order wins.
pub fn classify_intent<'a>(keywords: impl IntoIterator<Item = &'a str>) -> SearchIntent {
    // (intent, count) in order of first appearance.
    let mut tally: Vec<(SearchIntent, usize)> = Vec::new();
    for kw in keywords {
        let intent = keyword_intent(kw);
        match tally.iter_mut().find(|(i, _)| *i == intent) {
            Some((_, n)) => *n += 1,
            None => tally.push((intent, 1)),
        }
    }

    let mut best: Option<(SearchIntent, usize)> = None;
    for (intent, n) in tally {
        if best.is_none_or(|(_, b)| n > b) {
            best = Some((intent, n));
        }
    }
    best.map(|(i, _)| i).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_map_to_intent() {
        assert_eq!(
            keyword_intent("buy running shoes"),
            SearchIntent::Transactional
        );
        assert_eq!(keyword_intent("Cheap flights"), SearchIntent::Transactional);
        assert_eq!(
            keyword_intent("best running shoes"),
            SearchIntent::Commercial
        );
        assert_eq!(keyword_intent("nike vs adidas"), SearchIntent::Commercial);
        assert_eq!(keyword_intent("strava login"), SearchIntent::Navigational);
        assert_eq!(
            keyword_intent("running shoes guide"),
            SearchIntent::Informational
        );
    }

    #[test]
    fn transactional_beats_commercial() {
        assert_eq!(
            keyword_intent("buy best running shoes"),
            SearchIntent::Transactional
        );
    }

    #[test]
    fn majority_wins() {
        let intent = classify_intent(["running guide", "best running shoes", "top running shoes"]);
        assert_eq!(intent, SearchIntent::Commercial);
    }

    #[test]
    fn tie_goes_to_first_keyword() {
        let intent = classify_intent(["buy running shoes", "running shoes review"]);
        assert_eq!(intent, SearchIntent::Transactional);
        let intent = classify_intent(["running shoes review", "buy running shoes"]);
        assert_eq!(intent, SearchIntent::Commercial);
    }

    #[test]
    fn empty_is_informational() {
        assert_eq!(classify_intent([]), SearchIntent::Informational);
    }
}
