// src/filter.rs
//! Category + free-text filtering of trend items.

use crate::model::TrendItem;

/// Category value meaning "every category".
pub const ALL_CATEGORIES: &str = "alle";

/// Keep the items matching both the selected category and the query.
///
/// The category is compared exactly against `niche`. The query is trimmed and
/// lowercased; when non-empty it must occur in the title or in the JSON text
/// of the item's `sources` / `articles` lists. Matching against the JSON text
/// is deliberately loose (URLs and punctuation match too).
///
/// Input order is preserved.
pub fn filter_items<'a>(items: &'a [TrendItem], category: &str, query: &str) -> Vec<&'a TrendItem> {
    let q = query.trim().to_lowercase();
    items
        .iter()
        .filter(|it| matches_category(it, category))
        .filter(|it| q.is_empty() || matches_query(it, &q))
        .collect()
}

fn matches_category(it: &TrendItem, category: &str) -> bool {
    category == ALL_CATEGORIES || it.niche.as_deref() == Some(category)
}

// `q` is already trimmed and lowercased.
fn matches_query(it: &TrendItem, q: &str) -> bool {
    it.title_or_empty().to_lowercase().contains(q)
        || it.sources_json().to_lowercase().contains(q)
        || it.articles_json().to_lowercase().contains(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Vec<TrendItem> {
        [
            json!({"title": "Lederjacke", "niche": "Kleidung", "sources": ["GoogleTrends"]}),
            json!({"title": "PS5 Pro", "niche": "Elektronik", "sources": ["TikTok"]}),
            json!({"title": "Ducati Monster", "niche": "Motorrad",
                   "articles": [{"title": "Neue Ducati", "url": "https://moto.example/ducati"}]}),
            json!({"title": "Vintage Hoodie", "niche": "Kleidung"}),
            json!({"title": "ohne Kategorie"}),
        ]
        .iter()
        .map(TrendItem::from_value)
        .collect()
    }

    fn titles(v: &[&TrendItem]) -> Vec<String> {
        v.iter().map(|it| it.title_or_empty().to_string()).collect()
    }

    #[test]
    fn all_with_empty_query_is_identity() {
        let items = items();
        let out = filter_items(&items, ALL_CATEGORIES, "");
        assert_eq!(out.len(), items.len());
        assert!(out.iter().zip(items.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn category_is_exact_and_case_sensitive() {
        let items = items();
        assert_eq!(
            titles(&filter_items(&items, "Kleidung", "")),
            vec!["Lederjacke", "Vintage Hoodie"]
        );
        assert!(filter_items(&items, "kleidung", "").is_empty());
    }

    #[test]
    fn query_matches_title_case_insensitively_after_trim() {
        let items = items();
        assert_eq!(titles(&filter_items(&items, ALL_CATEGORIES, "  ps5 ")), vec!["PS5 Pro"]);
    }

    #[test]
    fn query_matches_source_names() {
        let items = items();
        assert_eq!(titles(&filter_items(&items, ALL_CATEGORIES, "tiktok")), vec!["PS5 Pro"]);
    }

    #[test]
    fn query_matches_inside_article_urls() {
        let items = items();
        assert_eq!(
            titles(&filter_items(&items, ALL_CATEGORIES, "moto.example")),
            vec!["Ducati Monster"]
        );
    }

    #[test]
    fn query_matches_structural_json_text() {
        // Loose matching: `"url"` is a key inside the serialized article list.
        let items = items();
        assert_eq!(titles(&filter_items(&items, ALL_CATEGORIES, "\"url\"")), vec!["Ducati Monster"]);
    }

    #[test]
    fn query_spanning_adjacent_keys_follows_published_order() {
        let ds = crate::model::TrendDataset::from_slice(
            br#"{"items":[{"title":"x","articles":[{"url":"https://moto.example/u","title":"Helm"}]}]}"#,
        )
        .unwrap();
        assert_eq!(filter_items(&ds.items, ALL_CATEGORIES, r#"/u","title":"helm"#).len(), 1);
        assert!(filter_items(&ds.items, ALL_CATEGORIES, r#"helm","url"#).is_empty());
    }

    #[test]
    fn adding_a_query_only_narrows() {
        let items = items();
        for cat in [ALL_CATEGORIES, "Kleidung", "Motorrad", "Garten"] {
            let base = filter_items(&items, cat, "");
            for q in ["e", "jacke", "google", "[", "zzz"] {
                let narrowed = filter_items(&items, cat, q);
                assert!(narrowed.iter().all(|n| base.iter().any(|b| std::ptr::eq(*n, *b))));
            }
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_items(&[], ALL_CATEGORIES, "x").is_empty());
    }
}
