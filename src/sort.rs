// src/sort.rs
//! Ordering of filtered trend items.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::TrendItem;

/// Value of the sort selector. Unknown values keep the filtered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    #[default]
    Score,
    Title,
    Niche,
    Unsorted(String),
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s {
            "score" => SortKey::Score,
            "title" => SortKey::Title,
            "niche" => SortKey::Niche,
            other => SortKey::Unsorted(other.to_string()),
        }
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        SortKey::from(s.as_str())
    }
}

impl From<SortKey> for String {
    fn from(k: SortKey) -> Self {
        k.as_str().to_string()
    }
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Score => "score",
            SortKey::Title => "title",
            SortKey::Niche => "niche",
            SortKey::Unsorted(raw) => raw,
        }
    }
}

/// Return a new ordering of `items`; the input slice is left as is.
///
/// Score sorts descending (absent = 0), title and niche ascending with
/// [`collate`] (absent = ""). The sort is stable, so ties keep filtered order.
pub fn sort_items<'a>(items: &[&'a TrendItem], key: &SortKey) -> Vec<&'a TrendItem> {
    let mut out = items.to_vec();
    match key {
        SortKey::Score => out.sort_by(|a, b| {
            b.score_or_zero()
                .partial_cmp(&a.score_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Title => out.sort_by(|a, b| collate(a.title_or_empty(), b.title_or_empty())),
        SortKey::Niche => out.sort_by(|a, b| collate(a.niche_or_empty(), b.niche_or_empty())),
        SortKey::Unsorted(_) => {}
    }
    out
}

/// Locale-aware comparison for German/Latin text.
///
/// Primary level ignores case and diacritics ("Äpfel" sorts with "Apfel",
/// "Straße" with "Strasse"); the raw strings only break ties.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' => out.push('a'),
            'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' => out.push('o'),
            'ü' | 'ù' | 'ú' | 'û' => out.push('u'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'ç' => out.push('c'),
            'ñ' => out.push('n'),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str, niche: Option<&str>, score: Option<f64>) -> TrendItem {
        TrendItem::from_value(&json!({"title": title, "niche": niche, "score": score}))
    }

    fn titles(v: &[&TrendItem]) -> Vec<String> {
        v.iter().map(|it| it.title_or_empty().to_string()).collect()
    }

    #[test]
    fn parses_known_keys_and_keeps_unknown_raw() {
        assert_eq!(SortKey::from("score"), SortKey::Score);
        assert_eq!(SortKey::from("title"), SortKey::Title);
        assert_eq!(SortKey::from("niche"), SortKey::Niche);
        assert_eq!(SortKey::from("Score"), SortKey::Unsorted("Score".into()));
        assert_eq!(SortKey::from("fresh").as_str(), "fresh");
    }

    #[test]
    fn score_descending_with_absent_as_zero() {
        let items = [
            item("ten", None, Some(10.0)),
            item("none", None, None),
            item("ninety", None, Some(90.0)),
            item("neg", None, Some(-3.0)),
        ];
        let refs: Vec<&TrendItem> = items.iter().collect();
        let out = sort_items(&refs, &SortKey::Score);
        assert_eq!(titles(&out), vec!["ninety", "ten", "none", "neg"]);
        // input untouched
        assert_eq!(titles(&refs), vec!["ten", "none", "ninety", "neg"]);
    }

    #[test]
    fn score_sort_is_idempotent_and_stable() {
        let items = [
            item("a", None, Some(5.0)),
            item("b", None, Some(7.0)),
            item("c", None, Some(5.0)),
            item("d", None, None),
            item("e", None, Some(0.0)),
        ];
        let refs: Vec<&TrendItem> = items.iter().collect();
        let once = sort_items(&refs, &SortKey::Score);
        let twice = sort_items(&once, &SortKey::Score);
        assert_eq!(titles(&once), vec!["b", "a", "c", "d", "e"]);
        assert_eq!(titles(&once), titles(&twice));
    }

    #[test]
    fn negative_zero_ties_with_absent_score() {
        let items = [
            item("none", None, None),
            item("negzero", None, Some(-0.0)),
            item("zero", None, Some(0.0)),
        ];
        let refs: Vec<&TrendItem> = items.iter().collect();
        assert_eq!(titles(&sort_items(&refs, &SortKey::Score)), vec!["none", "negzero", "zero"]);
        let reversed: Vec<&TrendItem> = items.iter().rev().collect();
        assert_eq!(
            titles(&sort_items(&reversed, &SortKey::Score)),
            vec!["zero", "negzero", "none"]
        );
    }

    #[test]
    fn title_sort_is_locale_aware() {
        let items = [
            item("Zelt", None, None),
            item("Äpfel", None, None),
            item("apfelsaft", None, None),
            item("Birne", None, None),
        ];
        let refs: Vec<&TrendItem> = items.iter().collect();
        let out = sort_items(&refs, &SortKey::Title);
        assert_eq!(titles(&out), vec!["Äpfel", "apfelsaft", "Birne", "Zelt"]);
    }

    #[test]
    fn niche_sort_puts_absent_first() {
        let items = [
            item("m", Some("Motorrad"), None),
            item("x", None, None),
            item("e", Some("Elektronik"), None),
        ];
        let refs: Vec<&TrendItem> = items.iter().collect();
        let out = sort_items(&refs, &SortKey::Niche);
        assert_eq!(titles(&out), vec!["x", "e", "m"]);
    }

    #[test]
    fn unknown_key_is_identity() {
        let items = [item("b", None, Some(1.0)), item("a", None, Some(2.0))];
        let refs: Vec<&TrendItem> = items.iter().collect();
        let out = sort_items(&refs, &SortKey::from("newest"));
        assert_eq!(titles(&out), vec!["b", "a"]);
    }

    #[test]
    fn collate_folds_sharp_s() {
        assert_eq!(collate("Strasse", "Straße"), "Strasse".cmp("Straße"));
        assert_eq!(collate("Straße", "Strassf"), Ordering::Less);
    }
}
