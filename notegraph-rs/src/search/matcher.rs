//! Matching, scoring and snippets.
//!
//! A pure function over a dataset snapshot; safe to call from many threads.

use crate::search::types::{Exclusion, SearchQuery, SearchResult};
use crate::types::NoteSummary;
use chrono::{NaiveDate, Utc};
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;

/// Characters of context on each side of the first match.
pub const SNIPPET_RADIUS: usize = 80;

/// Tag that earns a small ranking bonus.
pub const META_TAG: &str = "meta";

/// Run a query against a dataset, using today's date for recency.
pub fn run_search(dataset: &[NoteSummary], query: &SearchQuery) -> Vec<SearchResult> {
    run_search_at(dataset, query, Utc::now().date_naive())
}

/// Run a query with an explicit "today".
///
/// Results are ordered by score, then by `updatedAt`, newest first.
pub fn run_search_at(
    dataset: &[NoteSummary],
    query: &SearchQuery,
    today: NaiveDate,
) -> Vec<SearchResult> {
    if !query.has_positive() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = dataset
        .iter()
        .filter_map(|note| match_note(note, query, today))
        .collect();

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.note.updated_at.cmp(&a.note.updated_at))
    });
    results
}

/// Match a single note, returning its scored result.
pub fn match_note(note: &NoteSummary, query: &SearchQuery, today: NaiveDate) -> Option<SearchResult> {
    let haystack = searchable_text(note);
    let tags: Vec<String> = note.tags.iter().map(|t| t.to_lowercase()).collect();
    let mut matches = Vec::new();

    for phrase in &query.phrases {
        if !haystack.contains(phrase.as_str()) {
            return None;
        }
        matches.push(phrase.clone());
    }

    for term in &query.terms {
        if !haystack.contains(term.as_str()) {
            return None;
        }
        matches.push(term.clone());
    }

    for tag in &query.tags {
        if !tags.contains(tag) {
            return None;
        }
        matches.push(format!("#{}", tag));
    }

    let excluded = query.exclude.iter().any(|exclusion| match exclusion {
        Exclusion::Text(text) => haystack.contains(text.as_str()),
        Exclusion::Tag(tag) => tags.contains(tag),
    });
    if excluded {
        return None;
    }

    let meta_bonus = u32::from(tags.iter().any(|t| t == META_TAG));
    let score = 4 * matches.len() as u32 + meta_bonus + recency_score(&note.updated_at, today);

    Some(SearchResult {
        snippet: build_snippet(note, &matches),
        note: note.clone(),
        score,
        matches,
    })
}

/// Lowercased title, excerpt and plain text with whitespace collapsed.
pub fn searchable_text(note: &NoteSummary) -> String {
    format!("{} {} {}", note.title, note.excerpt, note.plain_text)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `6` within a week, `3` within a month, else `1`; `0` for an unreadable date.
pub fn recency_score(updated_at: &str, today: NaiveDate) -> u32 {
    let Ok(date) = NaiveDate::parse_from_str(updated_at, "%Y-%m-%d") else {
        return 0;
    };
    let days = (today - date).num_days();
    if days <= 7 {
        6
    } else if days <= 30 {
        3
    } else {
        1
    }
}

/// Text around the earliest match, with every match highlighted.
pub fn build_snippet(note: &NoteSummary, matches: &[String]) -> String {
    let reference = [&note.plain_text, &note.excerpt, &note.title]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(String::as_str)
        .unwrap_or_default();
    if reference.is_empty() {
        return String::new();
    }

    let patterns: Vec<(usize, Regex)> = matches
        .iter()
        .filter_map(|m| case_insensitive(m).map(|re| (m.chars().count(), re)))
        .collect();

    let first_match = patterns
        .iter()
        .filter_map(|(_, re)| re.find(reference).map(|m| m.start()))
        .min()
        .unwrap_or(0);

    let total = reference.chars().count();
    let center = reference[..first_match].chars().count();
    let start = center.saturating_sub(SNIPPET_RADIUS);
    let end = (center + SNIPPET_RADIUS).min(total);

    let window: String = reference.chars().skip(start).take(end - start).collect();
    let mut snippet = highlight(window.trim(), patterns);

    if start > 0 {
        snippet.insert(0, '…');
    }
    if end < total {
        snippet.push('…');
    }
    snippet
}

fn case_insensitive(value: &str) -> Option<Regex> {
    if value.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(value))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Wrap matches in `<mark>`, longest pattern first. A shorter match that
/// overlaps an already marked range is skipped.
fn highlight(text: &str, mut patterns: Vec<(usize, Regex)>) -> String {
    patterns.sort_by_key(|(len, _)| Reverse(*len));

    let mut marked: Vec<(usize, usize)> = Vec::new();
    for (_, re) in &patterns {
        for m in re.find_iter(text) {
            let overlaps = marked.iter().any(|&(s, e)| m.start() < e && m.end() > s);
            if !overlaps {
                marked.push((m.start(), m.end()));
            }
        }
    }
    marked.sort_unstable();

    let mut output = String::with_capacity(text.len() + marked.len() * 13);
    let mut last = 0;
    for (start, end) in marked {
        output.push_str(&text[last..start]);
        output.push_str("<mark>");
        output.push_str(&text[start..end]);
        output.push_str("</mark>");
        last = end;
    }
    output.push_str(&text[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parse_query;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn summary(id: &str, title: &str, tags: &[&str], text: &str, updated_at: &str) -> NoteSummary {
        NoteSummary {
            id: id.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            excerpt: text.chars().take(40).collect(),
            plain_text: text.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    fn dataset() -> Vec<NoteSummary> {
        vec![
            summary("n_01", "Grafo", &["meta"], "El grafo conecta todas las notas.", "2024-06-28"),
            summary("n_02", "Notas", &["draft"], "Notas sueltas sobre el grafo y otras cosas.", "2024-06-10"),
            summary("n_03", "Recetas", &[], "Nada que ver aquí.", "2023-01-01"),
        ]
    }

    #[test]
    fn test_tag_and_phrase() {
        let results = run_search_at(&dataset(), &parse_query("tag:#meta \"grafo\""), today());
        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.note.id, "n_01");
        assert_eq!(hit.matches, vec!["grafo", "#meta"]);
        assert_eq!(hit.score, 4 * 2 + 1 + 6);
        assert!(hit.snippet.contains("<mark>grafo</mark>"));
    }

    #[test]
    fn test_no_positive_criterion_matches_nothing() {
        assert!(run_search_at(&dataset(), &parse_query("-foo"), today()).is_empty());
        assert!(run_search_at(&dataset(), &parse_query(""), today()).is_empty());
    }

    #[test]
    fn test_ranking_by_score_then_date() {
        let results = run_search_at(&dataset(), &parse_query("grafo"), today());
        let ids: Vec<_> = results.iter().map(|r| r.note.id.as_str()).collect();
        assert_eq!(ids, vec!["n_01", "n_02"]);
        assert_eq!(results[0].score, 4 + 1 + 6);
        assert_eq!(results[1].score, 4 + 3);
    }

    #[test]
    fn test_exclusions() {
        let by_tag = run_search_at(&dataset(), &parse_query("grafo -tag:#draft"), today());
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].note.id, "n_01");

        let by_word = run_search_at(&dataset(), &parse_query("grafo -sueltas"), today());
        assert_eq!(by_word.len(), 1);

        let by_phrase = run_search_at(&dataset(), &parse_query("grafo -\"todas las\""), today());
        assert_eq!(by_phrase.len(), 1);
        assert_eq!(by_phrase[0].note.id, "n_02");
    }

    #[test]
    fn test_all_terms_required() {
        assert!(run_search_at(&dataset(), &parse_query("grafo recetas"), today()).is_empty());
        assert_eq!(run_search_at(&dataset(), &parse_query("GRAFO notas"), today()).len(), 2);
    }

    #[test]
    fn test_equal_score_sorted_by_date() {
        let data = vec![
            summary("n_01", "A", &[], "shared", "2020-01-01"),
            summary("n_02", "B", &[], "shared", "2021-01-01"),
        ];
        let results = run_search_at(&data, &parse_query("shared"), today());
        assert_eq!(results[0].note.id, "n_02");
    }

    #[test]
    fn test_recency_score() {
        assert_eq!(recency_score("2024-06-30", today()), 6);
        assert_eq!(recency_score("2024-06-23", today()), 6);
        assert_eq!(recency_score("2024-06-01", today()), 3);
        assert_eq!(recency_score("2024-05-01", today()), 1);
        assert_eq!(recency_score("2099-01-01", today()), 6);
        assert_eq!(recency_score("garbage", today()), 0);
    }

    #[test]
    fn test_snippet_window_and_ellipsis() {
        let text = format!("{} needle {}", "x".repeat(200), "y".repeat(200));
        let note = summary("n_01", "T", &[], &text, "2024-01-01");
        let snippet = build_snippet(&note, &["needle".to_string()]);

        assert!(snippet.starts_with('…'));
        assert!(snippet.ends_with('…'));
        assert!(snippet.contains("<mark>needle</mark>"));
        let bare = snippet.replace("<mark>", "").replace("</mark>", "");
        assert_eq!(bare.chars().count(), 160 + 2);
    }

    #[test]
    fn test_snippet_prefers_longest_match() {
        let note = summary("n_01", "T", &[], "graph theory and graphs", "2024-01-01");
        let snippet = build_snippet(&note, &["graph".to_string(), "graph theory".to_string()]);
        assert_eq!(snippet, "<mark>graph theory</mark> and <mark>graph</mark>s");
    }

    #[test]
    fn test_snippet_keeps_original_case() {
        let note = summary("n_01", "T", &[], "Grafo y GRAFO", "2024-01-01");
        assert_eq!(
            build_snippet(&note, &["grafo".to_string()]),
            "<mark>Grafo</mark> y <mark>GRAFO</mark>"
        );
    }

    #[test]
    fn test_snippet_falls_back_to_title() {
        let mut note = summary("n_01", "Only Title", &[], "", "2024-01-01");
        note.excerpt.clear();
        assert_eq!(build_snippet(&note, &["title".to_string()]), "Only <mark>Title</mark>");
    }
}
