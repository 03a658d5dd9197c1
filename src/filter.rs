use std::collections::HashSet;

use crate::models::Snippet;

/// The filter criteria held by the presentation layer and handed in together
/// with the collection. Defaults to "no restriction" on every axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring matched against title and description.
    pub search_query: String,
    /// Exact folder name; `None` means no folder restriction.
    pub selected_folder: Option<String>,
    /// Exact tag; `None` means no tag restriction.
    pub selected_tag: Option<String>,
    /// Language multi-select; empty means no language restriction, several
    /// selected languages match with OR semantics.
    pub selected_languages: Vec<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self == &FilterState::default()
    }
}

/// Derives the visible subset: the subsequence of `snippets` satisfying all
/// active predicates, original order preserved. Pure and deterministic;
/// calling it twice with the same inputs yields the same output.
pub fn filter_snippets<'a>(snippets: &'a [Snippet], filters: &FilterState) -> Vec<&'a Snippet> {
    let query = filters.search_query.to_lowercase();

    snippets
        .iter()
        .filter(|s| {
            let matches_search = s.title.to_lowercase().contains(&query)
                || s.description.to_lowercase().contains(&query);
            let matches_folder = filters
                .selected_folder
                .as_ref()
                .is_none_or(|folder| &s.folder == folder);
            let matches_tag = filters
                .selected_tag
                .as_ref()
                .is_none_or(|tag| s.tags.contains(tag));
            let matches_language = filters.selected_languages.is_empty()
                || filters.selected_languages.contains(&s.language);

            matches_search && matches_folder && matches_tag && matches_language
        })
        .collect()
}

/// Every distinct tag across the full collection, in first-seen order.
/// Independent of any filter state so tag-browsing always shows the whole
/// vocabulary.
pub fn all_tags(snippets: &[Snippet]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for snippet in snippets {
        for tag in &snippet.tags {
            if seen.insert(tag.clone()) {
                tags.push(tag.clone());
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snip(title: &str, description: &str, language: &str, folder: &str, tags: &[&str]) -> Snippet {
        Snippet {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: description.to_string(),
            code: String::new(),
            language: language.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            folder: folder.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn sample() -> Vec<Snippet> {
        vec![
            snip("Foo", "first sample", "python", "Work", &["x"]),
            snip("Bar", "second sample", "javascript", "Personal", &["y"]),
        ]
    }

    fn titles<'a>(filtered: &[&'a Snippet]) -> Vec<&'a str> {
        filtered.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let snippets = sample();
        let filtered = filter_snippets(&snippets, &FilterState::default());
        assert_eq!(titles(&filtered), vec!["Foo", "Bar"]);
    }

    #[test]
    fn folder_restriction_is_exact_equality() {
        let snippets = sample();
        let filters = FilterState {
            selected_folder: Some("Work".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&filter_snippets(&snippets, &filters)), vec!["Foo"]);
    }

    #[test]
    fn multiple_selected_languages_match_with_or_semantics() {
        let snippets = sample();
        let filters = FilterState {
            selected_languages: vec!["python".to_string(), "javascript".to_string()],
            ..Default::default()
        };
        assert_eq!(
            titles(&filter_snippets(&snippets, &filters)),
            vec!["Foo", "Bar"]
        );

        let filters = FilterState {
            selected_languages: vec!["python".to_string()],
            ..Default::default()
        };
        assert_eq!(titles(&filter_snippets(&snippets, &filters)), vec!["Foo"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let snippets = sample();

        let filters = FilterState {
            search_query: "FOO".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&filter_snippets(&snippets, &filters)), vec!["Foo"]);

        let filters = FilterState {
            search_query: "SECOND".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&filter_snippets(&snippets, &filters)), vec!["Bar"]);
    }

    #[test]
    fn search_never_looks_at_code_tags_or_language() {
        let mut snippets = sample();
        snippets[0].code = "needle".to_string();

        for query in ["needle", "x", "python"] {
            let filters = FilterState {
                search_query: query.to_string(),
                ..Default::default()
            };
            assert!(
                filter_snippets(&snippets, &filters).is_empty(),
                "query '{}' must not match outside title/description",
                query
            );
        }
    }

    #[test]
    fn predicates_combine_with_and() {
        let snippets = vec![
            snip("A", "", "python", "Work", &["x"]),
            snip("B", "", "python", "Work", &["y"]),
            snip("AB", "", "python", "Personal", &["x"]),
        ];
        let filters = FilterState {
            search_query: "a".to_string(),
            selected_folder: Some("Work".to_string()),
            selected_tag: Some("x".to_string()),
            selected_languages: vec!["python".to_string()],
        };
        assert_eq!(titles(&filter_snippets(&snippets, &filters)), vec!["A"]);
    }

    #[test]
    fn output_is_an_ordered_subsequence() {
        let snippets = vec![
            snip("One", "", "go", "Work", &[]),
            snip("Two", "", "rust", "Work", &[]),
            snip("Three", "", "go", "Work", &[]),
        ];
        let filters = FilterState {
            selected_languages: vec!["go".to_string()],
            ..Default::default()
        };
        assert_eq!(
            titles(&filter_snippets(&snippets, &filters)),
            vec!["One", "Three"]
        );
    }

    #[test]
    fn derivation_is_idempotent() {
        let snippets = sample();
        let filters = FilterState {
            search_query: "sample".to_string(),
            ..Default::default()
        };
        let first = filter_snippets(&snippets, &filters);
        let second = filter_snippets(&snippets, &filters);
        assert_eq!(titles(&first), titles(&second));
    }

    #[test]
    fn all_tags_covers_the_full_collection_in_first_seen_order() {
        let snippets = vec![
            snip("A", "", "go", "Work", &["shared", "alpha"]),
            snip("B", "", "rust", "Personal", &["beta", "shared"]),
        ];
        assert_eq!(all_tags(&snippets), vec!["shared", "alpha", "beta"]);
    }

    #[test]
    fn all_tags_does_not_shrink_when_filters_narrow_the_view() {
        let snippets = vec![
            snip("A", "", "go", "Work", &["alpha"]),
            snip("B", "", "rust", "Personal", &["beta"]),
        ];
        let filters = FilterState {
            selected_folder: Some("Work".to_string()),
            ..Default::default()
        };

        let filtered = filter_snippets(&snippets, &filters);
        assert_eq!(filtered.len(), 1);
        // The vocabulary is derived from the unfiltered collection.
        assert_eq!(all_tags(&snippets), vec!["alpha", "beta"]);
    }
}
