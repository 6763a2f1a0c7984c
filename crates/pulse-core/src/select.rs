// crates/pulse-core/src/select.rs - Snippet selection

use crate::schema::{Catalog, SnippetDefinition};

/// Snippets offered for `file_path`, in catalog order
///
/// Inactive snippets are skipped; snippets without a pattern apply
/// everywhere; the rest apply when their pattern matches the path.
pub fn applicable<'c>(catalog: &'c Catalog, file_path: &str) -> Vec<&'c SnippetDefinition> {
    catalog
        .iter()
        .filter(|snippet| snippet.applies_to(file_path))
        .collect()
}

/// Find a snippet by name, falling back to the best fuzzy match
pub fn find<'c>(snippets: &[&'c SnippetDefinition], query: &str) -> Option<&'c SnippetDefinition> {
    if let Some(exact) = snippets.iter().find(|snippet| snippet.name == query) {
        return Some(*exact);
    }

    fuzzy_find(snippets, query)
}

#[cfg(feature = "search")]
fn fuzzy_find<'c>(snippets: &[&'c SnippetDefinition], query: &str) -> Option<&'c SnippetDefinition> {
    use fuzzy_matcher::FuzzyMatcher;
    use fuzzy_matcher::skim::SkimMatcherV2;

    let matcher = SkimMatcherV2::default();
    let mut best: Option<(i64, &'c SnippetDefinition)> = None;

    // Ties keep the earlier catalog entry
    for snippet in snippets {
        if let Some(score) = matcher.fuzzy_match(&snippet.name, query) {
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, *snippet));
            }
        }
    }

    best.map(|(_, snippet)| snippet)
}

#[cfg(not(feature = "search"))]
fn fuzzy_find<'c>(_snippets: &[&'c SnippetDefinition], _query: &str) -> Option<&'c SnippetDefinition> {
    None
}
