//! Free-text search over entry names.

use super::Filter;

/// Whether `name` matches a lowercase `query`, allowing small typos.
pub fn matches_query(name: &str, query: &str, threshold: f64) -> bool {
    if query.is_empty() {
        return true;
    }

    let name = name.to_lowercase();
    name.contains(query) || strsim::jaro_winkler(&name, query) >= threshold
}

/// A filter hiding entries whose name does not match `query`.
pub fn search_filter(query: impl Into<String>, threshold: f64) -> Filter {
    let query = query.into().trim().to_lowercase();
    Filter::new(
        "Search",
        format!("Search: {query}"),
        "Entries whose name matches the search text",
        move |item| !matches_query(item.name(), &query, threshold),
    )
}
