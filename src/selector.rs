//! Tool selector query helpers
//!
//! Pure functions backing a search-as-you-type tool picker: which catalog
//! tools are still available, which match the query, and whether to offer
//! adding the query as a new tool.

use crate::domain::Tool;
use crate::id::normalize_name;

/// Catalog tools not already selected (by normalized name)
pub fn available<'a>(catalog: &'a [Tool], selected: &[Tool]) -> Vec<&'a Tool> {
    catalog
        .iter()
        .filter(|t| !selected.iter().any(|s| s.same_identity(t)))
        .collect()
}

/// Case-insensitive substring filter; an empty query matches everything
pub fn filter<'a>(tools: &[&'a Tool], query: &str) -> Vec<&'a Tool> {
    let needle = query.trim().to_lowercase();
    tools
        .iter()
        .copied()
        .filter(|t| t.name.to_lowercase().contains(&needle))
        .collect()
}

/// Tool whose normalized name equals the query
pub fn exact_match<'a>(tools: &[&'a Tool], query: &str) -> Option<&'a Tool> {
    let wanted = normalize_name(query);
    if wanted.is_empty() {
        return None;
    }
    tools.iter().copied().find(|t| t.identity() == wanted)
}

/// Whether to offer adding the query as a new tool
pub fn suggest_custom(query: &str, candidates: &[&Tool], selected: &[Tool]) -> bool {
    let wanted = normalize_name(query);
    !wanted.is_empty()
        && exact_match(candidates, query).is_none()
        && !selected.iter().any(|t| t.identity() == wanted)
}

/// Snapshot of what a selector shows for a query
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorView<'a> {
    pub matches: Vec<&'a Tool>,
    pub exact: Option<&'a Tool>,
    pub offer_custom: bool,
    /// Every catalog tool is already selected
    pub exhausted: bool,
}

/// Compute the selector view for `query`
pub fn view<'a>(catalog: &'a [Tool], selected: &[Tool], query: &str) -> SelectorView<'a> {
    let remaining = available(catalog, selected);
    let matches = filter(&remaining, query);
    let exact = exact_match(&matches, query);
    let offer_custom = suggest_custom(query, &matches, selected);

    SelectorView {
        exhausted: remaining.is_empty(),
        matches,
        exact,
        offer_custom,
    }
}
