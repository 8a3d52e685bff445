//! Turning free text into a tool

use crate::brand::BrandCandidate;
use crate::domain::{Category, Tool};
use crate::id::normalize_name;

/// Resolve `query` against a section's catalog subset.
///
/// Precedence: exact normalized catalog match, then the brand candidate,
/// then a custom tool with a deterministic id and no domain. Blank queries
/// resolve to nothing.
pub fn resolve_or_create_tool(
    query: &str,
    catalog: &[Tool],
    brand_candidate: Option<&BrandCandidate>,
    category: Category,
) -> Option<Tool> {
    let wanted = normalize_name(query);
    if wanted.is_empty() {
        return None;
    }

    if let Some(tool) = catalog.iter().find(|t| t.identity() == wanted) {
        return Some(tool.clone());
    }

    match brand_candidate {
        Some(candidate) => Some(Tool::from_brand(candidate, query, category)),
        None => Some(Tool::custom(query, category)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;
    use crate::domain::ToolSource;

    fn supabase_candidate() -> BrandCandidate {
        BrandCandidate {
            name: Some("Supabase".to_string()),
            domain: "supabase.io".to_string(),
            icon: None,
            claimed: true,
            brand_id: "idsb".to_string(),
        }
    }

    #[test]
    fn test_catalog_match_wins_over_brand() {
        let catalog = ToolCatalog::builtin().subset(Category::Other);
        let candidate = supabase_candidate();

        let tool = resolve_or_create_tool("Supabase", &catalog, Some(&candidate), Category::Other).unwrap();
        assert_eq!(tool.id, "supabase");
        assert_eq!(tool.url, "supabase.com");
        assert!(tool.is_catalog());
    }

    #[test]
    fn test_catalog_match_is_case_insensitive() {
        let catalog = ToolCatalog::builtin().subset(Category::Other);
        let tool = resolve_or_create_tool("  sUpAbAsE ", &catalog, None, Category::Other).unwrap();
        assert_eq!(tool.id, "supabase");
    }

    #[test]
    fn test_brand_candidate_used_without_catalog_match() {
        let candidate = supabase_candidate();
        let tool = resolve_or_create_tool("Supabase", &[], Some(&candidate), Category::Other).unwrap();
        assert_eq!(tool.id, "brand-other-idsb");
        assert!(matches!(tool.source, ToolSource::BrandResolved { .. }));
    }

    #[test]
    fn test_custom_tool_fallback() {
        let catalog = ToolCatalog::builtin().subset(Category::Backend);
        let first = resolve_or_create_tool("My Service", &catalog, None, Category::Backend).unwrap();
        let second = resolve_or_create_tool("  my SERVICE ", &catalog, None, Category::Backend).unwrap();
        let spaced = resolve_or_create_tool("my  service", &catalog, None, Category::Backend).unwrap();

        assert_eq!(first.id, "custom-backend-my-service");
        assert_eq!(first.id, second.id);
        assert_ne!(first.id, spaced.id);
        assert_eq!(first.url, "");
        assert_eq!(first.monogram(), "M");
    }

    #[test]
    fn test_blank_query_resolves_to_nothing() {
        let catalog = ToolCatalog::builtin().subset(Category::Backend);
        assert!(resolve_or_create_tool("   ", &catalog, None, Category::Backend).is_none());
    }

    #[test]
    fn test_partial_name_is_not_a_catalog_match() {
        let catalog = ToolCatalog::builtin().subset(Category::Frontend);
        let tool = resolve_or_create_tool("Reac", &catalog, None, Category::Frontend).unwrap();
        assert_eq!(tool.source, ToolSource::Custom);
    }
}
