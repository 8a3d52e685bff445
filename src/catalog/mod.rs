//! Tool catalog: the curated list of known tools per category
//!
//! Ships with a built-in catalog and can be replaced by a TOML file.
//! Read-only from the perspective of the reconciliation logic.

mod builtin;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{Category, Tool};
use crate::error::{Result, StackError};
use crate::id::normalize_name;

pub use builtin::builtin_tools;

/// TOML representation of a catalog entry
#[derive(Debug, Deserialize)]
struct TomlTool {
    id: String,
    name: String,
    #[serde(default)]
    url: String,
    category: String,
    description: Option<String>,
}

/// TOML file structure
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(rename = "tool", default)]
    tools: Vec<TomlTool>,
}

/// Catalog of known tools, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self {
            tools: builtin_tools(),
        }
    }

    /// Load catalog from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StackError::Catalog(format!("Failed to read catalog file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Load catalog from TOML string
    ///
    /// Rejects blank names, unknown categories, duplicate ids, and two
    /// entries with the same normalized name in one category.
    pub fn from_toml(content: &str) -> Result<Self> {
        let parsed: TomlCatalog =
            toml::from_str(content).map_err(|e| StackError::Catalog(format!("Failed to parse TOML: {}", e)))?;

        let mut catalog = Self::new();
        for entry in parsed.tools {
            let tool = Self::convert_toml_tool(entry)?;
            catalog.add(tool)?;
        }

        Ok(catalog)
    }

    fn convert_toml_tool(entry: TomlTool) -> Result<Tool> {
        if entry.name.trim().is_empty() {
            return Err(StackError::Catalog(format!("Tool '{}' has an empty name", entry.id)));
        }

        let category = Category::parse(&entry.category).ok_or_else(|| {
            StackError::Catalog(format!(
                "Invalid category '{}' for tool '{}'",
                entry.category, entry.id
            ))
        })?;

        let mut tool = Tool::catalog(entry.id, entry.name.trim(), entry.url.trim(), category);
        if let Some(description) = entry.description {
            tool = tool.with_description(description);
        }
        Ok(tool)
    }

    /// Add a tool, enforcing id and per-category name uniqueness
    pub fn add(&mut self, tool: Tool) -> Result<()> {
        if self.get(&tool.id).is_some() {
            return Err(StackError::Catalog(format!("Duplicate tool id: {}", tool.id)));
        }
        if self.find_in_category(tool.category, &tool.name).is_some() {
            return Err(StackError::Catalog(format!(
                "Duplicate tool name '{}' in {}",
                tool.name, tool.category
            )));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by id
    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// Tools valid for a section
    pub fn by_category(&self, category: Category) -> Vec<&Tool> {
        self.tools.iter().filter(|t| t.category == category).collect()
    }

    /// Owned subset for a section, used as the input of tool resolution
    pub fn subset(&self, category: Category) -> Vec<Tool> {
        self.by_category(category).into_iter().cloned().collect()
    }

    /// Exact normalized-name match anywhere in the catalog
    pub fn find_by_name(&self, name: &str) -> Option<&Tool> {
        let wanted = normalize_name(name);
        self.tools.iter().find(|t| t.identity() == wanted)
    }

    /// Exact normalized-name match within one category
    pub fn find_in_category(&self, category: Category, name: &str) -> Option<&Tool> {
        let wanted = normalize_name(name);
        self.tools
            .iter()
            .find(|t| t.category == category && t.identity() == wanted)
    }

    /// List all tool ids
    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.id.as_str()).collect()
    }

    /// Get all tools
    pub fn all(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Categories that have at least one tool
    pub fn categories(&self) -> Vec<Category> {
        let present: HashSet<Category> = self.tools.iter().map(|t| t.category).collect();
        Category::ALL.into_iter().filter(|c| present.contains(c)).collect()
    }

    /// Get number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[[tool]]
id = "react"
name = "React"
url = "react.dev"
category = "frontend"
description = "UI library"

[[tool]]
id = "axum"
name = "Axum"
url = "docs.rs/axum"
category = "backend"

[[tool]]
id = "helix"
name = "Helix"
category = "ide"
"#;

    #[test]
    fn test_catalog_new_empty() {
        let catalog = ToolCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(catalog.len(), 70);
        assert_eq!(catalog.by_category(Category::Frontend).len(), 12);
        assert_eq!(catalog.by_category(Category::Backend).len(), 18);
        assert_eq!(catalog.by_category(Category::Ide).len(), 12);
        assert_eq!(catalog.by_category(Category::Ai).len(), 12);
        assert_eq!(catalog.by_category(Category::Other).len(), 16);
        assert_eq!(catalog.categories(), Category::ALL.to_vec());
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        // Re-adding every builtin tool must pass the uniqueness checks
        let mut catalog = ToolCatalog::new();
        for tool in builtin_tools() {
            catalog.add(tool).unwrap();
        }
        assert_eq!(catalog.len(), 70);
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ToolCatalog::from_toml(SAMPLE_TOML).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.list(), vec!["react", "axum", "helix"]);

        let react = catalog.get("react").unwrap();
        assert_eq!(react.category, Category::Frontend);
        assert_eq!(react.description.as_deref(), Some("UI library"));

        let helix = catalog.get("helix").unwrap();
        assert_eq!(helix.domain(), None);
    }

    #[test]
    fn test_catalog_invalid_toml() {
        assert!(ToolCatalog::from_toml("invalid { toml }").is_err());
    }

    #[test]
    fn test_catalog_invalid_category() {
        let toml = r#"
[[tool]]
id = "x"
name = "X"
category = "database"
"#;
        let err = ToolCatalog::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
    }

    #[test]
    fn test_catalog_duplicate_name_in_category() {
        let toml = r#"
[[tool]]
id = "react"
name = "React"
category = "frontend"

[[tool]]
id = "react-2"
name = " react "
category = "frontend"
"#;
        assert!(ToolCatalog::from_toml(toml).is_err());
    }

    #[test]
    fn test_catalog_same_name_other_category_allowed() {
        let toml = r#"
[[tool]]
id = "go-backend"
name = "Go"
category = "backend"

[[tool]]
id = "go-other"
name = "Go"
category = "other"
"#;
        assert_eq!(ToolCatalog::from_toml(toml).unwrap().len(), 2);
    }

    #[test]
    fn test_catalog_blank_name_rejected() {
        let toml = r#"
[[tool]]
id = "blank"
name = "   "
category = "other"
"#;
        assert!(ToolCatalog::from_toml(toml).is_err());
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(catalog.find_by_name("  supabase ").unwrap().id, "supabase");
        assert_eq!(catalog.find_by_name("NEXT.JS").unwrap().id, "nextjs");
        assert!(catalog.find_by_name("supa").is_none());
    }

    #[test]
    fn test_find_in_category() {
        let catalog = ToolCatalog::builtin();
        assert!(catalog.find_in_category(Category::Other, "Docker").is_some());
        assert!(catalog.find_in_category(Category::Frontend, "Docker").is_none());
    }

    #[test]
    fn test_subset_is_owned_copy() {
        let catalog = ToolCatalog::builtin();
        let subset = catalog.subset(Category::Ai);
        assert_eq!(subset.len(), 12);
        assert!(subset.iter().all(|t| t.category == Category::Ai));
    }
}
