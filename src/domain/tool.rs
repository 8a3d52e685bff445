//! Tool definitions and category classification
//!
//! A tool is either curated catalog data, a free-text entry typed by the
//! user, or a record synthesized from a brand lookup. All three share the
//! same display projection (name, domain, icon).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::brand::BrandCandidate;
use crate::id::{brand_tool_id, custom_tool_id, normalize_name};

/// Category of a tool, which is also the identifier of the section it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Ide,
    Ai,
    Other,
}

/// Sections are keyed by the same closed set as tool categories
pub type SectionType = Category;

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 5] = [
        Category::Frontend,
        Category::Backend,
        Category::Ide,
        Category::Ai,
        Category::Other,
    ];

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "frontend" => Some(Self::Frontend),
            "backend" => Some(Self::Backend),
            "ide" => Some(Self::Ide),
            "ai" => Some(Self::Ai),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Ide => "ide",
            Self::Ai => "ai",
            Self::Other => "other",
        }
    }

    /// Human-readable section name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Frontend => "Frontend",
            Self::Backend => "Backend",
            Self::Ide => "IDE",
            Self::Ai => "AI",
            Self::Other => "Other",
        }
    }

    /// Position of the section within a stack
    pub fn order(&self) -> u32 {
        match self {
            Self::Frontend => 0,
            Self::Backend => 1,
            Self::Ide => 2,
            Self::Ai => 3,
            Self::Other => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a tool came from; drives its id scheme
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolSource {
    /// Curated entry from the catalog
    #[default]
    Catalog,
    /// Free-text entry, id derived from the normalized name
    Custom,
    /// Synthesized from a brand lookup candidate
    BrandResolved { brand_id: String, claimed: bool },
}

/// A tool that can be assigned to a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    /// Domain used for icon lookup; empty when unknown
    #[serde(default)]
    pub url: String,
    pub category: Category,
    #[serde(default)]
    pub source: ToolSource,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Tool {
    /// Create a catalog tool
    pub fn catalog(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            category,
            source: ToolSource::Catalog,
            icon: None,
            description: None,
        }
    }

    /// Create a free-text tool with a deterministic id and no domain
    pub fn custom(name: &str, category: Category) -> Self {
        Self {
            id: custom_tool_id(category.as_str(), name),
            name: name.trim().to_string(),
            url: String::new(),
            category,
            source: ToolSource::Custom,
            icon: None,
            description: None,
        }
    }

    /// Create a tool from a brand lookup candidate
    ///
    /// Candidates without a usable name fall back to `fallback_name`.
    pub fn from_brand(candidate: &BrandCandidate, fallback_name: &str, category: Category) -> Self {
        let name = candidate
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| fallback_name.trim());

        Self {
            id: brand_tool_id(category.as_str(), &candidate.brand_id),
            name: name.to_string(),
            url: candidate.domain.clone(),
            category,
            source: ToolSource::BrandResolved {
                brand_id: candidate.brand_id.clone(),
                claimed: candidate.claimed,
            },
            icon: candidate.icon.clone(),
            description: None,
        }
    }

    /// Set a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Identity used for duplicate suppression
    pub fn identity(&self) -> String {
        normalize_name(&self.name)
    }

    /// Same tool as far as duplicate suppression is concerned
    pub fn same_identity(&self, other: &Tool) -> bool {
        self.identity() == other.identity()
    }

    /// Domain for icon lookup, if any
    pub fn domain(&self) -> Option<&str> {
        let url = self.url.trim();
        if url.is_empty() { None } else { Some(url) }
    }

    /// Single-character fallback when no icon can be rendered
    pub fn monogram(&self) -> String {
        crate::brand::monogram(&self.name)
    }

    pub fn is_catalog(&self) -> bool {
        matches!(self.source, ToolSource::Catalog)
    }
}
