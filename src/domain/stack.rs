//! Stack, section and subsection records
//!
//! A Stack owns exactly one Section per category. Sections own their
//! subsections, assignments and pins; nothing is shared across sections.

use serde::{Deserialize, Serialize};

use super::tool::{SectionType, Tool};
use crate::id::{generate_record_id, generate_subsection_id, now_ms};

/// A user's tech stack profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub project_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Stack {
    pub fn new(name: &str) -> Self {
        let now = now_ms();
        Self {
            id: generate_record_id(),
            name: name.trim().to_string(),
            user_id: None,
            project_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_project_url(mut self, url: impl Into<String>) -> Self {
        self.project_url = Some(url.into());
        self
    }

    /// The five fixed sections every stack starts with, in display order
    pub fn default_sections(&self) -> Vec<Section> {
        SectionType::ALL
            .iter()
            .map(|section_type| Section::new(&self.id, *section_type))
            .collect()
    }
}

/// One of the fixed top-level groupings of a stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub stack_id: String,
    pub section_type: SectionType,
    pub name: String,
    pub order: u32,
}

impl Section {
    pub fn new(stack_id: &str, section_type: SectionType) -> Self {
        Self {
            id: generate_record_id(),
            stack_id: stack_id.to_string(),
            section_type,
            name: section_type.display_name().to_string(),
            order: section_type.order(),
        }
    }
}

/// User-created grouping within a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub id: String,
    pub section_id: String,
    pub name: String,
    pub order: u32,
    pub created_at: i64,
}

impl Subsection {
    /// Create a subsection with a freshly generated id
    pub fn new(section_id: &str, name: &str, order: u32) -> Self {
        Self {
            id: generate_subsection_id(),
            section_id: section_id.to_string(),
            name: name.trim().to_string(),
            order,
            created_at: now_ms(),
        }
    }
}

/// A tool selected into a section, either in the general bucket
/// (`subsection_id == None`) or in one subsection
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: String,
    pub tool: Tool,
    pub subsection_id: Option<String>,
}

impl Assignment {
    pub fn new(tool: Tool, subsection_id: Option<&str>) -> Self {
        Self {
            id: generate_record_id(),
            tool,
            subsection_id: subsection_id.map(str::to_string),
        }
    }

    /// True when this assignment has the given (identity, scope) key
    pub fn matches(&self, identity: &str, scope: Option<&str>) -> bool {
        self.subsection_id.as_deref() == scope && self.tool.identity() == identity
    }

    pub fn in_scope(&self, scope: Option<&str>) -> bool {
        self.subsection_id.as_deref() == scope
    }
}

/// A selected tool elevated to the highlighted subset of its section
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub id: String,
    pub tool: Tool,
    pub subsection_id: Option<String>,
}

impl Pin {
    pub fn new(tool: Tool, subsection_id: Option<&str>) -> Self {
        Self {
            id: generate_record_id(),
            tool,
            subsection_id: subsection_id.map(str::to_string),
        }
    }

    pub fn matches(&self, identity: &str, scope: Option<&str>) -> bool {
        self.subsection_id.as_deref() == scope && self.tool.identity() == identity
    }

    pub fn in_scope(&self, scope: Option<&str>) -> bool {
        self.subsection_id.as_deref() == scope
    }
}
