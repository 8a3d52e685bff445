//! Stack-specific collections and query helpers.

use serde::{Deserialize, Serialize};

use super::traits::{Filter, HasId, Storage};
use crate::domain::{Assignment, Pin, Section, SectionType, Stack, Subsection, Tool};
use crate::error::Result;

pub const STACKS_COLLECTION: &str = "stacks";
pub const SECTIONS_COLLECTION: &str = "sections";
pub const SUBSECTIONS_COLLECTION: &str = "subsections";
/// Non-catalog tools (custom and brand-resolved)
pub const TOOLS_COLLECTION: &str = "tools";
pub const SELECTED_TOOLS_COLLECTION: &str = "selected_tools";
pub const PINNED_TOOLS_COLLECTION: &str = "pinned_tools";

/// Persisted form of an [`Assignment`]; the tool is stored by reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedToolRecord {
    pub id: String,
    pub section_id: String,
    pub tool_id: String,
    #[serde(default)]
    pub subsection_id: Option<String>,
}

impl SelectedToolRecord {
    pub fn from_assignment(section_id: &str, assignment: &Assignment) -> Self {
        Self {
            id: assignment.id.clone(),
            section_id: section_id.to_string(),
            tool_id: assignment.tool.id.clone(),
            subsection_id: assignment.subsection_id.clone(),
        }
    }

    pub fn into_assignment(self, tool: Tool) -> Assignment {
        Assignment {
            id: self.id,
            tool,
            subsection_id: self.subsection_id,
        }
    }
}

/// Persisted form of a [`Pin`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedToolRecord {
    pub id: String,
    pub section_id: String,
    pub tool_id: String,
    #[serde(default)]
    pub subsection_id: Option<String>,
}

impl PinnedToolRecord {
    pub fn from_pin(section_id: &str, pin: &Pin) -> Self {
        Self {
            id: pin.id.clone(),
            section_id: section_id.to_string(),
            tool_id: pin.tool.id.clone(),
            subsection_id: pin.subsection_id.clone(),
        }
    }

    pub fn into_pin(self, tool: Tool) -> Pin {
        Pin {
            id: self.id,
            tool,
            subsection_id: self.subsection_id,
        }
    }
}

impl HasId for Stack {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Section {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Subsection {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Tool {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for SelectedToolRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for PinnedToolRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed queries over the stack collections.
pub struct StackStore<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> StackStore<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub fn get_stack(&self, id: &str) -> Result<Option<Stack>> {
        self.storage.get(STACKS_COLLECTION, id)
    }

    /// All stacks, oldest first
    pub fn list_stacks(&self) -> Result<Vec<Stack>> {
        let mut stacks: Vec<Stack> = self.storage.list(STACKS_COLLECTION)?;
        stacks.sort_by_key(|s| s.created_at);
        Ok(stacks)
    }

    /// Sections of a stack in display order
    pub fn sections_for_stack(&self, stack_id: &str) -> Result<Vec<Section>> {
        let mut sections: Vec<Section> = self
            .storage
            .query(SECTIONS_COLLECTION, &[Filter::eq("stack_id", stack_id)])?;
        sections.sort_by_key(|s| s.order);
        Ok(sections)
    }

    pub fn find_section(&self, stack_id: &str, section_type: SectionType) -> Result<Option<Section>> {
        let sections: Vec<Section> = self.storage.query(
            SECTIONS_COLLECTION,
            &[Filter::eq("stack_id", stack_id), Filter::eq("section_type", section_type)],
        )?;
        Ok(sections.into_iter().next())
    }

    pub fn subsections_for_section(&self, section_id: &str) -> Result<Vec<Subsection>> {
        let mut subsections: Vec<Subsection> = self
            .storage
            .query(SUBSECTIONS_COLLECTION, &[Filter::eq("section_id", section_id)])?;
        subsections.sort_by_key(|s| (s.order, s.created_at));
        Ok(subsections)
    }

    pub fn assignments_for_section(&self, section_id: &str) -> Result<Vec<SelectedToolRecord>> {
        self.storage
            .query(SELECTED_TOOLS_COLLECTION, &[Filter::eq("section_id", section_id)])
    }

    pub fn assignments_for_tool(&self, tool_id: &str) -> Result<Vec<SelectedToolRecord>> {
        self.storage
            .query(SELECTED_TOOLS_COLLECTION, &[Filter::eq("tool_id", tool_id)])
    }

    pub fn pins_for_section(&self, section_id: &str) -> Result<Vec<PinnedToolRecord>> {
        self.storage
            .query(PINNED_TOOLS_COLLECTION, &[Filter::eq("section_id", section_id)])
    }

    pub fn pins_for_tool(&self, tool_id: &str) -> Result<Vec<PinnedToolRecord>> {
        self.storage
            .query(PINNED_TOOLS_COLLECTION, &[Filter::eq("tool_id", tool_id)])
    }

    /// A stored (non-catalog) tool
    pub fn get_tool(&self, id: &str) -> Result<Option<Tool>> {
        self.storage.get(TOOLS_COLLECTION, id)
    }

    pub fn list_tools(&self) -> Result<Vec<Tool>> {
        self.storage.list(TOOLS_COLLECTION)
    }
}
