//! Stack service - loads a section, applies one reconciliation operation
//! and persists the resulting changes as a single write batch.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::brand::BrandCandidate;
use crate::catalog::ToolCatalog;
use crate::domain::{Category, Section, SectionType, Stack, Tool};
use crate::error::{Result, StackError};
use crate::id::now_ms;
use crate::selection::{SectionState, resolve_or_create_tool};
use crate::storage::{
    PINNED_TOOLS_COLLECTION, PinnedToolRecord, SECTIONS_COLLECTION, SELECTED_TOOLS_COLLECTION, STACKS_COLLECTION,
    SUBSECTIONS_COLLECTION, SelectedToolRecord, StackStore, Storage, TOOLS_COLLECTION, WriteOp,
};

/// A stack with every section loaded
#[derive(Debug, Clone)]
pub struct StackView {
    pub stack: Stack,
    /// Sections in display order
    pub sections: Vec<SectionState>,
}

impl StackView {
    pub fn section(&self, section_type: SectionType) -> Option<&SectionState> {
        self.sections.iter().find(|s| s.section_type() == section_type)
    }

    /// Number of assignments across all sections
    pub fn tool_count(&self) -> usize {
        self.sections.iter().map(|s| s.assignments().len()).sum()
    }
}

/// Stack curation over a storage backend
pub struct StackService<S: Storage> {
    storage: S,
    catalog: ToolCatalog,
    write_lock: Mutex<()>,
}

impl<S: Storage> StackService<S> {
    pub fn new(storage: S, catalog: ToolCatalog) -> Self {
        Self {
            storage,
            catalog,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    fn store(&self) -> StackStore<'_, S> {
        StackStore::new(&self.storage)
    }

    /// Create a stack with its five default sections
    pub fn create_stack(&self, name: &str, user_id: Option<&str>, project_url: Option<&str>) -> Result<Stack> {
        let mut stack = Stack::new(name);
        if let Some(user_id) = user_id {
            stack = stack.with_user(user_id);
        }
        if let Some(url) = project_url {
            stack = stack.with_project_url(url);
        }

        let mut ops = vec![WriteOp::create(STACKS_COLLECTION, &stack)?];
        for section in stack.default_sections() {
            ops.push(WriteOp::create(SECTIONS_COLLECTION, &section)?);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.storage.apply(&ops)?;
        tracing::info!(stack_id = %stack.id, name = %stack.name, "Created stack");
        Ok(stack)
    }

    pub fn list_stacks(&self) -> Result<Vec<Stack>> {
        self.store().list_stacks()
    }

    fn require_stack(&self, stack_id: &str) -> Result<Stack> {
        self.store()
            .get_stack(stack_id)?
            .ok_or_else(|| StackError::StackNotFound(stack_id.to_string()))
    }

    /// Catalog tool, or a stored custom/brand tool
    fn load_tool(&self, tool_id: &str) -> Result<Tool> {
        if let Some(tool) = self.catalog.get(tool_id) {
            return Ok(tool.clone());
        }
        self.store()
            .get_tool(tool_id)?
            .ok_or_else(|| StackError::ToolNotFound(tool_id.to_string()))
    }

    fn load_section(&self, section: Section) -> Result<SectionState> {
        let store = self.store();
        let subsections = store.subsections_for_section(&section.id)?;

        let assignments = store
            .assignments_for_section(&section.id)?
            .into_iter()
            .map(|record| {
                let tool = self.load_tool(&record.tool_id)?;
                Ok(record.into_assignment(tool))
            })
            .collect::<Result<Vec<_>>>()?;

        let pins = store
            .pins_for_section(&section.id)?
            .into_iter()
            .map(|record| {
                let tool = self.load_tool(&record.tool_id)?;
                Ok(record.into_pin(tool))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SectionState::from_parts(section, subsections, assignments, pins))
    }

    /// Load a stack with all of its sections
    pub fn get_stack(&self, stack_id: &str) -> Result<StackView> {
        let stack = self.require_stack(stack_id)?;
        let sections = self
            .store()
            .sections_for_stack(stack_id)?
            .into_iter()
            .map(|section| self.load_section(section))
            .collect::<Result<Vec<_>>>()?;
        Ok(StackView { stack, sections })
    }

    /// Load one section of a stack
    pub fn section_state(&self, stack_id: &str, section_type: SectionType) -> Result<SectionState> {
        self.require_stack(stack_id)?;
        let section = self
            .store()
            .find_section(stack_id, section_type)?
            .ok_or_else(|| StackError::SectionNotFound(format!("{}/{}", stack_id, section_type)))?;
        self.load_section(section)
    }

    /// Writes that turn `before` into `after`
    fn diff(&self, before: &SectionState, after: &SectionState) -> Result<Vec<WriteOp>> {
        let section_id = after.section().id.as_str();
        let mut ops = Vec::new();

        for subsection in after.subsections() {
            match before.subsection(&subsection.id) {
                None => ops.push(WriteOp::create(SUBSECTIONS_COLLECTION, subsection)?),
                Some(old) if old != subsection => ops.push(WriteOp::update(SUBSECTIONS_COLLECTION, subsection)?),
                Some(_) => {}
            }
        }
        for subsection in before.subsections() {
            if after.subsection(&subsection.id).is_none() {
                ops.push(WriteOp::delete(SUBSECTIONS_COLLECTION, &subsection.id));
            }
        }

        let mut new_tools: Vec<&Tool> = Vec::new();

        let old_assignments: HashMap<&str, _> = before.assignments().iter().map(|a| (a.id.as_str(), a)).collect();
        let new_assignments: HashSet<&str> = after.assignments().iter().map(|a| a.id.as_str()).collect();
        for assignment in after.assignments() {
            let record = SelectedToolRecord::from_assignment(section_id, assignment);
            match old_assignments.get(assignment.id.as_str()) {
                None => {
                    new_tools.push(&assignment.tool);
                    ops.push(WriteOp::create(SELECTED_TOOLS_COLLECTION, &record)?);
                }
                Some(old) if *old != assignment => {
                    new_tools.push(&assignment.tool);
                    ops.push(WriteOp::update(SELECTED_TOOLS_COLLECTION, &record)?);
                }
                Some(_) => {}
            }
        }
        for assignment in before.assignments() {
            if !new_assignments.contains(assignment.id.as_str()) {
                ops.push(WriteOp::delete(SELECTED_TOOLS_COLLECTION, &assignment.id));
            }
        }

        let old_pins: HashMap<&str, _> = before.pins().iter().map(|p| (p.id.as_str(), p)).collect();
        let new_pins: HashSet<&str> = after.pins().iter().map(|p| p.id.as_str()).collect();
        for pin in after.pins() {
            let record = PinnedToolRecord::from_pin(section_id, pin);
            match old_pins.get(pin.id.as_str()) {
                None => {
                    new_tools.push(&pin.tool);
                    ops.push(WriteOp::create(PINNED_TOOLS_COLLECTION, &record)?);
                }
                Some(old) if *old != pin => {
                    new_tools.push(&pin.tool);
                    ops.push(WriteOp::update(PINNED_TOOLS_COLLECTION, &record)?);
                }
                Some(_) => {}
            }
        }
        for pin in before.pins() {
            if !new_pins.contains(pin.id.as_str()) {
                ops.push(WriteOp::delete(PINNED_TOOLS_COLLECTION, &pin.id));
            }
        }

        let mut queued: HashMap<&str, &Tool> = HashMap::new();
        for tool in new_tools {
            if let Some(known) = queued.get(tool.id.as_str()) {
                ensure_same_tool(known, tool)?;
                continue;
            }
            if let Some(known) = self.catalog.get(&tool.id) {
                ensure_same_tool(known, tool)?;
            } else if let Some(stored) = self.store().get_tool(&tool.id)? {
                ensure_same_tool(&stored, tool)?;
            } else {
                ops.push(WriteOp::create(TOOLS_COLLECTION, tool)?);
            }
            queued.insert(tool.id.as_str(), tool);
        }

        Ok(ops)
    }

    /// Load a section, run `op` on a copy and persist the difference.
    ///
    /// Nothing is written when `op` fails or changes nothing.
    fn mutate<T>(
        &self,
        stack_id: &str,
        section_type: SectionType,
        op: impl FnOnce(&mut SectionState) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut stack = self.require_stack(stack_id)?;
        let before = self.section_state(stack_id, section_type)?;
        let mut after = before.clone();
        let output = op(&mut after)?;

        let mut ops = self.diff(&before, &after)?;
        if ops.is_empty() {
            return Ok(output);
        }

        stack.updated_at = now_ms();
        ops.push(WriteOp::update(STACKS_COLLECTION, &stack)?);
        self.storage.apply(&ops)?;
        tracing::info!(stack_id, section = %section_type, writes = ops.len(), "Persisted section changes");
        Ok(output)
    }

    /// Assign a tool; `Ok(false)` if it is already assigned in that scope
    pub fn assign(&self, stack_id: &str, section_type: SectionType, tool: Tool, scope: Option<&str>) -> Result<bool> {
        self.mutate(stack_id, section_type, |state| state.assign(tool, scope))
    }

    pub fn unassign(&self, stack_id: &str, section_type: SectionType, tool: &Tool, scope: Option<&str>) -> Result<bool> {
        self.mutate(stack_id, section_type, |state| state.unassign(tool, scope))
    }

    pub fn replace_assignments(
        &self,
        stack_id: &str,
        section_type: SectionType,
        scope: Option<&str>,
        tools: Vec<Tool>,
    ) -> Result<()> {
        self.mutate(stack_id, section_type, |state| state.replace_assignments(scope, tools))
    }

    /// Create a subsection; `Ok(None)` when the name is blank
    pub fn create_subsection(
        &self,
        stack_id: &str,
        section_type: SectionType,
        name: &str,
        initial_tools: Vec<Tool>,
    ) -> Result<Option<String>> {
        self.mutate(stack_id, section_type, |state| {
            Ok(state.create_subsection(name, initial_tools))
        })
    }

    pub fn rename_subsection(
        &self,
        stack_id: &str,
        section_type: SectionType,
        subsection_id: &str,
        name: &str,
    ) -> Result<bool> {
        self.mutate(stack_id, section_type, |state| state.rename_subsection(subsection_id, name))
    }

    pub fn delete_subsection(&self, stack_id: &str, section_type: SectionType, subsection_id: &str) -> Result<()> {
        self.mutate(stack_id, section_type, |state| state.delete_subsection(subsection_id))
    }

    /// Toggle a pin; returns the new pinned state
    pub fn toggle_pin(&self, stack_id: &str, section_type: SectionType, tool: &Tool, scope: Option<&str>) -> Result<bool> {
        self.mutate(stack_id, section_type, |state| state.toggle_pin(tool, scope))
    }

    /// Resolve free text against the section's catalog subset
    pub fn resolve_tool(
        &self,
        section_type: SectionType,
        query: &str,
        brand_candidate: Option<&BrandCandidate>,
    ) -> Option<Tool> {
        let subset = self.catalog.subset(section_type);
        resolve_or_create_tool(query, &subset, brand_candidate, section_type)
    }

    pub fn tools_by_category(&self, category: Category) -> Vec<Tool> {
        self.catalog.subset(category)
    }
}

/// Records reference tools by id, so an id must never stand for two tools
fn ensure_same_tool(known: &Tool, tool: &Tool) -> Result<()> {
    if known.same_identity(tool) && known.category == tool.category {
        return Ok(());
    }
    Err(StackError::ToolConflict {
        id: tool.id.clone(),
        existing: known.name.clone(),
    })
}
