//! Per-section selection state and the operations that reconcile it
//!
//! Invariants held by every operation:
//! - no two assignments share (normalized tool name, scope)
//! - every pin has an assignment with the same key
//! - every scoped assignment or pin refers to an existing subsection
//!
//! Operations validate before mutating, so a failed call leaves the state
//! exactly as it was.

use crate::domain::{Assignment, Pin, Section, SectionType, Subsection, Tool};
use crate::error::{Result, StackError};

/// Selected tools, pins and subsections of one section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionState {
    section: Section,
    subsections: Vec<Subsection>,
    assignments: Vec<Assignment>,
    pins: Vec<Pin>,
}

impl SectionState {
    /// Empty state for a section
    pub fn new(section: Section) -> Self {
        Self {
            section,
            subsections: Vec::new(),
            assignments: Vec::new(),
            pins: Vec::new(),
        }
    }

    /// Rebuild state from persisted parts
    pub fn from_parts(
        section: Section,
        mut subsections: Vec<Subsection>,
        assignments: Vec<Assignment>,
        pins: Vec<Pin>,
    ) -> Self {
        subsections.sort_by_key(|s| (s.order, s.created_at));
        Self {
            section,
            subsections,
            assignments,
            pins,
        }
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn section_type(&self) -> SectionType {
        self.section.section_type
    }

    pub fn subsections(&self) -> &[Subsection] {
        &self.subsections
    }

    pub fn subsection(&self, id: &str) -> Option<&Subsection> {
        self.subsections.iter().find(|s| s.id == id)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Assignments in one bucket (`None` is the section-general bucket)
    pub fn assignments_in(&self, scope: Option<&str>) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.in_scope(scope)).collect()
    }

    /// Tools in one bucket, in assignment order
    pub fn tools_in(&self, scope: Option<&str>) -> Vec<&Tool> {
        self.assignments_in(scope).into_iter().map(|a| &a.tool).collect()
    }

    /// Tools in the section-general bucket
    pub fn general_tools(&self) -> Vec<&Tool> {
        self.tools_in(None)
    }

    pub fn pins_in(&self, scope: Option<&str>) -> Vec<&Pin> {
        self.pins.iter().filter(|p| p.in_scope(scope)).collect()
    }

    pub fn is_assigned(&self, tool: &Tool, scope: Option<&str>) -> bool {
        let identity = tool.identity();
        self.assignments.iter().any(|a| a.matches(&identity, scope))
    }

    pub fn is_pinned(&self, tool: &Tool, scope: Option<&str>) -> bool {
        let identity = tool.identity();
        self.pins.iter().any(|p| p.matches(&identity, scope))
    }

    fn ensure_scope(&self, scope: Option<&str>) -> Result<()> {
        match scope {
            Some(id) if self.subsection(id).is_none() => Err(StackError::SubsectionNotFound(id.to_string())),
            _ => Ok(()),
        }
    }

    /// Insert without scope validation; returns false for blank or duplicate names
    fn insert(&mut self, tool: Tool, scope: Option<&str>) -> bool {
        let identity = tool.identity();
        if identity.is_empty() {
            return false;
        }
        if self.assignments.iter().any(|a| a.matches(&identity, scope)) {
            tracing::debug!(
                section = %self.section.section_type,
                tool = %tool.name,
                scope = ?scope,
                "Tool already assigned in scope, skipping"
            );
            return false;
        }
        self.assignments.push(Assignment::new(tool, scope));
        true
    }

    /// Assign a tool to the general bucket or a subsection.
    ///
    /// Returns `Ok(false)` when a tool with the same normalized name is
    /// already assigned in that scope.
    pub fn assign(&mut self, tool: Tool, scope: Option<&str>) -> Result<bool> {
        self.ensure_scope(scope)?;
        Ok(self.insert(tool, scope))
    }

    /// Remove an assignment and any pin with the same key.
    ///
    /// Returns whether an assignment was removed; removing something that
    /// is not there is a no-op.
    pub fn unassign(&mut self, tool: &Tool, scope: Option<&str>) -> Result<bool> {
        self.ensure_scope(scope)?;
        let identity = tool.identity();

        let before = self.assignments.len();
        self.assignments.retain(|a| !a.matches(&identity, scope));
        self.pins.retain(|p| !p.matches(&identity, scope));

        Ok(self.assignments.len() != before)
    }

    /// Replace every assignment in one bucket with `tools`.
    ///
    /// Assignments that survive keep their ids; other buckets are untouched.
    /// Pins in the bucket whose tool is no longer assigned are dropped.
    pub fn replace_assignments(&mut self, scope: Option<&str>, tools: Vec<Tool>) -> Result<()> {
        self.ensure_scope(scope)?;

        let (mut previous, others): (Vec<Assignment>, Vec<Assignment>) = std::mem::take(&mut self.assignments)
            .into_iter()
            .partition(|a| a.in_scope(scope));
        self.assignments = others;

        for tool in tools {
            let identity = tool.identity();
            match previous.iter().position(|a| a.tool.identity() == identity) {
                Some(pos) => {
                    let kept = previous.remove(pos);
                    self.assignments.push(kept);
                }
                None => {
                    self.insert(tool, scope);
                }
            }
        }

        let assignments = &self.assignments;
        self.pins.retain(|p| {
            !p.in_scope(scope) || assignments.iter().any(|a| a.matches(&p.tool.identity(), scope))
        });

        tracing::debug!(
            section = %self.section.section_type,
            scope = ?scope,
            removed = previous.len(),
            total = self.assignments_in(scope).len(),
            "Replaced assignments"
        );
        Ok(())
    }

    /// Create a subsection and assign `initial_tools` to it.
    ///
    /// Returns `None` without changing anything when the trimmed name is empty.
    pub fn create_subsection(&mut self, name: &str, initial_tools: Vec<Tool>) -> Option<String> {
        if name.trim().is_empty() {
            return None;
        }

        let order = self.subsections.iter().map(|s| s.order + 1).max().unwrap_or(0);
        let subsection = Subsection::new(&self.section.id, name, order);
        let id = subsection.id.clone();
        self.subsections.push(subsection);

        for tool in initial_tools {
            self.insert(tool, Some(&id));
        }

        tracing::info!(
            section = %self.section.section_type,
            subsection_id = %id,
            tools = self.assignments_in(Some(&id)).len(),
            "Created subsection"
        );
        Some(id)
    }

    /// Rename a subsection; a blank name is a no-op
    pub fn rename_subsection(&mut self, id: &str, name: &str) -> Result<bool> {
        let subsection = self
            .subsections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StackError::SubsectionNotFound(id.to_string()))?;

        let name = name.trim();
        if name.is_empty() || subsection.name == name {
            return Ok(false);
        }
        subsection.name = name.to_string();
        Ok(true)
    }

    /// Delete a subsection with every assignment and pin scoped to it
    pub fn delete_subsection(&mut self, id: &str) -> Result<()> {
        let pos = self
            .subsections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StackError::SubsectionNotFound(id.to_string()))?;
        self.subsections.remove(pos);

        let scope = Some(id);
        let before_assignments = self.assignments.len();
        let before_pins = self.pins.len();
        self.assignments.retain(|a| !a.in_scope(scope));
        self.pins.retain(|p| !p.in_scope(scope));

        tracing::info!(
            section = %self.section.section_type,
            subsection_id = %id,
            assignments_removed = before_assignments - self.assignments.len(),
            pins_removed = before_pins - self.pins.len(),
            "Deleted subsection"
        );
        Ok(())
    }

    /// Toggle the pin for (tool, scope); returns the new pinned state.
    ///
    /// Pins require a matching assignment: pinning an unassigned tool fails
    /// with `NotAssigned`, unpinning always succeeds.
    pub fn toggle_pin(&mut self, tool: &Tool, scope: Option<&str>) -> Result<bool> {
        self.ensure_scope(scope)?;
        let identity = tool.identity();

        if let Some(pos) = self.pins.iter().position(|p| p.matches(&identity, scope)) {
            self.pins.remove(pos);
            return Ok(false);
        }

        let assigned = self
            .assignments
            .iter()
            .find(|a| a.matches(&identity, scope))
            .ok_or_else(|| StackError::NotAssigned(tool.name.clone()))?;

        self.pins.push(Pin::new(assigned.tool.clone(), scope));
        Ok(true)
    }
}
