//! Domain types for Stackshare
//!
//! This module contains all core domain types:
//! - Tool: catalog, custom or brand-resolved tool with a shared display projection
//! - Category / SectionType: the closed set of top-level groupings
//! - Stack, Section, Subsection: the profile and its groupings
//! - Assignment, Pin: selections and highlights scoped to a section bucket or subsection

pub mod stack;
pub mod tool;

pub use stack::{Assignment, Pin, Section, Stack, Subsection};
pub use tool::{Category, SectionType, Tool, ToolSource};
