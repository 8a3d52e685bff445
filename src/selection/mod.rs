//! Selection reconciliation
//!
//! Keeps a section's assignments, pins and subsections consistent as the
//! user adds, removes and reorganizes tools. All mutation goes through
//! `SectionState`; persistence is handled by the caller.

mod resolve;
mod state;

pub use resolve::resolve_or_create_tool;
pub use state::SectionState;
