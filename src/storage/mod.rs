//! Storage layer for Stackshare - JSONL persistence with atomic write batches.
//!
//! Collections: stacks, sections, subsections, tools, selected_tools and
//! pinned_tools. Selected and pinned tools are indexed by `section_id` and
//! `tool_id` through equality filters.

mod jsonl;
mod stacks;
mod traits;

pub use jsonl::JsonlStorage;
pub use stacks::{
    PINNED_TOOLS_COLLECTION, PinnedToolRecord, SECTIONS_COLLECTION, SELECTED_TOOLS_COLLECTION, STACKS_COLLECTION,
    SUBSECTIONS_COLLECTION, SelectedToolRecord, StackStore, TOOLS_COLLECTION,
};
pub use traits::{Filter, FilterOp, HasId, Storage, WriteOp};
