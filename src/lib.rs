//! Stackshare - curate a project's tech stack
//!
//! A stack is five fixed sections (Frontend, Backend, IDE, AI, Other). Each
//! section holds selected tools, optional user-named subsections and a
//! pinned subset. Tools come from a built-in catalog, from a brand lookup,
//! or from free text.

pub mod brand;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod id;
pub mod selection;
pub mod selector;
pub mod service;
pub mod storage;

pub use error::{Result, StackError};
pub use service::{StackService, StackView};
