//! Brand lookup - resolving free-text tool names to brand records
//!
//! This module provides:
//! - BrandCandidate / ResolverError types
//! - BrandResolver trait with the Brandfetch client and a mock
//! - Icon URL construction and monogram fallback
//! - Debounced lookups that discard stale responses

pub mod client;
pub mod debounce;
pub mod icon;
pub mod types;

pub use client::{
    BrandResolver, BrandfetchClient, BrandfetchConfig, DEFAULT_BASE_URL, DEFAULT_CLIENT_ID_ENV, MockBrandResolver,
};
pub use debounce::{DebounceConfig, DebouncedLookup, LatestRequest, LookupOutcome};
pub use icon::{DEFAULT_CDN_URL, IconSource, icon_for, icon_url, monogram};
pub use types::{BrandCandidate, ResolverError, parse_candidates};
