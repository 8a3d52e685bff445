//! Error types for Stackshare
//!
//! Centralized error handling using thiserror. Validation and duplicate
//! conditions are not errors: the operations report them as no-ops.

use thiserror::Error;

use crate::brand::ResolverError;

/// All error types that can occur in Stackshare
#[derive(Debug, Error)]
pub enum StackError {
    /// Stack not found in storage
    #[error("Stack not found: {0}")]
    StackNotFound(String),

    /// Section not found for a stack
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Subsection not found in its section
    #[error("Subsection not found: {0}")]
    SubsectionNotFound(String),

    /// Tool referenced by a record no longer exists
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Pinning a tool that has no matching assignment
    #[error("Tool is not assigned: {0}")]
    NotAssigned(String),

    /// A tool id is already taken by a tool with a different name or category
    #[error("Tool id {id} already belongs to '{existing}'")]
    ToolConflict { id: String, existing: String },

    /// Catalog loading/parsing error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Brand resolver failure
    #[error("Brand lookup failed: {0}")]
    Resolver(#[from] ResolverError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StackError {
    /// True for referential-integrity failures (something referenced is missing)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StackError::StackNotFound(_)
                | StackError::SectionNotFound(_)
                | StackError::SubsectionNotFound(_)
                | StackError::ToolNotFound(_)
                | StackError::NotAssigned(_)
        )
    }
}

/// Result type alias for Stackshare operations
pub type Result<T> = std::result::Result<T, StackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_not_found_error() {
        let err = StackError::StackNotFound("1738300800123-a1b2".to_string());
        assert_eq!(err.to_string(), "Stack not found: 1738300800123-a1b2");
    }

    #[test]
    fn test_subsection_not_found_error() {
        let err = StackError::SubsectionNotFound("subsection-1".to_string());
        assert_eq!(err.to_string(), "Subsection not found: subsection-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_not_assigned_error() {
        let err = StackError::NotAssigned("react".to_string());
        assert_eq!(err.to_string(), "Tool is not assigned: react");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_error_is_not_integrity() {
        let err = StackError::Storage("file locked".to_string());
        assert_eq!(err.to_string(), "Storage error: file locked");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_resolver_error_conversion() {
        let err: StackError = ResolverError::MissingClientId {
            env_var: "BRANDFETCH_CLIENT_ID".to_string(),
        }
        .into();
        assert!(matches!(err, StackError::Resolver(_)));
        assert!(err.to_string().contains("BRANDFETCH_CLIENT_ID"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StackError = io_err.into();
        assert!(matches!(err, StackError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: StackError = json_err.into();
        assert!(matches!(err, StackError::Json(_)));
    }
}
