//! Brand lookup result and error types

use serde::{Deserialize, Serialize};

/// One candidate returned by a brand search, in ranked order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCandidate {
    #[serde(default)]
    pub name: Option<String>,
    pub domain: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub claimed: bool,
    pub brand_id: String,
}

impl BrandCandidate {
    /// Name to show for this candidate, falling back to its domain
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.domain)
    }
}

/// Errors that can occur during a brand lookup
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Missing client id: environment variable {env_var} not set")]
    MissingClientId { env_var: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ResolverError {
    /// Whether re-issuing the same query could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ResolverError::Network(_) => true,
            ResolverError::Api { status, .. } => *status == 429 || *status >= 500,
            ResolverError::MissingClientId { .. } => false,
            ResolverError::InvalidResponse(_) => false,
            ResolverError::InvalidUrl(_) => false,
        }
    }
}

/// Parse a brand search response body
pub fn parse_candidates(body: &str) -> Result<Vec<BrandCandidate>, ResolverError> {
    serde_json::from_str(body).map_err(|e| ResolverError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates() {
        let body = r#"[
            {"icon":"https://cdn.brandfetch.io/abc/icon.png","name":"Supabase","domain":"supabase.com","claimed":true,"brandId":"idsb"},
            {"icon":null,"name":null,"domain":"supa.dev","claimed":false,"brandId":"idsd"}
        ]"#;

        let candidates = parse_candidates(body).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].brand_id, "idsb");
        assert!(candidates[0].claimed);
        assert_eq!(candidates[0].display_name(), "Supabase");
        assert_eq!(candidates[1].name, None);
        assert_eq!(candidates[1].display_name(), "supa.dev");
    }

    #[test]
    fn test_parse_candidates_missing_optional_fields() {
        let candidates = parse_candidates(r#"[{"domain":"x.io","brandId":"idx"}]"#).unwrap();
        assert_eq!(candidates[0].icon, None);
        assert!(!candidates[0].claimed);
    }

    #[test]
    fn test_parse_candidates_invalid() {
        let err = parse_candidates(r#"{"error":"nope"}"#).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidResponse(_)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let candidate = BrandCandidate {
            name: Some("X".to_string()),
            domain: "x.io".to_string(),
            icon: None,
            claimed: false,
            brand_id: "idx".to_string(),
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["brandId"], "idx");
    }

    #[test]
    fn test_resolver_error_is_retryable() {
        assert!(
            ResolverError::Api {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(
            ResolverError::Api {
                status: 429,
                message: "slow down".to_string()
            }
            .is_retryable()
        );
        assert!(
            !ResolverError::Api {
                status: 400,
                message: "bad request".to_string()
            }
            .is_retryable()
        );
        assert!(!ResolverError::InvalidResponse("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_api_error_display() {
        let err = ResolverError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error 404: not found");
    }
}
