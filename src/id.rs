//! ID generation utilities for Stackshare
//!
//! Record ids are random; synthesized tool ids are deterministic so that the
//! same free-text name always maps to the same tool.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Generate a unique record ID
///
/// Format: `{timestamp_ms}-{random_hex}`
/// Example: `1738300800123-a1b2c3d4`
pub fn generate_record_id() -> String {
    let timestamp = now_ms();
    let random: u32 = rand::rng().random();
    format!("{}-{:08x}", timestamp, random)
}

/// Generate a subsection ID
///
/// Format: `subsection-{timestamp_ms}-{random_hex}`
pub fn generate_subsection_id() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("subsection-{}-{:04x}", timestamp, random)
}

/// Normalize a display name for identity comparisons: trimmed and lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Deterministic ID for a free-text tool entry
///
/// Format: `custom-{category}-{escaped normalized name}`. Each space becomes
/// `-`, ASCII letters and digits are kept, and every other byte becomes
/// `_xx` (lowercase hex), so distinct normalized names never share an id.
/// Example: "My  Tool" in frontend -> `custom-frontend-my--tool`,
/// "my-tool" -> `custom-frontend-my_2dtool`
pub fn custom_tool_id(category: &str, name: &str) -> String {
    format!("custom-{}-{}", category, escape_name(&normalize_name(name)))
}

/// ID for a tool synthesized from a brand lookup result, scoped to its category
pub fn brand_tool_id(category: &str, brand_id: &str) -> String {
    format!("brand-{}-{}", category, brand_id)
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ' ' => out.push('-'),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("_{:02x}", byte));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_returns_reasonable_timestamp() {
        let ts = now_ms();
        assert!(ts > 1577836800000); // 2020-01-01
        assert!(ts < 4102444800000); // 2100-01-01
    }

    #[test]
    fn test_generate_record_id_format() {
        let id = generate_record_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_record_id_uniqueness() {
        assert_ne!(generate_record_id(), generate_record_id());
    }

    #[test]
    fn test_generate_subsection_id_format() {
        let id = generate_subsection_id();
        assert!(id.starts_with("subsection-"));
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  React "), "react");
        assert_eq!(normalize_name("Next.js"), "next.js");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_custom_tool_id_is_deterministic() {
        assert_eq!(custom_tool_id("other", "My Tool"), "custom-other-my-tool");
        assert_eq!(custom_tool_id("other", "  my TOOL "), "custom-other-my-tool");
        assert_eq!(custom_tool_id("ai", "Next.js"), "custom-ai-next_2ejs");
    }

    #[test]
    fn test_custom_tool_id_distinguishes_names() {
        let names = ["my tool", "my-tool", "my  tool", "my_2dtool", "mytool", "my\ttool", "café", "cafe"];
        let ids: std::collections::HashSet<String> = names.iter().map(|n| custom_tool_id("other", n)).collect();
        assert_eq!(ids.len(), names.len());
    }

    #[test]
    fn test_custom_tool_id_scoped_by_category() {
        assert_ne!(custom_tool_id("backend", "Bun"), custom_tool_id("other", "Bun"));
    }

    #[test]
    fn test_brand_tool_id() {
        assert_eq!(brand_tool_id("backend", "idMzt9kg1A"), "brand-backend-idMzt9kg1A");
    }
}
