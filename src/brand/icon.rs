//! Icon URLs and monogram fallbacks

use crate::domain::Tool;

/// Brandfetch logo CDN
pub const DEFAULT_CDN_URL: &str = "https://cdn.brandfetch.io";

/// What to render for a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Image(String),
    Monogram(String),
}

/// CDN icon URL for a domain; `None` when there is no domain.
///
/// The light theme is used when a client id is available.
pub fn icon_url(cdn_base: &str, domain: &str, client_id: Option<&str>) -> Option<String> {
    let domain = domain.trim().trim_matches('/');
    if domain.is_empty() {
        return None;
    }
    let base = cdn_base.trim_end_matches('/');

    Some(match client_id.filter(|c| !c.is_empty()) {
        Some(id) => format!("{}/{}/icon/theme/light/h/80/w/80?c={}", base, domain, id),
        None => format!("{}/{}/icon/theme/dark/h/80/w/80", base, domain),
    })
}

/// First character of the name, uppercased; `?` for a blank name
pub fn monogram(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// Pick an icon: the brand's own icon, then the CDN by domain, then a monogram
pub fn icon_for(tool: &Tool, cdn_base: &str, client_id: Option<&str>) -> IconSource {
    if let Some(icon) = tool.icon.as_deref().filter(|i| !i.trim().is_empty()) {
        return IconSource::Image(icon.to_string());
    }
    match tool.domain().and_then(|d| icon_url(cdn_base, d, client_id)) {
        Some(url) => IconSource::Image(url),
        None => IconSource::Monogram(tool.monogram()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn test_icon_url_with_client_id() {
        assert_eq!(
            icon_url(DEFAULT_CDN_URL, "react.dev", Some("abc")).unwrap(),
            "https://cdn.brandfetch.io/react.dev/icon/theme/light/h/80/w/80?c=abc"
        );
    }

    #[test]
    fn test_icon_url_without_client_id() {
        assert_eq!(
            icon_url("https://cdn.example/", "vim.org", None).unwrap(),
            "https://cdn.example/vim.org/icon/theme/dark/h/80/w/80"
        );
    }

    #[test]
    fn test_icon_url_empty_domain() {
        assert!(icon_url(DEFAULT_CDN_URL, "  ", Some("abc")).is_none());
    }

    #[test]
    fn test_monogram() {
        assert_eq!(monogram("react"), "R");
        assert_eq!(monogram("  émile"), "É");
        assert_eq!(monogram(""), "?");
    }

    #[test]
    fn test_icon_for_custom_tool_falls_back_to_monogram() {
        let tool = Tool::custom("internal thing", Category::Other);
        assert_eq!(
            icon_for(&tool, DEFAULT_CDN_URL, Some("abc")),
            IconSource::Monogram("I".to_string())
        );
    }

    #[test]
    fn test_icon_for_prefers_brand_icon() {
        let mut tool = Tool::catalog("x", "X", "x.io", Category::Other);
        tool.icon = Some("https://img/x.png".to_string());
        assert_eq!(
            icon_for(&tool, DEFAULT_CDN_URL, None),
            IconSource::Image("https://img/x.png".to_string())
        );
    }

    #[test]
    fn test_icon_for_catalog_tool_uses_cdn() {
        let tool = Tool::catalog("docker", "Docker", "docker.com", Category::Other);
        assert!(matches!(
            icon_for(&tool, DEFAULT_CDN_URL, None),
            IconSource::Image(url) if url.contains("docker.com")
        ));
    }
}
