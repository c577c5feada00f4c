use article_markdown::{DEFAULT_DIAGRAM_BASE_URL, Theme};
use secrecy::SecretString;

/// Rendering options read from the environment.
///
/// Example:
/// RENDER_BASE_URL=https://polar.sh RENDER_THEME=dark \
/// API_BASE_URL=http://localhost:8000 \
/// cargo run -p prerender -- interactive article.json
pub struct Config {
    /// Origin for absolute links in email output.
    pub base_url: String,
    pub theme: Theme,
    /// Enables live lookups for interactive output when set.
    pub api_base_url: Option<String>,
    pub api_access_token: Option<SecretString>,
    pub diagram_base_url: String,
    pub show_paywalled_content: bool,
    pub is_subscriber: bool,
    pub paid_articles_benefit_name: Option<String>,
    /// Publisher used when the input is a bare markdown file.
    pub organization_name: String,
    pub organization_slug: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source. Empty values count as
    /// unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        let flag = |key: &str| {
            var(key).is_some_and(|value| matches!(value.as_str(), "1" | "true"))
        };

        let organization_name =
            var("RENDER_ORGANIZATION_NAME").unwrap_or_else(|| "Polar".to_string());
        let organization_slug = var("RENDER_ORGANIZATION_SLUG")
            .unwrap_or_else(|| organization_name.to_lowercase().replace(' ', "-"));

        Config {
            base_url: var("RENDER_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            theme: var("RENDER_THEME")
                .map(|theme| Theme::from_string(&theme))
                .unwrap_or_default(),
            api_base_url: var("API_BASE_URL"),
            api_access_token: var("API_ACCESS_TOKEN").map(SecretString::from),
            diagram_base_url: var("DIAGRAM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DIAGRAM_BASE_URL.to_string()),
            show_paywalled_content: flag("RENDER_SHOW_PAYWALLED_CONTENT"),
            is_subscriber: flag("RENDER_IS_SUBSCRIBER"),
            paid_articles_benefit_name: var("RENDER_BENEFIT_NAME"),
            organization_name,
            organization_slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.diagram_base_url, DEFAULT_DIAGRAM_BASE_URL);
        assert!(config.api_base_url.is_none());
        assert!(config.api_access_token.is_none());
        assert!(!config.show_paywalled_content);
        assert_eq!(config.organization_slug, "polar");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("RENDER_THEME", "dark"),
            ("API_BASE_URL", "http://localhost:8000"),
            ("API_ACCESS_TOKEN", "secret"),
            ("RENDER_IS_SUBSCRIBER", "true"),
            ("RENDER_ORGANIZATION_NAME", "Acme Inc"),
            ("RENDER_BENEFIT_NAME", " "),
        ]);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:8000"));
        assert!(config.api_access_token.is_some());
        assert!(config.is_subscriber);
        assert_eq!(config.organization_slug, "acme-inc");
        assert_eq!(config.paid_articles_benefit_name, None);
    }
}
