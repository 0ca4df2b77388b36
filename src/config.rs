use reqwest::Url;
use serde::Deserialize;

/// Client configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the chat/movie HTTP API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the web frontend hosting the watchlist confirmation page
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Email of the signed-in user, read once at startup
    #[serde(default)]
    pub user_email: Option<String>,

    /// Tracing filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_url() -> String {
    "http://localhost:5001/api".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_log_filter() -> String {
    "info,watchlist_chat=debug".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Parsed API base URL
    pub fn api_base(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_url)
            .map_err(|e| anyhow::anyhow!("Invalid API_URL '{}': {}", self.api_url, e))
    }

    /// Parsed frontend base URL
    pub fn frontend_base(&self) -> anyhow::Result<Url> {
        Url::parse(&self.frontend_url)
            .map_err(|e| anyhow::anyhow!("Invalid FRONTEND_URL '{}': {}", self.frontend_url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = from_pairs(&[]);
        assert_eq!(config.api_url, "http://localhost:5001/api");
        assert_eq!(config.frontend_url, "http://localhost:8000");
        assert_eq!(config.user_email, None);
        assert_eq!(config.log_filter, "info,watchlist_chat=debug");
    }

    #[test]
    fn test_reads_user_email() {
        let config = from_pairs(&[("USER_EMAIL", "john@example.com")]);
        assert_eq!(config.user_email.as_deref(), Some("john@example.com"));
    }

    #[test]
    fn test_invalid_api_url_is_rejected() {
        let config = from_pairs(&[("API_URL", "not a url")]);
        assert!(config.api_base().is_err());
    }

    #[test]
    fn test_frontend_base_parses() {
        let config = from_pairs(&[("FRONTEND_URL", "https://movies.example.com")]);
        let url = config.frontend_base().unwrap();
        assert_eq!(url.host_str(), Some("movies.example.com"));
    }
}
