use crate::response::RenderMode;
use crate::transport::validate_base_url;

use anyhow::{Context, Result};

/// Where the question store listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable consulted for the store URL.
pub const BASE_URL_ENV: &str = "QUIZDUMP_URL";

/// Settings shared by every command the client runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub render: RenderMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            render: RenderMode::default(),
        }
    }
}

impl ClientConfig {
    /// Validate `base_url` and normalise away any trailing slash.
    pub fn new(base_url: &str, render: RenderMode) -> Result<Self> {
        let base_url = validate_base_url(base_url)
            .with_context(|| format!("cannot use '{}' as the store URL", base_url))?;
        Ok(Self { base_url, render })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_points_at_local_store() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.render, RenderMode::Text);
    }

    #[test]
    fn new_normalises_and_validates() {
        let config = ClientConfig::new("http://localhost:8080/", RenderMode::Html).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        let err = ClientConfig::new("localhost", RenderMode::Text).unwrap_err();
        assert!(err.to_string().contains("cannot use 'localhost'"));
    }
}
