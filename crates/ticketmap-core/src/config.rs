use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_JIRA_URL: &str = "https://cornelisnetworks.atlassian.net";
pub const DEFAULT_LOG_FILE: &str = "ticketmap-cli.log";

pub const JIRA_URL_VAR: &str = "JIRA_URL";
pub const LOG_FILE_VAR: &str = "TICKETMAP_LOG_FILE";

/// Site-level settings shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL for ticket hyperlinks (`<jira_url>/browse/<key>`), without a trailing slash.
    pub jira_url: String,
    pub log_file: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            jira_url: DEFAULT_JIRA_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl SiteConfig {
    /// Reads overrides from the process environment, after loading `.env` when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`SiteConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(JIRA_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_jira_url(url);
        }
        if let Some(path) = lookup(LOG_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.log_file = PathBuf::from(path.trim());
        }
        config
    }

    pub fn with_jira_url(mut self, url: impl AsRef<str>) -> Self {
        self.jira_url = url.as_ref().trim().trim_end_matches('/').to_string();
        self
    }

    /// Browse link for a ticket key.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.jira_url)
    }
}
