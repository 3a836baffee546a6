//! Configuration management for pdbq
//!
//! Endpoint URLs and transport settings live in an explicit [`RcsbConfig`]
//! value handed to [`crate::api::RcsbClient`]. Layers, lowest precedence first:
//! built-in defaults, `<config_dir>/pdbq/config.toml`, `--config <file>`,
//! `PDBQ_*` environment variables, then `--base-url`.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

// ============================================================================
// Endpoint Defaults
// ============================================================================

pub const DEFAULT_SEARCH_URL: &str = "http://www.rcsb.org/pdb/rest/search";
pub const DEFAULT_REPORT_URL: &str = "http://www.rcsb.org/pdb/rest/customReport.xml";
pub const DEFAULT_DESCRIBE_URL: &str = "https://www.rcsb.org/pdb/rest/describeMol";
pub const DEFAULT_FASTA_URL: &str = "https://www.rcsb.org/pdb/download/downloadFastaFiles.do";
pub const DEFAULT_WEB_SEARCH_URL: &str = "https://www.rcsb.org/pdb/search/advSearch.do?search=new";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Endpoints and transport settings for the RCSB services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcsbConfig {
    /// XML query submission endpoint (POST)
    pub search_url: String,

    /// Custom report endpoint (GET, CSV body)
    pub report_url: String,

    /// describeMol endpoint (GET, XML body)
    pub describe_url: String,

    /// FASTA download endpoint (GET)
    pub fasta_url: String,

    /// Advanced search web form page
    pub web_search_url: String,

    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for RcsbConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            report_url: DEFAULT_REPORT_URL.to_string(),
            describe_url: DEFAULT_DESCRIBE_URL.to_string(),
            fasta_url: DEFAULT_FASTA_URL.to_string(),
            web_search_url: DEFAULT_WEB_SEARCH_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("pdbq/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RcsbConfig {
    /// Resolve the full configuration stack.
    ///
    /// `explicit` must exist when given; the per-user file is optional.
    /// Keys the explicit file leaves out keep the per-user file's values.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(Self::default_file().as_deref(), explicit)
    }

    fn load_from(user_file: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = user_file.filter(|p| p.is_file()) {
            config = config.merge_file(path)?;
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            config = config.merge_file(path)?;
        }

        config.merge_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `PDBQ_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().merge_vars(|key| std::env::var(key).ok())
    }

    /// Read a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::default().merge_file(path)
    }

    /// Overlay the keys set in a TOML file onto `self`
    pub fn merge_file(self, path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config file");
        let text = std::fs::read_to_string(path)?;
        let overrides: toml::Table = toml::from_str(&text)?;

        let mut merged = match toml::Value::try_from(&self) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err(CliError::config("config did not serialize to a table")),
            Err(e) => return Err(CliError::config(format!("cannot serialize config: {}", e))),
        };
        merged.extend(overrides);
        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// `<config_dir>/pdbq/config.toml`, if the platform has a config dir
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pdbq").join(CONFIG_FILE_NAME))
    }

    /// Apply overrides from a variable lookup
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("PDBQ_SEARCH_URL") {
            self.search_url = url;
        }
        if let Some(url) = lookup("PDBQ_REPORT_URL") {
            self.report_url = url;
        }
        if let Some(url) = lookup("PDBQ_DESCRIBE_URL") {
            self.describe_url = url;
        }
        if let Some(url) = lookup("PDBQ_FASTA_URL") {
            self.fasta_url = url;
        }
        if let Some(url) = lookup("PDBQ_WEB_SEARCH_URL") {
            self.web_search_url = url;
        }
        if let Some(secs) = lookup("PDBQ_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| CliError::config(format!("PDBQ_TIMEOUT_SECS '{}' is not a number", secs)))?;
        }
        Ok(self)
    }

    /// Point every endpoint at another scheme/host/port, keeping paths.
    ///
    /// Used for mirrors and for tests against a local mock server.
    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        let base = Url::parse(base)?;
        self.search_url = rebase(&self.search_url, &base)?;
        self.report_url = rebase(&self.report_url, &base)?;
        self.describe_url = rebase(&self.describe_url, &base)?;
        self.fasta_url = rebase(&self.fasta_url, &base)?;
        self.web_search_url = rebase(&self.web_search_url, &base)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("search_url", &self.search_url),
            ("report_url", &self.report_url),
            ("describe_url", &self.describe_url),
            ("fasta_url", &self.fasta_url),
            ("web_search_url", &self.web_search_url),
        ] {
            Url::parse(value)
                .map_err(|e| CliError::config(format!("{} '{}' is not a valid URL: {}", name, value, e)))?;
        }
        if self.timeout_secs == 0 {
            return Err(CliError::config("timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

fn rebase(endpoint: &str, base: &Url) -> Result<String> {
    let mut url = Url::parse(endpoint)?;
    url.set_scheme(base.scheme())
        .map_err(|_| CliError::config(format!("cannot use scheme '{}'", base.scheme())))?;
    url.set_host(base.host_str())?;
    url.set_port(base.port())
        .map_err(|_| CliError::config(format!("cannot set port on '{}'", endpoint)))?;
    Ok(url.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = RcsbConfig::default();
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.user_agent.starts_with("pdbq/"));
        config.validate().unwrap();
    }

    #[test]
    fn test_merge_vars() {
        let vars: HashMap<&str, &str> = [
            ("PDBQ_SEARCH_URL", "http://mirror.example.org/search"),
            ("PDBQ_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let config = RcsbConfig::default()
            .merge_vars(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.search_url, "http://mirror.example.org/search");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.fasta_url, DEFAULT_FASTA_URL);
    }

    #[test]
    fn test_merge_vars_rejects_bad_timeout() {
        let result = RcsbConfig::default().merge_vars(|k| {
            (k == "PDBQ_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_with_base_url_keeps_paths_and_query() {
        let config = RcsbConfig::default()
            .with_base_url("http://127.0.0.1:8080")
            .unwrap();

        assert_eq!(config.search_url, "http://127.0.0.1:8080/pdb/rest/search");
        assert_eq!(config.describe_url, "http://127.0.0.1:8080/pdb/rest/describeMol");
        assert_eq!(
            config.web_search_url,
            "http://127.0.0.1:8080/pdb/search/advSearch.do?search=new"
        );
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 12\nreport_url = \"http://localhost/report\"\n").unwrap();

        let config = RcsbConfig::from_file(&path).unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.report_url, "http://localhost/report");
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
    }

    #[test]
    fn test_explicit_file_layers_over_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&user, "timeout_secs = 12\nreport_url = \"http://user.example.org/report\"\n").unwrap();
        std::fs::write(&explicit, "timeout_secs = 7\n").unwrap();

        let config = RcsbConfig::load_from(Some(&user), Some(&explicit)).unwrap();
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.report_url, "http://user.example.org/report");
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
    }

    #[test]
    fn test_missing_user_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = RcsbConfig::load_from(Some(&dir.path().join("absent.toml")), None).unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = RcsbConfig::load(Some(Path::new("/nonexistent/pdbq.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = RcsbConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
