//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::Result;
use crate::api::Credentials;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Service under test
    #[serde(default)]
    pub service: ServiceConfig,

    /// Account used to obtain the bearer token
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Service settings
#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    /// Base URL every endpoint path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://d3s5nxhwblsjbi.cloudfront.net".to_string()
}

/// Credentials settings
#[derive(Debug, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn default_username() -> String {
    "justdeso".to_string()
}

fn default_password() -> String {
    "deso123".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Default)]
pub struct Timeouts {
    /// Per-request timeout. Unset means the HTTP client's defaults apply.
    pub request_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(url) = base_url {
            self.service.base_url = url;
        }
        if let Some(user) = username {
            self.credentials.username = user;
        }
        if let Some(pass) = password {
            self.credentials.password = pass;
        }
        self
    }

    /// Credentials for session bootstrap
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.credentials.username.clone(),
            password: self.credentials.password.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeouts.request_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.service.base_url, "https://d3s5nxhwblsjbi.cloudfront.net");
        assert_eq!(config.credentials.username, "justdeso");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[service]\nbase_url = \"http://127.0.0.1:9000\"\n\n[credentials]\nusername = \"alice\"\n\n[timeouts]\nrequest_secs = 5"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.credentials.username, "alice");
        assert_eq!(config.credentials.password, "deso123");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_file_is_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service\nbase_url = 1").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, crate::common::Error::ConfigParse(_)));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = Config::default().with_overrides(
            Some("http://localhost:1".to_string()),
            None,
            Some("secret".to_string()),
        );
        let creds = config.credentials();
        assert_eq!(config.service.base_url, "http://localhost:1");
        assert_eq!(creds.username, "justdeso");
        assert_eq!(creds.password, "secret");
    }
}
