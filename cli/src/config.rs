//! Configuration file management
//!
//! CLIConfiguration with TOML parsing for ~/.engine/config.toml
//!
//! # Configuration Format
//!
//! ```toml
//! [server]
//! url = "http://localhost:8080/v1/statement"  # statement endpoint
//! catalog = "hive"
//! schema = "default"
//! user = "engine"
//! header_prefix = "X-Engine"     # X-Presto, X-Trino, ...
//! timeout = 30                   # per-request timeout in seconds
//! max_retries = 3                # retries on transport failures
//! http_version = "auto"          # HTTP version: "http1", "http2", "auto"
//!
//! [query]
//! poll_interval_ms = 500         # delay between continuation polls
//! query_timeout_secs = 0         # overall deadline (0 = none)
//!
//! [auth]
//! jwt_token = "your-jwt-token"   # or username/password
//!
//! [ui]
//! format = "table"               # table, json, csv
//! color = true
//! ```

use engine_link::{AuthProvider, HttpVersion};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CLIError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "~/.engine/config.toml";

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Server connection settings
    pub server: Option<ServerConfig>,

    /// Query polling settings
    pub query: Option<QueryConfig>,

    /// Authentication settings
    pub auth: Option<AuthConfig>,

    /// UI preferences
    pub ui: Option<UIConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Statement endpoint (e.g., http://localhost:8080/v1/statement)
    pub url: Option<String>,

    pub catalog: Option<String>,

    pub schema: Option<String>,

    pub user: Option<String>,

    /// Prefix for identity headers (default: "X-Engine")
    pub header_prefix: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum retry attempts
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// HTTP version preference: "http1", "http2", "auto" (default: "auto")
    #[serde(default = "default_http_version")]
    pub http_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Delay between continuation polls in milliseconds (default: 500)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Overall query deadline in seconds (0 = no deadline)
    #[serde(default)]
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token
    pub jwt_token: Option<String>,

    /// HTTP Basic Auth username
    pub username: Option<String>,

    /// HTTP Basic Auth password
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Output format: table, json, csv
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_http_version() -> String {
    "auto".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_format() -> String {
    "table".to_string()
}

fn default_color() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            catalog: None,
            schema: None,
            user: None,
            header_prefix: None,
            timeout: default_timeout(),
            max_retries: default_retries(),
            http_version: default_http_version(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            query_timeout_secs: 0,
        }
    }
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color: default_color(),
        }
    }
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or(DEFAULT_CONFIG_PATH);
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn default_config_path() -> PathBuf {
    expand_config_path(Path::new(DEFAULT_CONFIG_PATH))
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CLIError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn resolved_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn resolved_query(&self) -> QueryConfig {
        self.query.clone().unwrap_or_default()
    }

    pub fn resolved_ui(&self) -> UIConfig {
        self.ui.clone().unwrap_or_default()
    }

    /// Get the HTTP version setting from config
    pub fn http_version(&self) -> HttpVersion {
        self.server
            .as_ref()
            .map(|s| HttpVersion::parse_lenient(&s.http_version))
            .unwrap_or_default()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.resolved_query().poll_interval_ms)
    }

    /// Overall query deadline, `None` when unset or zero
    pub fn query_timeout(&self) -> Option<Duration> {
        match self.resolved_query().query_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Authentication from the `[auth]` section; a token wins over basic auth
    pub fn auth_provider(&self) -> AuthProvider {
        let Some(auth) = self.auth.as_ref() else {
            return AuthProvider::None;
        };
        if let Some(token) = auth.jwt_token.clone().filter(|t| !t.is_empty()) {
            return AuthProvider::jwt_token(token);
        }
        match (auth.username.clone(), auth.password.clone()) {
            (Some(username), password) => {
                AuthProvider::basic_auth(username, password.unwrap_or_default())
            },
            (None, _) => AuthProvider::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CLIConfiguration::default();
        let server = config.resolved_server();
        assert!(server.url.is_none());
        assert_eq!(server.timeout, 30);
        assert_eq!(server.max_retries, 3);
        assert_eq!(config.http_version(), HttpVersion::Auto);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.query_timeout(), None);
        assert_eq!(config.resolved_ui().format, "table");
        assert!(matches!(config.auth_provider(), AuthProvider::None));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CLIConfiguration::load(&dir.path().join("absent.toml")).unwrap();
        assert!(config.server.is_none());
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
url = "https://engine.example.com/v1/statement"
catalog = "tpch"
schema = "tiny"
user = "alice"
header_prefix = "X-Presto"
http_version = "http1"

[query]
poll_interval_ms = 250
query_timeout_secs = 600

[auth]
username = "alice"
password = "secret"

[ui]
format = "csv"
color = false
"#
        )
        .unwrap();

        let config = CLIConfiguration::load(file.path()).unwrap();
        let server = config.resolved_server();
        assert_eq!(server.url.as_deref(), Some("https://engine.example.com/v1/statement"));
        assert_eq!(server.catalog.as_deref(), Some("tpch"));
        assert_eq!(server.header_prefix.as_deref(), Some("X-Presto"));
        assert_eq!(server.timeout, 30, "omitted keys take defaults");
        assert_eq!(config.http_version(), HttpVersion::Http1);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(600)));
        assert!(matches!(config.auth_provider(), AuthProvider::BasicAuth(ref u, _) if u == "alice"));
        assert_eq!(config.resolved_ui().format, "csv");
        assert!(!config.resolved_ui().color);
    }

    #[test]
    fn test_token_preferred_over_basic_auth() {
        let config: CLIConfiguration = toml::from_str(
            r#"
[auth]
jwt_token = "tok"
username = "alice"
"#,
        )
        .unwrap();
        assert!(matches!(config.auth_provider(), AuthProvider::JwtToken(ref t) if t == "tok"));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nurl = ").unwrap();
        let err = CLIConfiguration::load(file.path()).unwrap_err();
        assert!(matches!(err, CLIError::ConfigurationError(_)));
    }

    #[test]
    fn test_expand_config_path() {
        let plain = Path::new("/etc/engine/config.toml");
        assert_eq!(expand_config_path(plain), plain.to_path_buf());

        if let Some(home) = dirs::home_dir() {
            assert_eq!(default_config_path(), home.join(".engine/config.toml"));
        }
    }
}
