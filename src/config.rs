use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Default limit {default_limit} exceeds maximum limit {max_limit}")]
    Limits { default_limit: usize, max_limit: usize },
}

/// Server configuration with validation.
///
/// Built once at start-up and handed to the datastore and router; nothing
/// reads it from a global.
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Public base URL of this API, used to build hyperlinks
    #[validate(length(min = 1, message = "Code list API URL cannot be empty"))]
    pub code_list_api_url: String,

    /// Bolt URI of the graph database
    #[validate(length(min = 1, message = "Neo4j URI cannot be empty"))]
    pub neo4j_uri: String,

    pub neo4j_user: String,

    #[serde(skip_serializing)]
    pub neo4j_password: String,

    /// Upper bound on pooled Bolt connections
    #[validate(range(min = 1, message = "Neo4j pool needs at least one connection"))]
    pub neo4j_max_connections: usize,

    /// Label stem shared by all code list nodes (`_<label>`, `_<label>_<id>`)
    #[validate(length(min = 1, message = "Code list label cannot be empty"))]
    pub code_list_label: String,

    pub default_offset: usize,

    pub default_limit: usize,

    #[validate(range(min = 1, message = "Maximum limit must be at least 1"))]
    pub max_limit: usize,

    /// Per-request timeout enforced by the HTTP layer
    #[validate(range(min = 1, message = "Request timeout must be at least 1 second"))]
    pub request_timeout_secs: u64,

    /// How long a health check result is reused before the graph is pinged again
    #[validate(range(min = 1, message = "Health check interval must be at least 1 second"))]
    pub health_check_interval_secs: u64,

    /// Failing for this long marks the service critical rather than unhealthy
    #[validate(range(
        min = 1,
        message = "Health check critical timeout must be at least 1 second"
    ))]
    pub health_check_critical_timeout_secs: u64,

    /// Time in-flight requests get to drain once shutdown begins
    #[validate(range(
        min = 1,
        message = "Graceful shutdown timeout must be at least 1 second"
    ))]
    pub graceful_shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 22400,
            code_list_api_url: "http://localhost:22400".to_string(),
            neo4j_uri: "127.0.0.1:7687".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: String::new(),
            neo4j_max_connections: 16,
            code_list_label: "code_list".to_string(),
            default_offset: 0,
            default_limit: 20,
            max_limit: 1000,
            request_timeout_secs: 30,
            health_check_interval_secs: 10,
            health_check_critical_timeout_secs: 60,
            graceful_shutdown_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            http_host: env::var("CODE_LIST_API_HOST").unwrap_or(defaults.http_host),
            http_port: parse_env_var("CODE_LIST_API_PORT", "22400")?,
            code_list_api_url: env::var("CODE_LIST_API_URL").unwrap_or(defaults.code_list_api_url),
            neo4j_uri: env::var("NEO4J_URI").unwrap_or(defaults.neo4j_uri),
            neo4j_user: env::var("NEO4J_USER").unwrap_or(defaults.neo4j_user),
            neo4j_password: env::var("NEO4J_PASSWORD").unwrap_or_default(),
            neo4j_max_connections: parse_env_var("NEO4J_MAX_CONNECTIONS", "16")?,
            code_list_label: env::var("CODE_LIST_LABEL").unwrap_or(defaults.code_list_label),
            default_offset: parse_env_var("DEFAULT_OFFSET", "0")?,
            default_limit: parse_env_var("DEFAULT_LIMIT", "20")?,
            max_limit: parse_env_var("MAX_LIMIT", "1000")?,
            request_timeout_secs: parse_env_var("REQUEST_TIMEOUT_SECS", "30")?,
            health_check_interval_secs: parse_env_var("HEALTHCHECK_INTERVAL_SECS", "10")?,
            health_check_critical_timeout_secs: parse_env_var(
                "HEALTHCHECK_CRITICAL_TIMEOUT_SECS",
                "60",
            )?,
            graceful_shutdown_timeout_secs: parse_env_var("GRACEFUL_SHUTDOWN_TIMEOUT_SECS", "5")?,
        };

        config.check()?;
        Ok(config)
    }

    /// Create configuration from YAML file; missing fields take their defaults
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.check()?;
        Ok(config)
    }

    /// Apply command line overrides, then re-validate
    pub fn apply_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(host) = cli.http_host {
            self.http_host = host;
        }
        if let Some(port) = cli.http_port {
            self.http_port = port;
        }
        if let Some(uri) = cli.neo4j_uri {
            self.neo4j_uri = uri;
        }

        self.check()?;
        Ok(self)
    }

    /// Field validation plus the cross-field limit check
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.default_limit > self.max_limit {
            return Err(ConfigError::Limits {
                default_limit: self.default_limit,
                max_limit: self.max_limit,
            });
        }
        Ok(())
    }

    pub fn http_bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// CLI overrides (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub http_host: Option<String>,
    pub http_port: Option<u16>,
    pub neo4j_uri: Option<String>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
