//! Connector configuration
//!
//! `MarvelConfig` is the user-supplied configuration (credentials, developer
//! mode, transport tuning). `SpecConfig` describes that configuration for the
//! `spec` command.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://gateway.marvel.com/v1/public";

// ============================================================================
// Connector Config
// ============================================================================

/// Configuration for a sync run
#[derive(Clone, Serialize, Deserialize)]
pub struct MarvelConfig {
    /// Public API key
    #[serde(default)]
    pub public_key: String,

    /// Private API key
    #[serde(default)]
    pub private_key: String,

    /// Only fetch the first page of each stream
    #[serde(default)]
    pub developer_mode: bool,

    /// Value for the `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Fallback `modifiedSince` for streams without a stored cursor
    #[serde(default)]
    pub start_date: Option<String>,

    /// API root, overridable for testing
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Client-side request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    10
}

impl MarvelConfig {
    /// Create a config with the given credentials and defaults elsewhere
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            developer_mode: false,
            user_agent: None,
            start_date: None,
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            timeout_seconds: default_timeout_seconds(),
            requests_per_second: default_requests_per_second(),
        }
    }

    /// Enable or disable developer mode
    #[must_use]
    pub fn with_developer_mode(mut self, enabled: bool) -> Self {
        self.developer_mode = enabled;
        self
    }

    /// Override the API root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::from_json(&content)
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.public_key.trim().is_empty() {
            return Err(Error::missing_field("public_key"));
        }
        if self.private_key.trim().is_empty() {
            return Err(Error::missing_field("private_key"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if let Some(start) = &self.start_date {
            if crate::stream::parse_timestamp(start).is_none() {
                return Err(Error::invalid_value(
                    "start_date",
                    format!("'{start}' is not an ISO-8601 timestamp"),
                ));
            }
        }
        if self.requests_per_second == 0 {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Build the transport configuration for this connector
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .rate_limit(RateLimiterConfig::new(
                self.requests_per_second,
                self.requests_per_second,
            ));
        if let Some(agent) = self.user_agent.clone().none_if_empty() {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Describe the accepted configuration
    pub fn spec() -> SpecConfig {
        let mut properties = BTreeMap::new();
        properties.insert(
            "public_key".to_string(),
            PropertyConfig::string("Public Key")
                .description("Your public key for the Marvel API")
                .secret()
                .required(),
        );
        properties.insert(
            "private_key".to_string(),
            PropertyConfig::string("Private Key")
                .description("Your private key for the Marvel API")
                .secret()
                .required(),
        );
        properties.insert(
            "developer_mode".to_string(),
            PropertyConfig::boolean("Developer Mode")
                .description(
                    "Whether to turn develop mode on, which fetches only the first page of each stream.",
                )
                .default_value(serde_json::Value::Bool(false)),
        );
        properties.insert(
            "user_agent".to_string(),
            PropertyConfig::string("User Agent")
                .description("User-Agent header sent with every request"),
        );
        properties.insert(
            "start_date".to_string(),
            PropertyConfig::string("Start Date")
                .description("Earliest modification date to sync when no state is stored")
                .format("date-time"),
        );
        SpecConfig { properties }
    }
}

impl std::fmt::Debug for MarvelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarvelConfig")
            .field("public_key", &"***")
            .field("private_key", &"***")
            .field("developer_mode", &self.developer_mode)
            .field("user_agent", &self.user_agent)
            .field("start_date", &self.start_date)
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

// ============================================================================
// Spec Config (for UI)
// ============================================================================

/// Configuration specification for connector setup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecConfig {
    /// Configuration properties
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyConfig>,
}

impl SpecConfig {
    /// Render as a JSON schema object
    pub fn to_json_schema(&self) -> serde_json::Value {
        let required: Vec<&str> = self
            .properties
            .iter()
            .filter(|(_, p)| p.required)
            .map(|(name, _)| name.as_str())
            .collect();
        let properties: serde_json::Map<String, serde_json::Value> = self
            .properties
            .iter()
            .map(|(name, p)| (name.clone(), p.to_json_schema()))
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Configuration property definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Property type ("string", "boolean", ...)
    #[serde(rename = "type")]
    pub property_type: String,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Property description
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is a secret (should be masked)
    #[serde(default)]
    pub secret: bool,

    /// Whether this property is required
    #[serde(default)]
    pub required: bool,

    /// Default value
    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// Format hint (e.g., "date-time")
    #[serde(default)]
    pub format: Option<String>,
}

impl PropertyConfig {
    fn new(property_type: &str, title: &str) -> Self {
        Self {
            property_type: property_type.to_string(),
            title: Some(title.to_string()),
            description: None,
            secret: false,
            required: false,
            default: None,
            format: None,
        }
    }

    /// A string property
    pub fn string(title: &str) -> Self {
        Self::new("string", title)
    }

    /// A boolean property
    pub fn boolean(title: &str) -> Self {
        Self::new("boolean", title)
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    fn to_json_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::json!({ "type": self.property_type });
        if let Some(title) = &self.title {
            schema["title"] = title.clone().into();
        }
        if let Some(description) = &self.description {
            schema["description"] = description.clone().into();
        }
        if self.secret {
            schema["secret"] = true.into();
            schema["airbyte_secret"] = true.into();
        }
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        if let Some(format) = &self.format {
            schema["format"] = format.clone().into();
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults() {
        let config =
            MarvelConfig::from_json(r#"{"public_key": "pub", "private_key": "priv"}"#).unwrap();
        assert_eq!(config.public_key, "pub");
        assert_eq!(config.private_key, "priv");
        assert!(!config.developer_mode);
        assert!(config.user_agent.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_from_json_developer_mode() {
        let config = MarvelConfig::from_json(
            r#"{"public_key": "pub", "private_key": "priv", "developer_mode": true, "user_agent": "tap/1.0"}"#,
        )
        .unwrap();
        assert!(config.developer_mode);
        assert_eq!(config.user_agent.as_deref(), Some("tap/1.0"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = MarvelConfig::from_json(r#"{"private_key": "priv"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "public_key"));

        let err = MarvelConfig::from_json(r#"{"public_key": "pub", "private_key": "  "}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "private_key"));
    }

    #[test]
    fn test_invalid_values() {
        let err = MarvelConfig::new("pub", "priv")
            .with_base_url("not a url")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "base_url"));

        let err = MarvelConfig::new("pub", "priv")
            .with_start_date("yesterday")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "start_date"));

        assert!(MarvelConfig::new("pub", "priv")
            .with_start_date("2020-01-01T00:00:00Z")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config = MarvelConfig::new("my-public", "my-private");
        let debug = format!("{config:?}");
        assert!(!debug.contains("my-public"));
        assert!(!debug.contains("my-private"));
    }

    #[test]
    fn test_http_config() {
        let config = MarvelConfig::new("pub", "priv").with_user_agent("agent/2.0");
        let http = config.http_config();
        assert_eq!(http.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(http.user_agent, "agent/2.0");
        assert_eq!(http.max_retries, 3);
    }

    #[test]
    fn test_empty_user_agent_uses_default() {
        let http = MarvelConfig::new("pub", "priv").with_user_agent("").http_config();
        assert!(http.user_agent.starts_with("marvel-connector/"));
    }

    #[test]
    fn test_spec_schema() {
        let schema = MarvelConfig::spec().to_json_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&serde_json::json!("public_key")));
        assert!(required.contains(&serde_json::json!("private_key")));
        assert_eq!(schema["properties"]["private_key"]["secret"], true);
        assert_eq!(schema["properties"]["developer_mode"]["default"], false);
    }
}
