//! Client configuration
//!
//! `ClientConfig` carries credentials, the API base URL and the request
//! policy knobs (timeouts, timeout retries, rate-limit fallback, throttle).
//! It can be built in code, loaded from YAML, or overlaid from `PCO_*`
//! environment variables.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::ThrottleConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default PCO API base URL
pub const DEFAULT_API_BASE: &str = "https://api.planningcenteronline.com";

/// Environment variable holding the PAT application id
pub const ENV_APPLICATION_ID: &str = "PCO_APPLICATION_ID";
/// Environment variable holding the PAT secret
pub const ENV_SECRET: &str = "PCO_SECRET";
/// Environment variable holding an OAuth access token
pub const ENV_TOKEN: &str = "PCO_TOKEN";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE: &str = "PCO_API_BASE";

/// Configuration for `PcoClient`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Personal Access Token application id
    pub application_id: Option<String>,
    /// Personal Access Token secret
    pub secret: Option<String>,
    /// OAuth access token
    pub token: Option<String>,
    /// Base URL prepended to relative request paths
    pub api_base: String,
    /// Per-attempt request timeout
    #[serde(rename = "timeout_secs", with = "duration_secs")]
    pub timeout: Duration,
    /// How many times a timed-out request is attempted before giving up
    pub timeout_retries: u32,
    /// Wait used when a 429 arrives without a usable Retry-After header
    #[serde(rename = "rate_limit_fallback_secs", with = "duration_secs")]
    pub rate_limit_fallback: Duration,
    /// Optional client-side request throttle
    pub throttle: Option<ThrottleConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            secret: None,
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
            timeout_retries: 3,
            rate_limit_fallback: Duration::from_secs(1),
            throttle: None,
            user_agent: format!("pco-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file '{}' not found", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load a config from the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Overlay values found through `lookup` onto this config.
    ///
    /// Only non-empty values are applied.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(id) = get(ENV_APPLICATION_ID) {
            self.application_id = Some(id);
        }
        if let Some(secret) = get(ENV_SECRET) {
            self.secret = Some(secret);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(base) = get(ENV_API_BASE) {
            self.api_base = base;
        }
    }

    /// Resolve the configured credentials
    pub fn auth(&self) -> Result<AuthConfig> {
        AuthConfig::from_credentials(
            self.application_id.as_deref(),
            self.secret.as_deref(),
            self.token.as_deref(),
        )
    }

    /// Check the config for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api_base.is_empty() {
            return Err(Error::config("api_base must not be empty"));
        }
        url::Url::parse(&self.api_base)?;
        if self.timeout_retries == 0 {
            return Err(Error::config("timeout_retries must be at least 1"));
        }
        if self.rate_limit_fallback.is_zero() {
            return Err(Error::config("rate_limit_fallback must be greater than zero"));
        }
        self.auth().map(|_| ())
    }
}

/// Builder for `ClientConfig`
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Use Personal Access Token credentials
    pub fn personal_access_token(
        mut self,
        application_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.config.application_id = Some(application_id.into());
        self.config.secret = Some(secret.into());
        self
    }

    /// Use an OAuth access token
    pub fn oauth_token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = url.into();
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how many times a timed-out request is attempted
    pub fn timeout_retries(mut self, retries: u32) -> Self {
        self.config.timeout_retries = retries;
        self
    }

    /// Set the wait used when Retry-After is missing or unparsable
    pub fn rate_limit_fallback(mut self, wait: Duration) -> Self {
        self.config.rate_limit_fallback = wait;
        self
    }

    /// Enable client-side throttling
    pub fn throttle(mut self, config: ThrottleConfig) -> Self {
        self.config.throttle = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Serialize a `Duration` as (possibly fractional) seconds
pub(crate) mod duration_secs {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|e| D::Error::custom(format!("invalid duration {secs}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthType;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "https://api.planningcenteronline.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.timeout_retries, 3);
        assert_eq!(config.rate_limit_fallback, Duration::from_secs(1));
        assert!(config.throttle.is_none());
        assert!(config.user_agent.starts_with("pco-client/"));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .personal_access_token("app-id", "app-secret")
            .api_base("http://localhost:8080")
            .timeout(Duration::from_secs(5))
            .timeout_retries(5)
            .rate_limit_fallback(Duration::from_millis(250))
            .throttle(ThrottleConfig::new(10, Duration::from_secs(1)))
            .user_agent("test-agent/1.0")
            .build();

        assert_eq!(config.application_id.as_deref(), Some("app-id"));
        assert_eq!(config.secret.as_deref(), Some("app-secret"));
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.timeout_retries, 5);
        assert_eq!(config.rate_limit_fallback, Duration::from_millis(250));
        assert_eq!(config.throttle.unwrap().max_requests, 10);
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r"
application_id: app-id
secret: app-secret
timeout_secs: 15
rate_limit_fallback_secs: 2
throttle:
  max_requests: 100
  period_secs: 20
";
        let config = ClientConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.rate_limit_fallback, Duration::from_secs(2));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout_retries, 3);
        let throttle = config.throttle.clone().unwrap();
        assert_eq!(throttle.max_requests, 100);
        assert_eq!(throttle.period, Duration::from_secs(20));
        assert_eq!(
            config.auth().unwrap().auth_type(),
            AuthType::PersonalAccessToken
        );
    }

    #[test]
    fn test_config_yaml_keeps_sub_second_durations() {
        let config = ClientConfig::builder()
            .oauth_token("token")
            .rate_limit_fallback(Duration::from_millis(250))
            .build();

        let yaml = serde_yaml::to_string(&config).unwrap();
        let restored = ClientConfig::from_yaml_str(&yaml).unwrap();

        assert_eq!(restored.rate_limit_fallback, Duration::from_millis(250));
        assert_eq!(restored, config);

        let parsed = ClientConfig::from_yaml_str("rate_limit_fallback_secs: 0.5").unwrap();
        assert_eq!(parsed.rate_limit_fallback, Duration::from_millis(500));
    }

    #[test]
    fn test_config_rejects_negative_duration() {
        let result = ClientConfig::from_yaml_str("timeout_secs: -1");
        assert!(matches!(result, Err(Error::YamlParse(_))));
    }

    #[test]
    fn test_validate_rejects_zero_fallback() {
        let config = ClientConfig::builder()
            .oauth_token("token")
            .rate_limit_fallback(Duration::ZERO)
            .build();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_config_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pco.yaml");
        fs::write(&path, "token: oauth-token\napi_base: http://localhost:9000\n").unwrap();

        let config = ClientConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.token.as_deref(), Some("oauth-token"));
        assert_eq!(config.api_base, "http://localhost:9000");
    }

    #[test]
    fn test_config_missing_file() {
        let result = ClientConfig::from_yaml_file("/nonexistent/pco.yaml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_config_bad_yaml() {
        let result = ClientConfig::from_yaml_str("timeout_secs: [not, a, number]");
        assert!(matches!(result, Err(Error::YamlParse(_))));
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [
            (ENV_TOKEN, "env-token"),
            (ENV_API_BASE, "http://localhost:1234"),
            (ENV_SECRET, ""),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_env(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.api_base, "http://localhost:1234");
        assert!(config.secret.is_none());
        assert!(config.application_id.is_none());
    }

    #[test]
    fn test_validate() {
        let ok = ClientConfig::builder().oauth_token("t").build();
        assert!(ok.validate().is_ok());

        let no_creds = ClientConfig::default();
        assert!(matches!(
            no_creds.validate(),
            Err(Error::Credentials { .. })
        ));

        let bad_base = ClientConfig::builder()
            .oauth_token("t")
            .api_base("not a url")
            .build();
        assert!(matches!(bad_base.validate(), Err(Error::InvalidUrl(_))));

        let zero_retries = ClientConfig::builder()
            .oauth_token("t")
            .timeout_retries(0)
            .build();
        assert!(matches!(zero_retries.validate(), Err(Error::Config { .. })));
    }
}
