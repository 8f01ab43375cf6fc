//! Client configuration, from code or from `DEXTER_*` environment variables.

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::{DexterError, Result};
use crate::params::{ParamPrecedence, Params};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL, without the `/rest/` prefix
    pub url: String,

    /// Parameters merged into every call
    pub default_params: Params,

    /// How defaults and call parameters are merged
    pub precedence: ParamPrecedence,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_params: Self::standard_params(),
            precedence: ParamPrecedence::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// `lp=0`, the linking-policy flag every call carries by default.
    pub fn standard_params() -> Params {
        Params::new().with("lp", 0)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let url = env::var("DEXTER_URL")
            .map_err(|_| DexterError::Config("DEXTER_URL must be set".into()))?;
        let mut config = Self::new(url);

        if let Ok(secs) = env::var("DEXTER_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                DexterError::Config("DEXTER_TIMEOUT_SECS must be a valid number".into())
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(flag) = env::var("DEXTER_EXPLICIT_PARAMS_WIN") {
            let explicit: bool = flag.parse().map_err(|_| {
                DexterError::Config("DEXTER_EXPLICIT_PARAMS_WIN must be true or false".into())
            })?;
            if explicit {
                config.precedence = ParamPrecedence::ExplicitWins;
            }
        }

        Ok(config)
    }

    pub fn with_default_params(mut self, params: Params) -> Self {
        self.default_params = params;
        self
    }

    pub fn with_precedence(mut self, precedence: ParamPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.default_params.get("lp"), Some(&ParamValue::Int(0)));
        assert_eq!(config.precedence, ParamPrecedence::DefaultsWin);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_env() {
        env::set_var("DEXTER_URL", "http://localhost:8080/dexter");
        env::set_var("DEXTER_TIMEOUT_SECS", "7");
        env::set_var("DEXTER_EXPLICIT_PARAMS_WIN", "true");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.url, "http://localhost:8080/dexter");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.precedence, ParamPrecedence::ExplicitWins);

        env::set_var("DEXTER_TIMEOUT_SECS", "soon");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, DexterError::Config(_)));

        env::remove_var("DEXTER_TIMEOUT_SECS");
        env::remove_var("DEXTER_EXPLICIT_PARAMS_WIN");
        env::remove_var("DEXTER_URL");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, DexterError::Config(ref msg) if msg.contains("DEXTER_URL")));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://localhost")
            .with_default_params(Params::new())
            .with_precedence(ParamPrecedence::ExplicitWins)
            .with_timeout(Duration::from_secs(5));

        assert!(config.default_params.is_empty());
        assert_eq!(config.precedence, ParamPrecedence::ExplicitWins);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
