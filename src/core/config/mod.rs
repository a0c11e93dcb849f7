//! Defines the core runtime `Config` struct, its defaults, and related utilities.
//! Submodules handle loading, building, and validation.

pub(crate) mod builder;
pub(crate) mod file;
pub(crate) mod loading;
pub(crate) mod validation;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;
pub use loading::{load_config_file, API_KEY_ENV_VAR};

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.bounceban.com/v1";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Runtime configuration settings used by the bridge.
///
/// Built once at startup and shared read-only with every request afterwards.
#[derive(Clone)]
pub struct Config {
    pub bind_address: String,

    pub api_base_url: String,
    /// Used when a request carries no usable connection credential.
    pub fallback_api_key: Option<String>,
    pub user_agent: String,

    pub lookup_timeout: Duration,
    pub bulk_timeout: Duration,

    pub poll_interval: Duration,
    pub poll_deadline: Duration,

    pub loaded_config_path: Option<String>,
}

impl Config {
    fn build_default() -> Self {
        Config {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            fallback_api_key: None,
            user_agent: format!("bounceban-bridge/{}", env!("CARGO_PKG_VERSION")),
            lookup_timeout: Duration::from_secs(30),
            bulk_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(5),
            poll_deadline: Duration::from_secs(60),
            loaded_config_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::build_default()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("api_base_url", &self.api_base_url)
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("user_agent", &self.user_agent)
            .field("lookup_timeout", &self.lookup_timeout)
            .field("bulk_timeout", &self.bulk_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("poll_deadline", &self.poll_deadline)
            .field("loaded_config_path", &self.loaded_config_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_provider_contract() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.bounceban.com/v1");
        assert_eq!(config.lookup_timeout, Duration::from_secs(30));
        assert_eq!(config.bulk_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.poll_deadline, Duration::from_secs(60));
        assert!(config.fallback_api_key.is_none());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = Config {
            fallback_api_key: Some("secret-key".into()),
            ..Config::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
