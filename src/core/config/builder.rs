//! Layers defaults, the optional config file, the environment and CLI overrides into a [`Config`].

use super::file::ConfigFile;
use super::loading::api_key_from_env;
use super::validation;
use super::Config;
use crate::core::error::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Builder for [`Config`]. Later layers override earlier ones:
/// defaults, then the file, then the environment, then explicit setters.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<(ConfigFile, PathBuf)>,
    env_api_key: Option<String>,
    bind_address: Option<String>,
    api_base_url: Option<String>,
    fallback_api_key: Option<String>,
    lookup_timeout: Option<Duration>,
    bulk_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    poll_deadline: Option<Duration>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: Option<(ConfigFile, PathBuf)>) -> Self {
        self.file = file;
        self
    }

    /// Captures `BOUNCEBAN_API_KEY` from the current process environment.
    pub fn with_env(mut self) -> Self {
        self.env_api_key = api_key_from_env();
        self
    }

    pub fn bind_address(mut self, addr: impl Into<String>) -> Self {
        self.bind_address = Some(addr.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn fallback_api_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_api_key = Some(key.into());
        self
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    pub fn bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = Some(timeout);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll_deadline = Some(deadline);
        self
    }

    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if let Some((file, path)) = self.file {
            tracing::info!(target: "config", "Applying config file {}", path.display());
            if let Some(addr) = file.server.bind_address {
                config.bind_address = addr;
            }
            if let Some(url) = file.provider.base_url {
                config.api_base_url = url;
            }
            if let Some(key) = file.provider.api_key.filter(|k| !k.trim().is_empty()) {
                config.fallback_api_key = Some(key);
            }
            if let Some(agent) = file.provider.user_agent {
                config.user_agent = agent;
            }
            if let Some(secs) = file.provider.lookup_timeout {
                config.lookup_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = file.provider.bulk_timeout {
                config.bulk_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = file.polling.interval {
                config.poll_interval = Duration::from_secs(secs);
            }
            if let Some(secs) = file.polling.deadline {
                config.poll_deadline = Duration::from_secs(secs);
            }
            config.loaded_config_path = Some(path.display().to_string());
        }

        if let Some(key) = self.env_api_key {
            config.fallback_api_key = Some(key);
        }

        if let Some(addr) = self.bind_address {
            config.bind_address = addr;
        }
        if let Some(url) = self.api_base_url {
            config.api_base_url = url;
        }
        if let Some(key) = self.fallback_api_key {
            config.fallback_api_key = Some(key);
        }
        if let Some(timeout) = self.lookup_timeout {
            config.lookup_timeout = timeout;
        }
        if let Some(timeout) = self.bulk_timeout {
            config.bulk_timeout = timeout;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval = interval;
        }
        if let Some(deadline) = self.poll_deadline {
            config.poll_deadline = deadline;
        }

        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_from(toml_src: &str) -> Option<(ConfigFile, PathBuf)> {
        Some((
            toml::from_str(toml_src).unwrap(),
            PathBuf::from("bounceban-bridge.toml"),
        ))
    }

    #[test]
    fn file_values_override_defaults() {
        let config = ConfigBuilder::new()
            .with_file(file_from(
                "[provider]\napi_key = \"file-key\"\n[polling]\ninterval = 2\ndeadline = 10",
            ))
            .build()
            .unwrap();

        assert_eq!(config.fallback_api_key.as_deref(), Some("file-key"));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.poll_deadline, Duration::from_secs(10));
        assert_eq!(
            config.loaded_config_path.as_deref(),
            Some("bounceban-bridge.toml")
        );
    }

    #[test]
    fn explicit_setters_win_over_file() {
        let config = ConfigBuilder::new()
            .with_file(file_from("[server]\nbind_address = \"0.0.0.0:1\""))
            .bind_address("127.0.0.1:9999")
            .fallback_api_key("cli-key")
            .build()
            .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9999");
        assert_eq!(config.fallback_api_key.as_deref(), Some("cli-key"));
    }

    #[test]
    fn blank_file_key_is_ignored() {
        let config = ConfigBuilder::new()
            .with_file(file_from("[provider]\napi_key = \"   \""))
            .build()
            .unwrap();
        assert!(config.fallback_api_key.is_none());
    }

    #[test]
    fn invalid_result_is_rejected() {
        let result = ConfigBuilder::new()
            .poll_interval(Duration::from_secs(0))
            .build();
        assert!(result.is_err());
    }
}
