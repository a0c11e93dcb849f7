//! Defines the structure mirroring the TOML configuration file format.

use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub(crate) server: ServerConfig,
    #[serde(default)]
    pub(crate) provider: ProviderConfig,
    #[serde(default)]
    pub(crate) polling: PollingConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ServerConfig {
    pub(crate) bind_address: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProviderConfig {
    pub(crate) base_url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) user_agent: Option<String>,
    /// Seconds.
    pub(crate) lookup_timeout: Option<u64>,
    /// Seconds.
    pub(crate) bulk_timeout: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct PollingConfig {
    /// Seconds between status checks.
    pub(crate) interval: Option<u64>,
    /// Seconds before the loop gives up and reports "still processing".
    pub(crate) deadline: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sections() {
        let file: ConfigFile = toml::from_str(
            r#"
            [server]
            bind_address = "0.0.0.0:9000"

            [provider]
            base_url = "https://example.test/v1"
            api_key = "k"
            lookup_timeout = 10
            bulk_timeout = 20

            [polling]
            interval = 1
            deadline = 30
            "#,
        )
        .unwrap();

        assert_eq!(file.server.bind_address.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(file.provider.api_key.as_deref(), Some("k"));
        assert_eq!(file.provider.bulk_timeout, Some(20));
        assert_eq!(file.polling.deadline, Some(30));
    }

    #[test]
    fn rejects_unknown_fields() {
        let parsed: Result<ConfigFile, _> = toml::from_str(
            r#"
            [polling]
            retries = 3
            "#,
        );
        assert!(parsed.is_err());
    }
}
