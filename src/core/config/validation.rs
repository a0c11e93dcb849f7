//! Sanity checks applied to a fully built [`Config`].

use super::Config;
use crate::core::error::{AppError, Result};
use std::net::SocketAddr;
use url::Url;

pub(crate) fn validate(config: &Config) -> Result<()> {
    let base = Url::parse(&config.api_base_url).map_err(|e| {
        AppError::Config(format!(
            "Invalid provider base URL '{}': {}",
            config.api_base_url, e
        ))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "Provider base URL must use http or https, got '{}'",
            base.scheme()
        )));
    }

    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        AppError::Config(format!(
            "Invalid bind address '{}': {}",
            config.bind_address, e
        ))
    })?;

    if config.lookup_timeout.is_zero() || config.bulk_timeout.is_zero() {
        return Err(AppError::Config(
            "Provider timeouts must be greater than zero".to_string(),
        ));
    }

    if config.poll_interval.is_zero() || config.poll_deadline.is_zero() {
        return Err(AppError::Config(
            "Polling interval and deadline must be greater than zero".to_string(),
        ));
    }

    if config.poll_interval > config.poll_deadline {
        return Err(AppError::Config(format!(
            "Polling interval ({:?}) must not exceed the polling deadline ({:?})",
            config.poll_interval, config.poll_deadline
        )));
    }

    Ok(())
}
