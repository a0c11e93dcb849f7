//! Resolves the provider API key for a request.
//!
//! Lookup order: `connection_data.value.api_key_bearer`, then `connection_data.value`
//! when it is a plain string, then `api_key` on the connection object, and finally the
//! fallback captured from the environment at startup.

use serde_json::Value;

use crate::core::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    ConnectionBearer,
    ConnectionValue,
    ConnectionApiKey,
    Environment,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::ConnectionBearer => "connection_data.value.api_key_bearer",
            CredentialSource::ConnectionValue => "connection_data.value",
            CredentialSource::ConnectionApiKey => "api_key",
            CredentialSource::Environment => "environment",
        }
    }
}

/// A resolved API key. Sent verbatim as the `Authorization` header.
#[derive(Clone)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct CredentialResolver {
    fallback: Option<String>,
}

impl CredentialResolver {
    /// `fallback` is read once at startup and never changes afterwards.
    pub fn new(fallback: Option<String>) -> Self {
        Self {
            fallback: fallback
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        }
    }

    pub fn resolve(&self, connection: Option<&Value>) -> Result<Credential> {
        let from_connection = connection.and_then(from_connection);
        let credential = from_connection.or_else(|| {
            self.fallback.clone().map(|token| Credential {
                token,
                source: CredentialSource::Environment,
            })
        });

        match credential {
            Some(credential) => {
                tracing::debug!(target: "credentials", source = credential.source.as_str(), "Resolved API key");
                Ok(credential)
            }
            None => Err(AppError::MissingCredential),
        }
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn from_connection(connection: &Value) -> Option<Credential> {
    let candidates = [
        (
            connection.pointer("/connection_data/value/api_key_bearer"),
            CredentialSource::ConnectionBearer,
        ),
        (
            connection.pointer("/connection_data/value"),
            CredentialSource::ConnectionValue,
        ),
        (connection.get("api_key"), CredentialSource::ConnectionApiKey),
    ];
    candidates
        .into_iter()
        .find_map(|(value, source)| non_blank(value).map(|token| Credential { token, source }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_bearer_wins() {
        let resolver = CredentialResolver::new(Some("env-key".into()));
        let conn = json!({
            "connection_data": {"value": {"api_key_bearer": "bearer-key"}},
            "api_key": "flat-key"
        });
        let cred = resolver.resolve(Some(&conn)).unwrap();
        assert_eq!(cred.token(), "bearer-key");
        assert_eq!(cred.source(), CredentialSource::ConnectionBearer);
    }

    #[test]
    fn flat_shapes_are_supported() {
        let resolver = CredentialResolver::default();

        let conn = json!({"connection_data": {"value": "value-key"}});
        assert_eq!(resolver.resolve(Some(&conn)).unwrap().token(), "value-key");

        let conn = json!({"api_key": "flat-key"});
        let cred = resolver.resolve(Some(&conn)).unwrap();
        assert_eq!(cred.token(), "flat-key");
        assert_eq!(cred.source(), CredentialSource::ConnectionApiKey);
    }

    #[test]
    fn falls_back_to_environment_value() {
        let resolver = CredentialResolver::new(Some("env-key".into()));
        let conn = json!({"connection_data": {"value": {"api_key_bearer": ""}}, "api_key": "  "});
        let cred = resolver.resolve(Some(&conn)).unwrap();
        assert_eq!(cred.token(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);

        assert_eq!(resolver.resolve(None).unwrap().token(), "env-key");
    }

    #[test]
    fn missing_everywhere_is_an_error() {
        let resolver = CredentialResolver::new(Some("   ".into()));
        assert!(matches!(
            resolver.resolve(Some(&json!({}))),
            Err(AppError::MissingCredential)
        ));
        assert!(matches!(resolver.resolve(None), Err(AppError::MissingCredential)));
    }

    #[test]
    fn debug_never_prints_token() {
        let cred = CredentialResolver::new(Some("super-secret".into()))
            .resolve(None)
            .unwrap();
        assert!(!format!("{:?}", cred).contains("super-secret"));
    }
}
