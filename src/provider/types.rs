//! Raw response bodies as returned by the provider.
//!
//! Every field is optional. The provider's schema is loose, so identifiers and labels
//! are accepted as either strings or numbers, and anything whose type varies is kept
//! as a JSON value and relayed untouched.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<RawResultItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawResultItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /check`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCheck {
    pub domain_type: Option<Value>,
    pub username_type: Option<Value>,
    pub syntax_valid: Option<Value>,
    pub credits_consumed: Option<Value>,
    pub credits_remaining: Option<Value>,
}

/// `GET /verify/single` and `GET /verify/single/status`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSingle {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub result: Option<String>,
    pub result_code: Option<Value>,
    pub score: Option<Value>,
    pub is_accept_all: Option<Value>,
    pub is_catchall: Option<Value>,
    pub is_disposable: Option<Value>,
    pub is_role: Option<Value>,
    pub is_free: Option<Value>,
    pub is_seg_protected: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    pub details: Option<Value>,
    pub mx_records: Option<Value>,
    pub smtp_provider: Option<Value>,
    pub timestamp: Option<Value>,
    pub completed_at: Option<Value>,
}

/// `POST /verify/bulk`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBulkSubmit {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    pub count_submitted: Option<Value>,
    pub count_duplicates_removed: Option<Value>,
    pub count_processing: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

/// `GET /verify/bulk/status`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBulkStatus {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    pub count_total: Option<Value>,
    pub count_checked: Option<Value>,
    pub count_remaining: Option<Value>,
    pub progress_percentage: Option<Value>,
    pub verification_started_at: Option<Value>,
    pub verification_ended_at: Option<Value>,
    pub estimated_time_remaining: Option<Value>,
    pub created_at: Option<Value>,
    pub updated_at: Option<Value>,
}

/// One entry of a dump or an email lookup. Note the provider spells it `verify_at`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawResultItem {
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub result: Option<String>,
    pub result_code: Option<Value>,
    pub score: Option<Value>,
    pub is_catchall: Option<Value>,
    pub is_disposable: Option<Value>,
    pub is_role: Option<Value>,
    pub is_free: Option<Value>,
    pub is_seg_protected: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    pub mx_records: Option<Value>,
    pub smtp_provider: Option<Value>,
    pub verify_at: Option<Value>,
}

/// `GET /verify/bulk/dump`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBulkDump {
    #[serde(deserialize_with = "lenient_items")]
    pub items: Vec<RawResultItem>,
}

/// `POST /verify/bulk/emails`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBulkEmails {
    pub request_id: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub items: Vec<RawResultItem>,
}

/// `POST /verify/bulk/destroy`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBulkDestroy {
    pub status: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    pub deleted_at: Option<Value>,
    pub emails_deleted: Option<Value>,
    pub storage_freed: Option<Value>,
}
