//! Response envelope and the normalized output shapes relayed to the workflow host.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::Result;

/// Outcome summary carried in every response's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// The provider answered and the call did what was asked.
    #[serde(rename = "success")]
    Success,
    /// Validation failure, provider error or a task that ended without results.
    #[serde(rename = "failed")]
    Failed,
    /// Work continues upstream; call again with the returned id.
    #[serde(rename = "still processing")]
    StillProcessing,
    /// Email lookup found none of the requested addresses in the task.
    #[serde(rename = "no email match")]
    NoEmailMatch,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::StillProcessing => "still processing",
            OutcomeStatus::NoEmailMatch => "no email match",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub status: OutcomeStatus,
    /// Operation-specific extras such as `task_status` or `verification_status`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ data, metadata }` body returned by every execute and content route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Value,
    pub metadata: Metadata,
}

impl Envelope {
    pub fn from_value(data: Value, status: OutcomeStatus) -> Self {
        Self {
            data,
            metadata: Metadata {
                status,
                extra: Map::new(),
            },
        }
    }

    pub fn new<T: Serialize>(data: &T, status: OutcomeStatus) -> Result<Self> {
        Ok(Self::from_value(serde_json::to_value(data)?, status))
    }

    /// Adds an extra metadata entry next to `status`.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.extra.insert(key.to_string(), value.into());
        self
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Normalized output of the generic check operation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    /// The email or domain exactly as received.
    pub query: String,
    pub domain_type: Option<Value>,
    pub username_type: Option<Value>,
    pub syntax_valid: Option<Value>,
    pub credits_consumed: Option<Value>,
    pub credits_remaining: Option<Value>,
    /// Untouched provider body, for fields not lifted above.
    pub raw: Value,
}

/// Normalized output of a single-email submission.
#[derive(Debug, Clone, Serialize)]
pub struct SingleSubmission {
    pub email: String,
    /// Present when the provider has not decided yet; poll with it.
    pub verification_id: Option<String>,
    pub status: Option<String>,
    pub result: Option<String>,
    pub result_code: Option<Value>,
    pub score: Option<Value>,
    pub is_catchall: Option<Value>,
    pub is_disposable: Option<Value>,
    pub is_role: Option<Value>,
    pub is_free: Option<Value>,
    pub is_seg_protected: Option<Value>,
    pub message: Option<String>,
    pub timestamp: Option<Value>,
}

/// Normalized output of a single-email status poll.
#[derive(Debug, Clone, Serialize)]
pub struct SingleStatus {
    pub verification_id: String,
    pub email: Option<String>,
    pub status: Option<String>,
    pub result: Option<String>,
    pub result_code: Option<Value>,
    pub score: Option<Value>,
    pub is_catchall: Option<Value>,
    pub is_disposable: Option<Value>,
    pub is_role: Option<Value>,
    pub is_free: Option<Value>,
    pub is_seg_protected: Option<Value>,
    pub message: Option<String>,
    pub details: Option<Value>,
    pub mx_records: Option<Value>,
    pub smtp_provider: Option<Value>,
    pub timestamp: Option<Value>,
    /// Only set once the verification has finished.
    pub completed_at: Option<Value>,
}

/// One per-email verification outcome inside a bulk task.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub email: Option<String>,
    pub result: Option<String>,
    pub result_code: Option<Value>,
    pub score: Option<Value>,
    pub is_catchall: Option<Value>,
    pub is_disposable: Option<Value>,
    pub is_role: Option<Value>,
    pub is_free: Option<Value>,
    pub is_seg_protected: Option<Value>,
    pub message: Option<String>,
    pub mx_records: Option<Value>,
    pub smtp_provider: Option<Value>,
    /// Provider's `verify_at`.
    pub verified_at: Option<Value>,
}

/// Snapshot returned right after a bulk task is created.
#[derive(Debug, Clone, Serialize)]
pub struct BulkSubmissionSummary {
    pub task_id: Option<String>,
    pub task_name: String,
    pub status: Option<String>,
    /// Provider count, or the number of addresses sent when it omits one.
    pub count_submitted: Value,
    pub count_duplicates_removed: Value,
    pub count_processing: Value,
    pub message: String,
}

/// Status snapshot of a bulk task as last reported by the provider.
#[derive(Debug, Clone, Serialize)]
pub struct BulkTaskStatus {
    pub task_id: String,
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub count_total: Value,
    pub count_checked: Value,
    pub count_remaining: Value,
    /// 0 to 100. Counts and progress default to 0 when the provider leaves them out.
    pub progress_percentage: Value,
    pub verification_started_at: Option<Value>,
    pub verification_ended_at: Option<Value>,
    pub estimated_time_remaining: Option<Value>,
    pub created_at: Option<Value>,
    pub updated_at: Option<Value>,
}

/// One page of bulk results.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResultsPage {
    pub task_id: String,
    /// Both counts are the size of this page, not of the whole task.
    pub total_results: usize,
    pub returned_results: usize,
    pub offset: u64,
    pub limit: u32,
    pub filter_status: String,
    pub results: Vec<VerificationResult>,
}

/// Output of the bulk poll flow: the last task snapshot plus the fetched page.
///
/// `results` stays empty unless the task completed within the deadline.
#[derive(Debug, Clone, Serialize)]
pub struct BulkPollReport {
    #[serde(flatten)]
    pub task: BulkTaskStatus,
    pub total_results: usize,
    pub returned_results: usize,
    pub offset: u64,
    pub limit: u32,
    pub filter_status: String,
    pub results: Vec<VerificationResult>,
}

/// Output of a result-by-email lookup on a bulk task.
#[derive(Debug, Clone, Serialize)]
pub struct BulkEmailLookup {
    /// Task id.
    pub id: String,
    pub request_id: Option<Value>,
    pub status: Option<String>,
    pub message: String,
    pub offset: u64,
    pub limit: u32,
    /// Zero means [`OutcomeStatus::NoEmailMatch`] unless the task is still running.
    pub total_matched: usize,
    pub results: Vec<VerificationResult>,
}

/// Confirmation returned after a bulk task was deleted.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeletion {
    pub task_id: String,
    /// `"success"` unless the provider says otherwise.
    pub status: Value,
    pub message: String,
    pub deleted_at: Option<Value>,
    pub emails_deleted: Value,
    pub storage_freed: Option<Value>,
}
