//! Field-by-field mapping from raw provider bodies to the bridge's output schema.

use serde_json::Value;

use crate::core::models::{
    BulkDeletion, BulkEmailLookup, BulkPollReport, BulkResultsPage, BulkSubmissionSummary,
    BulkTaskStatus, CheckSummary, SingleStatus, SingleSubmission, VerificationResult,
};
use crate::provider::types::{
    RawBulkDestroy, RawBulkDump, RawBulkEmails, RawBulkStatus, RawBulkSubmit, RawCheck,
    RawResultItem, RawSingle,
};
use crate::provider::ResultsPage;

fn or_zero(value: Option<Value>) -> Value {
    value.unwrap_or_else(|| Value::from(0))
}

pub fn check_summary(query: String, parsed: RawCheck, raw: Value) -> CheckSummary {
    CheckSummary {
        query,
        domain_type: parsed.domain_type,
        username_type: parsed.username_type,
        syntax_valid: parsed.syntax_valid,
        credits_consumed: parsed.credits_consumed,
        credits_remaining: parsed.credits_remaining,
        raw,
    }
}

/// The submit path reads the provider's `is_accept_all` into `is_catchall`.
pub fn single_submission(email: String, raw: RawSingle) -> SingleSubmission {
    SingleSubmission {
        email,
        verification_id: raw.id,
        status: raw.status,
        result: raw.result,
        result_code: raw.result_code,
        score: raw.score,
        is_catchall: raw.is_accept_all,
        is_disposable: raw.is_disposable,
        is_role: raw.is_role,
        is_free: raw.is_free,
        is_seg_protected: raw.is_seg_protected,
        message: raw.message,
        timestamp: raw.timestamp,
    }
}

/// The status path passes the provider's `is_catchall` through unchanged.
pub fn single_status(verification_id: String, raw: RawSingle) -> SingleStatus {
    SingleStatus {
        verification_id,
        email: raw.email,
        status: raw.status,
        result: raw.result,
        result_code: raw.result_code,
        score: raw.score,
        is_catchall: raw.is_catchall,
        is_disposable: raw.is_disposable,
        is_role: raw.is_role,
        is_free: raw.is_free,
        is_seg_protected: raw.is_seg_protected,
        message: raw.message,
        details: raw.details,
        mx_records: raw.mx_records,
        smtp_provider: raw.smtp_provider,
        timestamp: raw.timestamp,
        completed_at: raw.completed_at,
    }
}

pub fn bulk_submission(task_name: String, sent: usize, raw: RawBulkSubmit) -> BulkSubmissionSummary {
    BulkSubmissionSummary {
        task_id: raw.id,
        task_name,
        status: raw.status,
        count_submitted: raw.count_submitted.unwrap_or_else(|| Value::from(sent)),
        count_duplicates_removed: or_zero(raw.count_duplicates_removed),
        count_processing: raw.count_processing.unwrap_or_else(|| Value::from(sent)),
        message: raw
            .message
            .unwrap_or_else(|| "Bulk verification task created successfully".to_string()),
    }
}

pub fn bulk_status(task_id: String, raw: RawBulkStatus) -> BulkTaskStatus {
    BulkTaskStatus {
        task_id,
        task_name: raw.name,
        status: raw.status,
        count_total: or_zero(raw.count_total),
        count_checked: or_zero(raw.count_checked),
        count_remaining: or_zero(raw.count_remaining),
        progress_percentage: or_zero(raw.progress_percentage),
        verification_started_at: raw.verification_started_at,
        verification_ended_at: raw.verification_ended_at,
        estimated_time_remaining: raw.estimated_time_remaining,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

/// Renames the provider's `verify_at` to `verified_at`.
pub fn verification_result(raw: RawResultItem) -> VerificationResult {
    VerificationResult {
        email: raw.email,
        result: raw.result,
        result_code: raw.result_code,
        score: raw.score,
        is_catchall: raw.is_catchall,
        is_disposable: raw.is_disposable,
        is_role: raw.is_role,
        is_free: raw.is_free,
        is_seg_protected: raw.is_seg_protected,
        message: raw.message,
        mx_records: raw.mx_records,
        smtp_provider: raw.smtp_provider,
        verified_at: raw.verify_at,
    }
}

pub fn results_page(page: &ResultsPage, raw: RawBulkDump) -> BulkResultsPage {
    let results: Vec<VerificationResult> = raw.items.into_iter().map(verification_result).collect();
    BulkResultsPage {
        task_id: page.task_id.clone(),
        total_results: results.len(),
        returned_results: results.len(),
        offset: page.offset,
        limit: page.limit,
        filter_status: page.filter.as_str().to_string(),
        results,
    }
}

/// Combines the last status snapshot with the fetched page, if any.
pub fn poll_report(
    page: &ResultsPage,
    status: RawBulkStatus,
    results: Option<RawBulkDump>,
) -> BulkPollReport {
    let results: Vec<VerificationResult> = results
        .map(|dump| dump.items.into_iter().map(verification_result).collect())
        .unwrap_or_default();
    BulkPollReport {
        task: bulk_status(page.task_id.clone(), status),
        total_results: results.len(),
        returned_results: results.len(),
        offset: page.offset,
        limit: page.limit,
        filter_status: page.filter.as_str().to_string(),
        results,
    }
}

pub fn email_lookup(task_id: String, offset: u64, limit: u32, raw: RawBulkEmails) -> BulkEmailLookup {
    let results: Vec<VerificationResult> = raw.items.into_iter().map(verification_result).collect();
    BulkEmailLookup {
        id: task_id,
        request_id: raw.request_id,
        status: raw.status,
        message: raw
            .message
            .unwrap_or_else(|| "Result generation requested successfully".to_string()),
        offset,
        limit,
        total_matched: results.len(),
        results,
    }
}

pub fn deletion(task_id: String, raw: RawBulkDestroy) -> BulkDeletion {
    BulkDeletion {
        task_id,
        status: raw.status.unwrap_or_else(|| Value::from("success")),
        message: raw
            .message
            .unwrap_or_else(|| "Bulk verification task deleted successfully".to_string()),
        deleted_at: raw.deleted_at,
        emails_deleted: or_zero(raw.emails_deleted),
        storage_freed: raw.storage_freed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FilterStatus;
    use serde_json::json;

    fn raw<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn submit_path_reads_accept_all_as_catchall() {
        let out = single_submission(
            "a@x.com".into(),
            raw(json!({"id": "v1", "status": "completed", "is_accept_all": true, "is_catchall": false})),
        );
        assert_eq!(out.is_catchall, Some(json!(true)));
        assert_eq!(out.verification_id.as_deref(), Some("v1"));
    }

    #[test]
    fn status_path_passes_catchall_through() {
        let out = single_status(
            "v1".into(),
            raw(json!({"is_accept_all": true, "is_catchall": false, "details": {"smtp": 250}})),
        );
        assert_eq!(out.is_catchall, Some(json!(false)));
        assert_eq!(out.details, Some(json!({"smtp": 250})));
    }

    #[test]
    fn results_rename_verify_at() {
        let page = ResultsPage {
            task_id: "t".into(),
            offset: 0,
            limit: 1000,
            filter: FilterStatus::Deliverable,
        };
        let out = results_page(
            &page,
            raw(json!({"items": [
                {"email": "a@x.com", "result": "deliverable", "verify_at": "2024-01-01T00:00:00Z"},
                {"email": "b@x.com", "result": "risky"}
            ]})),
        );
        assert_eq!(out.total_results, 2);
        assert_eq!(out.filter_status, "deliverable");
        assert_eq!(out.results[0].verified_at, Some(json!("2024-01-01T00:00:00Z")));
        let rendered = serde_json::to_value(&out.results[0]).unwrap();
        assert!(rendered.get("verify_at").is_none());
        assert!(rendered.get("verified_at").is_some());
    }

    #[test]
    fn bulk_submission_defaults_counts_to_sent() {
        let out = bulk_submission("T".into(), 3, raw(json!({"id": "task-1"})));
        assert_eq!(out.count_submitted, json!(3));
        assert_eq!(out.count_processing, json!(3));
        assert_eq!(out.count_duplicates_removed, json!(0));
        assert_eq!(out.message, "Bulk verification task created successfully");
    }

    #[test]
    fn bulk_status_defaults_counts_to_zero() {
        let out = bulk_status("t".into(), raw(json!({"name": "N", "status": "queued"})));
        assert_eq!(out.count_total, json!(0));
        assert_eq!(out.progress_percentage, json!(0));
        assert_eq!(out.task_name.as_deref(), Some("N"));
    }

    #[test]
    fn poll_report_is_flat() {
        let page = ResultsPage {
            task_id: "t".into(),
            offset: 0,
            limit: 1000,
            filter: FilterStatus::All,
        };
        let report = poll_report(
            &page,
            raw(json!({"status": "completed", "count_total": 2})),
            Some(raw(json!({"items": [{"email": "a@x.com"}, {"email": "b@x.com"}]}))),
        );
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["task_id"], "t");
        assert_eq!(body["status"], "completed");
        assert_eq!(body["count_total"], 2);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);

        let pending = poll_report(&page, raw(json!({"status": "processing"})), None);
        assert!(pending.results.is_empty());
        assert_eq!(pending.total_results, 0);
    }

    #[test]
    fn deletion_defaults() {
        let out = deletion("t".into(), raw(json!({})));
        assert_eq!(out.status, json!("success"));
        assert_eq!(out.emails_deleted, json!(0));
        assert_eq!(out.message, "Bulk verification task deleted successfully");
    }
}
