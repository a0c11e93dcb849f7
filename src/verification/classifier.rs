//! Maps provider status and result strings onto [`OutcomeStatus`].

use crate::core::models::OutcomeStatus;

const COMPLETED: &[&str] = &["completed", "complete", "finished"];
const FAILED: &[&str] = &["failed", "error", "cancelled"];
const IN_PROGRESS: &[&str] = &["processing", "running", "verifying", "waiting", "queued"];

/// Where a bulk task stands from the poll loop's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Completed,
    Failed,
    InProgress,
}

/// What an unrecognized status string turns into. Status endpoints keep waiting,
/// submit endpoints give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnrecognizedStatus {
    StillProcessing,
    Failed,
}

impl From<UnrecognizedStatus> for OutcomeStatus {
    fn from(value: UnrecognizedStatus) -> Self {
        match value {
            UnrecognizedStatus::StillProcessing => OutcomeStatus::StillProcessing,
            UnrecognizedStatus::Failed => OutcomeStatus::Failed,
        }
    }
}

pub fn normalize_status(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_lowercase()
}

/// Anything outside the completed and failed families counts as still running.
pub fn task_phase(status: &str) -> TaskPhase {
    let status = status.trim().to_lowercase();
    if COMPLETED.contains(&status.as_str()) {
        TaskPhase::Completed
    } else if FAILED.contains(&status.as_str()) {
        TaskPhase::Failed
    } else {
        TaskPhase::InProgress
    }
}

fn result_outcome(result: Option<&str>) -> OutcomeStatus {
    match normalize_status(result).as_str() {
        "undeliverable" | "invalid" => OutcomeStatus::Failed,
        // deliverable/valid, and risky/catchall/unknown count as success with caveats
        _ => OutcomeStatus::Success,
    }
}

/// Classifies a verification or task snapshot.
pub fn classify(
    status: Option<&str>,
    result: Option<&str>,
    unrecognized: UnrecognizedStatus,
) -> OutcomeStatus {
    let status = normalize_status(status);
    let status = status.as_str();
    if COMPLETED.contains(&status) || status == "success" {
        result_outcome(result)
    } else if FAILED.contains(&status) {
        OutcomeStatus::Failed
    } else if IN_PROGRESS.contains(&status) {
        OutcomeStatus::StillProcessing
    } else {
        unrecognized.into()
    }
}

/// Outcome of a result-by-email lookup. No matched items is its own outcome.
pub fn classify_lookup(status: Option<&str>, matched: usize) -> OutcomeStatus {
    if matched > 0 {
        OutcomeStatus::Success
    } else if IN_PROGRESS.contains(&normalize_status(status).as_str()) {
        OutcomeStatus::StillProcessing
    } else {
        OutcomeStatus::NoEmailMatch
    }
}
