//! Bulk task poll loop: check status at a fixed interval until the task completes,
//! fails, or the deadline passes.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::classifier::{normalize_status, task_phase, TaskPhase};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::provider::types::{RawBulkDump, RawBulkStatus};
use crate::provider::{BulkTaskApi, ResultsPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            deadline: Duration::from_secs(60),
        }
    }
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
            deadline: config.poll_deadline,
        }
    }
}

/// Terminal state of one run of the loop. Each variant carries the last status snapshot.
#[derive(Debug)]
pub enum PollOutcome {
    Completed {
        status: RawBulkStatus,
        results: RawBulkDump,
    },
    Failed {
        status: RawBulkStatus,
    },
    TimedOut {
        status: RawBulkStatus,
    },
    Cancelled {
        status: RawBulkStatus,
    },
}

impl PollOutcome {
    pub fn status(&self) -> &RawBulkStatus {
        match self {
            PollOutcome::Completed { status, .. }
            | PollOutcome::Failed { status }
            | PollOutcome::TimedOut { status }
            | PollOutcome::Cancelled { status } => status,
        }
    }
}

/// Polls `page.task_id` until it reaches a terminal state, then fetches `page` once.
///
/// Provider errors abort the loop; only "still in progress" is retried. Progress is not
/// kept anywhere, so callers resume by supplying the same task id again.
pub async fn poll_bulk_task(
    api: &dyn BulkTaskApi,
    token: &str,
    page: &ResultsPage,
    settings: PollSettings,
    cancel: &CancellationToken,
) -> Result<PollOutcome> {
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let status = api.bulk_status(token, &page.task_id).await?;
        let normalized = normalize_status(status.status.as_deref());

        tracing::debug!(
            target: "bulk_poll",
            task_id = %page.task_id,
            attempt,
            status = %normalized,
            elapsed = ?started.elapsed(),
            "Polled bulk task"
        );

        match task_phase(&normalized) {
            TaskPhase::Completed => {
                tracing::info!(target: "bulk_poll", task_id = %page.task_id, attempt, "Bulk task completed, fetching results");
                let results = api.bulk_dump(token, page).await?;
                return Ok(PollOutcome::Completed { status, results });
            }
            TaskPhase::Failed => {
                tracing::warn!(target: "bulk_poll", task_id = %page.task_id, status = %normalized, "Bulk task ended without results");
                return Ok(PollOutcome::Failed { status });
            }
            TaskPhase::InProgress => {}
        }

        if started.elapsed() >= settings.deadline {
            tracing::info!(
                target: "bulk_poll",
                task_id = %page.task_id,
                attempt,
                "Polling deadline reached, task still processing"
            );
            return Ok(PollOutcome::TimedOut { status });
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(target: "bulk_poll", task_id = %page.task_id, "Polling cancelled");
                return Ok(PollOutcome::Cancelled { status });
            }
            _ = tokio::time::sleep(settings.interval) => {}
        }
    }
}
