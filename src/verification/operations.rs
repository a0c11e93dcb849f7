//! One method per inbound operation.
//!
//! Every method runs the same pipeline: validate the payload, resolve the API key,
//! make the provider call(s), normalize the body, classify the outcome. Validation and
//! credential failures return before anything is sent to the provider.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::classifier::{classify, classify_lookup, normalize_status, UnrecognizedStatus};
use super::content;
use super::credentials::{Credential, CredentialResolver};
use super::normalize;
use super::poll::{poll_bulk_task, PollOutcome, PollSettings};
use super::validator::{
    self, BulkEntry, FilterPolicy, PaginationPolicy, Payload, SingleRequest,
};
use crate::core::config::Config;
use crate::core::error::{AppError, Result};
use crate::core::models::{Envelope, OutcomeStatus};
use crate::provider::requests::{self, CheckTarget};
use crate::provider::types::{
    RawBulkDestroy, RawBulkEmails, RawBulkStatus, RawBulkSubmit, RawCheck, RawSingle,
};
use crate::provider::{BounceBanClient, ResultsPage};

#[derive(Clone)]
pub struct Verifier {
    client: BounceBanClient,
    credentials: CredentialResolver,
    poll: PollSettings,
}

impl Verifier {
    pub fn new(client: BounceBanClient, credentials: CredentialResolver, poll: PollSettings) -> Self {
        Self {
            client,
            credentials,
            poll,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            BounceBanClient::new(config)?,
            CredentialResolver::new(config.fallback_api_key.clone()),
            PollSettings::from(config),
        ))
    }

    fn credential(&self, input: &Payload) -> Result<Credential> {
        self.credentials.resolve(input.get("api_connection"))
    }

    /// Generic lookup of an email address or a domain.
    pub async fn check(&self, input: &Payload) -> Result<Envelope> {
        let query = validator::check_query(input)?;
        let credential = self.credential(input)?;

        let target = CheckTarget::classify(&query);
        let kind = match target {
            CheckTarget::Email(_) => "email",
            CheckTarget::Domain(_) => "domain",
        };
        tracing::info!(target: "verify", kind, "Running check");
        let raw = self
            .client
            .send(credential.token(), &requests::check(&target, self.client.timeouts()))
            .await?;
        let parsed: RawCheck = crate::provider::client::decode(raw.clone())?;

        Envelope::new(
            &normalize::check_summary(query, parsed, raw),
            OutcomeStatus::Success,
        )
    }

    /// Submits a single address, or polls an earlier verification when an id is given.
    pub async fn verify_single(&self, input: &Payload) -> Result<Envelope> {
        let request = validator::single_request(input)?;
        let credential = self.credential(input)?;
        let timeouts = self.client.timeouts();

        match request {
            SingleRequest::Submit { email } => {
                let raw: RawSingle = self
                    .client
                    .call(credential.token(), &requests::verify_single(&email, timeouts))
                    .await?;
                let outcome = classify(
                    raw.status.as_deref(),
                    raw.result.as_deref(),
                    UnrecognizedStatus::Failed,
                );
                tracing::info!(target: "verify", %outcome, "Single verification submitted");
                Envelope::new(&normalize::single_submission(email, raw), outcome)
            }
            SingleRequest::Status { verification_id } => {
                let raw: RawSingle = self
                    .client
                    .call(
                        credential.token(),
                        &requests::verify_single_status(&verification_id, timeouts),
                    )
                    .await?;
                let outcome = classify(
                    raw.status.as_deref(),
                    raw.result.as_deref(),
                    UnrecognizedStatus::StillProcessing,
                );
                let verification_status = raw.result.clone().unwrap_or_else(|| "unknown".into());
                tracing::info!(target: "verify", %outcome, "Single verification status fetched");
                Ok(Envelope::new(&normalize::single_status(verification_id, raw), outcome)?
                    .with_meta("verification_status", verification_status))
            }
        }
    }

    /// Submits a bulk task (or resumes an existing one) and polls it until it finishes,
    /// fails, or the deadline passes. A completed task returns one page of results.
    pub async fn verify_bulk(&self, input: &Payload, cancel: &CancellationToken) -> Result<Envelope> {
        let entry = validator::bulk_entry(input)?;
        let page_input = validator::results_page(
            input,
            String::new(),
            PaginationPolicy::ClampToDefaults,
            FilterPolicy::ResetToAll,
        )?;
        let credential = self.credential(input)?;

        let task_id = match entry {
            BulkEntry::Resume { task_id } => {
                tracing::info!(target: "verify", %task_id, "Resuming poll of existing bulk task");
                task_id
            }
            BulkEntry::Submit { name, emails } => {
                let raw = self.submit(&credential, &name, &emails).await?;
                raw.id.ok_or_else(|| {
                    AppError::Unexpected("Provider did not return a task id".to_string())
                })?
            }
        };

        let page = ResultsPage {
            task_id,
            ..page_input
        };
        let outcome =
            poll_bulk_task(&self.client, credential.token(), &page, self.poll, cancel).await?;

        let task_status = normalize_status(outcome.status().status.as_deref());
        let (status, raw_status, results) = match outcome {
            PollOutcome::Completed { status, results } => {
                (OutcomeStatus::Success, status, Some(results))
            }
            PollOutcome::Failed { status } => (OutcomeStatus::Failed, status, None),
            PollOutcome::TimedOut { status } | PollOutcome::Cancelled { status } => {
                (OutcomeStatus::StillProcessing, status, None)
            }
        };

        Ok(
            Envelope::new(&normalize::poll_report(&page, raw_status, results), status)?
                .with_meta("task_status", task_status),
        )
    }

    async fn submit(&self, credential: &Credential, name: &str, emails: &[String]) -> Result<RawBulkSubmit> {
        tracing::info!(target: "verify", task_name = name, count = emails.len(), "Submitting bulk task");
        self.client
            .call(
                credential.token(),
                &requests::verify_bulk(name, emails, self.client.timeouts()),
            )
            .await
    }

    /// Creates a bulk task and returns the provider's creation snapshot without polling.
    pub async fn submit_bulk(&self, input: &Payload) -> Result<Envelope> {
        let name = validator::task_name(input);
        let emails = validator::bulk_emails(input)?;
        let credential = self.credential(input)?;

        let raw = self.submit(&credential, &name, &emails).await?;
        Envelope::new(
            &normalize::bulk_submission(name, emails.len(), raw),
            OutcomeStatus::Success,
        )
    }

    /// One status check of a bulk task.
    pub async fn bulk_status(&self, input: &Payload) -> Result<Envelope> {
        let task_id = validator::task_id(input)?;
        let credential = self.credential(input)?;

        let raw: RawBulkStatus = self
            .client
            .call(
                credential.token(),
                &requests::verify_bulk_status(&task_id, self.client.timeouts()),
            )
            .await?;
        let task_status = normalize_status(raw.status.as_deref());
        let outcome = classify(raw.status.as_deref(), None, UnrecognizedStatus::StillProcessing);

        Ok(Envelope::new(&normalize::bulk_status(task_id, raw), outcome)?
            .with_meta("task_status", task_status))
    }

    /// One page of a bulk task's results, with strict pagination and filter checks.
    pub async fn bulk_results(&self, input: &Payload) -> Result<Envelope> {
        let task_id = validator::task_id(input)?;
        let page = validator::results_page(
            input,
            task_id,
            PaginationPolicy::Strict,
            FilterPolicy::Reject,
        )?;
        let credential = self.credential(input)?;

        let raw = self
            .client
            .call(
                credential.token(),
                &requests::verify_bulk_dump(&page, self.client.timeouts()),
            )
            .await?;
        Envelope::new(&normalize::results_page(&page, raw), OutcomeStatus::Success)
    }

    /// Looks up the results of specific addresses inside a bulk task.
    pub async fn bulk_lookup(&self, input: &Payload) -> Result<Envelope> {
        let emails = validator::lookup_emails(input)?;
        let task_id = validator::task_id(input)?;
        let (offset, limit) = validator::pagination(input, PaginationPolicy::Strict)?;
        let credential = self.credential(input)?;

        let raw: RawBulkEmails = self
            .client
            .call(
                credential.token(),
                &requests::verify_bulk_emails(&task_id, &emails, self.client.timeouts()),
            )
            .await?;
        let lookup = normalize::email_lookup(task_id, offset, limit, raw);
        let outcome = classify_lookup(lookup.status.as_deref(), lookup.total_matched);
        if outcome == OutcomeStatus::NoEmailMatch {
            tracing::info!(target: "verify", requested = emails.len(), "No results matched the requested emails");
        }
        Envelope::new(&lookup, outcome)
    }

    /// Deletes a bulk task. Requires an explicit `confirm_delete`.
    pub async fn destroy_bulk(&self, input: &Payload) -> Result<Envelope> {
        let task_id = validator::task_id(input)?;
        validator::deletion_confirmed(input)?;
        let credential = self.credential(input)?;

        let raw: RawBulkDestroy = self
            .client
            .call(
                credential.token(),
                &requests::verify_bulk_destroy(&task_id, self.client.timeouts()),
            )
            .await
            .map_err(|err| match err {
                AppError::ProviderHttp { status: 404, .. } => AppError::TaskNotFound,
                other => other,
            })?;
        tracing::info!(target: "verify", %task_id, "Bulk task deleted");
        Envelope::new(&normalize::deletion(task_id, raw), OutcomeStatus::Success)
    }

    /// Static dropdown choices; no provider call and no credential needed.
    pub fn content(&self, input: &Payload) -> Result<Envelope> {
        Envelope::new(&content::lookup(input), OutcomeStatus::Success)
    }
}

/// Turns an operation result into the envelope sent back to the host.
pub fn respond(result: Result<Envelope>) -> Envelope {
    result.unwrap_or_else(|err| {
        match &err {
            AppError::Validation(_) | AppError::MissingCredential => {
                tracing::debug!(target: "verify", error = %err, "Request rejected");
            }
            _ => tracing::warn!(target: "verify", error = %err, "Operation failed"),
        }
        err.into_envelope()
    })
}

/// Empty body, or anything that is not a JSON object, is treated as no fields at all.
pub fn payload_from(value: Option<Value>) -> Payload {
    match value {
        Some(Value::Object(map)) => map,
        _ => Payload::new(),
    }
}
