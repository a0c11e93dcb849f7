//! Pure mapping from validated inputs to provider calls.
//!
//! Nothing here touches the network; [`super::BounceBanClient`] executes the result.

use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

/// Provider endpoints, relative to the configured base URL (`.../v1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Check,
    VerifySingle,
    VerifySingleStatus,
    VerifyBulk,
    VerifyBulkStatus,
    VerifyBulkDump,
    VerifyBulkEmails,
    VerifyBulkDestroy,
}

impl Endpoint {
    /// Path relative to the base URL, without a leading slash.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Check => "check",
            Endpoint::VerifySingle => "verify/single",
            Endpoint::VerifySingleStatus => "verify/single/status",
            Endpoint::VerifyBulk => "verify/bulk",
            Endpoint::VerifyBulkStatus => "verify/bulk/status",
            Endpoint::VerifyBulkDump => "verify/bulk/dump",
            Endpoint::VerifyBulkEmails => "verify/bulk/emails",
            Endpoint::VerifyBulkDestroy => "verify/bulk/destroy",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::VerifyBulk | Endpoint::VerifyBulkEmails | Endpoint::VerifyBulkDestroy => {
                Method::POST
            }
            _ => Method::GET,
        }
    }

    /// Bulk submission and results dumps move large payloads and get the longer timeout.
    fn is_bulk_transfer(&self) -> bool {
        matches!(self, Endpoint::VerifyBulk | Endpoint::VerifyBulkDump)
    }
}

/// Per-call timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Lookups, status checks and small POSTs.
    pub lookup: Duration,
    /// Bulk submission and results dumps.
    pub bulk: Duration,
}

impl Timeouts {
    fn for_endpoint(&self, endpoint: Endpoint) -> Duration {
        if endpoint.is_bulk_transfer() {
            self.bulk
        } else {
            self.lookup
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            lookup: Duration::from_secs(30),
            bulk: Duration::from_secs(60),
        }
    }
}

/// A single provider call: one attempt, no retries.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(&'static str, String)>,
    /// JSON body; `Some` only for POST endpoints.
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl ProviderRequest {
    fn get(endpoint: Endpoint, query: Vec<(&'static str, String)>, timeouts: &Timeouts) -> Self {
        Self {
            endpoint,
            query,
            body: None,
            timeout: timeouts.for_endpoint(endpoint),
        }
    }

    fn post(endpoint: Endpoint, body: Value, timeouts: &Timeouts) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            body: Some(body),
            timeout: timeouts.for_endpoint(endpoint),
        }
    }
}

/// What the generic check operation looks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckTarget {
    Email(String),
    Domain(String),
}

impl CheckTarget {
    /// Anything containing `@` is checked as an email, everything else as a domain.
    pub fn classify(query: &str) -> Self {
        if query.contains('@') {
            CheckTarget::Email(query.to_string())
        } else {
            CheckTarget::Domain(query.to_string())
        }
    }
}

/// Result categories the provider can filter a dump by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterStatus {
    #[default]
    All,
    Deliverable,
    Undeliverable,
    Risky,
    Unknown,
}

impl FilterStatus {
    pub const ALL: [FilterStatus; 5] = [
        FilterStatus::All,
        FilterStatus::Deliverable,
        FilterStatus::Undeliverable,
        FilterStatus::Risky,
        FilterStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterStatus::All => "all",
            FilterStatus::Deliverable => "deliverable",
            FilterStatus::Undeliverable => "undeliverable",
            FilterStatus::Risky => "risky",
            FilterStatus::Unknown => "unknown",
        }
    }

    /// Exact, case-sensitive match against [`FilterStatus::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }
}

/// One page of a bulk task's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPage {
    pub task_id: String,
    pub offset: u64,
    pub limit: u32,
    pub filter: FilterStatus,
}

/// `GET /check?email=` or `GET /check?domain=`.
pub fn check(target: &CheckTarget, timeouts: &Timeouts) -> ProviderRequest {
    let query = match target {
        CheckTarget::Email(email) => vec![("email", email.clone())],
        CheckTarget::Domain(domain) => vec![("domain", domain.clone())],
    };
    ProviderRequest::get(Endpoint::Check, query, timeouts)
}

/// `GET /verify/single?email=`. The provider answers with either a verdict or a pending id.
pub fn verify_single(email: &str, timeouts: &Timeouts) -> ProviderRequest {
    ProviderRequest::get(
        Endpoint::VerifySingle,
        vec![("email", email.to_string())],
        timeouts,
    )
}

pub fn verify_single_status(verification_id: &str, timeouts: &Timeouts) -> ProviderRequest {
    ProviderRequest::get(
        Endpoint::VerifySingleStatus,
        vec![("id", verification_id.to_string())],
        timeouts,
    )
}

pub fn verify_bulk(name: &str, emails: &[String], timeouts: &Timeouts) -> ProviderRequest {
    ProviderRequest::post(
        Endpoint::VerifyBulk,
        json!({ "name": name, "emails": emails }),
        timeouts,
    )
}

pub fn verify_bulk_status(task_id: &str, timeouts: &Timeouts) -> ProviderRequest {
    ProviderRequest::get(
        Endpoint::VerifyBulkStatus,
        vec![("id", task_id.to_string())],
        timeouts,
    )
}

/// `filter` is only sent when it narrows the results.
pub fn verify_bulk_dump(page: &ResultsPage, timeouts: &Timeouts) -> ProviderRequest {
    let mut query = vec![
        ("id", page.task_id.clone()),
        ("offset", page.offset.to_string()),
        ("limit", page.limit.to_string()),
    ];
    if page.filter != FilterStatus::All {
        query.push(("filter", page.filter.as_str().to_string()));
    }
    ProviderRequest::get(Endpoint::VerifyBulkDump, query, timeouts)
}

pub fn verify_bulk_emails(task_id: &str, emails: &[String], timeouts: &Timeouts) -> ProviderRequest {
    ProviderRequest::post(
        Endpoint::VerifyBulkEmails,
        json!({ "id": task_id, "emails": emails }),
        timeouts,
    )
}

/// `POST /verify/bulk/destroy`, irreversible on the provider side.
pub fn verify_bulk_destroy(task_id: &str, timeouts: &Timeouts) -> ProviderRequest {
    ProviderRequest::post(
        Endpoint::VerifyBulkDestroy,
        json!({ "id": task_id }),
        timeouts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_routes_on_at_sign() {
        let t = Timeouts::default();
        let email = check(&CheckTarget::classify("user@example.com"), &t);
        assert_eq!(email.query, vec![("email", "user@example.com".to_string())]);
        assert_eq!(email.endpoint.method(), Method::GET);

        let domain = check(&CheckTarget::classify("example.com"), &t);
        assert_eq!(domain.query, vec![("domain", "example.com".to_string())]);
    }

    #[test]
    fn bulk_transfers_use_long_timeout() {
        let t = Timeouts::default();
        let emails = vec!["a@x.com".to_string()];
        let page = ResultsPage {
            task_id: "t".into(),
            offset: 0,
            limit: 10,
            filter: FilterStatus::All,
        };

        assert_eq!(verify_bulk("n", &emails, &t).timeout, Duration::from_secs(60));
        assert_eq!(verify_bulk_dump(&page, &t).timeout, Duration::from_secs(60));
        assert_eq!(verify_bulk_status("t", &t).timeout, Duration::from_secs(30));
        assert_eq!(verify_single("a@x.com", &t).timeout, Duration::from_secs(30));
        assert_eq!(verify_bulk_emails("t", &emails, &t).timeout, Duration::from_secs(30));
        assert_eq!(verify_bulk_destroy("t", &t).timeout, Duration::from_secs(30));
    }

    #[test]
    fn endpoints_keep_provider_paths_and_methods() {
        let table = [
            (Endpoint::Check, "check", Method::GET),
            (Endpoint::VerifySingle, "verify/single", Method::GET),
            (Endpoint::VerifySingleStatus, "verify/single/status", Method::GET),
            (Endpoint::VerifyBulk, "verify/bulk", Method::POST),
            (Endpoint::VerifyBulkStatus, "verify/bulk/status", Method::GET),
            (Endpoint::VerifyBulkDump, "verify/bulk/dump", Method::GET),
            (Endpoint::VerifyBulkEmails, "verify/bulk/emails", Method::POST),
            (Endpoint::VerifyBulkDestroy, "verify/bulk/destroy", Method::POST),
        ];
        for (endpoint, path, method) in table {
            assert_eq!(endpoint.path(), path);
            assert_eq!(endpoint.method(), method);
        }
    }

    #[test]
    fn dump_only_sends_filter_when_narrowed() {
        let t = Timeouts::default();
        let mut page = ResultsPage {
            task_id: "task-1".into(),
            offset: 20,
            limit: 50,
            filter: FilterStatus::All,
        };
        let all = verify_bulk_dump(&page, &t);
        assert!(all.query.iter().all(|(k, _)| *k != "filter"));
        assert!(all.query.contains(&("offset", "20".to_string())));
        assert!(all.query.contains(&("limit", "50".to_string())));

        page.filter = FilterStatus::Risky;
        let risky = verify_bulk_dump(&page, &t);
        assert!(risky.query.contains(&("filter", "risky".to_string())));
    }

    #[test]
    fn bulk_submit_body_carries_name_and_emails() {
        let req = verify_bulk(
            "T",
            &["a@x.com".to_string(), "b@x.com".to_string()],
            &Timeouts::default(),
        );
        assert_eq!(
            req.body,
            Some(json!({"name": "T", "emails": ["a@x.com", "b@x.com"]}))
        );
        assert!(req.query.is_empty());
    }

    #[test]
    fn filter_status_parses_known_values_only() {
        assert_eq!(FilterStatus::parse("risky"), Some(FilterStatus::Risky));
        assert_eq!(FilterStatus::parse("all"), Some(FilterStatus::All));
        assert_eq!(FilterStatus::parse("Risky"), None);
        assert_eq!(FilterStatus::parse("catchall"), None);
    }
}
