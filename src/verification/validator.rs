//! Input validation for every operation.
//!
//! Call sites disagree on how strictly pagination and filters are checked, so the
//! policy is chosen explicitly per operation through [`PaginationPolicy`] and
//! [`FilterPolicy`].

use serde_json::{Map, Value};

use crate::core::error::ValidationError;
use crate::provider::{FilterStatus, ResultsPage};
use crate::utils::email::{has_address_shape, split_address_block};

/// Inbound JSON body.
pub type Payload = Map<String, Value>;

pub type Validated<T> = std::result::Result<T, ValidationError>;

pub const MAX_BULK_EMAILS: usize = 500_000;
pub const DEFAULT_OFFSET: u64 = 0;
pub const DEFAULT_LIMIT: u32 = 1000;
pub const MAX_LIMIT: u32 = 10_000;
pub const DEFAULT_TASK_NAME: &str = "Bulk Verification Task";

/// How out-of-range `offset`/`limit` values are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPolicy {
    /// Reject the request (direct results fetch and email lookup).
    Strict,
    /// Fall back to `offset = 0`, `limit = 1000` (poll flow).
    ClampToDefaults,
}

/// How an unknown `filter_status` is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPolicy {
    /// Reject the request (direct results fetch).
    Reject,
    /// Treat the filter as `all` (poll flow).
    ResetToAll,
}

/// Single-email operation mode. The presence of an id switches the handler into polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleRequest {
    /// Submit a new address.
    Submit { email: String },
    /// Poll a verification already under way.
    Status { verification_id: String },
}

/// Bulk poll-flow entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkEntry {
    /// Create a task, then poll it.
    Submit { name: String, emails: Vec<String> },
    /// Poll an existing task.
    Resume { task_id: String },
}

/// Returns the first listed key holding a non-empty string (numbers are accepted as ids).
fn text_field(input: &Payload, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match input.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

enum IntField {
    Missing,
    Int(i64),
    Invalid,
}

fn int_field(input: &Payload, key: &str) -> IntField {
    match input.get(key) {
        None | Some(Value::Null) => IntField::Missing,
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                IntField::Int(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        IntField::Int(f as i64)
                    }
                    _ => IntField::Invalid,
                }
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(IntField::Int)
            .unwrap_or(IntField::Invalid),
        Some(_) => IntField::Invalid,
    }
}

/// `check`: any non-empty `query` string.
pub fn check_query(input: &Payload) -> Validated<String> {
    match input.get("query") {
        Some(Value::String(q)) if !q.is_empty() => Ok(q.clone()),
        _ => Err(ValidationError::new("Email or domain is required.")),
    }
}

/// A `verification_id` (or `id`) polls an earlier submission; otherwise `email` is
/// required and must look like an address.
pub fn single_request(input: &Payload) -> Validated<SingleRequest> {
    if let Some(verification_id) = text_field(input, &["verification_id", "id"]) {
        return Ok(SingleRequest::Status { verification_id });
    }

    let email = match input.get("email") {
        Some(Value::String(e)) if !e.is_empty() => e.clone(),
        _ => return Err(ValidationError::new("Email is required")),
    };
    if !has_address_shape(&email) {
        return Err(ValidationError::new("A valid email address is required"));
    }
    Ok(SingleRequest::Submit { email })
}

/// `task_id`, falling back to `id`.
pub fn task_id(input: &Payload) -> Validated<String> {
    text_field(input, &["task_id", "id"]).ok_or_else(|| ValidationError::new("Task ID is required"))
}

/// Non-blank `task_name`, or "Bulk Verification Task".
pub fn task_name(input: &Payload) -> String {
    match input.get("task_name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        _ => DEFAULT_TASK_NAME.to_string(),
    }
}

/// Bulk submission list: a JSON array or a newline-delimited string, blanks trimmed away.
pub fn bulk_emails(input: &Payload) -> Validated<Vec<String>> {
    let emails = match input.get("emails") {
        None | Some(Value::Null) => return Err(ValidationError::new("Emails list is required")),
        Some(Value::String(block)) => split_address_block(block),
        Some(Value::Array(items)) => {
            let mut emails = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => {
                        let trimmed = s.trim();
                        if !trimmed.is_empty() {
                            emails.push(trimmed.to_string());
                        }
                    }
                    Value::Null => {}
                    _ => {
                        return Err(ValidationError::new("Emails must be provided as a list"));
                    }
                }
            }
            emails
        }
        Some(_) => return Err(ValidationError::new("Emails must be provided as a list")),
    };

    if emails.is_empty() {
        return Err(ValidationError::new("Emails list is required"));
    }
    if emails.len() > MAX_BULK_EMAILS {
        return Err(ValidationError::new(
            "Maximum 500,000 emails allowed per bulk task",
        ));
    }
    Ok(emails)
}

fn emails_supplied(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(block)) => !block.trim().is_empty(),
        Some(Value::Array(items)) => items.iter().any(|item| match item {
            Value::String(s) => !s.trim().is_empty(),
            Value::Null => false,
            _ => true,
        }),
        Some(_) => true,
    }
}

/// Decides between a fresh submission and resuming an existing task.
///
/// Supplied emails always mean a new submission; otherwise a task id resumes polling.
/// Blank strings and lists holding only blanks count as not supplied.
pub fn bulk_entry(input: &Payload) -> Validated<BulkEntry> {
    if !emails_supplied(input.get("emails")) {
        if let Some(task_id) = text_field(input, &["task_id", "id"]) {
            return Ok(BulkEntry::Resume { task_id });
        }
    }
    Ok(BulkEntry::Submit {
        name: task_name(input),
        emails: bulk_emails(input)?,
    })
}

/// Email lookup list: a non-empty array whose every element is a string containing `@`.
pub fn lookup_emails(input: &Payload) -> Validated<Vec<String>> {
    let invalid = || ValidationError::new("A valid list of email addresses is required");
    let items = match input.get("emails") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(invalid()),
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) if s.contains('@') => Ok(s.clone()),
            _ => Err(invalid()),
        })
        .collect()
}

/// `(offset, limit)`, defaulting to `(0, 1000)`. Valid limits are 1 to 10000.
pub fn pagination(input: &Payload, policy: PaginationPolicy) -> Validated<(u64, u32)> {
    let offset = match (int_field(input, "offset"), policy) {
        (IntField::Missing, _) => DEFAULT_OFFSET,
        (IntField::Int(n), _) if n >= 0 => n as u64,
        (_, PaginationPolicy::Strict) => {
            return Err(ValidationError::new("Offset must be 0 or greater"));
        }
        (_, PaginationPolicy::ClampToDefaults) => DEFAULT_OFFSET,
    };

    let limit = match (int_field(input, "limit"), policy) {
        (IntField::Missing, _) => DEFAULT_LIMIT,
        (IntField::Int(n), _) if (1..=i64::from(MAX_LIMIT)).contains(&n) => n as u32,
        (_, PaginationPolicy::Strict) => {
            return Err(ValidationError::new("Limit must be between 1 and 10000"));
        }
        (_, PaginationPolicy::ClampToDefaults) => DEFAULT_LIMIT,
    };

    Ok((offset, limit))
}

/// Missing or null means `all`; anything outside [`FilterStatus::ALL`] is handled per `policy`.
pub fn filter_status(input: &Payload, policy: FilterPolicy) -> Validated<FilterStatus> {
    let raw = match input.get("filter_status") {
        None | Some(Value::Null) => return Ok(FilterStatus::All),
        Some(Value::String(s)) => FilterStatus::parse(s),
        Some(_) => None,
    };
    match (raw, policy) {
        (Some(filter), _) => Ok(filter),
        (None, FilterPolicy::ResetToAll) => {
            tracing::debug!(target: "validation", "Unknown filter_status, using 'all'");
            Ok(FilterStatus::All)
        }
        (None, FilterPolicy::Reject) => {
            let allowed: Vec<&str> = FilterStatus::ALL.iter().map(|f| f.as_str()).collect();
            Err(ValidationError::new(format!(
                "Filter status must be one of: {}",
                allowed.join(", ")
            )))
        }
    }
}

pub fn results_page(
    input: &Payload,
    task_id: String,
    pagination_policy: PaginationPolicy,
    filter_policy: FilterPolicy,
) -> Validated<ResultsPage> {
    let (offset, limit) = pagination(input, pagination_policy)?;
    let filter = filter_status(input, filter_policy)?;
    Ok(ResultsPage {
        task_id,
        offset,
        limit,
        filter,
    })
}

/// Destroy requires `confirm_delete` to be explicitly true.
pub fn deletion_confirmed(input: &Payload) -> Validated<()> {
    let confirmed = match input.get("confirm_delete") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };
    if confirmed {
        Ok(())
    } else {
        Err(ValidationError::new("Deletion not confirmed")
            .with_message("Set confirm_delete to true to proceed with deletion"))
    }
}
