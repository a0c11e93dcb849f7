//! Static dropdown choices for the workflow host's dynamic form fields.

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use super::validator::Payload;
use crate::provider::FilterStatus;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContentObject {
    pub content_object_name: String,
    pub data: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct ContentCatalog {
    pub content_objects: Vec<ContentObject>,
}

fn filter_label(filter: FilterStatus) -> &'static str {
    match filter {
        FilterStatus::All => "All results",
        FilterStatus::Deliverable => "Deliverable",
        FilterStatus::Undeliverable => "Undeliverable",
        FilterStatus::Risky => "Risky",
        FilterStatus::Unknown => "Unknown",
    }
}

static CATALOG: Lazy<Vec<(&'static str, Vec<Choice>)>> = Lazy::new(|| {
    vec![
        (
            "filter_status",
            FilterStatus::ALL
                .iter()
                .map(|f| Choice {
                    value: f.as_str(),
                    label: filter_label(*f),
                })
                .collect(),
        ),
        (
            "confirm_delete",
            vec![
                Choice {
                    value: "true",
                    label: "Yes, delete the task",
                },
                Choice {
                    value: "false",
                    label: "No, keep the task",
                },
            ],
        ),
    ]
});

/// Requested field names, given either as plain strings or as `{ "id": ... }` objects.
fn requested_names(input: &Payload) -> Vec<String> {
    match input.get("content_object_names") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("id").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Looks up each requested name in the catalog. Unknown names are skipped.
pub fn lookup(input: &Payload) -> ContentCatalog {
    let content_objects = requested_names(input)
        .into_iter()
        .filter_map(|name| {
            CATALOG
                .iter()
                .find(|(known, _)| *known == name)
                .map(|(_, data)| ContentObject {
                    content_object_name: name,
                    data: data.clone(),
                })
        })
        .collect();
    ContentCatalog { content_objects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_strings_and_id_objects() {
        let catalog = lookup(&payload(json!({
            "content_object_names": ["filter_status", {"id": "confirm_delete"}, "nope"]
        })));
        let names: Vec<&str> = catalog
            .content_objects
            .iter()
            .map(|c| c.content_object_name.as_str())
            .collect();
        assert_eq!(names, vec!["filter_status", "confirm_delete"]);
        assert_eq!(catalog.content_objects[0].data.len(), 5);
        assert_eq!(catalog.content_objects[0].data[0].value, "all");
    }

    #[test]
    fn missing_names_yield_empty_catalog() {
        assert!(lookup(&payload(json!({}))).content_objects.is_empty());
        assert!(lookup(&payload(json!({"content_object_names": "filter_status"})))
            .content_objects
            .is_empty());
    }
}
