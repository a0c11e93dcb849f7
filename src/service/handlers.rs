//! Axum handlers. Each one parses the body, runs the matching [`Verifier`] operation
//! and always answers `200` with an envelope.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use super::SharedState;
use crate::core::error::{Result, ValidationError};
use crate::core::models::Envelope;
use crate::verification::validator::Payload;
use crate::verification::{payload_from, respond};

/// An empty body counts as an empty object; a body that is not JSON is rejected.
pub(crate) fn parse_payload(body: &Bytes) -> Result<Payload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "service", error = %e, "Rejected malformed JSON body");
        ValidationError::new("Request body must be valid JSON")
    })?;
    Ok(payload_from(Some(value)))
}

pub async fn check(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.check(&parse_payload(&body)?).await }.await)
}

pub async fn verify_single(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.verify_single(&parse_payload(&body)?).await }.await)
}

/// Blocks for up to the poll deadline. Shutdown cancels the request's child token and
/// ends the loop with the latest snapshot. A client that hangs up is only noticed when
/// hyper drops the connection future, so the loop may run to its deadline.
pub async fn verify_bulk(State(state): State<SharedState>, body: Bytes) -> Envelope {
    let cancel = state.shutdown.child_token();
    respond(
        async {
            let input = parse_payload(&body)?;
            state.verifier.verify_bulk(&input, &cancel).await
        }
        .await,
    )
}

pub async fn submit_bulk(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.submit_bulk(&parse_payload(&body)?).await }.await)
}

pub async fn bulk_status(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.bulk_status(&parse_payload(&body)?).await }.await)
}

pub async fn bulk_lookup(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.bulk_lookup(&parse_payload(&body)?).await }.await)
}

pub async fn bulk_results(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.bulk_results(&parse_payload(&body)?).await }.await)
}

pub async fn destroy_bulk(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(async { state.verifier.destroy_bulk(&parse_payload(&body)?).await }.await)
}

pub async fn content(State(state): State<SharedState>, body: Bytes) -> Envelope {
    respond(parse_payload(&body).and_then(|input| state.verifier.content(&input)))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    #[test]
    fn empty_body_is_empty_payload() {
        assert!(parse_payload(&Bytes::new()).unwrap().is_empty());
        assert!(parse_payload(&Bytes::from_static(b"  \n")).unwrap().is_empty());
    }

    #[test]
    fn non_object_json_is_empty_payload() {
        assert!(parse_payload(&Bytes::from_static(b"[1, 2]")).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = parse_payload(&Bytes::from_static(b"{oops")).unwrap_err();
        match err {
            AppError::Validation(v) => assert_eq!(v.error, "Request body must be valid JSON"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
