//! `PUT /`: inbound topic commands.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use hometick_app::inbox::Payload;
use serde_json::Value;

use crate::state::AppState;

/// Decode the body as a JSON object and enqueue it.
///
/// Always answers `200 OK`; bodies that are not JSON objects and payloads
/// the inbox cannot take are logged and dropped.
pub async fn put_command(State(state): State<AppState>, body: Bytes) -> StatusCode {
    match decode(&body) {
        Some(payload) => {
            let topics = payload.len();
            match state.commands.submit(payload) {
                Ok(()) => tracing::debug!(topics, "queued inbound command"),
                Err(err) => tracing::warn!(error = %err, "dropping inbound command"),
            }
        }
        None => tracing::warn!(
            body = %String::from_utf8_lossy(&body),
            "ignoring body that is not a JSON object"
        ),
    }
    StatusCode::OK
}

fn decode(body: &[u8]) -> Option<Payload> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(payload)) => Some(payload),
        _ => None,
    }
}
