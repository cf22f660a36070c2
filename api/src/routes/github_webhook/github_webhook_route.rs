use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    dispatch::{self, BotEvent},
    error_handler::AppError,
    routes::github_webhook::signature::verify_signature,
};

/// Acknowledgement returned to GitHub.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,
    /// `true` when a comment is being prepared for this delivery.
    pub handled: bool,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

/// HTTP endpoint for GitHub webhook deliveries.
///
/// Verifies the signature (when a secret is configured), decodes the event
/// and acknowledges right away. The comment itself is produced on a
/// background task: `202` means one is on its way, `200` with
/// `handled: false` means the delivery was ignored.
#[instrument(name = "github_webhook_route", skip_all)]
pub async fn github_webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(event) = header_str(&headers, "X-GitHub-Event").map(str::to_string) else {
        return AppError::BadRequest("missing X-GitHub-Event header".into()).into_response();
    };
    let delivery = header_str(&headers, "X-GitHub-Delivery").map(str::to_string);

    info!(%event, delivery = delivery.as_deref().unwrap_or("-"), "received webhook event");

    // --- Validate signature ------------------------------------------------------
    if let Some(secret) = state.webhook_secret.as_deref() {
        let signature = header_str(&headers, "X-Hub-Signature-256");
        if let Err(e) = verify_signature(secret, &body, signature) {
            warn!(%event, error = %e, "rejected webhook delivery");
            return AppError::Unauthorized(e).into_response();
        }
    }

    // --- Decode and dispatch -----------------------------------------------------
    let parsed = match BotEvent::parse(&event, &body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%event, error = %e, "malformed webhook payload");
            return AppError::BadRequest(format!("malformed {event} payload: {e}")).into_response();
        }
    };

    let handled = parsed.is_some();
    let status = match parsed {
        Some(bot_event) => {
            debug!(kind = bot_event.kind(), "dispatching event");
            tokio::spawn(dispatch::handle(state.clone(), bot_event));
            StatusCode::ACCEPTED
        }
        None => {
            debug!(%event, "delivery ignored");
            StatusCode::OK
        }
    };

    ApiResponse::success(WebhookAck {
        event,
        delivery,
        handled,
    })
    .into_response_with_status(status)
}
