//! HTTP surface of the bot.
//!
//! Routes:
//!   * POST /webhook: GitHub deliveries
//!   * GET  /health: liveness

use std::{env, sync::Arc};

pub mod core;
pub mod dispatch;
pub mod error_handler;
pub mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::{
        github_webhook::github_webhook_route::github_webhook_route,
        health::health_route::health_route,
    },
};

/// Default listen address when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:3000";

/// Builds the router over an already prepared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(github_webhook_route))
        .route("/health", get(health_route))
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());
    let state = Arc::new(AppState::from_env()?);

    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening for webhooks");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use git_context_engine::{GitHubClient, ProviderConfig};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use snark_reviewer::Composer;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::github_webhook::signature::sign;

    const SECRET: &str = "topsecret";

    fn app(secret: Option<&str>) -> Router {
        let gh = GitHubClient::from_config(
            ProviderConfig::new("http://127.0.0.1:9", "ghp_test").unwrap(),
        )
        .unwrap();
        router(Arc::new(AppState::new(
            secret.map(str::to_string),
            gh,
            Composer::canned_only(),
        )))
    }

    fn delivery(event: &str, body: &str, signature: Option<String>) -> Request<Body> {
        let mut req = Request::post("/webhook")
            .header("X-GitHub-Event", event)
            .header("X-GitHub-Delivery", "d-1")
            .header("content-type", "application/json");
        if let Some(sig) = signature {
            req = req.header("X-Hub-Signature-256", sig);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_generation_state() {
        let resp = app(None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({ "success": true, "data": { "status": "ok", "generation_enabled": false } })
        );
    }

    #[tokio::test]
    async fn bad_signature_is_rejected() {
        let body = r#"{"zen":"hi"}"#;
        let resp = app(Some(SECRET))
            .oneshot(delivery("ping", body, Some(sign("wrong", body.as_bytes()).unwrap())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app(Some(SECRET))
            .oneshot(delivery("ping", body, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn signed_ping_is_acknowledged_and_ignored() {
        let body = r#"{"zen":"hi"}"#;
        let resp = app(Some(SECRET))
            .oneshot(delivery("ping", body, Some(sign(SECRET, body.as_bytes()).unwrap())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await["data"],
            json!({ "event": "ping", "delivery": "d-1", "handled": false })
        );
    }

    #[tokio::test]
    async fn closed_issue_is_ignored() {
        let body = json!({
            "action": "closed",
            "issue": { "number": 1, "title": "t" },
            "repository": { "full_name": "octo/hello" }
        })
        .to_string();
        let resp = app(None).oneshot(delivery("issues", &body, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["data"]["handled"], false);
    }

    #[tokio::test]
    async fn opened_issue_is_accepted() {
        let body = json!({
            "action": "opened",
            "issue": { "number": 1, "title": "bug" },
            "repository": { "full_name": "octo/hello" }
        })
        .to_string();
        let resp = app(None).oneshot(delivery("issues", &body, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(resp).await["data"]["handled"], true);
    }

    #[tokio::test]
    async fn malformed_payload_and_missing_event_are_bad_requests() {
        let resp = app(None).oneshot(delivery("issues", "{", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = Request::post("/webhook").body(Body::from("{}")).unwrap();
        let resp = app(None).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
