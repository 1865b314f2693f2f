use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::DomainManager;
use crate::notice::{Notice, NoticeBoard};
use crate::view::View;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppContext {
    pub manager: Arc<DomainManager>,
    pub notices: Arc<NoticeBoard>,
}

/// Result of a user action: notices it raised plus the screen afterwards
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub notices: Vec<NoticeMessage>,
    pub view: View,
}

#[derive(Debug, Serialize)]
pub struct NoticeMessage {
    pub kind: Notice,
    pub message: &'static str,
}

/// Form field changes; missing fields are left alone
#[derive(Debug, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub record: Option<String>,
}

/// Build the application router with all routes
pub fn create_router(manager: Arc<DomainManager>, notices: Arc<NoticeBoard>) -> Router {
    let state = AppContext { manager, notices };

    Router::new()
        // Plain-text rendering of the current screen
        .route("/", get(render_text))
        .route("/state", get(render_json))
        .route("/connect", post(connect))
        .route("/network/switch", post(switch_network))
        .route("/form", post(update_form))
        .route("/submit", post(submit))
        .route("/mints/refresh", post(refresh_mints))
        .route("/mints/:id/edit", post(edit_mint))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl AppContext {
    fn respond(&self) -> Json<ActionResponse> {
        let notices = self
            .notices
            .drain()
            .into_iter()
            .map(|kind| NoticeMessage {
                kind,
                message: kind.message(),
            })
            .collect();

        Json(ActionResponse {
            notices,
            view: self.manager.view(),
        })
    }
}

async fn render_text(State(ctx): State<AppContext>) -> String {
    ctx.manager.view().to_string()
}

async fn render_json(State(ctx): State<AppContext>) -> Json<View> {
    Json(ctx.manager.view())
}

async fn connect(State(ctx): State<AppContext>) -> Json<ActionResponse> {
    ctx.manager.connect().await;
    ctx.respond()
}

async fn switch_network(State(ctx): State<AppContext>) -> Json<ActionResponse> {
    ctx.manager.switch_network().await;
    ctx.respond()
}

async fn update_form(
    State(ctx): State<AppContext>,
    Json(input): Json<FormInput>,
) -> Json<ActionResponse> {
    if let Some(domain) = input.domain {
        ctx.manager.set_domain(domain);
    }
    if let Some(record) = input.record {
        ctx.manager.set_record(record);
    }
    ctx.respond()
}

/// Mint or update, depending on whether an entry is being edited.
///
/// Resolves once the transactions are confirmed.
async fn submit(State(ctx): State<AppContext>) -> Json<ActionResponse> {
    ctx.manager.submit().await;
    ctx.respond()
}

async fn refresh_mints(State(ctx): State<AppContext>) -> impl IntoResponse {
    if !ctx.manager.is_on_required_network() {
        return (StatusCode::CONFLICT, ctx.respond());
    }
    ctx.manager.fetch_mints().await;
    (StatusCode::OK, ctx.respond())
}

async fn edit_mint(State(ctx): State<AppContext>, Path(id): Path<usize>) -> impl IntoResponse {
    if ctx.manager.edit(id) {
        (StatusCode::OK, ctx.respond())
    } else {
        tracing::warn!(id, "No listed domain with that id");
        (StatusCode::NOT_FOUND, ctx.respond())
    }
}

/// Health check handler
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::WalletConnection;
    use crate::config::Config;
    use crate::testing::{owner, FakeRegistry, FakeWallet};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router(wallet: Option<FakeWallet>, registry: FakeRegistry) -> (Router, Arc<DomainManager>) {
        let notices = Arc::new(NoticeBoard::default());
        let connection = wallet.map(|w| WalletConnection {
            provider: Arc::new(w),
            registry: Arc::new(registry),
        });
        let manager = Arc::new(DomainManager::new(Config::default(), connection, notices.clone()));
        (create_router(manager.clone(), notices), manager)
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router(None, FakeRegistry::default());
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_connect_without_wallet_returns_notice() {
        let (router, _) = router(None, FakeRegistry::default());
        let (status, json) = call(&router, "POST", "/connect", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["notices"][0]["kind"], "wallet_missing");
        assert_eq!(json["view"]["screen"], "connect");
    }

    #[tokio::test]
    async fn test_short_domain_flow() {
        let (router, manager) = router(
            Some(FakeWallet::on_chain(929).authorized()),
            FakeRegistry::default(),
        );
        manager.initialize().await;

        let (_, json) = call(&router, "POST", "/form", Some(serde_json::json!({ "domain": "ab" }))).await;
        assert_eq!(json["view"]["form"]["domain"], "ab");

        let (_, json) = call(&router, "POST", "/submit", None).await;
        assert_eq!(json["notices"][0]["kind"], "domain_too_short");
        assert_eq!(
            json["notices"][0]["message"],
            "Domain is too short. Must be at least 3 characters long"
        );
    }

    #[tokio::test]
    async fn test_edit_and_text_view() {
        let (router, manager) = router(
            Some(FakeWallet::on_chain(929).authorized()),
            FakeRegistry::default().with_entry("alice", "gm", owner()),
        );
        manager.initialize().await;

        let (status, json) = call(&router, "POST", "/mints/0/edit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["view"]["form"]["submit"], "update");
        assert_eq!(json["view"]["form"]["record"], "gm");

        let (status, _) = call(&router, "POST", "/mints/9/edit", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(text.to_vec()).unwrap();
        assert!(text.contains("alice.trigon"));
        assert!(text.contains("[ Update Domain ]"));
    }

    #[tokio::test]
    async fn test_refresh_blocked_off_network() {
        let (router, _) = router(
            Some(FakeWallet::on_chain(80001).authorized()),
            FakeRegistry::default(),
        );
        let (status, _) = call(&router, "POST", "/mints/refresh", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
