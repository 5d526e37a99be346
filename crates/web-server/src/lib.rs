// In crates/web-server/src/lib.rs

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use core_types::SharedSnapshot;
use notifier::{SubscriptionInfo, SubscriptionStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

pub mod dashboard;
pub mod error;

pub use dashboard::DashboardSettings;
pub use error::{Error, Result};

/// The shared application state that is available to all handlers.
///
/// The snapshot is only ever read here; the poll loop owns all writes.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: SharedSnapshot,
    pub subscriptions: SubscriptionStore,
    pub view: Arc<DashboardSettings>,
}

/// Creates the application router with all routes and middleware.
///
/// Anything not matched by a route is looked up in `static_dir`
/// (service worker, icons).
pub fn create_router(app_state: AppState, static_dir: &str) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let api_router = Router::new().route("/snapshot", get(snapshot_handler));

    Router::new()
        .route("/", get(dashboard_handler))
        .route("/subscribe", post(subscribe_handler))
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .fallback_service(ServeDir::new(static_dir))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// The handler for `GET /`.
async fn dashboard_handler(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot.read().await;
    Html(dashboard::render(&snapshot, &state.view))
}

/// The handler for `POST /subscribe`. Malformed bodies are rejected by the
/// `Json` extractor before this runs.
async fn subscribe_handler(
    State(state): State<AppState>,
    Json(subscription): Json<SubscriptionInfo>,
) -> StatusCode {
    tracing::info!(endpoint = %subscription.endpoint, "New push subscription registered.");
    state.subscriptions.add(subscription).await;
    StatusCode::CREATED
}

/// The handler for `GET /api/snapshot`.
async fn snapshot_handler(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&*snapshot)?))
}

/// Binds the listener and serves the router until the process stops.
pub async fn run(settings: &app_config::ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state, &settings.static_dir);

    let address = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;
    tracing::info!("Web server listening on {}", address);

    axum::serve(listener, app).await.map_err(Error::Serve)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use chrono::Utc;
    use core_types::{MarketSnapshot, Symbol, Ticker, Timeframe};
    use tower::ServiceExt;

    fn state(snapshot: SharedSnapshot) -> AppState {
        AppState {
            snapshot,
            subscriptions: SubscriptionStore::new(),
            view: Arc::new(DashboardSettings {
                symbols: vec![Symbol("BTC/TRY".into())],
                timeframes: vec![Timeframe::H1],
                trade_url_base: "https://www.trbinance.com/trade".into(),
                quote_label: "TRY".into(),
                refresh_seconds: 30,
                vapid_public_key: Some("BPub".into()),
            }),
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = create_router(state(MarketSnapshot::shared()), "public");
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn dashboard_renders_html() {
        let app = create_router(state(MarketSnapshot::shared()), "public");
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let html = body_text(response).await;
        assert!(html.contains("BTC/TRY"));
        assert!(html.contains("Loading"));
    }

    #[tokio::test]
    async fn subscribe_stores_subscription_and_returns_created() {
        let app_state = state(MarketSnapshot::shared());
        let store = app_state.subscriptions.clone();
        let app = create_router(app_state, "public");

        let body = serde_json::json!({
            "endpoint": "https://push.example.com/send/abc",
            "keys": { "p256dh": "BKey", "auth": "secret" }
        });
        let response = app
            .oneshot(
                Request::post("/subscribe")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(body_text(response).await.is_empty());
        let stored = store.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].endpoint, "https://push.example.com/send/abc");
    }

    #[tokio::test]
    async fn malformed_subscription_is_rejected() {
        let app_state = state(MarketSnapshot::shared());
        let store = app_state.subscriptions.clone();
        let app = create_router(app_state, "public");

        let response = app
            .oneshot(
                Request::post("/subscribe")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"endpoint\": 42"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn snapshot_endpoint_serializes_state() {
        let snapshot = MarketSnapshot::shared();
        snapshot.write().await.record_ticker(
            &Symbol("BTC/TRY".into()),
            Some(&Ticker { last: 100.0, percentage: 2.5 }),
            Utc::now(),
        );
        let app = create_router(state(snapshot), "public");

        let response = app
            .oneshot(Request::get("/api/snapshot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["symbols"]["BTC/TRY"]["price"], 100.0);
        assert_eq!(json["symbols"]["BTC/TRY"]["percent_change"], 2.5);
    }

    #[tokio::test]
    async fn static_files_are_served_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sw.js"), "self.addEventListener('push', () => {});").unwrap();
        let app = create_router(state(MarketSnapshot::shared()), &dir.path().to_string_lossy());

        let response = app
            .clone()
            .oneshot(Request::get("/sw.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("push"));

        let response = app
            .oneshot(Request::get("/missing.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
