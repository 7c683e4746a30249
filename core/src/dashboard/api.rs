// Dashboard HTTP API server
//
// Provides REST endpoints and SSE streaming for the launch records page

use crate::controller::{ChartSnapshot, ChartUpdate, ControllerHandle};
use crate::dashboard::event_stream::ChartBroadcaster;
use crate::dashboard::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::{PayloadRange, SiteSelection};
use crate::layout::DashboardLayout;
use crate::{DashError, Result};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive},
        Html, IntoResponse, Sse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Dashboard server state
#[derive(Clone)]
struct DashboardState {
    layout: Arc<DashboardLayout>,
    controller: ControllerHandle,
    broadcaster: ChartBroadcaster,
}

/// Body of `POST /api/controls/site`
#[derive(Debug, Serialize, Deserialize)]
pub struct SiteControl {
    pub value: SiteSelection,
}

/// Body of `POST /api/controls/payload`
#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadControl {
    pub value: PayloadRange,
}

/// Build the dashboard router
pub fn router(
    dataset: Arc<Dataset>,
    controller: ControllerHandle,
    broadcaster: ChartBroadcaster,
) -> Router {
    let state = DashboardState {
        layout: Arc::new(DashboardLayout::for_dataset(&dataset)),
        controller,
        broadcaster,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/static/*asset", get(static_asset_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/charts", get(charts_handler))
        .route("/api/charts/stream", get(chart_stream_handler))
        .route("/api/controls/site", post(site_handler))
        .route("/api/controls/payload", post(payload_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Dashboard HTTP server
pub struct DashboardServer {
    config: DashboardConfig,
    dataset: Arc<Dataset>,
    controller: ControllerHandle,
    broadcaster: ChartBroadcaster,
}

impl DashboardServer {
    pub fn new(
        config: DashboardConfig,
        dataset: Arc<Dataset>,
        controller: ControllerHandle,
        broadcaster: ChartBroadcaster,
    ) -> Self {
        Self {
            config,
            dataset,
            controller,
            broadcaster,
        }
    }

    pub fn router(&self) -> Router {
        router(
            Arc::clone(&self.dataset),
            self.controller.clone(),
            self.broadcaster.clone(),
        )
    }

    /// Start the Dashboard server
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr();
        info!(
            target: "dashboard",
            addr = %addr,
            "Starting Dashboard server"
        );

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| DashError::Server(format!("cannot bind {}: {}", addr, e)))?;
        info!(
            target: "dashboard",
            url = %format!("http://{}", addr),
            "Dashboard server ready"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        info!(target: "dashboard", "Dashboard server stopped");
        Ok(())
    }
}

/// Serve the main HTML page
const FALLBACK_INDEX: &str = r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>Launch Dashboard</title></head><body><h1>Dashboard assets not found</h1></body></html>"#;

async fn index_handler() -> Html<&'static str> {
    let html = crate::dashboard::static_assets::get_text("index.html").unwrap_or(FALLBACK_INDEX);
    Html(html)
}

async fn static_asset_handler(Path(asset): Path<String>) -> impl IntoResponse {
    match crate::dashboard::static_assets::get(asset.as_str()) {
        Some(asset) => {
            let mut headers = HeaderMap::new();
            if let Ok(value) = header::HeaderValue::from_str(asset.content_type) {
                headers.insert(header::CONTENT_TYPE, value);
            }
            (StatusCode::OK, headers, asset.body).into_response()
        }
        None => {
            let headers = HeaderMap::new();
            (StatusCode::NOT_FOUND, headers, b"Not found".as_slice()).into_response()
        }
    }
}

/// Page layout: heading, dropdown options, slider bounds and initial value
async fn layout_handler(State(state): State<DashboardState>) -> Json<DashboardLayout> {
    Json(state.layout.as_ref().clone())
}

/// Current control state with both charts
async fn charts_handler(
    State(state): State<DashboardState>,
) -> std::result::Result<Json<ChartSnapshot>, StatusCode> {
    state
        .controller
        .snapshot()
        .await
        .map(Json)
        .map_err(controller_status)
}

async fn site_handler(
    State(state): State<DashboardState>,
    Json(body): Json<SiteControl>,
) -> std::result::Result<Json<ChartUpdate>, StatusCode> {
    info!(target: "dashboard", site = %body.value, "Site selection changed");
    state
        .controller
        .set_site(body.value)
        .await
        .map(Json)
        .map_err(controller_status)
}

async fn payload_handler(
    State(state): State<DashboardState>,
    Json(body): Json<PayloadControl>,
) -> std::result::Result<Json<ChartUpdate>, StatusCode> {
    info!(
        target: "dashboard",
        low = body.value.low,
        high = body.value.high,
        "Payload range changed"
    );
    state
        .controller
        .set_payload_range(body.value)
        .await
        .map(Json)
        .map_err(controller_status)
}

fn controller_status(err: DashError) -> StatusCode {
    warn!(target: "dashboard", error = %err, "Controller request failed");
    match err {
        DashError::ControllerClosed => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// SSE endpoint for chart updates
///
/// A client that falls behind the broadcast buffer receives the latest full
/// update (both charts) in place of the updates it missed.
async fn chart_stream_handler(
    State(state): State<DashboardState>,
) -> Sse<impl tokio_stream::Stream<Item = std::result::Result<Event, Infallible>>> {
    info!(
        target: "dashboard",
        subscribers = state.broadcaster.subscriber_count() + 1,
        "New SSE client connected"
    );

    let broadcaster = state.broadcaster.clone();
    let rx = broadcaster.subscribe();
    // Sequence of the last full update sent; buffered updates at or below it are stale
    let mut resynced_at = 0u64;
    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let update = match result {
            Ok(update) if update.sequence <= resynced_at => return None,
            Ok(update) => update,
            Err(e) => {
                warn!(target: "dashboard", error = %e, "SSE client lagged; resending full charts");
                let full = broadcaster.latest()?;
                resynced_at = full.sequence;
                full
            }
        };
        match chart_event(&update) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!(target: "dashboard", error = %e, "Failed to serialize chart update");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn chart_event(update: &ChartUpdate) -> Result<Event> {
    let json = serde_json::to_string(update)?;
    Ok(Event::default().event("charts").data(json))
}
