pub mod board;
pub mod client;
pub mod error;
pub mod handlers;
pub mod models;
pub mod settings;
pub mod validation;
pub mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{board_page, healthz_live, healthz_ready, refresh, submit_signup, unregister_participant};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::board::{ActivityBoard, FlashAlerts};
use crate::client::ActivitiesClient;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub board: Arc<ActivityBoard>,
    pub alerts: Arc<FlashAlerts>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let alerts = Arc::new(FlashAlerts::new());
        let board = ActivityBoard::new(
            ActivitiesClient::new(settings.backend_base_url.clone()),
            alerts.clone(),
            settings.message_timeout(),
        );
        Self {
            settings,
            board: Arc::new(board),
            alerts,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::new(settings);
    info!(
        backend = %state.settings.backend_base_url,
        "Loading activities"
    );
    state.board.load_activities().await;

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Activity Board on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .route("/", get(board_page))
        .route("/signup", post(submit_signup))
        .route("/activities/{activity}/unregister", post(unregister_participant))
        .route("/refresh", post(refresh))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .with_state(state)
        .layer(trace_layer)
}
