pub mod access;
pub mod channels;
pub mod config;
pub mod fallback;
pub mod hours;
pub mod llm;
pub mod prompt;
pub mod relay;
pub mod types;

pub use config::Config;

use self::access::SingleSender;
use self::channels::whatsapp::{self as whatsapp_channel, WhatsAppSidecar, WhatsAppState};
use self::config::load_config;
use self::fallback::FallbackRegistry;
use self::llm::OpenAiClient;
use self::relay::{Relay, RelaySettings};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

pub const ROOT_BANNER: &str = "WhatsApp ChatGPT bot is running";

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub relay: Arc<Relay>,
    pub whatsapp: Arc<WhatsAppState>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub whatsapp_ready: bool,
    pub business_open: bool,
    pub fallback_notified: usize,
}

/// Wires the production collaborators: OpenAI-compatible completions and the
/// WhatsApp sidecar.
pub fn build_state(config: Config, http: reqwest::Client) -> AppState {
    let sidecar = Arc::new(WhatsAppSidecar::new(
        http.clone(),
        config.whatsapp.sidecar_url.clone(),
    ));
    let relay = Relay::new(
        Arc::new(SingleSender::new(config.relay.allowed_sender.clone())),
        Arc::new(OpenAiClient::from_config(&config.llm)),
        sidecar,
        Arc::new(FallbackRegistry::new()),
        RelaySettings {
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            persona: config.persona.clone(),
            hours: config.hours.clone(),
        },
    );
    AppState {
        config,
        http,
        relay: Arc::new(relay),
        whatsapp: Arc::new(WhatsAppState::default()),
    }
}

pub fn router(state: AppState) -> Router {
    let wa = &state.config.whatsapp;
    Router::new()
        .route("/", get(root))
        .route("/v1/health", get(health))
        .route("/v1/status", get(status))
        .route(&wa.inbound_path, post(whatsapp_inbound))
        .route(&wa.events_path, post(whatsapp_events))
        .with_state(state)
}

pub async fn create_app() -> anyhow::Result<(AppState, Router)> {
    let config = load_config();
    let http = reqwest::Client::builder().build()?;
    let state = build_state(config, http);
    let app = router(state.clone());
    Ok((state, app))
}

async fn root() -> &'static str {
    ROOT_BANNER
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        whatsapp_ready: state.whatsapp.is_ready(),
        business_open: state.relay.hours().is_open_now(),
        fallback_notified: state.relay.notified().len(),
    })
}

async fn whatsapp_inbound(
    State(state): State<AppState>,
    Json(payload): Json<whatsapp_channel::WhatsAppInboundPayload>,
) -> impl IntoResponse {
    let inbound = whatsapp_channel::normalize_whatsapp_inbound(payload);
    let relay = state.relay.clone();
    tokio::spawn(async move {
        let outcome = relay.handle(inbound).await;
        debug!(?outcome, "inbound message done");
    });
    (StatusCode::ACCEPTED, Json(json!({"status": "accepted"})))
}

async fn whatsapp_events(
    State(state): State<AppState>,
    Json(event): Json<whatsapp_channel::WhatsAppEvent>,
) -> impl IntoResponse {
    state.whatsapp.apply(&event);
    Json(json!({"ok": true}))
}

/// Starts the WhatsApp session through the sidecar. Failure only disables
/// messaging; the HTTP server keeps serving health checks.
pub async fn start_whatsapp(config: &Config, http: reqwest::Client) {
    let sidecar = WhatsAppSidecar::new(http, config.whatsapp.sidecar_url.clone());
    if let Err(err) = sidecar.initialize(&config.whatsapp).await {
        error!("Failed to start WhatsApp client: {err:?}");
    }
}
