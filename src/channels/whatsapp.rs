use crate::config::WhatsAppConfig;
use crate::types::InboundMessage;
use anyhow::Result;
use async_trait::async_trait;
use qrcode::{Color, QrCode};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WhatsAppInboundPayload {
    pub from: String,
    pub body: Option<String>,
    pub message_id: Option<String>,
    pub timestamp: Option<i64>,
    pub sender_name: Option<String>,
}

/// Lifecycle notifications pushed by the WhatsApp bridge.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WhatsAppEvent {
    Qr { code: String },
    Ready,
    AuthFailure { reason: Option<String> },
    Disconnected { reason: Option<String> },
}

/// Where replies go. Implemented by the sidecar client, faked in tests.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, to: &str, text: &str, reply_to: Option<&str>) -> Result<()>;
}

pub async fn send_whatsapp_message(
    client: &Client,
    sidecar_url: &str,
    to: &str,
    text: &str,
    reply_to: Option<&str>,
) -> Result<()> {
    let payload = serde_json::json!({
        "to": to,
        "text": text,
        "reply_to": reply_to,
    });
    let resp = client
        .post(format!("{}/send", sidecar_url))
        .json(&payload)
        .send()
        .await?;
    if !resp.status().is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("whatsapp sidecar error: {}", body));
    }
    Ok(())
}

pub fn normalize_whatsapp_inbound(payload: WhatsAppInboundPayload) -> InboundMessage {
    InboundMessage {
        message_id: payload
            .message_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        channel: "whatsapp".to_string(),
        from: payload.from,
        sender_name: payload.sender_name,
        body: payload.body.unwrap_or_default(),
        timestamp: payload.timestamp,
    }
}

pub struct WhatsAppSidecar {
    http: Client,
    sidecar_url: String,
}

impl WhatsAppSidecar {
    pub fn new(http: Client, sidecar_url: impl Into<String>) -> Self {
        Self {
            http,
            sidecar_url: sidecar_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Asks the bridge to start (or resume) the WhatsApp Web session.
    pub async fn initialize(&self, cfg: &WhatsAppConfig) -> Result<()> {
        let public = cfg
            .public_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string());
        let payload = serde_json::json!({
            "client_id": cfg.client_id,
            "data_path": cfg.session_path,
            "inbound_url": public.as_ref().map(|u| format!("{}{}", u, cfg.inbound_path)),
            "events_url": public.as_ref().map(|u| format!("{}{}", u, cfg.events_path)),
        });
        let resp = self
            .http
            .post(format!("{}/init", self.sidecar_url))
            .json(&payload)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("whatsapp init failed: {} {}", status, body));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySink for WhatsAppSidecar {
    async fn send(&self, to: &str, text: &str, reply_to: Option<&str>) -> Result<()> {
        send_whatsapp_message(&self.http, &self.sidecar_url, to, text, reply_to).await
    }
}

#[derive(Debug, Default)]
pub struct WhatsAppState {
    ready: AtomicBool,
}

impl WhatsAppState {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn apply(&self, event: &WhatsAppEvent) {
        match event {
            WhatsAppEvent::Qr { code } => {
                self.ready.store(false, Ordering::Relaxed);
                match render_pairing_code(code) {
                    Some(art) => println!("{art}"),
                    None => warn!("could not render pairing code, raw value: {code}"),
                }
                info!("Scan the QR code above with your WhatsApp mobile app.");
            }
            WhatsAppEvent::Ready => {
                if !self.ready.swap(true, Ordering::Relaxed) {
                    info!("WhatsApp client is ready!");
                }
            }
            WhatsAppEvent::AuthFailure { reason } => {
                self.ready.store(false, Ordering::Relaxed);
                warn!("whatsapp authentication failed: {}", reason.as_deref().unwrap_or("unknown"));
            }
            WhatsAppEvent::Disconnected { reason } => {
                self.ready.store(false, Ordering::Relaxed);
                warn!("whatsapp disconnected: {}", reason.as_deref().unwrap_or("unknown"));
            }
        }
    }
}

/// Renders a pairing code as Unicode half blocks, two QR rows per text line,
/// with the 4-module quiet zone scanners need.
pub fn render_pairing_code(data: &str) -> Option<String> {
    let code = QrCode::new(data.as_bytes()).ok()?;
    let matrix = code.to_colors();
    let w = code.width();
    let quiet = 4;
    let total = w + quiet * 2;

    let color_at = |x: usize, y: usize| -> Color {
        if x < quiet || x >= quiet + w || y < quiet || y >= quiet + w {
            Color::Light
        } else {
            matrix[(y - quiet) * w + (x - quiet)]
        }
    };

    let mut out = String::new();
    let mut y = 0;
    while y < total {
        for x in 0..total {
            let top = color_at(x, y);
            let bottom = if y + 1 < total {
                color_at(x, y + 1)
            } else {
                Color::Light
            };
            out.push(match (top, bottom) {
                (Color::Light, Color::Light) => ' ',
                (Color::Dark, Color::Dark) => '\u{2588}',
                (Color::Dark, Color::Light) => '\u{2580}',
                (Color::Light, Color::Dark) => '\u{2584}',
            });
        }
        out.push('\n');
        y += 2;
    }
    Some(out)
}
