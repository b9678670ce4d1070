use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message_id: String,
    pub channel: String,
    pub from: String,
    pub sender_name: Option<String>,
    pub body: String,
    pub timestamp: Option<i64>,
}

impl InboundMessage {
    pub fn trimmed_body(&self) -> &str {
        self.body.trim()
    }
}

/// Terminal state of one inbound message after it went through the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RelayOutcome {
    Discarded,
    Suppressed,
    Replied { text: String, fallback: bool },
    Errored { detail: String },
}
