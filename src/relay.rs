//! Per-message reply pipeline: sender check, completion call, fallback
//! deduplication and the reply itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::access::SenderPolicy;
use crate::channels::whatsapp::ReplySink;
use crate::fallback::FallbackRegistry;
use crate::hours::{self, BusinessHours};
use crate::llm::{ChatMessage, CompletionError, CompletionProvider, CompletionRequest};
use crate::prompt::{self, Persona};
use crate::types::{InboundMessage, RelayOutcome};

pub const APOLOGY: &str = "Sorry, something went wrong while processing your message.";

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub max_tokens: u32,
    pub persona: Persona,
    pub hours: BusinessHours,
}

pub struct Relay {
    policy: Arc<dyn SenderPolicy>,
    provider: Arc<dyn CompletionProvider>,
    sink: Arc<dyn ReplySink>,
    notified: Arc<FallbackRegistry>,
    settings: RelaySettings,
}

impl Relay {
    pub fn new(
        policy: Arc<dyn SenderPolicy>,
        provider: Arc<dyn CompletionProvider>,
        sink: Arc<dyn ReplySink>,
        notified: Arc<FallbackRegistry>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            policy,
            provider,
            sink,
            notified,
            settings,
        }
    }

    pub fn notified(&self) -> &FallbackRegistry {
        &self.notified
    }

    pub fn hours(&self) -> &BusinessHours {
        &self.settings.hours
    }

    pub fn build_request(&self, text: &str, open: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::system_prompt(
                    &self.settings.persona,
                    &self.settings.hours,
                    open,
                )),
                ChatMessage::user(text),
            ],
            max_tokens: self.settings.max_tokens,
        }
    }

    pub async fn handle(&self, inbound: InboundMessage) -> RelayOutcome {
        self.handle_at(inbound, Utc::now()).await
    }

    pub async fn handle_at(&self, inbound: InboundMessage, now: DateTime<Utc>) -> RelayOutcome {
        let from = inbound.from.as_str();
        if !self.policy.is_allowed(from) {
            info!(from = %from, "Blocked message from unauthorized number");
            return RelayOutcome::Discarded;
        }

        let text = inbound.trimmed_body();
        info!(from = %from, "Received message: {text}");

        let open = self.settings.hours.is_open_at(&now);
        debug!(business = hours::label(open), "composing completion request");
        let request = self.build_request(text, open);

        let outcome = match self.provider.complete(&request).await {
            Ok(answer) => self.classify(from, answer),
            Err(err) => self.errored(err),
        };

        if matches!(outcome, RelayOutcome::Suppressed | RelayOutcome::Discarded) {
            return outcome;
        }
        let reply = match &outcome {
            RelayOutcome::Replied { text, .. } => text.as_str(),
            _ => APOLOGY,
        };

        match self
            .sink
            .send(from, reply, Some(inbound.message_id.as_str()))
            .await
        {
            Ok(()) => info!(from = %from, "Sent reply: {reply}"),
            Err(err) => warn!(from = %from, "failed to deliver reply: {err:?}"),
        }
        outcome
    }

    fn classify(&self, from: &str, answer: String) -> RelayOutcome {
        let fallback = prompt::is_fallback(&answer);
        // A single insert decides who gets the one fallback reply.
        if fallback && !self.notified.try_mark(from) {
            info!(from = %from, "suppressing repeated fallback reply");
            return RelayOutcome::Suppressed;
        }
        RelayOutcome::Replied {
            text: answer,
            fallback,
        }
    }

    fn errored(&self, err: CompletionError) -> RelayOutcome {
        error!("completion API error: {err:?}");
        RelayOutcome::Errored {
            detail: err.to_string(),
        }
    }
}
