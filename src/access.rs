/// Decides whether a WhatsApp sender may talk to the relay.
pub trait SenderPolicy: Send + Sync {
    fn is_allowed(&self, sender_id: &str) -> bool;
}

/// Single-tenant policy: exactly one `<number>@c.us` address is accepted.
#[derive(Debug, Clone)]
pub struct SingleSender {
    allowed: String,
}

impl SingleSender {
    pub fn new(allowed: impl Into<String>) -> Self {
        Self {
            allowed: allowed.into(),
        }
    }
}

impl SenderPolicy for SingleSender {
    fn is_allowed(&self, sender_id: &str) -> bool {
        sender_id == self.allowed
    }
}
