use dashmap::DashSet;

/// Senders that already got the "we cannot answer this" reply since startup.
///
/// Entries are never removed; the set only resets when the process restarts.
#[derive(Debug, Default)]
pub struct FallbackRegistry {
    notified: DashSet<String>,
}

impl FallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_been_notified(&self, sender_id: &str) -> bool {
        self.notified.contains(sender_id)
    }

    pub fn mark_notified(&self, sender_id: &str) {
        self.notified.insert(sender_id.to_string());
    }

    /// Returns `true` only for the call that inserted the sender.
    pub fn try_mark(&self, sender_id: &str) -> bool {
        self.notified.insert(sender_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }
}
