use serde::Serialize;

use super::PushMessage;

/// Result of merging a message into the pending set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ingested {
    Inserted,
    Replaced,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("push suspended for token {0}")]
    Rejected(String),
}

/// Per-token gate state: the pending window plus the flags driving the
/// debounce and cooldown timers. Always accessed under the token's mutex.
#[derive(Debug)]
pub struct TokenState {
    token: String,
    enabled: bool,
    pending: Vec<PushMessage>,
    debounce_armed: bool,
    cooldown_armed: bool,
    cooldown_cancel_requested: bool,
}

impl TokenState {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            enabled: true,
            pending: Vec::new(),
            debounce_armed: false,
            cooldown_armed: false,
            cooldown_cancel_requested: false,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Merge a message into the pending set, one entry per title.
    /// The last message for a title wins and keeps the slot of the first.
    pub fn ingest(&mut self, message: PushMessage) -> Result<Ingested, IngestError> {
        if !self.enabled {
            return Err(IngestError::Rejected(self.token.clone()));
        }
        let message = message.normalized();

        match self.pending.iter_mut().find(|m| m.title == message.title) {
            Some(slot) => {
                *slot = message;
                Ok(Ingested::Replaced)
            }
            None => {
                self.pending.push(message);
                Ok(Ingested::Inserted)
            }
        }
    }

    pub fn pending(&self) -> &[PushMessage] {
        &self.pending
    }

    pub fn take_pending(&mut self) -> Vec<PushMessage> {
        std::mem::take(&mut self.pending)
    }

    pub fn debounce_armed(&self) -> bool {
        self.debounce_armed
    }

    /// Returns true only for the call that opened the window.
    pub fn arm_debounce(&mut self) -> bool {
        !std::mem::replace(&mut self.debounce_armed, true)
    }

    pub fn disarm_debounce(&mut self) {
        self.debounce_armed = false;
    }

    pub fn cooldown_armed(&self) -> bool {
        self.cooldown_armed
    }

    /// Returns true only for the call that started the cooldown.
    pub fn arm_cooldown(&mut self) -> bool {
        !std::mem::replace(&mut self.cooldown_armed, true)
    }

    /// Ask a running cooldown to end early. No-op when none is running.
    pub fn request_cooldown_cancel(&mut self) -> bool {
        if self.cooldown_armed {
            self.cooldown_cancel_requested = true;
        }
        self.cooldown_armed
    }

    pub fn take_cooldown_cancel(&mut self) -> bool {
        std::mem::take(&mut self.cooldown_cancel_requested)
    }

    /// Cooldown over, by expiry or cancel: the token pushes again.
    pub fn finish_cooldown(&mut self) {
        self.enabled = true;
        self.cooldown_armed = false;
        self.cooldown_cancel_requested = false;
    }

    pub fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot {
            token: self.token.clone(),
            enabled: self.enabled,
            pending_titles: self.pending.iter().map(|m| m.title.clone()).collect(),
            debounce_armed: self.debounce_armed,
            cooldown_armed: self.cooldown_armed,
            cooldown_cancel_requested: self.cooldown_cancel_requested,
        }
    }
}

/// Read-only view of a token's state, served by the status endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenSnapshot {
    pub token: String,
    pub enabled: bool,
    pub pending_titles: Vec<String>,
    pub debounce_armed: bool,
    pub cooldown_armed: bool,
    pub cooldown_cancel_requested: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageDefaults, PushRequest};

    fn msg(title: &str, body: &str) -> PushMessage {
        PushRequest::new(title, body)
            .into_message(&MessageDefaults::default())
            .unwrap()
    }

    #[test]
    fn new_state_is_enabled_and_idle() {
        let s = TokenState::new("t");
        assert!(s.is_enabled());
        assert!(s.pending().is_empty());
        assert!(!s.debounce_armed());
        assert!(!s.cooldown_armed());
    }

    #[test]
    fn same_title_overwrites_in_place() {
        let mut s = TokenState::new("t");
        assert_eq!(s.ingest(msg("A", "hello")), Ok(Ingested::Inserted));
        assert_eq!(s.ingest(msg("B", "yo")), Ok(Ingested::Inserted));
        assert_eq!(s.ingest(msg("A", "A: hello again")), Ok(Ingested::Replaced));

        let titles: Vec<_> = s.pending().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(s.pending()[0].message, "hello again");
    }

    #[test]
    fn disabled_state_rejects_without_queueing() {
        let mut s = TokenState::new("t");
        s.set_enabled(false);
        assert_eq!(
            s.ingest(msg("A", "hello")),
            Err(IngestError::Rejected("t".into()))
        );
        assert!(s.pending().is_empty());
    }

    #[test]
    fn arming_is_idempotent() {
        let mut s = TokenState::new("t");
        assert!(s.arm_debounce());
        assert!(!s.arm_debounce());
        s.disarm_debounce();
        assert!(s.arm_debounce());

        assert!(s.arm_cooldown());
        assert!(!s.arm_cooldown());
    }

    #[test]
    fn cancel_request_needs_running_cooldown() {
        let mut s = TokenState::new("t");
        assert!(!s.request_cooldown_cancel());
        assert!(!s.take_cooldown_cancel());

        s.arm_cooldown();
        assert!(s.request_cooldown_cancel());
        assert!(s.take_cooldown_cancel());
        assert!(!s.take_cooldown_cancel());
    }

    #[test]
    fn finishing_cooldown_reenables_and_clears_flags() {
        let mut s = TokenState::new("t");
        s.set_enabled(false);
        s.arm_cooldown();
        s.request_cooldown_cancel();
        s.finish_cooldown();

        let snap = s.snapshot();
        assert!(snap.enabled);
        assert!(!snap.cooldown_armed);
        assert!(!snap.cooldown_cancel_requested);
    }
}
