use std::sync::Arc;

use crate::application::{AppResult, Notifier, SharedTokenState, lock_state};
use crate::domain::PushMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Token was suspended when the window closed; nothing was sent.
    Dropped { discarded: usize },
    Delivered { sent: usize, failed: usize },
}

/// Hands flushed messages to the notifier, one call per message.
pub struct DispatchUseCase {
    notifier: Arc<dyn Notifier>,
    max_body_chars: Option<usize>,
}

impl DispatchUseCase {
    pub fn new(notifier: Arc<dyn Notifier>, max_body_chars: Option<usize>) -> Self {
        Self {
            notifier,
            max_body_chars,
        }
    }

    pub async fn deliver(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        match self.max_body_chars {
            Some(max) => self.notifier.notify(token, &message.truncated(max)).await,
            None => self.notifier.notify(token, message).await,
        }
    }

    /// Close the token's window: drain pending and release the debounce slot
    /// in one critical section, then send outside the lock.
    pub async fn flush(&self, state: &SharedTokenState) -> AppResult<FlushOutcome> {
        let (token, enabled, messages) = {
            let mut guard = lock_state(state)?;
            guard.disarm_debounce();
            (
                guard.token().to_string(),
                guard.is_enabled(),
                guard.take_pending(),
            )
        };

        if !enabled {
            tracing::info!(token = %token, discarded = messages.len(), "push suspended, pending messages dropped");
            return Ok(FlushOutcome::Dropped {
                discarded: messages.len(),
            });
        }

        let mut failed = 0;
        for message in &messages {
            // one bad message must not hold back the rest of the window
            if let Err(e) = self.deliver(&token, message).await {
                failed += 1;
                tracing::warn!(token = %token, title = %message.title, "push failed: {e}");
            }
        }

        let sent = messages.len() - failed;
        tracing::info!(token = %token, sent, failed, "window flushed");
        Ok(FlushOutcome::Delivered { sent, failed })
    }
}
