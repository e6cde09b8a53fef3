use std::sync::Arc;
use std::time::Duration;

use crate::application::usecases::DispatchUseCase;
use crate::application::{AppError, AppResult, SharedTokenState, TokenRegistry, lock_state};
use crate::domain::{MessageDefaults, PushRequest};

/// How an accepted message relates to the token's debounce window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// First message since the last flush; the countdown just started.
    WindowOpened,
    /// Merged into a window that is already counting down.
    WindowOpen,
}

/// Queue a message for a token and open its debounce window if needed.
///
/// The window has a fixed length measured from the first message: later
/// messages never extend it. When it closes, the whole pending set goes
/// through [`DispatchUseCase::flush`].
pub struct PushUseCase {
    registry: Arc<TokenRegistry>,
    dispatch: Arc<DispatchUseCase>,
    defaults: MessageDefaults,
    debounce: Duration,
}

impl PushUseCase {
    pub fn new(
        registry: Arc<TokenRegistry>,
        dispatch: Arc<DispatchUseCase>,
        defaults: MessageDefaults,
        debounce: Duration,
    ) -> Self {
        Self {
            registry,
            dispatch,
            defaults,
            debounce,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn execute(&self, token: &str, request: PushRequest) -> AppResult<PushOutcome> {
        let state = self.registry.get_or_create(token)?;

        let opened = {
            let mut guard = lock_state(&state)?;
            // suspended tokens answer before the fields are even looked at
            if !guard.is_enabled() {
                return Err(AppError::Rejected(token.to_string()));
            }
            let message = request.into_message(&self.defaults)?;
            let title = message.title.clone();
            let ingested = guard.ingest(message)?;
            tracing::debug!(token = %token, title = %title, ?ingested, "message queued");
            guard.arm_debounce()
        };

        if !opened {
            return Ok(PushOutcome::WindowOpen);
        }

        tracing::info!(token = %token, delay_secs = self.debounce.as_secs(), "debounce window opened");
        self.spawn_flush(state);
        Ok(PushOutcome::WindowOpened)
    }

    fn spawn_flush(&self, state: SharedTokenState) {
        let dispatch = Arc::clone(&self.dispatch);
        let delay = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = dispatch.flush(&state).await {
                tracing::error!("flush failed: {e}");
            }
        });
    }
}
