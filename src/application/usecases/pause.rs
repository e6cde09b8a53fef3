use std::sync::Arc;
use std::time::Duration;

use crate::application::{AppResult, SharedTokenState, TokenRegistry, lock_state};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuspendOutcome {
    CooldownStarted,
    /// A cooldown was already counting down; it keeps its original deadline.
    CooldownRunning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// The running cooldown will re-enable the token on its next poll.
    Requested,
    AlreadyEnabled,
    /// Disabled but no cooldown is running: resume has nothing to cancel
    /// and leaves the token disabled.
    NoCooldown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownEnd {
    Elapsed,
    Cancelled,
}

/// Suspend a token and bring it back automatically after a cooldown.
///
/// The cooldown task polls the token's cancel flag every `poll`, so an early
/// resume takes effect within one poll interval.
pub struct PauseUseCase {
    registry: Arc<TokenRegistry>,
    cooldown: Duration,
    poll: Duration,
}

impl PauseUseCase {
    pub fn new(registry: Arc<TokenRegistry>, cooldown: Duration, poll: Duration) -> Self {
        Self {
            registry,
            cooldown,
            poll,
        }
    }

    pub fn suspend(&self, token: &str) -> AppResult<SuspendOutcome> {
        let state = self.registry.get_or_create(token)?;

        let started = {
            let mut guard = lock_state(&state)?;
            guard.set_enabled(false);
            guard.arm_cooldown()
        };

        if !started {
            tracing::debug!(token = %token, "push already suspended, cooldown running");
            return Ok(SuspendOutcome::CooldownRunning);
        }

        tracing::info!(token = %token, cooldown_secs = self.cooldown.as_secs(), "push suspended");
        let (cooldown, poll) = (self.cooldown, self.poll);
        tokio::spawn(async move {
            if let Err(e) = run_cooldown(&state, cooldown, poll).await {
                tracing::error!("cooldown failed: {e}");
            }
        });
        Ok(SuspendOutcome::CooldownStarted)
    }

    pub fn resume(&self, token: &str) -> AppResult<ResumeOutcome> {
        let state = self.registry.get_or_create(token)?;
        let mut guard = lock_state(&state)?;

        if guard.request_cooldown_cancel() {
            tracing::info!(token = %token, "cooldown cancel requested");
            Ok(ResumeOutcome::Requested)
        } else if guard.is_enabled() {
            Ok(ResumeOutcome::AlreadyEnabled)
        } else {
            tracing::warn!(token = %token, "resume ignored: token disabled without a cooldown");
            Ok(ResumeOutcome::NoCooldown)
        }
    }
}

/// Count down `cooldown` in `poll` steps. The cancel check and the final
/// re-enable happen under one lock so a late cancel request is never left
/// behind for the next cooldown.
pub async fn run_cooldown(
    state: &SharedTokenState,
    cooldown: Duration,
    poll: Duration,
) -> AppResult<CooldownEnd> {
    let mut waited = Duration::ZERO;

    loop {
        let step = poll.min(cooldown.saturating_sub(waited));
        tokio::time::sleep(step).await;
        waited += step;

        let mut guard = lock_state(state)?;
        if guard.take_cooldown_cancel() {
            guard.finish_cooldown();
            tracing::info!(token = %guard.token(), "cooldown cancelled, push enabled");
            return Ok(CooldownEnd::Cancelled);
        }
        if waited >= cooldown {
            guard.finish_cooldown();
            tracing::info!(token = %guard.token(), "cooldown elapsed, push enabled");
            return Ok(CooldownEnd::Elapsed);
        }
    }
}
