#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pushgate::application::usecases::{
    DEFAULT_COOLDOWN, DEFAULT_COOLDOWN_POLL, DEFAULT_DEBOUNCE, DispatchUseCase, PauseUseCase,
    PushUseCase,
};
use pushgate::application::{AppResult, Notifier, TokenRegistry, lock_state};
use pushgate::domain::{MessageDefaults, PushMessage, PushRequest, TokenSnapshot};

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, PushMessage)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), message.clone()));
        Ok(())
    }
}

pub struct Gate {
    pub registry: Arc<TokenRegistry>,
    pub push: Arc<PushUseCase>,
    pub pause: Arc<PauseUseCase>,
    pub notifier: RecordingNotifier,
}

impl Gate {
    pub fn new() -> Self {
        let notifier = RecordingNotifier::new();
        let registry = Arc::new(TokenRegistry::new());
        let dispatch = Arc::new(DispatchUseCase::new(Arc::new(notifier.clone()), None));
        let push = PushUseCase::new(
            Arc::clone(&registry),
            dispatch,
            MessageDefaults::default(),
            DEFAULT_DEBOUNCE,
        );
        let pause = PauseUseCase::new(
            Arc::clone(&registry),
            DEFAULT_COOLDOWN,
            DEFAULT_COOLDOWN_POLL,
        );

        Self {
            registry,
            push: Arc::new(push),
            pause: Arc::new(pause),
            notifier,
        }
    }

    pub fn snapshot(&self, token: &str) -> TokenSnapshot {
        let state = self.registry.get(token).unwrap().expect("token seen");
        lock_state(&state).unwrap().snapshot()
    }

    pub fn is_enabled(&self, token: &str) -> bool {
        self.snapshot(token).enabled
    }
}

pub fn request(title: &str, msg: &str) -> PushRequest {
    PushRequest::new(title, msg)
}

pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub async fn sleep_secs(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}
