use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::{AppError, AppResult};
use crate::domain::TokenState;

pub type SharedTokenState = Arc<Mutex<TokenState>>;

/// Every token seen since startup, each behind its own mutex.
/// Entries are never removed.
#[derive(Default)]
pub struct TokenRegistry {
    states: Mutex<HashMap<String, SharedTokenState>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, token: &str) -> AppResult<SharedTokenState> {
        let mut states = self
            .states
            .lock()
            .map_err(|_| AppError::State("registry lock poisoned".into()))?;
        let state = states
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenState::new(token))));
        Ok(Arc::clone(state))
    }

    pub fn get(&self, token: &str) -> AppResult<Option<SharedTokenState>> {
        let states = self
            .states
            .lock()
            .map_err(|_| AppError::State("registry lock poisoned".into()))?;
        Ok(states.get(token).cloned())
    }

    pub fn len(&self) -> AppResult<usize> {
        let states = self
            .states
            .lock()
            .map_err(|_| AppError::State("registry lock poisoned".into()))?;
        Ok(states.len())
    }
}

pub fn lock_state(state: &SharedTokenState) -> AppResult<MutexGuard<'_, TokenState>> {
    state
        .lock()
        .map_err(|_| AppError::State("token state lock poisoned".into()))
}
