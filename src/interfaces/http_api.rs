use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::application::usecases::{
    PauseUseCase, PushOutcome, PushUseCase, ResumeOutcome, SuspendOutcome,
};
use crate::application::{AppError, TokenRegistry, lock_state};
use crate::domain::PushRequest;

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<TokenRegistry>,
    pub push: Arc<PushUseCase>,
    pub pause: Arc<PauseUseCase>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/push", get(push))
        .route("/stop", get(stop))
        .route("/start", get(start))
        .route("/status", get(status))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[derive(Deserialize)]
struct PushQuery {
    token: Option<String>,
    title: Option<String>,
    msg: Option<String>,
    from: Option<String>,
    group: Option<String>,
    url: Option<String>,
    icon: Option<String>,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

async fn push(State(state): State<ApiState>, Query(q): Query<PushQuery>) -> Response {
    let Some(token) = required_token(q.token) else {
        return missing_token();
    };
    let request = PushRequest {
        title: q.title,
        msg: q.msg,
        from: q.from,
        group: q.group,
        url: q.url,
        icon: q.icon,
    };

    let delay = state.push.debounce().as_secs();
    match state.push.execute(&token, request) {
        Ok(PushOutcome::WindowOpened) => {
            (StatusCode::OK, format!("queued, delivering in {delay}s")).into_response()
        }
        Ok(PushOutcome::WindowOpen) => {
            (StatusCode::OK, format!("queued, delivering within {delay}s")).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn stop(State(state): State<ApiState>, Query(q): Query<TokenQuery>) -> Response {
    let Some(token) = required_token(q.token) else {
        return missing_token();
    };
    match state.pause.suspend(&token) {
        Ok(SuspendOutcome::CooldownStarted | SuspendOutcome::CooldownRunning) => {
            (StatusCode::OK, "push suspended").into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn start(State(state): State<ApiState>, Query(q): Query<TokenQuery>) -> Response {
    let Some(token) = required_token(q.token) else {
        return missing_token();
    };
    let body = match state.pause.resume(&token) {
        Ok(ResumeOutcome::Requested) => "push enabled",
        Ok(ResumeOutcome::AlreadyEnabled) => "push already enabled",
        Ok(ResumeOutcome::NoCooldown) => "no cooldown running",
        Err(e) => return error_response(e),
    };
    (StatusCode::OK, body).into_response()
}

async fn status(State(state): State<ApiState>, Query(q): Query<TokenQuery>) -> Response {
    let Some(token) = required_token(q.token) else {
        return missing_token();
    };
    let shared = match state.registry.get(&token) {
        Ok(Some(s)) => s,
        Ok(None) => return (StatusCode::NOT_FOUND, "unknown token").into_response(),
        Err(e) => return error_response(e),
    };
    match lock_state(&shared) {
        Ok(guard) => Json(guard.snapshot()).into_response(),
        Err(e) => error_response(e),
    }
}

fn required_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

fn missing_token() -> Response {
    (StatusCode::BAD_REQUEST, "missing token").into_response()
}

fn error_response(e: AppError) -> Response {
    match e {
        AppError::Rejected(_) => (StatusCode::OK, "push suspended".to_string()).into_response(),
        AppError::MissingField(field) => {
            (StatusCode::BAD_REQUEST, format!("missing {field}")).into_response()
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {other}")).into_response(),
    }
}
