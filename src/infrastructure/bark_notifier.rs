use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::application::{AppError, AppResult, Notifier};
use crate::domain::PushMessage;

/// Bark's interruption level; "active" lights the screen immediately.
const LEVEL: &str = "active";

pub struct BarkNotifier {
    client: reqwest::Client,
    base_url: Url,
}

impl BarkNotifier {
    /// base_url 示例: "https://api.day.app" or a self-hosted bark-server
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("bad provider url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "provider url cannot carry a path: {base_url}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// `{base}/{token}/{body}?title=..&group=..&url=..&icon=..&level=active`
    fn request_url(&self, token: &str, message: &PushMessage) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config("provider url cannot carry a path".into()))?
            .pop_if_empty()
            .push(token)
            .push(&message.message);
        url.query_pairs_mut()
            .append_pair("title", &message.title)
            .append_pair("group", &message.group)
            .append_pair("url", &message.url)
            .append_pair("icon", &message.icon)
            .append_pair("level", LEVEL);
        Ok(url)
    }
}

#[async_trait]
impl Notifier for BarkNotifier {
    async fn notify(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        let url = self.request_url(token, message)?;

        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Provider(e.to_string()))?;

        tracing::info!(token = %token, title = %message.title, "message pushed");
        Ok(())
    }
}
