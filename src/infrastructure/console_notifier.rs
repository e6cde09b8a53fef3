use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::PushMessage;

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        println!(
            "PUSH: token={} from={} title={} group={} url={} body={}",
            token, message.sender, message.title, message.group, message.url, message.message
        );
        Ok(())
    }
}
