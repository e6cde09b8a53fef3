use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::PushMessage;

pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn notify(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        // 单个渠道失败不影响其它渠道：这里选择“尽量发”
        let mut last_err = None;

        for n in &self.notifiers {
            if let Err(e) = n.notify(token, message).await {
                last_err = Some(e);
            }
        }

        if let Some(e) = last_err {
            return Err(e);
        }

        Ok(())
    }
}
