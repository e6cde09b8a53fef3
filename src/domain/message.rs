use serde::{Deserialize, Serialize};

pub const DEFAULT_SENDER: &str = "fchat";
pub const DEFAULT_GROUP: &str = "fchat";
pub const DEFAULT_URL: &str = "fchat://";
pub const DEFAULT_ICON: &str = "https://s2.loli.net/2024/10/11/1hRNIbjcCSke5Zy.png";

/// A single notification waiting for delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub sender: String,
    pub title: String, // dedup key inside one token's window
    pub message: String,
    pub group: String,
    pub url: String,
    pub icon: String,
}

impl PushMessage {
    /// Some senders echo their own name into the body as `"<title>:"`.
    /// Every occurrence is removed and the body's leading whitespace trimmed.
    pub fn normalized(mut self) -> Self {
        if let Some(stripped) = strip_title_echo(&self.title, &self.message) {
            self.message = stripped;
        }
        self
    }

    /// Body cut down to at most `max_chars` characters, on a char boundary.
    pub fn truncated(&self, max_chars: usize) -> Self {
        match self.message.char_indices().nth(max_chars) {
            Some((idx, _)) => Self {
                message: self.message[..idx].to_string(),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// Fallbacks for the optional inbound fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageDefaults {
    #[serde(alias = "from")]
    pub sender: String,
    pub group: String,
    pub url: String,
    pub icon: String,
}

impl Default for MessageDefaults {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_string(),
            group: DEFAULT_GROUP.to_string(),
            url: DEFAULT_URL.to_string(),
            icon: DEFAULT_ICON.to_string(),
        }
    }
}

/// Inbound notification as it arrives from the transport, before validation.
#[derive(Clone, Debug, Default)]
pub struct PushRequest {
    pub title: Option<String>,
    pub msg: Option<String>,
    pub from: Option<String>,
    pub group: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
}

impl PushRequest {
    pub fn new(title: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            msg: Some(msg.into()),
            ..Self::default()
        }
    }

    pub fn into_message(self, defaults: &MessageDefaults) -> Result<PushMessage, MessageError> {
        let title = non_empty(self.title).ok_or(MessageError::MissingField("title"))?;
        let message = non_empty(self.msg).ok_or(MessageError::MissingField("msg"))?;
        // a body that was nothing but the echo has nothing left to push
        if strip_title_echo(&title, &message).is_some_and(|s| s.is_empty()) {
            return Err(MessageError::MissingField("msg"));
        }

        Ok(PushMessage {
            sender: non_empty(self.from).unwrap_or_else(|| defaults.sender.clone()),
            title,
            message,
            group: non_empty(self.group).unwrap_or_else(|| defaults.group.clone()),
            url: non_empty(self.url).unwrap_or_else(|| defaults.url.clone()),
            icon: non_empty(self.icon).unwrap_or_else(|| defaults.icon.clone()),
        })
    }
}

fn strip_title_echo(title: &str, body: &str) -> Option<String> {
    let prefix = format!("{title}:");
    body.contains(&prefix)
        .then(|| body.replace(&prefix, "").trim_start().to_string())
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
