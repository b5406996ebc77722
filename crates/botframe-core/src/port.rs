use async_trait::async_trait;
use serde_json::Value;

use crate::{domain::ChatId, keyboard::InlineKeyboardMarkup, Result};

/// Text formatting mode understood by the remote platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    Html,
    Markdown,
    MarkdownV2,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::Markdown => "Markdown",
            ParseMode::MarkdownV2 => "MarkdownV2",
        }
    }
}

/// Options shared by message sends.
#[derive(Clone, Debug)]
pub struct SendOptions {
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    pub reply_to_message_id: Option<i32>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Html,
            disable_web_page_preview: true,
            disable_notification: false,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

/// Outbound messaging port.
///
/// The Telegram client is the production implementation; the broadcast
/// helper and its tests only depend on this trait.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Fetch live metadata for a chat.
    async fn chat_info(&self, chat: ChatId) -> Result<Value>;

    /// Send a text message to a chat.
    async fn send_text(&self, chat: ChatId, text: &str, options: &SendOptions) -> Result<Value>;
}
