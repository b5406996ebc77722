//! One thin builder per supported Bot API method.
//!
//! Each builder assembles a parameter set and delegates to
//! `Client::execute`; the executor's payload comes back untransformed. The
//! addressee is an explicit `ChatId` at every call site — the stateful
//! convenience layer lives in `bot`.

use async_trait::async_trait;
use serde_json::Value;

use botframe_core::{
    domain::{ChatId, MessageId},
    keyboard::InlineKeyboardMarkup,
    params::Params,
    port::{Outbound, ParseMode, SendOptions},
    Error, Result,
};

use crate::client::Client;

/// Options for `send_photo`.
#[derive(Clone, Debug, Default)]
pub struct PhotoOptions {
    pub caption: Option<String>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub disable_notification: bool,
}

/// Options for message edits.
#[derive(Clone, Debug)]
pub struct EditOptions {
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Html,
            disable_web_page_preview: false,
            reply_markup: None,
        }
    }
}

/// Options for `answer_inline_query`, including the switch-to-private-chat
/// button shown above the results.
#[derive(Clone, Debug)]
pub struct InlineQueryOptions {
    pub switch_pm_text: Option<String>,
    pub switch_pm_parameter: Option<String>,
    pub is_personal: bool,
    pub cache_time: u32,
}

impl Default for InlineQueryOptions {
    fn default() -> Self {
        Self {
            switch_pm_text: None,
            switch_pm_parameter: None,
            is_personal: true,
            cache_time: 300,
        }
    }
}

/// Chat status shown to the user for a few seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    UploadDocument,
}

impl ChatAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatAction::Typing => "typing",
            ChatAction::UploadPhoto => "upload_photo",
            ChatAction::UploadDocument => "upload_document",
        }
    }
}

impl Client {
    pub async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("text", text);
        params.push("parse_mode", options.parse_mode.as_str());
        params.push("disable_web_page_preview", options.disable_web_page_preview);
        params.push("disable_notification", options.disable_notification);
        params.push_opt("reply_to_message_id", options.reply_to_message_id);
        if let Some(markup) = &options.reply_markup {
            params.push_json("reply_markup", markup)?;
        }
        self.execute("sendMessage", params).await
    }

    pub async fn forward_message(
        &self,
        chat: ChatId,
        from_chat: ChatId,
        message_id: MessageId,
        disable_notification: bool,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("from_chat_id", from_chat);
        params.push("message_id", message_id);
        params.push("disable_notification", disable_notification);
        self.execute("forwardMessage", params).await
    }

    /// `photo` is a file id or a URL; uploads are not supported here.
    pub async fn send_photo(
        &self,
        chat: ChatId,
        photo: &str,
        options: &PhotoOptions,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("photo", photo);
        params.push_opt("caption", options.caption.as_deref());
        params.push("disable_notification", options.disable_notification);
        if let Some(markup) = &options.reply_markup {
            params.push_json("reply_markup", markup)?;
        }
        self.execute("sendPhoto", params).await
    }

    pub async fn send_sticker(
        &self,
        chat: ChatId,
        sticker: &str,
        disable_notification: bool,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("sticker", sticker);
        params.push("disable_notification", disable_notification);
        self.execute("sendSticker", params).await
    }

    pub async fn send_chat_action(&self, chat: ChatId, action: ChatAction) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("action", action.as_str());
        self.execute("sendChatAction", params).await
    }

    pub async fn edit_message_text(
        &self,
        chat: ChatId,
        message_id: MessageId,
        text: &str,
        options: &EditOptions,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("message_id", message_id);
        params.push("text", text);
        params.push("parse_mode", options.parse_mode.as_str());
        params.push("disable_web_page_preview", options.disable_web_page_preview);
        if let Some(markup) = &options.reply_markup {
            params.push_json("reply_markup", markup)?;
        }
        self.execute("editMessageText", params).await
    }

    /// Edit a message that was sent via an inline query result.
    pub async fn edit_inline_message_text(
        &self,
        inline_message_id: &str,
        text: &str,
        options: &EditOptions,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("inline_message_id", inline_message_id);
        params.push("text", text);
        params.push("parse_mode", options.parse_mode.as_str());
        params.push("disable_web_page_preview", options.disable_web_page_preview);
        if let Some(markup) = &options.reply_markup {
            params.push_json("reply_markup", markup)?;
        }
        self.execute("editMessageText", params).await
    }

    pub async fn edit_message_reply_markup(
        &self,
        chat: ChatId,
        message_id: MessageId,
        markup: &InlineKeyboardMarkup,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        params.push("message_id", message_id);
        params.push_json("reply_markup", markup)?;
        self.execute("editMessageReplyMarkup", params).await
    }

    pub async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("callback_query_id", callback_id);
        params.push_opt("text", text);
        params.push("show_alert", show_alert);
        self.execute("answerCallbackQuery", params).await
    }

    /// `results` must be a JSON array of InlineQueryResult objects.
    pub async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &Value,
        options: &InlineQueryOptions,
    ) -> Result<Value> {
        if !results.is_array() {
            return Err(Error::Validation(
                "inline query results must be a JSON array".to_string(),
            ));
        }

        let mut params = Params::new();
        params.push("inline_query_id", inline_query_id);
        params.push_json("results", results)?;
        params.push("is_personal", options.is_personal);
        params.push("cache_time", options.cache_time);
        params.push_opt("switch_pm_text", options.switch_pm_text.as_deref());
        params.push_opt(
            "switch_pm_parameter",
            options.switch_pm_parameter.as_deref(),
        );
        self.execute("answerInlineQuery", params).await
    }

    pub async fn get_chat(&self, chat: ChatId) -> Result<Value> {
        let mut params = Params::new();
        params.push("chat_id", chat);
        self.execute("getChat", params).await
    }

    pub async fn get_me(&self) -> Result<Value> {
        self.execute("getMe", Params::new()).await
    }

    /// Long-poll for updates. Invalid combinations fail before any network
    /// call: `limit` outside 1..=100 or a timeout above 60 s.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        limit: u32,
        timeout_secs: u32,
    ) -> Result<Value> {
        if !(1..=100).contains(&limit) {
            return Err(Error::Validation(format!(
                "getUpdates limit must be within 1..=100, got {limit}"
            )));
        }
        if timeout_secs > 60 {
            return Err(Error::Validation(format!(
                "getUpdates timeout must be at most 60s, got {timeout_secs}"
            )));
        }

        let mut params = Params::new();
        params.push_opt("offset", offset);
        params.push("limit", limit);
        params.push("timeout", timeout_secs);
        self.execute("getUpdates", params).await
    }
}

#[async_trait]
impl Outbound for Client {
    async fn chat_info(&self, chat: ChatId) -> Result<Value> {
        self.get_chat(chat).await
    }

    async fn send_text(&self, chat: ChatId, text: &str, options: &SendOptions) -> Result<Value> {
        self.send_message(chat, text, options).await
    }
}
