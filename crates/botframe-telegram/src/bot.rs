use serde_json::Value;

use botframe_core::{
    domain::{ChatId, MessageId},
    keyboard::InlineKeyboardMarkup,
    port::SendOptions,
    Error, Result,
};

use crate::{
    client::{ApiConfig, Client},
    methods::{ChatAction, EditOptions, PhotoOptions},
};

/// Stateful facade over `Client` for callers that work through one
/// conversation at a time.
///
/// Holds the current chat target and, while a callback query is being
/// handled, its id. Every wrapper checks the state it needs up front and
/// fails with `Error::Precondition` before any network traffic; the
/// underlying `Client` methods always take explicit targets and are
/// reachable via `client()`.
pub struct Bot {
    client: Client,
    chat: Option<ChatId>,
    callback_id: Option<String>,
    bot_id: Option<i64>,
}

impl Bot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            chat: None,
            callback_id: None,
            bot_id: None,
        }
    }

    pub fn from_token(token: &str) -> Result<Self> {
        Ok(Self::new(Client::new(token, ApiConfig::default())?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn chat(&self) -> Option<ChatId> {
        self.chat
    }

    /// Change the chat every following send/edit addresses.
    pub fn set_chat(&mut self, chat: ChatId) {
        self.chat = Some(chat);
    }

    pub fn set_callback_id(&mut self, id: impl Into<String>) {
        self.callback_id = Some(id.into());
    }

    pub fn clear_callback_id(&mut self) {
        self.callback_id = None;
    }

    fn current_chat(&self) -> Result<ChatId> {
        self.chat.ok_or(Error::Precondition("chat target is not set"))
    }

    fn current_callback(&self) -> Result<&str> {
        self.callback_id
            .as_deref()
            .ok_or(Error::Precondition("callback query id is not set"))
    }

    /// The bot's own user id, fetched once via `getMe` and cached.
    pub async fn bot_id(&mut self) -> Result<i64> {
        if let Some(id) = self.bot_id {
            return Ok(id);
        }
        let me = self.client.get_me().await?;
        let id: i64 = serde_json::from_value(me.get("id").cloned().unwrap_or(Value::Null))?;
        self.bot_id = Some(id);
        Ok(id)
    }

    pub async fn send_message(&self, text: &str, options: &SendOptions) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client.send_message(chat, text, options).await
    }

    pub async fn forward_message(
        &self,
        from_chat: ChatId,
        message_id: MessageId,
        disable_notification: bool,
    ) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client
            .forward_message(chat, from_chat, message_id, disable_notification)
            .await
    }

    pub async fn send_photo(&self, photo: &str, options: &PhotoOptions) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client.send_photo(chat, photo, options).await
    }

    pub async fn send_sticker(&self, sticker: &str, disable_notification: bool) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client
            .send_sticker(chat, sticker, disable_notification)
            .await
    }

    pub async fn send_chat_action(&self, action: ChatAction) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client.send_chat_action(chat, action).await
    }

    pub async fn edit_message_text(
        &self,
        message_id: MessageId,
        text: &str,
        options: &EditOptions,
    ) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client
            .edit_message_text(chat, message_id, text, options)
            .await
    }

    pub async fn edit_message_reply_markup(
        &self,
        message_id: MessageId,
        markup: &InlineKeyboardMarkup,
    ) -> Result<Value> {
        let chat = self.current_chat()?;
        self.client
            .edit_message_reply_markup(chat, message_id, markup)
            .await
    }

    /// Answer the callback query currently being handled.
    pub async fn answer_callback_query(
        &self,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<Value> {
        let callback_id = self.current_callback()?;
        self.client
            .answer_callback_query(callback_id, text, show_alert)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_bot() -> Bot {
        // Unroutable host: these tests must fail before any network call.
        let client = Client::new(
            "1234:test-token",
            ApiConfig {
                host: "http://127.0.0.1:1".to_string(),
                ..ApiConfig::default()
            },
        )
        .unwrap();
        Bot::new(client)
    }

    #[tokio::test]
    async fn sends_fail_fast_without_a_chat_target() {
        let bot = offline_bot();

        let err = bot
            .send_message("hello", &SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));

        let err = bot
            .forward_message(ChatId(1), MessageId(2), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));

        let err = bot
            .edit_message_text(MessageId(2), "x", &EditOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[tokio::test]
    async fn callback_answer_requires_a_current_callback() {
        let bot = offline_bot();
        let err = bot.answer_callback_query(None, false).await.unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn chat_target_is_readable_back() {
        let mut bot = offline_bot();
        assert_eq!(bot.chat(), None);
        bot.set_chat(ChatId(77));
        assert_eq!(bot.chat(), Some(ChatId(77)));
    }
}
