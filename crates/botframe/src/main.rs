//! Demo long-polling bot.
//!
//! Subscribes every sender to the user store, echoes text messages back, and
//! lets the configured admin chat broadcast to all subscribers.

use std::time::Duration;

use serde_json::Value;

use botframe_core::{config::Config, domain::ChatId, port::SendOptions, Error};
use botframe_store::{broadcast_message, UserStore};
use botframe_telegram::{ApiConfig, Bot, Client};

#[tokio::main]
async fn main() -> Result<(), Error> {
    botframe_core::logging::init("botframe")?;

    let cfg = Config::load()?;
    let client = Client::new(&cfg.bot_token, ApiConfig::from_config(&cfg))?;
    let mut bot = Bot::new(client);

    let mut store = UserStore::new(cfg.user_table.as_str(), cfg.user_id_column.as_str())?;
    match &cfg.store_path {
        Some(path) => {
            store.connect(path)?;
            tracing::info!("subscriber store at {}", path.display());
        }
        None => {
            tracing::warn!("STORE_PATH not set; subscriptions and /broadcast are disabled");
        }
    }

    run_polling(&cfg, &mut bot, &store).await
}

async fn run_polling(cfg: &Config, bot: &mut Bot, store: &UserStore) -> Result<(), Error> {
    // Validates the credential up front; a bad token stops here.
    tracing::info!("running as bot id {}", bot.bot_id().await?);

    let mut offset: Option<i64> = None;
    loop {
        let updates = match bot
            .client()
            .get_updates(offset, cfg.poll_limit, cfg.poll_timeout_secs)
            .await
        {
            Ok(updates) => updates,
            // The credential was rejected: stop issuing requests with it.
            Err(e) if e.is_fatal_auth() => return Err(e),
            Err(e) => {
                tracing::warn!("getUpdates failed: {e}");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        let Some(items) = updates.as_array() else {
            continue;
        };

        for update in items {
            if let Some(id) = update.get("update_id").and_then(Value::as_i64) {
                offset = Some(offset.map_or(id + 1, |prev| prev.max(id + 1)));
            }

            if let Err(e) = handle_update(cfg, bot, store, update).await {
                if e.is_fatal_auth() {
                    return Err(e);
                }
                tracing::warn!("update handling failed: {e}");
            }
        }
    }
}

async fn handle_update(
    cfg: &Config,
    bot: &mut Bot,
    store: &UserStore,
    update: &Value,
) -> Result<(), Error> {
    let Some(message) = update.get("message") else {
        return Ok(());
    };
    let Some(chat_id) = message.pointer("/chat/id").and_then(Value::as_i64) else {
        return Ok(());
    };
    let Some(text) = message.get("text").and_then(Value::as_str) else {
        return Ok(());
    };

    let chat = ChatId(chat_id);
    bot.set_chat(chat);

    if text == "/broadcast" || text.starts_with("/broadcast ") {
        let payload = text.strip_prefix("/broadcast").unwrap_or("").trim();
        return handle_broadcast(cfg, bot, store, chat, payload).await;
    }

    if store.is_connected() {
        if let Err(e) = store.add_user(chat) {
            // Returning users hit the primary key; nothing to do.
            tracing::debug!("subscriber insert skipped for {chat}: {e}");
        }
    }

    bot.send_message(&escape_html(text), &SendOptions::default())
        .await?;
    Ok(())
}

async fn handle_broadcast(
    cfg: &Config,
    bot: &Bot,
    store: &UserStore,
    chat: ChatId,
    text: &str,
) -> Result<(), Error> {
    let opts = SendOptions::default();

    if cfg.admin_chat != Some(chat) {
        bot.send_message("Broadcast is admin-only.", &opts).await?;
        return Ok(());
    }
    if !store.is_connected() {
        bot.send_message("No subscriber store configured.", &opts)
            .await?;
        return Ok(());
    }
    if text.is_empty() {
        bot.send_message("Usage: /broadcast &lt;text&gt;", &opts)
            .await?;
        return Ok(());
    }

    let report = broadcast_message(
        bot.client(),
        store,
        text,
        &opts,
        cfg.broadcast_interval,
    )
    .await?;

    bot.send_message(
        &format!(
            "Read {} subscribers: {} delivered, {} unreachable, {} sends failed.",
            report.subscribers, report.sent, report.lookup_failed, report.send_failed
        ),
        &opts,
    )
    .await?;
    Ok(())
}

/// Echoed user text goes out with parse_mode HTML, so the markup-significant
/// characters must be escaped.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
