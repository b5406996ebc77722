use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

/// Typed configuration for the workspace, loaded from the environment with
/// optional `.env` support.
#[derive(Clone, Debug)]
pub struct Config {
    // Credential + wire
    pub bot_token: String,
    pub api_host: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Wait inserted after an HTTP 5xx before the failure is handed back.
    pub server_error_backoff: Duration,

    // Subscriber store
    pub store_path: Option<PathBuf>,
    pub user_table: String,
    pub user_id_column: String,
    /// Spacing between users during a broadcast; `None` disables pacing.
    pub broadcast_interval: Option<Duration>,

    // Demo binary
    pub admin_chat: Option<ChatId>,
    pub poll_limit: u32,
    pub poll_timeout_secs: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let api_host = env_str("TELEGRAM_API_HOST")
            .and_then(non_empty)
            .unwrap_or_else(|| "https://api.telegram.org".to_string());

        let connect_timeout = Duration::from_millis(env_u64("CONNECT_TIMEOUT_MS").unwrap_or(5_000));
        let request_timeout =
            Duration::from_millis(env_u64("REQUEST_TIMEOUT_MS").unwrap_or(60_000));
        let server_error_backoff =
            Duration::from_millis(env_u64("SERVER_ERROR_BACKOFF_MS").unwrap_or(10_000));

        let store_path = env_str("STORE_PATH").and_then(non_empty).map(PathBuf::from);
        let user_table = env_str("USER_TABLE")
            .and_then(non_empty)
            .unwrap_or_else(|| "users".to_string());
        let user_id_column = env_str("USER_ID_COLUMN")
            .and_then(non_empty)
            .unwrap_or_else(|| "chat_id".to_string());

        // 0 disables pacing; the default stays under Telegram's per-second
        // bulk-send limit.
        let broadcast_interval = match env_u64("BROADCAST_INTERVAL_MS").unwrap_or(1_050) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        let admin_chat = env_i64("ADMIN_CHAT_ID").map(ChatId);
        let poll_limit = env_u32("POLL_LIMIT").unwrap_or(100).clamp(1, 100);
        let poll_timeout_secs = env_u32("POLL_TIMEOUT_SECS").unwrap_or(30).min(60);

        Ok(Self {
            bot_token,
            api_host,
            connect_timeout,
            request_timeout,
            server_error_backoff,
            store_path,
            user_table,
            user_id_column,
            broadcast_interval,
            admin_chat,
            poll_limit,
            poll_timeout_secs,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_i64(key: &str) -> Option<i64> {
    env_str(key).and_then(|s| s.trim().parse::<i64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
