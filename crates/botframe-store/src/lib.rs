//! SQLite-backed subscriber registry and the broadcast helper built on it.
//!
//! Table and column names are configurable but validated up front — they are
//! spliced into SQL text, so only plain identifiers pass. Row values are
//! always bound as statement parameters.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use botframe_core::{
    domain::ChatId,
    pacing::IntervalPacer,
    port::{Outbound, SendOptions},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No live storage connection; call `connect` first.
    #[error("storage connection not set")]
    NotConfigured,

    /// A configured table or column name is not a plain SQL identifier.
    #[error("invalid sql identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl From<StoreError> for botframe_core::Error {
    fn from(e: StoreError) -> Self {
        botframe_core::Error::Storage(e.to_string())
    }
}

/// Registry of chat ids the bot has seen, one row per subscriber.
pub struct UserStore {
    conn: Option<Connection>,
    table: String,
    column: String,
}

impl UserStore {
    /// Validates the identifiers; the connection is established separately.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        let column = column.into();
        validate_identifier(&table)?;
        validate_identifier(&column)?;
        Ok(Self {
            conn: None,
            table,
            column,
        })
    }

    pub fn connect(&mut self, path: &Path) -> Result<(), StoreError> {
        let conn = Connection::open(path)?;
        self.init_schema(conn)
    }

    pub fn connect_in_memory(&mut self) -> Result<(), StoreError> {
        let conn = Connection::open_in_memory()?;
        self.init_schema(conn)
    }

    fn init_schema(&mut self, conn: Connection) -> Result<(), StoreError> {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({} INTEGER PRIMARY KEY)",
                self.table, self.column
            ),
            [],
        )?;
        self.conn = Some(conn);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::NotConfigured)
    }

    /// Insert one subscriber row. Re-inserting an existing id is an `Err`
    /// (primary key), which callers may treat as already-subscribed.
    pub fn add_user(&self, user: ChatId) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES (?1)",
                self.table, self.column
            ),
            [user.0],
        )?;
        Ok(())
    }

    /// All stored ids, materialized so callers get a countable cursor.
    pub fn user_ids(&self) -> Result<Vec<ChatId>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM {}", self.column, self.table))?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        rows.map(|row| row.map(ChatId).map_err(StoreError::from))
            .collect()
    }

    pub fn count_users(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

/// Outcome of a broadcast run.
///
/// Rows read and deliveries are reported separately: `subscribers` is the
/// stored-row count and says nothing about how many sends succeeded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub subscribers: usize,
    pub sent: usize,
    pub lookup_failed: usize,
    pub send_failed: usize,
}

/// Send `text` to every stored subscriber, strictly sequentially.
///
/// For each row: one chat-metadata lookup, and only if it succeeds, one
/// send. Per-user failures are counted, logged, and skipped — they never
/// abort the run. `pace` spaces the users to stay under the platform's
/// bulk-send flood limit.
pub async fn broadcast_message<O: Outbound + ?Sized>(
    outbound: &O,
    store: &UserStore,
    text: &str,
    options: &SendOptions,
    pace: Option<Duration>,
) -> Result<BroadcastReport, StoreError> {
    let users = store.user_ids()?;
    let mut report = BroadcastReport {
        subscribers: users.len(),
        ..Default::default()
    };
    let mut pacer = pace.map(IntervalPacer::new);

    for user in users {
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait().await;
        }

        match outbound.chat_info(user).await {
            Ok(_) => match outbound.send_text(user, text, options).await {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    tracing::warn!("broadcast send to {user} failed: {e}");
                    report.send_failed += 1;
                }
            },
            Err(e) => {
                tracing::warn!("chat lookup for {user} failed, skipping send: {e}");
                report.lookup_failed += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use botframe_core::{Error, Result as CoreResult};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    fn connected_store() -> UserStore {
        let mut store = UserStore::new("users", "chat_id").unwrap();
        store.connect_in_memory().unwrap();
        store
    }

    #[test]
    fn rejects_injection_shaped_identifiers() {
        assert!(UserStore::new("users; DROP TABLE users", "chat_id").is_err());
        assert!(UserStore::new("users", "chat_id--").is_err());
        assert!(UserStore::new("", "chat_id").is_err());
        assert!(UserStore::new("1users", "chat_id").is_err());
        assert!(UserStore::new("bot_users", "chat_id").is_ok());
    }

    #[test]
    fn operations_require_a_connection() {
        let store = UserStore::new("users", "chat_id").unwrap();
        assert!(!store.is_connected());
        assert!(matches!(
            store.add_user(ChatId(1)),
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(store.user_ids(), Err(StoreError::NotConfigured)));
    }

    #[test]
    fn add_and_read_back_round_trips() {
        let store = connected_store();
        store.add_user(ChatId(10)).unwrap();
        store.add_user(ChatId(-20)).unwrap();

        assert_eq!(store.count_users().unwrap(), 2);
        let mut ids = store.user_ids().unwrap();
        ids.sort_by_key(|chat| chat.0);
        assert_eq!(ids, vec![ChatId(-20), ChatId(10)]);
    }

    #[test]
    fn duplicate_subscription_surfaces_the_sqlite_cause() {
        let store = connected_store();
        store.add_user(ChatId(10)).unwrap();
        assert!(matches!(store.add_user(ChatId(10)), Err(StoreError::Sql(_))));
        assert_eq!(store.count_users().unwrap(), 1);
    }

    /// Records every call; lookups fail for ids in `unreachable`, sends fail
    /// for ids in `undeliverable`.
    #[derive(Default)]
    struct FakeOutbound {
        unreachable: Vec<i64>,
        undeliverable: Vec<i64>,
        lookups: Mutex<Vec<i64>>,
        sends: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl Outbound for FakeOutbound {
        async fn chat_info(&self, chat: ChatId) -> CoreResult<Value> {
            self.lookups.lock().unwrap().push(chat.0);
            if self.unreachable.contains(&chat.0) {
                return Err(Error::Remote {
                    code: 400,
                    description: "chat not found".to_string(),
                });
            }
            Ok(json!({"id": chat.0, "type": "private"}))
        }

        async fn send_text(
            &self,
            chat: ChatId,
            _text: &str,
            _options: &SendOptions,
        ) -> CoreResult<Value> {
            self.sends.lock().unwrap().push(chat.0);
            if self.undeliverable.contains(&chat.0) {
                return Err(Error::Remote {
                    code: 403,
                    description: "bot was blocked by the user".to_string(),
                });
            }
            Ok(json!({"message_id": 1}))
        }
    }

    #[tokio::test]
    async fn broadcast_looks_up_every_row_and_skips_failed_lookups() {
        let store = connected_store();
        for id in [1, 2, 3, 4] {
            store.add_user(ChatId(id)).unwrap();
        }
        let outbound = FakeOutbound {
            unreachable: vec![3],
            ..Default::default()
        };

        let report = broadcast_message(
            &outbound,
            &store,
            "hello",
            &SendOptions::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(outbound.lookups.lock().unwrap().len(), 4);
        assert_eq!(outbound.sends.lock().unwrap().as_slice(), &[1, 2, 4]);
        assert_eq!(
            report,
            BroadcastReport {
                subscribers: 4,
                sent: 3,
                lookup_failed: 1,
                send_failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn subscriber_count_is_rows_read_not_deliveries() {
        let store = connected_store();
        for id in [1, 2, 3] {
            store.add_user(ChatId(id)).unwrap();
        }
        let outbound = FakeOutbound {
            undeliverable: vec![1, 2, 3],
            ..Default::default()
        };

        let report = broadcast_message(
            &outbound,
            &store,
            "hello",
            &SendOptions::default(),
            None,
        )
        .await
        .unwrap();

        // Every delivery failed; the stored-row count still comes back as 3.
        assert_eq!(report.subscribers, 3);
        assert_eq!(report.sent, 0);
        assert_eq!(report.send_failed, 3);
    }

    #[tokio::test]
    async fn broadcast_over_an_empty_table_does_nothing() {
        let store = connected_store();
        let outbound = FakeOutbound::default();

        let report = broadcast_message(
            &outbound,
            &store,
            "hello",
            &SendOptions::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(report, BroadcastReport::default());
        assert!(outbound.lookups.lock().unwrap().is_empty());
    }
}
