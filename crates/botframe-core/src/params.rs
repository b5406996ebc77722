use serde::Serialize;

use crate::Result;

/// Ordered key/value set serialized into a request's query string.
///
/// Absent optional values are omitted entirely — the wire never sees an
/// empty or literal-null entry for a parameter the caller didn't supply.
/// Nested structures (reply markup, inline results) are embedded as compact
/// JSON, which is how the Bot API expects them inside a query string.
#[derive(Clone, Debug, Default)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar parameter. Bools render as `true`/`false`.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.push((key.into(), value.to_string()));
    }

    /// Add a scalar parameter only when it is present.
    pub fn push_opt(&mut self, key: impl Into<String>, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    /// Add a nested structure as a compact JSON value.
    pub fn push_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.entries.push((key.into(), json));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The encoded pairs, in insertion order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}
