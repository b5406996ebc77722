/// Core error type for the workspace.
///
/// Every failure kind stays distinguishable — nothing collapses to a boolean
/// sentinel. Adapter crates map their specific errors into this type so
/// callers can tell transient failures from fatal ones.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad caller input; no network call was made.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Required local state is missing; no network call was made.
    #[error("missing local state: {0}")]
    Precondition(&'static str),

    /// The remote rejected the access credential (HTTP 401). Fatal: callers
    /// must stop issuing further requests with this credential.
    #[error("credential rejected: {0}")]
    Auth(String),

    /// Transient server-side failure (HTTP 5xx), returned after the
    /// configured backoff wait.
    #[error("server error: http {status}")]
    Server { status: u16 },

    /// No usable response was obtained (DNS, refused connection, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP 200 with an `ok: false` envelope.
    #[error("api error {code}: {description}")]
    Remote { code: i64, description: String },

    /// Any other non-200 status.
    #[error("request failed: http {status}")]
    RequestFailed {
        status: u16,
        code: Option<i64>,
        description: Option<String>,
    },

    /// Response body could not be decoded as the expected envelope.
    #[error("undecodable response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Worth retrying later: the failure was on the wire or on the remote's
    /// side, not in the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Server { .. } | Error::Transport(_))
    }

    /// The credential itself was rejected; retrying cannot help.
    pub fn is_fatal_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_covers_server_and_transport() {
        assert!(Error::Server { status: 502 }.is_transient());
        assert!(Error::Transport("connection refused".to_string()).is_transient());
        assert!(!Error::Auth("bad token".to_string()).is_transient());
        assert!(!Error::Validation("empty method".to_string()).is_transient());
    }

    #[test]
    fn only_auth_is_fatal() {
        assert!(Error::Auth("bad token".to_string()).is_fatal_auth());
        assert!(!Error::Server { status: 500 }.is_fatal_auth());
    }
}
