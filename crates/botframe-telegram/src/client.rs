use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::time::sleep;

use botframe_core::{config::Config, params::Params, Error, Result};

/// Wire-level settings for the API client.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Wait inserted after an HTTP 5xx before the failure is handed back,
    /// so a broken remote is not hammered in a tight loop.
    pub server_error_backoff: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "https://api.telegram.org".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
            server_error_backoff: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            host: cfg.api_host.clone(),
            connect_timeout: cfg.connect_timeout,
            request_timeout: cfg.request_timeout,
            server_error_backoff: cfg.server_error_backoff,
        }
    }
}

/// Response envelope wrapping every Bot API reply.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// Executes Bot API requests: builds `{host}/bot{token}/{method}?{params}`,
/// issues exactly one POST per call, classifies the status code, and hands
/// back the inner `result` payload untransformed.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    backoff: Duration,
}

impl Client {
    pub fn new(token: &str, config: ApiConfig) -> Result<Self> {
        validate_token(token)?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{token}/", config.host.trim_end_matches('/')),
            backoff: config.server_error_backoff,
        })
    }

    /// Issue one API call. No retries; an HTTP 5xx waits out the configured
    /// backoff window (cancellable by dropping the future) before the
    /// `Server` error is returned.
    pub async fn execute(&self, method: &str, params: Params) -> Result<Value> {
        let url = format!("{}{method}", self.base_url);

        let response = match self.http.post(&url).query(params.entries()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("transport failure calling {method}: {e}");
                return Err(Error::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        if status >= 500 {
            tracing::warn!(
                "http {status} from {method}, backing off {:?}",
                self.backoff
            );
            sleep(self.backoff).await;
            return Err(Error::Server { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let outcome = classify(status, &body);
        match &outcome {
            Ok(_) => tracing::debug!("{method} ok"),
            Err(e) => tracing::warn!("{method} failed: {e}"),
        }
        outcome
    }

    /// Generic escape hatch for methods without a dedicated builder.
    ///
    /// The method name feeds straight into the request path, so it is the
    /// widest trust boundary here: only plain API method names pass.
    pub async fn api_request(&self, method: &str, params: Params) -> Result<Value> {
        validate_method_name(method)?;
        self.execute(method, params).await
    }
}

/// Map a non-5xx response to the inner payload or a typed failure.
fn classify(status: u16, body: &str) -> Result<Value> {
    if status == 200 {
        let envelope: ApiEnvelope = serde_json::from_str(body)?;
        if envelope.ok {
            return Ok(envelope.result.unwrap_or(Value::Null));
        }
        return Err(Error::Remote {
            code: envelope.error_code.unwrap_or(0),
            description: envelope.description.unwrap_or_default(),
        });
    }

    let envelope: Option<ApiEnvelope> = serde_json::from_str(body).ok();
    let description = envelope.as_ref().and_then(|e| e.description.clone());

    if status == 401 {
        return Err(Error::Auth(
            description.unwrap_or_else(|| "invalid access token".to_string()),
        ));
    }

    Err(Error::RequestFailed {
        status,
        code: envelope.and_then(|e| e.error_code),
        description,
    })
}

fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() || token.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Validation(
            "bot token is empty or not valid".to_string(),
        ));
    }
    Ok(())
}

fn validate_method_name(method: &str) -> Result<()> {
    if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Validation(format!(
            "invalid api method name: {method:?}"
        )));
    }
    Ok(())
}
