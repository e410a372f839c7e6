use std::time::Duration;

use marketmate_core::config::ApiConfig;
use marketmate_core::{MarketMateError, MarketMateResult};
use reqwest::Response;
use tracing::{debug, info};
use url::Url;

use crate::types::{Credentials, ErrorBody, GenerateRequest, GenerateResponse, SendRequest, SendResponse};

/// Async client for the MarketMate backend.
///
/// Cheap to clone; the underlying `reqwest::Client` is a shared handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> MarketMateResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MarketMateError::Config(format!("invalid base URL {}: {e}", config.base_url))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| MarketMateError::Config(format!("failed to build HTTP client: {e}")))?;

        info!(base_url = %base_url, "API client initialized");
        Ok(Self { http, base_url })
    }

    /// Authenticate existing credentials via `POST /login`. Success is any
    /// 2xx; the response body is ignored.
    pub async fn login(&self, email: &str, password: &str) -> MarketMateResult<()> {
        debug!(email, "POST /login");
        let resp = self.post("/login", &Credentials { email, password }).await?;
        check_status(resp).await.map(|_| ())
    }

    /// Register new credentials via `POST /signup`. Same contract as login.
    pub async fn signup(&self, email: &str, password: &str) -> MarketMateResult<()> {
        debug!(email, "POST /signup");
        let resp = self.post("/signup", &Credentials { email, password }).await?;
        check_status(resp).await.map(|_| ())
    }

    /// Ask the backend to draft an email template. Returns the raw generated
    /// text; splitting into subject/body is the wizard's concern.
    pub async fn generate_email(&self, req: &GenerateRequest) -> MarketMateResult<String> {
        debug!(company = %req.company_name, trigger = %req.trigger_type, "POST /generate_email");
        let resp = self.post("/generate_email", req).await?;
        let resp = check_status(resp).await?;
        let body: GenerateResponse = decode(resp).await?;
        Ok(body.generated_email)
    }

    /// Dispatch the campaign via `POST /send_email`. Returns the backend's
    /// confirmation message, surfaced verbatim to the user.
    pub async fn send_email(&self, req: &SendRequest) -> MarketMateResult<String> {
        debug!(recipients = req.recipients.len(), "POST /send_email");
        let resp = self.post("/send_email", req).await?;
        let resp = check_status(resp).await?;
        let body: SendResponse = decode(resp).await?;
        Ok(body.message)
    }

    async fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> MarketMateResult<Response> {
        let url = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        self.http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(transport_error)
    }
}

/// Map a transport-level failure (connect, timeout) into the normalized
/// remote error shape. No server message exists at this layer.
fn transport_error(err: reqwest::Error) -> MarketMateError {
    MarketMateError::Remote {
        status: err.status().map(|s| s.as_u16()),
        message: None,
    }
}

/// Pass 2xx responses through; turn anything else into `Remote`, extracting
/// `body.message` when the failure body is JSON with that field.
async fn check_status(resp: Response) -> MarketMateResult<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.message);
    debug!(status, ?message, "remote call failed");
    Err(MarketMateError::Remote {
        status: Some(status),
        message,
    })
}

/// Decode a 2xx body; a malformed success body is still a remote failure
/// from the caller's point of view.
async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> MarketMateResult<T> {
    let status = resp.status().as_u16();
    resp.json::<T>().await.map_err(|_| MarketMateError::Remote {
        status: Some(status),
        message: None,
    })
}
