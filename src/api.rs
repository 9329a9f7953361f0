//! HTTP client for the faucet backend.
//!
//! Every function maps one request to one tagged result: build, send,
//! classify by status, decode the `{status, data, error}` envelope. Drip and
//! deploy additionally flatten all failures into their outcome types so the
//! UI boundary never sees a raw error.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use crate::config::Endpoints;
use crate::error::ApiError;
use crate::session::SessionStore;
use crate::types::{
    AuthData, CaptchaData, DeployData, DeployOutcome, DeployRequest, DripData, DripOutcome,
    DripRequest, Envelope, ResponseStatus, Token, User,
};

const IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// Minimum perceived latency for drip/deploy calls. Responses that come back
/// faster are held until this much wall time has passed, so the loading state
/// is always visible. UX policy, not a correctness requirement.
pub const MIN_PERCEIVED_LATENCY: Duration = Duration::from_millis(500);

/// Hold until `min` has elapsed since `started`; no-op if it already has.
pub async fn pad_to_min_latency(started: Instant, min: Duration) {
    let elapsed = started.elapsed();
    if elapsed < min {
        tokio::time::sleep(min - elapsed).await;
    }
}

pub struct FaucetClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    session: Arc<dyn SessionStore>,
}

impl FaucetClient {
    pub fn new(
        endpoints: Endpoints,
        session: Arc<dyn SessionStore>,
        timeout_ms: u64,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            endpoints,
            session,
        })
    }

    fn bearer(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.load() {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    /// Public IP as seen by a third-party lookup. No local fallback; the
    /// caller decides what a missing IP means.
    pub async fn fetch_ip(&self) -> Result<String, ApiError> {
        let response = self.http.get(IP_LOOKUP_URL).send().await?;
        let value: serde_json::Value = response.json().await?;
        value["ip"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ApiError::envelope("ip-lookup", "no ip field"))
    }

    /// Verify a Turnstile token for this client IP. Errors on non-2xx.
    pub async fn verify_captcha(&self, ip: &str, token: &str) -> Result<bool, ApiError> {
        let response = self
            .http
            .post(self.endpoints.captcha())
            .json(&json!({ "ip": ip, "token": token }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "captcha",
                status: response.status().as_u16(),
            });
        }
        let envelope: Envelope<CaptchaData> = response.json().await?;
        envelope
            .data
            .map(|d| d.success)
            .ok_or_else(|| ApiError::envelope("captcha", "no success flag"))
    }

    /// Exchange an OAuth code for a session token and persist it. The caller
    /// is responsible for dropping the pending code either way.
    pub async fn exchange_code(&self, code: &str) -> Result<String, ApiError> {
        let response = self.http.get(self.endpoints.auth(code)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "auth",
                status: response.status().as_u16(),
            });
        }
        let envelope: Envelope<AuthData> = response.json().await?;
        let token = envelope
            .data
            .map(|d| d.token)
            .ok_or_else(|| ApiError::envelope("auth", "no token in response"))?;
        self.session.save(&token);
        Ok(token)
    }

    /// Fetch the logged-in user. Any failure clears the stored session and
    /// yields `None`; the error is logged, never surfaced.
    pub async fn fetch_user(&self) -> Option<User> {
        let token = self.session.load()?;
        let result: Result<User, ApiError> = async {
            let response = self
                .http
                .get(self.endpoints.user())
                .bearer_auth(&token)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(ApiError::Status {
                    endpoint: "user",
                    status: response.status().as_u16(),
                });
            }
            let envelope: Envelope<User> = response.json().await?;
            envelope
                .data
                .ok_or_else(|| ApiError::envelope("user", "no user in response"))
        }
        .await;

        match result {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("[api] user fetch failed, clearing session: {e}");
                self.session.clear();
                None
            }
        }
    }

    /// Request a drip of `token` to `address`. Local validation failures
    /// return immediately; once a response is decoded the call is held to
    /// [`MIN_PERCEIVED_LATENCY`].
    pub async fn request_drip(&self, address: &str, token: Option<&Token>) -> DripOutcome {
        let started = Instant::now();
        let token = match token {
            Some(t) if !address.is_empty() => t,
            _ => return DripOutcome::failure("Invalid address or token"),
        };

        let result: Result<Envelope<DripData>, ApiError> = async {
            let ip = self.fetch_ip().await?;
            let body = DripRequest {
                token_address: token.address.clone(),
                to: address.to_string(),
                token_type: token.token_type.clone(),
                magnification: 1,
                ip,
            };
            let response = self
                .bearer(self.http.post(self.endpoints.withdraw()))
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(ApiError::Status {
                    endpoint: "withdraw",
                    status: response.status().as_u16(),
                });
            }
            Ok(response.json().await?)
        }
        .await;

        match result {
            Ok(envelope) => {
                pad_to_min_latency(started, MIN_PERCEIVED_LATENCY).await;
                match envelope.data {
                    Some(data) => DripOutcome {
                        tx_hash: Some(data.tx_hash),
                        amount: Some(data.amount),
                        next_access: None,
                        magnification: data.magnification.max(1),
                        error: None,
                    },
                    None => {
                        let (message, next_access) = match envelope.error {
                            Some(e) => (e.message, e.next_access),
                            None => ("Unexpected response format".to_string(), None),
                        };
                        DripOutcome {
                            next_access,
                            ..DripOutcome::failure(message)
                        }
                    }
                }
            }
            Err(e) => DripOutcome::failure(e.to_string()),
        }
    }

    /// Deploy a new ERC-20 through the faucet. Multipart body: a `data` JSON
    /// part plus the icon as a `file` part. Never returns an Err.
    pub async fn deploy_token(
        &self,
        request: DeployRequest,
        icon_name: &str,
        icon_bytes: Vec<u8>,
    ) -> DeployOutcome {
        let started = Instant::now();

        let result: Result<Envelope<DeployData>, ApiError> = async {
            let data = serde_json::to_string(&request)
                .map_err(|e| ApiError::envelope("deploy", e.to_string()))?;
            let icon = reqwest::multipart::Part::bytes(icon_bytes)
                .file_name(icon_name.to_string())
                .mime_str(mime_for(icon_name))
                .map_err(|e| ApiError::envelope("deploy", e.to_string()))?;
            let form = reqwest::multipart::Form::new()
                .text("data", data)
                .part("file", icon);

            let response = self
                .bearer(self.http.post(self.endpoints.deploy_erc20()))
                .multipart(form)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(ApiError::Status {
                    endpoint: "deploy",
                    status: response.status().as_u16(),
                });
            }
            Ok(response.json().await?)
        }
        .await;

        match result {
            Ok(envelope) => {
                pad_to_min_latency(started, MIN_PERCEIVED_LATENCY).await;
                match envelope.data {
                    Some(data) => DeployOutcome {
                        contract_address: Some(data.contract_address),
                        error: None,
                    },
                    None => DeployOutcome::failure(
                        envelope
                            .error
                            .map(|e| e.message)
                            .unwrap_or_else(|| "Unexpected response format".to_string()),
                    ),
                }
            }
            Err(e) => DeployOutcome::failure(e.to_string()),
        }
    }

    /// Current token catalog. Only a Success envelope with data counts.
    pub async fn fetch_tokens(&self) -> Result<Vec<Token>, ApiError> {
        let response = self.http.get(self.endpoints.tokens()).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint: "tokens",
                status: response.status().as_u16(),
            });
        }
        let envelope: Envelope<Vec<Token>> = response.json().await?;
        match envelope.status {
            ResponseStatus::Success => envelope
                .data
                .ok_or_else(|| ApiError::envelope("tokens", "success without data")),
            ResponseStatus::Error => Err(ApiError::envelope(
                "tokens",
                envelope
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(str::to_ascii_lowercase) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "svg" => "image/svg+xml",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::session::MemorySessionStore;

    fn client() -> FaucetClient {
        FaucetClient::new(
            Endpoints::new("https://faucet.example.org", "https://x.example/tx/"),
            Arc::new(MemorySessionStore::default()),
            5000,
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn padding_holds_fast_responses_to_the_floor() {
        let started = Instant::now();
        pad_to_min_latency(started, MIN_PERCEIVED_LATENCY).await;
        assert!(started.elapsed() >= MIN_PERCEIVED_LATENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn padding_is_a_noop_once_the_floor_has_passed() {
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(700)).await;
        pad_to_min_latency(started, MIN_PERCEIVED_LATENCY).await;
        assert!(started.elapsed() < Duration::from_millis(710));
    }

    #[tokio::test]
    async fn drip_without_token_fails_locally() {
        let outcome = client()
            .request_drip("0x1111111111111111111111111111111111111111", None)
            .await;
        assert_eq!(outcome.error.as_deref(), Some("Invalid address or token"));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn drip_with_empty_address_fails_locally() {
        let token = Token {
            created_by: "faucet".into(),
            token_type: "erc20".into(),
            address: "0xAAA0000000000000000000000000000000000001".into(),
            logo_url: String::new(),
            chain_id: 1,
            symbol: "USDC".into(),
            name: "USD Coin".into(),
            decimals: 6,
        };
        let outcome = client().request_drip("", Some(&token)).await;
        assert_eq!(outcome.error.as_deref(), Some("Invalid address or token"));
    }

    #[test]
    fn mime_guess_by_extension() {
        assert_eq!(mime_for("icon.png"), "image/png");
        assert_eq!(mime_for("icon.JPEG"), "image/jpeg");
        assert_eq!(mime_for("icon"), "application/octet-stream");
    }

    #[tokio::test]
    #[ignore] // Requires a running faucet backend
    async fn fetch_tokens_live() {
        let tokens = client().fetch_tokens().await.unwrap();
        assert!(!tokens.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires a running faucet backend and a fresh Turnstile token
    async fn verify_captcha_live() {
        let ip = client().fetch_ip().await.unwrap();
        let ok = client().verify_captcha(&ip, "turnstile-token").await.unwrap();
        assert!(!ok);
    }
}
