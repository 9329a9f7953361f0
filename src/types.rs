use serde::{Deserialize, Serialize};

/// Envelope used by every JSON endpoint on the faucet backend.
/// `data` is present on Success, `error` on Error; neither is guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_access: Option<String>,
}

/// One entry of the drippable-token catalog, keyed by address.
/// `token_type` is echoed verbatim into withdraw requests, so it stays a
/// plain string rather than an enum of the currently known kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub created_by: String,
    pub token_type: String,
    pub address: String,
    pub logo_url: String,
    pub chain_id: u64,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub github_id: String,
    pub access_token: String,
    pub avatar_url: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// `data` of a successful `/withdraw` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DripData {
    pub tx_hash: String,
    pub amount: String,
    #[serde(default = "default_magnification")]
    pub magnification: u32,
}

fn default_magnification() -> u32 {
    1
}

/// `data` of a successful `/deploy/erc20` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployData {
    pub contract_address: String,
}

/// `data` of a successful `/auth?code=...` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthData {
    pub token: String,
}

/// `data` of a successful `/verify-turnstile-captcha` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaData {
    pub success: bool,
}

/// Body sent to `/withdraw`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DripRequest {
    pub token_address: String,
    pub to: String,
    pub token_type: String,
    pub magnification: u32,
    pub ip: String,
}

/// JSON part of the `/deploy/erc20` multipart body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    pub name: String,
    pub symbol: String,
    pub total_supply: String,
    pub decimals: u32,
    pub deployer_address: String,
    pub ip: String,
}

/// Normalized result of one drip attempt. All fields are produced together
/// from a single response; the API layer never returns an Err for a drip.
#[derive(Debug, Clone, Default)]
pub struct DripOutcome {
    pub tx_hash: Option<String>,
    pub amount: Option<String>,
    pub next_access: Option<String>,
    pub magnification: u32,
    pub error: Option<String>,
}

impl DripOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            magnification: 1,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.tx_hash.is_some()
    }
}

/// Normalized result of one deploy attempt; same never-throws contract.
#[derive(Debug, Clone, Default)]
pub struct DeployOutcome {
    pub contract_address: Option<String>,
    pub error: Option<String>,
}

impl DeployOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            contract_address: None,
            error: Some(message.into()),
        }
    }
}

/// Events delivered to the main loop from background tasks.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Catalog poll succeeded; replaces the token list wholesale.
    CatalogReplaced(Vec<Token>),
    DripFinished(DripOutcome),
    DeployFinished(DeployOutcome),
    /// Code exchange succeeded and the session token was persisted.
    SessionEstablished,
    /// Code exchange failed before a session could be stored.
    AuthFailed(String),
    /// `None` means the fetch failed and local session state was cleared.
    UserFetched(Option<User>),
    Quit,
}
