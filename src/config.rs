use anyhow::{anyhow, Result};
use clap::Parser;

use crate::theme::Theme;

/// Spigot - testnet faucet terminal client
///
/// Requests testnet tokens, deploys new ERC-20 tokens, and signs in through
/// the faucet backend's GitHub OAuth exchange.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "spigot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Testnet faucet terminal client", long_about = None)]
pub struct CliArgs {
    /// Faucet backend base URL (required)
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Turnstile captcha site id (required)
    #[arg(long, env = "CAPTCHA_SITE_ID")]
    pub captcha_site_id: Option<String>,

    /// GitHub OAuth client id (required)
    #[arg(long, env = "GITHUB_CLIENT_ID")]
    pub github_client_id: Option<String>,

    /// Block explorer base URL for transaction links (required)
    #[arg(long, env = "EXPLORER_URL")]
    pub explorer_url: Option<String>,

    /// Token catalog poll interval in seconds (5-300)
    #[arg(long, env = "POLL_INTERVAL_SECS")]
    pub poll_interval_secs: Option<u64>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord, dos-blue, amber-crt, green-phosphor
    #[arg(long, env = "SPIGOT_THEME")]
    pub theme: Option<String>,

    /// OAuth code or full redirect URL to exchange at startup
    #[arg(long, env = "AUTH_CODE")]
    pub auth_code: Option<String>,

    /// Path of the session token file (defaults to ~/.spigot/session)
    #[arg(long, env = "SESSION_FILE")]
    pub session_file: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: String,
    pub captcha_site_id: String,
    pub github_client_id: String,
    pub explorer_url: String,
    pub poll_interval_secs: u64,
    pub http_timeout_ms: u64,
    pub render_fps: u32,
    pub theme: Theme,
    pub auth_code: Option<String>,
    pub session_file: Option<String>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// A required setting must be present and non-empty; anything else is fatal.
fn require(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("Missing {name} in environment or CLI args")),
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables.
/// Fails fast: with any required setting absent the application never gets
/// as far as constructing an endpoint table.
pub fn load() -> Result<Config> {
    Config::from_args(CliArgs::parse())
}

impl Config {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let backend_url = require(args.backend_url, "BACKEND_URL")?;
        validate_url(&backend_url, "BACKEND_URL")?;

        let captcha_site_id = require(args.captcha_site_id, "CAPTCHA_SITE_ID")?;
        let github_client_id = require(args.github_client_id, "GITHUB_CLIENT_ID")?;

        let explorer_url = require(args.explorer_url, "EXPLORER_URL")?;
        validate_url(&explorer_url, "EXPLORER_URL")?;

        let poll_interval_secs = args.poll_interval_secs.unwrap_or(20);
        let poll_interval_secs =
            validate_in_range(poll_interval_secs, 5, 300, "POLL_INTERVAL_SECS")?;

        let http_timeout_ms = args.http_timeout_ms.unwrap_or(15_000);
        let http_timeout_ms = validate_in_range(http_timeout_ms, 1000, 60_000, "HTTP_TIMEOUT_MS")?;

        let render_fps = args.render_fps.unwrap_or(30);
        let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

        let theme = match args.theme.as_deref() {
            Some(name) => Theme::from_str(name).map_err(|e| anyhow!(e))?,
            None => Theme::default(),
        };

        Ok(Config {
            backend_url,
            captcha_site_id,
            github_client_id,
            explorer_url,
            poll_interval_secs,
            http_timeout_ms,
            render_fps,
            theme,
            auth_code: args.auth_code,
            session_file: args.session_file,
        })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.backend_url, &self.explorer_url)
    }
}

/// Stable mapping from logical endpoint name to absolute URL, derived once
/// from the validated backend base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
    explorer: String,
}

impl Endpoints {
    pub fn new(backend_url: &str, explorer_url: &str) -> Self {
        Self {
            base: backend_url.trim_end_matches('/').to_string(),
            explorer: explorer_url.to_string(),
        }
    }

    pub fn captcha(&self) -> String {
        format!("{}/verify-turnstile-captcha", self.base)
    }

    pub fn test_auth(&self) -> String {
        format!("{}/test_auth", self.base)
    }

    pub fn withdraw(&self) -> String {
        format!("{}/withdraw", self.base)
    }

    pub fn deploy_erc20(&self) -> String {
        format!("{}/deploy/erc20", self.base)
    }

    pub fn user(&self) -> String {
        format!("{}/user", self.base)
    }

    pub fn upload(&self) -> String {
        format!("{}/upload", self.base)
    }

    pub fn tokens(&self) -> String {
        format!("{}/tokens", self.base)
    }

    pub fn auth(&self, code: &str) -> String {
        format!("{}/auth?code={code}", self.base)
    }

    /// Explorer page for a transaction hash (the explorer base already ends
    /// with its path prefix, matching the deployed frontend's usage).
    pub fn explorer_tx(&self, tx_hash: &str) -> String {
        format!("{}{tx_hash}", self.explorer)
    }

    /// GitHub authorize URL for the login flow.
    pub fn github_authorize(client_id: &str) -> String {
        format!("https://github.com/login/oauth/authorize?client_id={client_id}")
    }
}
