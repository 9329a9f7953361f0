use thiserror::Error;

/// Errors crossing the API-client boundary. Drip and deploy calls flatten
/// these into their outcome types; everything else propagates them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("malformed response from {endpoint}: {detail}")]
    Envelope {
        endpoint: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn envelope(endpoint: &'static str, detail: impl Into<String>) -> Self {
        ApiError::Envelope {
            endpoint,
            detail: detail.into(),
        }
    }
}
