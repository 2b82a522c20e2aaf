use thiserror::Error;

/// Failures crossing the backend boundary.
///
/// `Network` covers transport and non-2xx responses; `MalformedBundle` covers
/// payloads that decode but violate the data contract (missing golden vote,
/// confidence out of range, unknown outcome token, partial match records).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed payload: {0}")]
    MalformedBundle(String),
}

impl ApiError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedBundle(msg.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedBundle(err.to_string())
    }
}
