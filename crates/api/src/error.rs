#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InvalidUrl(String),
    Transport(String),
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidUrl(url) => write!(f, "invalid api url: {url}"),
            ApiError::Transport(msg) => write!(f, "request failed: {msg}"),
            ApiError::Decode(msg) => write!(f, "unexpected response body: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
