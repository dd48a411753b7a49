use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[cfg(feature = "gemini")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("API key is missing; set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("address too short to resolve: {0:?}")]
    AddressTooShort(String),
}
