/// Error types shared across quiz service crates.
///
/// These errors represent failures in infrastructure components (Redis, the
/// generative-language API) that are common to any service in this workspace.
/// Application-specific errors should be defined in each service crate and
/// wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis unavailable, degrading gracefully")]
    RedisUnavailable,

    #[error("gemini error: {0}")]
    Gemini(#[from] crate::gemini::GeminiError),
}
