//! Typed embedding failure classification.

/// Why an embedding attempt failed.
///
/// These are per-window events: the orchestrator logs them and moves on to
/// the next window rather than aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Connection, timeout, or other transport-level failure (including
    /// unexpected HTTP statuses outside the classified ones).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service rejected the credential (HTTP 401/403).
    #[error("authentication error: {0}")]
    Authentication(String),

    /// The service throttled the request (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The response body could not be decoded into an embedding vector.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause() {
        let err = EmbeddingError::RateLimited("HTTP 429 from /v1/embeddings".into());
        assert!(err.to_string().starts_with("rate limited"));
        assert!(err.to_string().contains("429"));
    }
}
