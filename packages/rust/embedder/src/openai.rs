//! OpenAI embeddings client.
//!
//! One HTTP POST per window: `{ "input": text, "model": ... }` against the
//! configured embeddings endpoint, bearer-authenticated. The response's
//! first `data[].embedding` array is the vector.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use chaptervec_shared::{ChapterVecError, EmbedderConfig, Result};

use crate::{Embedder, EmbeddingError};

/// User-Agent string for embedding requests.
const USER_AGENT: &str = concat!("chaptervec/", env!("CARGO_PKG_VERSION"));

/// Request body for the embeddings endpoint.
#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

/// Response body from the embeddings endpoint. Fields we do not consume
/// (usage, object tags) are ignored.
#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// [`Embedder`] backed by the OpenAI `/v1/embeddings` API.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    /// Build an embedder from a validated runtime config.
    ///
    /// The per-request timeout bounds each network call; a window whose
    /// call times out is classified as a transport failure.
    pub fn new(config: &EmbedderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ChapterVecError::config(format!("invalid embeddings endpoint '{}': {e}", config.endpoint))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChapterVecError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Transport(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(EmbeddingError::Authentication(format!("HTTP {status}")));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(EmbeddingError::RateLimited(format!("HTTP {status}")));
            }
            s if !s.is_success() => {
                return Err(EmbeddingError::Transport(format!("HTTP {status}")));
            }
            _ => {}
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                EmbeddingError::MalformedResponse("response contained no embeddings".into())
            })?;

        debug!(dimensions = vector.len(), "embedding received");
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(endpoint: String) -> EmbedderConfig {
        EmbedderConfig {
            api_key: "test-key".into(),
            model: "text-embedding-ada-002".into(),
            endpoint,
            timeout: Duration::from_secs(5),
        }
    }

    fn embedder_for(server: &MockServer) -> OpenAiEmbedder {
        let config = test_config(format!("{}/v1/embeddings", server.uri()));
        OpenAiEmbedder::new(&config).expect("build embedder")
    }

    #[tokio::test]
    async fn successful_embed_returns_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-embedding-ada-002",
                "input": "They set sail at dawn."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": [0.25, -0.5, 1.0] }]
            })))
            .mount(&server)
            .await;

        let embedder = embedder_for(&server);
        let vector = embedder
            .embed("They set sail at dawn.")
            .await
            .expect("embed");
        assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn http_401_is_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let embedder = embedder_for(&server);
        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Authentication(_)));
    }

    #[tokio::test]
    async fn http_429_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let embedder = embedder_for(&server);
        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::RateLimited(_)));
    }

    #[tokio::test]
    async fn http_500_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let embedder = embedder_for(&server);
        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Transport(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let embedder = embedder_for(&server);
        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_data_array_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })),
            )
            .mount(&server)
            .await;

        let embedder = embedder_for(&server);
        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        // Port 1 is never listening.
        let config = test_config("http://127.0.0.1:1/v1/embeddings".into());
        let embedder = OpenAiEmbedder::new(&config).expect("build embedder");
        let err = embedder.embed("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Transport(_)));
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let config = test_config("not a url".into());
        assert!(OpenAiEmbedder::new(&config).is_err());
    }
}
