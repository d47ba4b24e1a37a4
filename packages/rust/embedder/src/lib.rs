//! Remote embedding capability: text in, fixed-length vector out.
//!
//! The pipeline only sees the [`Embedder`] trait — a fallible
//! `text → Vec<f32>` conversion. The concrete [`OpenAiEmbedder`] talks to
//! the OpenAI `/v1/embeddings` endpoint over reqwest. Every failure mode
//! (network, authentication, rate limiting, undecodable response) maps to a
//! typed [`EmbeddingError`]; nothing panics into the caller.

mod error;
mod openai;

pub use error::EmbeddingError;
pub use openai::OpenAiEmbedder;

/// A stateless capability converting a text string into an embedding
/// vector, or a classified failure.
///
/// Implementations make exactly one attempt per call; retry policy (if
/// any) belongs to the caller.
pub trait Embedder {
    /// Embed `text`, returning the vector or a typed failure.
    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = std::result::Result<Vec<f32>, EmbeddingError>> + Send;
}
