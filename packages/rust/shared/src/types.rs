//! Core domain types for chaptervec corpora.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for ingest-run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// ChapterHeader
// ---------------------------------------------------------------------------

/// Chapter identity derived once per source file: number from the file
/// name, title from the first line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterHeader {
    /// Chapter number (first digit run in the file name).
    pub number: u32,
    /// First line of the file, trimmed. May be empty.
    pub title: String,
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A unit of text submitted to the embedder as a single request.
///
/// Section numbers are assigned at emission, starting at 1, and are
/// strictly increasing within a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// 1-based position within the chapter's window sequence.
    pub section_number: u32,
    /// Non-empty trimmed lines joined by single spaces.
    pub text: String,
}

// ---------------------------------------------------------------------------
// SectionEmbedding / StoredSection
// ---------------------------------------------------------------------------

/// The write unit persisted per successfully embedded window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionEmbedding {
    /// Embedding vector for the section text.
    pub vector: Vec<f32>,
    /// Owning chapter number.
    pub chapter_number: u32,
    /// Owning chapter title.
    pub chapter_title: String,
    /// 1-based section number within the chapter.
    pub section_number: u32,
    /// The window text that was embedded.
    pub section_content: String,
}

/// A persisted section read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSection {
    /// Surrogate key assigned by the store (monotonically increasing).
    pub id: i64,
    /// Embedding vector, deserialized from its stored JSON form.
    pub vector: Vec<f32>,
    /// Owning chapter number.
    pub chapter_number: u32,
    /// Owning chapter title.
    pub chapter_title: String,
    /// 1-based section number within the chapter.
    pub section_number: u32,
    /// The window text that was embedded.
    pub section_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let s = id.to_string();
        let parsed: RunId = s.parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn section_embedding_serialization() {
        let section = SectionEmbedding {
            vector: vec![0.25, -0.5, 1.0],
            chapter_number: 3,
            chapter_title: "The Voyage".into(),
            section_number: 7,
            section_content: "They set sail at dawn.".into(),
        };

        let json = serde_json::to_string(&section).expect("serialize");
        let parsed: SectionEmbedding = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.vector, section.vector);
        assert_eq!(parsed.chapter_number, 3);
        assert_eq!(parsed.section_content, "They set sail at dawn.");
    }
}
