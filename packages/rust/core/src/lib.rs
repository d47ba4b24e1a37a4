//! Ingest orchestration for chaptervec: corpus discovery and the
//! file → window → embedding → store pipeline.

pub mod corpus;
pub mod pipeline;

pub use corpus::discover_chapter_files;
pub use pipeline::{
    IngestConfig, IngestResult, IngestStats, ProgressReporter, SilentProgress, ingest_corpus,
};
