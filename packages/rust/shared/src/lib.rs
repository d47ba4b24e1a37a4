//! Shared types, error model, and configuration for chaptervec.
//!
//! This crate is the foundation depended on by all other chaptervec crates.
//! It provides:
//! - [`ChapterVecError`] — the unified error type
//! - Domain types ([`ChapterHeader`], [`Window`], [`SectionEmbedding`], [`RunId`])
//! - Configuration ([`AppConfig`], [`EmbedderConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EmbedderConfig, OpenAiConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{ChapterVecError, Result};
pub use types::{ChapterHeader, RunId, SectionEmbedding, StoredSection, Window};
