//! Corpus discovery.
//!
//! The pipeline itself takes an explicit list of paths; this module is the
//! one place that touches directory iteration, and it sorts the result so
//! ingest order is deterministic across filesystems.

use std::path::{Path, PathBuf};

use chaptervec_shared::{ChapterVecError, Result};

/// List the chapter files (`*.txt`) directly inside `dir`, sorted
/// lexicographically by path.
///
/// Subdirectories are not descended into. An empty directory yields an
/// empty list, not an error; an unreadable directory is an error.
pub fn discover_chapter_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ChapterVecError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ChapterVecError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
