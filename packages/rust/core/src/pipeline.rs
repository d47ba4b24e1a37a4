//! End-to-end ingest pipeline: chapter files → windows → embeddings → store.
//!
//! Failure isolation is the organizing principle. Per-file problems
//! (missing file, unreadable content, no chapter number) skip that file;
//! per-window problems (embedding failure, store failure) skip that window.
//! Both are logged with enough context to find the unit of work and the run
//! carries on. Only opening the store — and the pre-flight credential check
//! done by the caller — can abort a run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument, warn};

use chaptervec_chunker::{parse_header, windows};
use chaptervec_embedder::Embedder;
use chaptervec_shared::{Result, RunId, SectionEmbedding};
use chaptervec_storage::Storage;

/// Configuration for one ingest run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Path to the vector store database.
    pub db_path: PathBuf,
    /// Corpus directory label recorded with the run.
    pub corpus_dir: String,
}

/// Counters accumulated over a run, persisted as the run's stats JSON.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IngestStats {
    /// Files whose windows were iterated (even if every window failed).
    pub files_processed: usize,
    /// Files skipped before windowing (missing, unreadable, no chapter number).
    pub files_skipped: usize,
    /// Windows embedded and persisted.
    pub windows_embedded: usize,
    /// Windows dropped to an embedding or store failure.
    pub windows_failed: usize,
}

/// Result of a completed ingest run.
#[derive(Debug)]
pub struct IngestResult {
    /// Identifier of the run, recorded in the store's run history.
    pub run_id: RunId,
    /// Run counters.
    pub stats: IngestStats,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a file begins processing.
    fn file_started(&self, path: &Path, current: usize, total: usize);
    /// Called when a window has been embedded and persisted.
    fn window_embedded(&self, chapter_number: u32, section_number: u32);
    /// Called when the pipeline completes.
    fn done(&self, result: &IngestResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn window_embedded(&self, _chapter_number: u32, _section_number: u32) {}
    fn done(&self, _result: &IngestResult) {}
}

/// Run the full ingest pipeline over an explicit, ordered list of files.
///
/// For each file: parse the chapter header, window the remaining lines,
/// embed each window, and persist one record per successful embedding —
/// synchronously, before moving to the next window. Section numbers are
/// assigned by the windower at emission, so a window whose embedding fails
/// still consumes its number and later sections keep their positions.
#[instrument(skip_all, fields(db_path = %config.db_path.display(), files = files.len()))]
pub async fn ingest_corpus<E: Embedder>(
    config: &IngestConfig,
    files: &[PathBuf],
    embedder: &E,
    progress: &dyn ProgressReporter,
) -> Result<IngestResult> {
    let start = Instant::now();
    let run_id = RunId::new();

    info!(%run_id, files = files.len(), "starting ingest run");

    progress.phase("Opening vector store");
    let storage = Storage::open(&config.db_path).await?;
    storage.insert_ingest_run(&run_id, &config.corpus_dir).await?;

    progress.phase("Ingesting chapters");
    let mut stats = IngestStats::default();
    let total = files.len();

    for (i, path) in files.iter().enumerate() {
        progress.file_started(path, i + 1, total);

        match process_file(path, embedder, &storage, &mut stats, progress).await {
            FileOutcome::Processed => stats.files_processed += 1,
            FileOutcome::Skipped => stats.files_skipped += 1,
        }
    }

    // Run bookkeeping is best-effort: a stats write failure must not turn a
    // completed run into an error.
    match serde_json::to_string(&stats) {
        Ok(stats_json) => {
            if let Err(e) = storage.finish_ingest_run(&run_id, &stats_json).await {
                warn!(%run_id, error = %e, "failed to record run completion");
            }
        }
        Err(e) => warn!(%run_id, error = %e, "failed to serialize run stats"),
    }

    let result = IngestResult {
        run_id,
        stats,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        run_id = %result.run_id,
        files_processed = stats.files_processed,
        files_skipped = stats.files_skipped,
        windows_embedded = stats.windows_embedded,
        windows_failed = stats.windows_failed,
        elapsed_ms = result.elapsed.as_millis(),
        "ingest run complete"
    );

    Ok(result)
}

/// Whether a file made it into the window loop or was skipped beforehand.
enum FileOutcome {
    Processed,
    Skipped,
}

/// Process a single chapter file. Never returns an error: every failure
/// inside a file is logged and isolated to that file or window.
async fn process_file<E: Embedder>(
    path: &Path,
    embedder: &E,
    storage: &Storage,
    stats: &mut IngestStats,
    progress: &dyn ProgressReporter,
) -> FileOutcome {
    if !path.exists() {
        warn!(path = %path.display(), "file not found, skipping");
        return FileOutcome::Skipped;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file, skipping");
            return FileOutcome::Skipped;
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut lines = content.lines();
    let first_line = lines.next().unwrap_or("");

    let header = match parse_header(&file_name, first_line) {
        Ok(header) => header,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no chapter header, skipping file");
            return FileOutcome::Skipped;
        }
    };

    info!(
        chapter = header.number,
        title = %header.title,
        path = %path.display(),
        "processing chapter"
    );

    for window in windows(lines) {
        let section_number = window.section_number;

        let vector = match embedder.embed(&window.text).await {
            Ok(vector) => vector,
            Err(e) => {
                stats.windows_failed += 1;
                warn!(
                    chapter = header.number,
                    section = section_number,
                    error = %e,
                    "embedding failed, skipping window"
                );
                continue;
            }
        };

        let section = SectionEmbedding {
            vector,
            chapter_number: header.number,
            chapter_title: header.title.clone(),
            section_number,
            section_content: window.text,
        };

        match storage.append_section(&section).await {
            Ok(_) => {
                stats.windows_embedded += 1;
                progress.window_embedded(header.number, section_number);
            }
            Err(e) => {
                stats.windows_failed += 1;
                warn!(
                    chapter = header.number,
                    section = section_number,
                    error = %e,
                    "failed to persist section, skipping window"
                );
            }
        }
    }

    FileOutcome::Processed
}
