//! libSQL vector store for embedded chapter sections.
//!
//! The [`Storage`] struct wraps a local libSQL database holding one
//! append-only `vectors` table (vector + chapter/section metadata + source
//! text) plus ingest-run history. Appends commit before returning and never
//! deduplicate: re-ingesting the same corpus produces duplicate rows by
//! design.

mod migrations;

use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, params};

use chaptervec_shared::{ChapterVecError, Result, RunId, SectionEmbedding, StoredSection};

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

/// A row from the `ingest_runs` history table.
#[derive(Debug, Clone)]
pub struct IngestRunRow {
    /// Run identifier (UUID v7, time-sortable).
    pub id: String,
    /// Corpus directory the run ingested from.
    pub corpus_dir: String,
    /// RFC 3339 start timestamp.
    pub started_at: String,
    /// RFC 3339 finish timestamp, if the run completed.
    pub finished_at: Option<String>,
    /// JSON-encoded run statistics, if the run completed.
    pub stats_json: Option<String>,
}

impl Storage {
    /// Open or create a database at `path`, applying pending migrations.
    ///
    /// Safe to call on an existing store: migrations never drop or alter
    /// existing rows.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ChapterVecError::io(parent, e))?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        let storage = Self { db, conn };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    ChapterVecError::Storage(format!(
                        "migration v{} failed: {e}",
                        migration.version
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    // -----------------------------------------------------------------------
    // Section operations
    // -----------------------------------------------------------------------

    /// Append one embedded section. Returns the assigned surrogate id.
    ///
    /// Ids are monotonically increasing and the row is committed before
    /// this returns. There is no upsert path: identical sections append
    /// duplicate rows.
    pub async fn append_section(&self, section: &SectionEmbedding) -> Result<i64> {
        let vector_json = serde_json::to_string(&section.vector)
            .map_err(|e| ChapterVecError::Storage(format!("vector serialization: {e}")))?;

        self.conn
            .execute(
                "INSERT INTO vectors (vector, chapterNumber, chapterTitle, sectionNumber, sectionContent)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    vector_json.as_str(),
                    section.chapter_number,
                    section.chapter_title.as_str(),
                    section.section_number,
                    section.section_content.as_str(),
                ],
            )
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Total number of stored sections.
    pub async fn count_sections(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM vectors", params![])
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let count: i64 = row
                    .get(0)
                    .map_err(|e| ChapterVecError::Storage(e.to_string()))?;
                Ok(count as u64)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(ChapterVecError::Storage(e.to_string())),
        }
    }

    /// All sections for a chapter, ordered by section number then id.
    pub async fn sections_for_chapter(&self, chapter_number: u32) -> Result<Vec<StoredSection>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, vector, chapterNumber, chapterTitle, sectionNumber, sectionContent
                 FROM vectors WHERE chapterNumber = ?1
                 ORDER BY sectionNumber, id",
                params![chapter_number],
            )
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_stored_section(&row)?);
        }
        Ok(results)
    }

    /// Per-chapter section counts, ordered by chapter number.
    pub async fn chapter_counts(&self) -> Result<Vec<(u32, u64)>> {
        let mut rows = self
            .conn
            .query(
                "SELECT chapterNumber, COUNT(*) FROM vectors
                 GROUP BY chapterNumber ORDER BY chapterNumber",
                params![],
            )
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let chapter: u32 = row
                .get(0)
                .map_err(|e| ChapterVecError::Storage(e.to_string()))?;
            let count: i64 = row
                .get(1)
                .map_err(|e| ChapterVecError::Storage(e.to_string()))?;
            results.push((chapter, count as u64));
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Ingest run operations
    // -----------------------------------------------------------------------

    /// Record the start of an ingest run.
    pub async fn insert_ingest_run(&self, run_id: &RunId, corpus_dir: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO ingest_runs (id, corpus_dir, started_at) VALUES (?1, ?2, ?3)",
                params![run_id.to_string(), corpus_dir, now.as_str()],
            )
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Mark an ingest run finished and attach its statistics.
    pub async fn finish_ingest_run(&self, run_id: &RunId, stats_json: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "UPDATE ingest_runs SET finished_at = ?1, stats_json = ?2 WHERE id = ?3",
                params![now.as_str(), stats_json, run_id.to_string()],
            )
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;
        Ok(())
    }

    /// The most recently started ingest run, if any.
    pub async fn last_ingest_run(&self) -> Result<Option<IngestRunRow>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, corpus_dir, started_at, finished_at, stats_json
                 FROM ingest_runs ORDER BY started_at DESC, id DESC LIMIT 1",
                params![],
            )
            .await
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(IngestRunRow {
                id: row
                    .get::<String>(0)
                    .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
                corpus_dir: row
                    .get::<String>(1)
                    .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
                started_at: row
                    .get::<String>(2)
                    .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
                finished_at: row.get::<String>(3).ok(),
                stats_json: row.get::<String>(4).ok(),
            })),
            Ok(None) => Ok(None),
            Err(e) => Err(ChapterVecError::Storage(e.to_string())),
        }
    }
}

/// Convert a database row to a [`StoredSection`], deserializing the vector.
fn row_to_stored_section(row: &libsql::Row) -> Result<StoredSection> {
    let vector_json: String = row
        .get(1)
        .map_err(|e| ChapterVecError::Storage(e.to_string()))?;
    let vector: Vec<f32> = serde_json::from_str(&vector_json)
        .map_err(|e| ChapterVecError::Storage(format!("vector deserialization: {e}")))?;

    Ok(StoredSection {
        id: row
            .get::<i64>(0)
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
        vector,
        chapter_number: row
            .get::<u32>(2)
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
        chapter_title: row
            .get::<String>(3)
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
        section_number: row
            .get::<u32>(4)
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
        section_content: row
            .get::<String>(5)
            .map_err(|e| ChapterVecError::Storage(e.to_string()))?,
    })
}
