//! SQL migration definitions for the chaptervec vector store.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed as a batch.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: vectors, ingest_runs",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version   INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Embedded sections. Column names match the store layout that earlier
-- ingest tooling produced, so existing databases keep working.
CREATE TABLE IF NOT EXISTS vectors (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    vector         TEXT NOT NULL,
    chapterNumber  INTEGER NOT NULL,
    chapterTitle   TEXT NOT NULL,
    sectionNumber  INTEGER NOT NULL,
    sectionContent TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_vectors_chapter ON vectors(chapterNumber);

-- Ingest run history
CREATE TABLE IF NOT EXISTS ingest_runs (
    id          TEXT PRIMARY KEY,
    corpus_dir  TEXT NOT NULL,
    started_at  TEXT NOT NULL,
    finished_at TEXT,
    stats_json  TEXT
);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
