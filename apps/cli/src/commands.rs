//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use chaptervec_core::pipeline::{IngestConfig, IngestResult, ProgressReporter};
use chaptervec_core::{discover_chapter_files, ingest_corpus};
use chaptervec_embedder::OpenAiEmbedder;
use chaptervec_shared::{AppConfig, EmbedderConfig, init_config, load_config};
use chaptervec_storage::Storage;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// chaptervec — embed book chapters into a local vector store.
#[derive(Parser)]
#[command(
    name = "chaptervec",
    version,
    about = "Split chapter text files into windows and store their embedding vectors locally.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Ingest a corpus of chapter files into the vector store.
    Ingest {
        /// Directory of chapter text files (defaults to config value).
        #[arg(short, long)]
        corpus: Option<String>,

        /// Vector store database path (defaults to config value).
        #[arg(long)]
        db: Option<String>,

        /// Embedding model override.
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show vector store contents and the last ingest run.
    Status {
        /// Vector store database path (defaults to config value).
        #[arg(long)]
        db: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "chaptervec=info",
        1 => "chaptervec=debug",
        _ => "chaptervec=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ingest { corpus, db, model } => {
            cmd_ingest(corpus.as_deref(), db.as_deref(), model.as_deref()).await
        }
        Command::Status { db } => cmd_status(db.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// ingest
// ---------------------------------------------------------------------------

async fn cmd_ingest(corpus: Option<&str>, db: Option<&str>, model: Option<&str>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(model) = model {
        config.openai.model = model.to_string();
    }

    // Resolve the credential before touching any file; a missing key
    // aborts here with nothing read and nothing written.
    let embedder_config = EmbedderConfig::from_app_config(&config)?;
    let embedder = OpenAiEmbedder::new(&embedder_config)?;

    let corpus_dir = PathBuf::from(corpus.unwrap_or(&config.defaults.corpus_dir));
    let db_path = PathBuf::from(db.unwrap_or(&config.defaults.db_path));

    let files = discover_chapter_files(&corpus_dir)?;

    info!(
        corpus_dir = %corpus_dir.display(),
        db_path = %db_path.display(),
        model = %embedder_config.model,
        files = files.len(),
        "ingesting corpus"
    );

    let ingest_config = IngestConfig {
        db_path,
        corpus_dir: corpus_dir.to_string_lossy().into_owned(),
    };

    let reporter = CliProgress::new();
    let result = ingest_corpus(&ingest_config, &files, &embedder, &reporter).await?;

    // Print summary
    println!();
    println!("  Ingest complete!");
    println!("  Run:       {}", result.run_id);
    println!("  Files:     {} processed, {} skipped", result.stats.files_processed, result.stats.files_skipped);
    println!("  Windows:   {} embedded, {} failed", result.stats.windows_embedded, result.stats.windows_failed);
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_started(&self, path: &std::path::Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Ingesting [{current}/{total}] {}", path.display()));
    }

    fn window_embedded(&self, chapter_number: u32, section_number: u32) {
        self.spinner.set_message(format!(
            "Embedded chapter {chapter_number} section {section_number}"
        ));
    }

    fn done(&self, _result: &IngestResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

async fn cmd_status(db: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let db_path = PathBuf::from(db.unwrap_or(&config.defaults.db_path));

    let storage = Storage::open(&db_path).await?;
    let total = storage.count_sections().await?;
    let chapters = storage.chapter_counts().await?;

    println!("Vector store: {}", db_path.display());
    println!("Sections:     {total}");
    for (chapter, count) in chapters {
        println!("  chapter {chapter:>3}: {count} sections");
    }

    match storage.last_ingest_run().await? {
        Some(run) => {
            println!("Last run:     {} (started {})", run.id, run.started_at);
            match run.finished_at {
                Some(finished) => println!("  finished {finished}"),
                None => println!("  did not finish"),
            }
            if let Some(stats) = run.stats_json {
                println!("  stats: {stats}");
            }
        }
        None => println!("Last run:     none recorded"),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
