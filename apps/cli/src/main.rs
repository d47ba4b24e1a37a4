//! chaptervec CLI — local-first chapter embedding tool.
//!
//! Splits chapter text files into windows, embeds each window via a remote
//! embedding service, and stores vectors with chapter/section metadata in a
//! local vector store.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
