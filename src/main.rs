//! CLI entry point for the recommendation service.
//!
//! Provides commands for building the vector index, serving the HTTP API,
//! and running one-shot queries from the shell.

use std::sync::Arc;

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use recsift::{
    CatalogStore, FastEmbedEncoder, IndexBuilder, Recommender, Settings, VectorIndex,
};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

#[derive(Parser)]
#[command(
    name = "recsift",
    version,
    about = "Assessment recommendations from semantic retrieval with test-type balancing",
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "recsift.toml", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed the catalog and write the vector index file
    #[command(
        after_help = "Examples:\n  recsift build-index\n  RECSIFT_CATALOG_PATH=catalog.csv recsift build-index"
    )]
    BuildIndex,

    /// Start the HTTP recommendation service
    #[command(after_help = "Examples:\n  recsift serve\n  RECSIFT_SERVER__BIND=0.0.0.0:8080 recsift serve")]
    Serve,

    /// Run one query and print the recommendations as JSON
    #[command(after_help = "Examples:\n  recsift query \"java developer\"\n  recsift query \"team lead\" --top-k 5")]
    Query {
        /// Free-text query describing the role or skills
        text: String,

        /// Number of recommendations to return (clamped to 1..=10)
        #[arg(long, default_value_t = 10)]
        top_k: i64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("recsift=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)?;

    match cli.command {
        Commands::BuildIndex => build_index(&settings),
        Commands::Serve => serve(&settings),
        Commands::Query { text, top_k } => query(&settings, &text, top_k),
    }
}

fn build_index(settings: &Settings) -> anyhow::Result<()> {
    let catalog = CatalogStore::load(&settings.catalog_path)?;
    let encoder = FastEmbedEncoder::new(
        &settings.embedding.model,
        settings.embedding.cache_dir.clone(),
    )
    .context("failed to initialize embedding model")?;

    let written = IndexBuilder::new(&encoder, settings.embedding.batch_size)
        .build(&catalog, &settings.index_path)?;

    println!(
        "Indexed {written} catalog entries into {}",
        settings.index_path.display()
    );
    Ok(())
}

fn load_recommender(settings: &Settings) -> anyhow::Result<Recommender> {
    let catalog = CatalogStore::load(&settings.catalog_path)?;
    let index = VectorIndex::open(&settings.index_path)
        .context("failed to open vector index, run `recsift build-index` first")?;
    let encoder = FastEmbedEncoder::new(
        &settings.embedding.model,
        settings.embedding.cache_dir.clone(),
    )
    .context("failed to initialize embedding model")?;

    Ok(Recommender::new(catalog, index, Box::new(encoder))?)
}

fn serve(settings: &Settings) -> anyhow::Result<()> {
    let recommender = Arc::new(load_recommender(settings)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(recsift::server::serve(recommender, &settings.server.bind))
}

fn query(settings: &Settings, text: &str, top_k: i64) -> anyhow::Result<()> {
    let recommender = load_recommender(settings)?;
    let results = recommender.recommend(text, top_k)?;

    let output = serde_json::json!({ "recommended_assessments": results });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
