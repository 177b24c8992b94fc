mod cli;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use ragstore::server::AppState;
use ragstore::pipeline::DefaultPipeline;
use ragstore::{ExtractiveSynthesizer, HashingEmbedder, RagPipeline, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ragstore", version, about = "In-memory vector store with document question answering")]
struct Cli {
    /// Config file (defaults to ./ragstore.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Documents to ingest at startup, one per line
    #[arg(long, global = true)]
    docs: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Repl,
    /// Serve the JSON API
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Answer one question from the --docs file and exit
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        #[arg(long)]
        top_k: Option<usize>,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ragstore=info"));

    if std::env::var("RAGSTORE_LOG_JSON").is_ok() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

/// One pipeline for every mode, with `--docs` ingested up front.
fn build_pipeline(settings: &Settings) -> anyhow::Result<DefaultPipeline> {
    let embedder = HashingEmbedder::new(settings.embedding_dimension)?;
    let pipeline = RagPipeline::new(embedder, ExtractiveSynthesizer);

    if let Some(path) = &settings.documents {
        pipeline
            .ingest_file(path)
            .with_context(|| format!("failed to ingest '{}'", path.display()))?;
    }

    Ok(pipeline)
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let state = web::Data::new(AppState::new(build_pipeline(&settings)?, settings.default_top_k));
    info!(bind = %settings.bind, "starting server");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(ragstore::server::config))
        .bind(&settings.bind)
        .with_context(|| format!("failed to bind {}", settings.bind))?
        .run()
        .await?;

    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(docs) = cli.docs {
        settings.documents = Some(docs);
    }

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let pipeline = build_pipeline(&settings)?;
            cli::run_repl(&pipeline, settings.default_top_k)?;
        }

        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            serve(settings).await?;
        }

        Commands::Ask { question, top_k } => {
            let pipeline = build_pipeline(&settings)?;
            let top_k = top_k.unwrap_or(settings.default_top_k);
            let answer = pipeline.ask(&question.join(" "), top_k)?;

            for (rank, passage) in answer.context.passages().iter().enumerate() {
                println!("{}. {}", rank + 1, passage);
            }
            println!("\nAnswer: {}", answer.text);
        }
    }

    Ok(())
}
