use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delver::catalog;
use delver::config::Config;
use delver::engine::RemoteEngine;
use delver::session::{
    render_markdown, Orchestrator, ProgressEvent, ProgressSink, SessionInputs, UploadedFile,
};

#[derive(Parser)]
#[command(name = "delver")]
#[command(author, version, about = "Delver - deep research sessions from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a research session and print the report
    Research {
        /// Research query/topic
        query: String,

        /// LLM provider (openai, anthropic, google, groq, sambanova)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model identifier (falls back to the provider's default model)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum research loops, 1-20 (more = deeper research)
        #[arg(long)]
        max_loops: Option<u32>,

        /// Perform more extensive research
        #[arg(long)]
        extra_effort: bool,

        /// Force minimum effort (single loop)
        #[arg(long)]
        minimum_effort: bool,

        /// Allow steering guidance during research
        #[arg(long)]
        steering: bool,

        /// Documents to include in the research context (repeatable)
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Deadline for the engine call, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Research engine base URL
        #[arg(long)]
        engine_url: Option<String>,

        /// Write the rendered markdown report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported providers and their models
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "delver=debug"
    } else {
        "delver=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Research {
            query,
            provider,
            model,
            max_loops,
            extra_effort,
            minimum_effort,
            steering,
            files,
            timeout_secs,
            engine_url,
            output,
        } => {
            let provider = provider.unwrap_or_else(|| config.defaults.provider.clone());
            let model = model.unwrap_or_else(|| config.defaults.model.clone());
            let max_loops = max_loops.unwrap_or(config.defaults.max_loops);
            warn_missing_api_key(&provider);

            let engine_url = engine_url.unwrap_or_else(|| config.engine.url.clone());
            tracing::info!("Using research engine at {}", engine_url);

            let mut orchestrator = Orchestrator::new(Arc::new(RemoteEngine::new(engine_url)));
            if let Some(secs) = timeout_secs.or(config.engine.timeout_secs) {
                orchestrator = orchestrator.with_deadline(Duration::from_secs(secs));
            }

            let inputs = SessionInputs {
                query,
                provider,
                model,
                max_loops,
                extra_effort,
                minimum_effort,
                steering_enabled: steering,
                uploaded_files: files.iter().map(UploadedFile::from_path).collect(),
            };

            let progress: ProgressSink = Arc::new(|event: ProgressEvent| {
                tracing::info!("[{:>3.0}%] {}", event.fraction * 100.0, event.label);
            });

            let session_output = orchestrator.run(inputs, progress).await;

            if let Some(path) = output {
                std::fs::write(&path, render_markdown(&session_output))?;
                tracing::info!("Report written to {}", path.display());
            }

            println!("{}", session_output.status);
            println!();
            println!("{}", session_output.report);
            println!();
            println!("Sources:");
            println!("{}", session_output.sources);
        }
        Commands::Providers => {
            for entry in catalog::all() {
                println!("{} (key: {})", entry.name, entry.key_env);
                for model in entry.models {
                    println!("  {}", model);
                }
            }
        }
    }

    Ok(())
}

/// Advisory startup check: a missing credential never blocks a request,
/// the engine reports its own auth failures.
fn warn_missing_api_key(provider: &str) {
    if let Some(entry) = catalog::find(provider) {
        if std::env::var(entry.key_env).is_err() {
            tracing::warn!(
                "{} not set. Provider '{}' may not work.",
                entry.key_env,
                provider
            );
        }
    }
}
