use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use plagio::{BatchPolicy, CancellationToken, Document, Engine, MatchStrategy, PlagioConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Ngram,
    Sentence,
}

impl From<Strategy> for MatchStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Ngram => MatchStrategy::NGram,
            Strategy::Sentence => MatchStrategy::Sentence,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "plagio", about = "Compares text documents and reports shared passages.")]
struct Args {
    /// Documents to compare; the first one is the primary document
    #[arg(required = true, num_args = 2..)]
    files: Vec<PathBuf>,

    /// YAML pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Compare every pair of documents instead of each one against the first
    #[arg(long, default_value_t = false)]
    exhaustive: bool,

    /// Overrides the configured matching strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Also ask the generative model for matches (needs GEMINI_API_KEY)
    #[arg(long, default_value_t = false)]
    remote: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plagio=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlagioConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlagioConfig::default(),
    };
    if args.exhaustive {
        config.detector.policy = BatchPolicy::Exhaustive;
    }
    if let Some(strategy) = args.strategy {
        config.detector.strategy = strategy.into();
    }
    if args.remote {
        config.remote.enabled = true;
    }

    let documents = args
        .files
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Document::new(path.display().to_string(), content))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let engine = Engine::from_config(&config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling analysis");
            on_interrupt.cancel();
        }
    });

    let result = engine.analyze(&documents, &cancel).await?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => print!("{}", engine.report(&result)),
    }
    Ok(())
}
