mod display;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rankforge_core::{AppConfig, Credentials, ResearchRequest};
use rankforge_server::{AppState, Pipeline};
use rankforge_store::{MemoryJobStore, Retention};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rankforge", version, about = "Keyword opportunity research and SEO planning")]
struct Cli {
    /// TOML config file with [batch], [scoring], [cluster] and [plan] sections.
    #[arg(long, global = true, env = "RANKFORGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    creds: CredentialArgs,

    /// Keywords fetched concurrently per batch.
    #[arg(long, global = true, env = "RANKFORGE_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Pause between batches, in milliseconds.
    #[arg(long, global = true, env = "RANKFORGE_BATCH_DELAY_MS")]
    batch_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long, global = true, env = "SERPAPI_API_KEY", hide_env_values = true)]
    serpapi_key: Option<String>,

    #[arg(long, global = true, env = "MOZ_ACCESS_ID", hide_env_values = true)]
    moz_access_id: Option<String>,

    #[arg(long, global = true, env = "MOZ_SECRET_KEY", hide_env_values = true)]
    moz_secret_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "RANKFORGE_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
    /// Research keywords and print the opportunity score card.
    Research {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the full result as JSON instead of the card.
        #[arg(long)]
        json: bool,
    },
    /// Research keywords, then print the generated SEO plan as JSON.
    Plan {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
struct TargetArgs {
    #[arg(long)]
    country: String,

    #[arg(long)]
    niche: String,

    #[arg(required = true, num_args = 1..)]
    keywords: Vec<String>,
}

impl TargetArgs {
    fn into_request(self) -> ResearchRequest {
        ResearchRequest {
            country: self.country,
            niche: self.niche,
            keywords: self.keywords,
            api_keys: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("rankforge v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let credentials = Credentials::new(
        cli.creds.serpapi_key,
        cli.creds.moz_access_id,
        cli.creds.moz_secret_key,
    );
    let pipeline = Pipeline::from_config(config, credentials).context("building pipeline")?;

    match cli.command {
        Command::Serve { bind } => {
            let jobs = &pipeline.config().jobs;
            let store = MemoryJobStore::with_retention(Retention {
                max_finished: jobs.max_finished,
                finished_ttl: jobs.finished_ttl(),
            });
            let state = AppState::new(Arc::new(pipeline), Arc::new(store));
            rankforge_server::serve(state, bind)
                .await
                .with_context(|| format!("serving on {bind}"))?;
        }
        Command::Research { target, json } => {
            let result = pipeline.research(target.into_request()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                display::print_score_card(&result);
            }
        }
        Command::Plan { target } => {
            let result = pipeline.research(target.into_request()).await?;
            let plan = pipeline.plan_for(&result);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(n) = cli.batch_size {
        config.batch.batch_size = n;
    }
    if let Some(ms) = cli.batch_delay_ms {
        config.batch.inter_batch_delay_ms = ms;
    }
    config.validate()?;
    Ok(config)
}
