use anibridge::config::{AppConfig, LogConfig};
use anibridge::resolver::create_default_manager;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(
    name = "anibridge",
    about = "Resolve AniList entries onto streaming providers.",
    version
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the provider id matching an AniList id
    Resolve {
        #[arg(long)]
        provider: String,
        anilist_id: i64,
    },
    /// Print a provider's episode list for an AniList id as JSON
    Episodes {
        #[arg(long)]
        provider: String,
        anilist_id: i64,
    },
    /// List configured providers
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _guard = init_tracing(&config.log)?;

    match cli.command {
        Command::Providers => {
            if config.providers.is_empty() {
                println!("No providers configured");
            }
            for provider in &config.providers {
                println!("{}\t{}\t{}", provider.id, provider.name, provider.base_url);
            }
        }
        Command::Resolve {
            provider,
            anilist_id,
        } => {
            let manager = create_default_manager(&config)?;
            match manager.resolve(anilist_id, &provider).await? {
                Some(resolved) => {
                    info!(
                        "Resolved {} via {:?} (score {:.1})",
                        anilist_id, resolved.strategy, resolved.score
                    );
                    println!("{}", resolved.provider_id);
                }
                None => println!("No match for {anilist_id} on {provider}"),
            }
        }
        Command::Episodes {
            provider,
            anilist_id,
        } => {
            let manager = create_default_manager(&config)?;
            match manager.episodes(anilist_id, &provider).await? {
                Some(episodes) => println!("{}", serde_json::to_string_pretty(&episodes)?),
                None => println!("No match for {anilist_id} on {provider}"),
            }
        }
    }

    Ok(())
}

/// Console logging plus an optional daily file; the guard must outlive `main`
fn init_tracing(log: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .context("invalid log level")?;

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "anibridge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}
