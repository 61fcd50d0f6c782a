mod collect;

use clap::{Args, Parser, Subcommand};
use tftdb_core::{Environment, Tier};
use tftdb_riot::ShutdownSignal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tftdb")]
#[command(about = "Ranked TFT ladder and match history collector")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample the ladder and store match history, one run per tier
    Collect(CollectArgs),
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Args)]
struct CollectArgs {
    /// Tier to collect; repeat for several. Defaults to `TFTDB_TIERS`.
    #[arg(long = "tier")]
    tiers: Vec<Tier>,
    /// Ladder entries sampled per division. Defaults to `TFTDB_PLAYERS_PER_DIVISION`.
    #[arg(long)]
    players_per_division: Option<usize>,
    /// Recent match ids requested per player. Defaults to `TFTDB_MATCHES_PER_PLAYER`.
    #[arg(long)]
    matches_per_player: Option<usize>,
    /// Ladder pages followed per division.
    #[arg(long, default_value_t = 1)]
    ladder_pages: u32,
    /// Collect and report counts without writing to the database
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("tftdb: run `tftdb --help` for available commands");
        return Ok(());
    };

    let config = tftdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(matches!(config.env, Environment::Development))
        .init();
    tracing::debug!(env = %config.env, ?config, "configuration loaded");

    match command {
        Commands::Collect(args) => {
            let plan = collect::CollectPlan::resolve(&args, &config)?;
            let shutdown = ShutdownSignal::new();
            spawn_ctrl_c_listener(shutdown.clone());
            collect::run_collect(&config, &plan, &shutdown).await
        }
        Commands::Db { command } => run_db_command(&config, &command).await,
    }
}

async fn run_db_command(
    config: &tftdb_core::AppConfig,
    command: &DbCommands,
) -> anyhow::Result<()> {
    let pool = tftdb_db::connect_pool_from_config(config).await?;
    match command {
        DbCommands::Ping => {
            tftdb_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = tftdb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    pool.close().await;
    Ok(())
}

/// Requests shutdown on Ctrl-C. Collectors stop at their next request and
/// the current tier is abandoned without persisting.
fn spawn_ctrl_c_listener(shutdown: ShutdownSignal) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        tracing::info!("received ctrl-c, stopping collection");
        shutdown.request();
    });
}
