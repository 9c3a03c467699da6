use std::path::PathBuf;

use anyhow::Result;
use clap::{command, Parser, Subcommand};
use lowtide::{
    configuration::{Configuration, StoreBackend},
    models::Collection,
    store::Store,
    sweeper::Sweeper,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of a remote status store.
    #[arg(long, conflicts_with = "database")]
    store_url: Option<url::Url>,

    /// Path to a local sqlite status store.
    #[arg(long)]
    database: Option<PathBuf>,

    /// Collection to sweep.
    #[arg(long, default_value = "statuses")]
    collection: String,

    /// Statuses created at least this many hours ago are deleted.
    #[arg(long, default_value_t = 24)]
    retention_hours: i64,

    /// Seconds between sweeps when watching.
    #[arg(long, default_value_t = 3600)]
    interval_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sweep on the fixed schedule until interrupted.
    Watch,
    /// Run a single sweep and exit.
    Sweep,
    /// Report how many statuses are eligible without deleting them.
    Pending,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Args::parse();
    let config = configuration_from(&cli);

    config.init().await?;

    let store = Store::from_configuration(&config)?;
    let sweeper = Sweeper::builder()
        .store(store)
        .retention(config.retention())
        .interval(config.sweep_interval())
        .build();

    match cli.command {
        Commands::Watch => {
            let version = lowtide::built_info::GIT_VERSION.unwrap_or("unknown");
            info!(
                "lowtide (git:{}) sweeping {} every {}s",
                version,
                config.collection(),
                config.sweep_interval().as_secs()
            );
            sweeper.watch().await?
        }
        Commands::Sweep => {
            let outcome = sweeper.sweep().await?;
            println!(
                "Deleted {} statuses created at or before {}",
                outcome.deleted, outcome.cutoff
            );
        }
        Commands::Pending => println!("{}", sweeper.pending().await?),
    }
    Ok(())
}

fn configuration_from(cli: &Args) -> Configuration {
    let config = match (&cli.store_url, &cli.database) {
        (Some(url), _) => Configuration::with_backend(StoreBackend::Http(url.clone())),
        (None, Some(path)) => Configuration::with_backend(StoreBackend::Sqlite(path.clone())),
        (None, None) => Configuration::default(),
    };
    config
        .with_collection(Collection::from(cli.collection.as_str()))
        .with_retention(chrono::Duration::hours(cli.retention_hours))
        .with_sweep_interval(std::time::Duration::from_secs(cli.interval_secs))
}
