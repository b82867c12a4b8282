use anyhow::Result;
use std::io;
use tracing_subscriber::EnvFilter;

use wealth_scan::{Config, Console, ProfileStore, Session, DEFAULT_CONFIG_FILE, VERSION};

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the menu on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wealth_scan=warn")),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("WealthScan {} starting...", VERSION);

    let config = Config::load(DEFAULT_CONFIG_FILE);
    tracing::debug!("Config: {:?}", config);

    let store = ProfileStore::new(&config.store.path);
    let session = Session::new(store, config.scoring, config.leaderboard.size);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(session, stdin.lock(), stdout.lock())
        .with_chart_window(config.ui.chart_window);
    console.run()?;

    Ok(())
}
