use anyhow::Result;
use clap::Parser;
use tracing::debug;

use fleetlog::app::Tracker;
use fleetlog::cli::{self, Cli};
use fleetlog::config::AppConfig;
use fleetlog::db::{self, SqliteStore};
use fleetlog::logging;

fn main() -> Result<()> {
    let cli_opts = Cli::parse();
    let config = AppConfig::load(cli_opts.config.as_deref())?;
    logging::init(&config.log_level)?;

    let db_path = cli_opts
        .db
        .clone()
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(db::default_db_path);
    debug!(db_path = %db_path, "opening database");
    let conn = db::init(&db_path)?;

    let mut tracker = Tracker::new(SqliteStore::new(conn)).with_seed_policy(config.seed_policy);
    tracker.initialize()?;

    match cli_opts.command {
        Some(command) => cli::run(command, &mut tracker, &config),
        None => {
            cli::print_status(&tracker);
            Ok(())
        }
    }
}
