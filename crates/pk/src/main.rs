mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use pk_core::{LoadOutcome, Pickups};
use pk_db::DbStore;
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::config::Config;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "pk", about = "Schedule and track scrap pickups")]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load()?;
    init_tracing(&config);

    create_data_dir(&config.db_path)?;
    let conn = pk_db::schema::open_and_migrate(&config.db_path)?;
    let (mut pickups, outcome) = Pickups::open(DbStore::new(conn));
    if let LoadOutcome::Recovered { reason } = &outcome {
        warn!(%reason, "starting with an empty pickup list");
    }

    let result = commands::handle(cli.command, &mut pickups)?;

    if cli.json {
        let value = output::render_json(&result);
        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        );
    } else {
        println!("{}", output::render_human(&result));
    }
    Ok(())
}

fn create_data_dir(db_path: &Path) -> Result<(), CliError> {
    let Some(parent) = db_path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(parent).map_err(|source| CliError::DataDir {
        path: parent.to_path_buf(),
        source,
    })
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("PK_LOG").unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_created_or_reported() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested/data/pickups.db");
        create_data_dir(&db_path).unwrap();
        assert!(dir.path().join("nested/data").is_dir());

        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let err = create_data_dir(&blocker.join("data/pickups.db")).unwrap_err();
        assert!(matches!(err, CliError::DataDir { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
