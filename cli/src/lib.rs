use clap::Parser;
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "folder-mirror", version)]
#[command(about = "Periodically mirror a source folder onto a replica folder", long_about = None)]
pub struct Cli {
    /// Path to the source directory (created if missing)
    pub source: PathBuf,

    /// Path to the replica directory (created if missing)
    pub replica: PathBuf,

    /// Synchronization interval in seconds
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Path to the log file
    pub log_file: PathBuf,
}

pub async fn cli_match() -> utils::error::Result<()> {
    let cli = Cli::parse();

    commands::sync_cmd(cli.source, cli.replica, cli.interval, cli.log_file).await?;

    Ok(())
}
