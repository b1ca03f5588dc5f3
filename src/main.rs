use anyhow::{Context, Result};
use clap::Parser;

use obc_commands::{cli, config, logging, Database};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    let db_path = config::resolve_db_path(cli.db);
    config::ensure_parent_dir(&db_path)
        .with_context(|| format!("Failed to create directory for {}", db_path.display()))?;

    let mut db = Database::new(&db_path.to_string_lossy())?;
    cli::handle_command(cli.command, &mut db, cli.json)?;

    Ok(())
}
