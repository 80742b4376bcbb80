use anyhow::Result;
use clap::Parser;
use guion_import::utils::logging;
use guion_import::{App, Config};
use std::path::PathBuf;

/// Import a script PDF into the board: one item per episode, one subitem per character
#[derive(Parser, Debug)]
#[command(name = "guion-import", version, about)]
struct Cli {
    /// Script PDF, named like `Obra_NNN_...pdf`
    pdf: PathBuf,

    /// Board ID (overrides MONDAY_BOARD_ID)
    #[arg(long)]
    board_id: Option<String>,

    /// Group for the new item (overrides MONDAY_GROUP_ID)
    #[arg(long)]
    group_id: Option<String>,

    /// Subitem board ID (overrides MONDAY_SUBITEMS_BOARD_ID)
    #[arg(long)]
    subitems_board_id: Option<String>,

    /// TOML file with default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only show what would be imported
    #[arg(long)]
    dry_run: bool,

    /// Log request payloads
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?.with_overrides(
        cli.board_id,
        cli.group_id,
        cli.subitems_board_id,
    );

    // Initialize logging
    logging::init(cli.verbose || config.verbose_logging);

    // anyhow prints the error chain once on exit
    let app = App::new(config);
    app.run(&cli.pdf, cli.dry_run).await?;

    Ok(())
}
