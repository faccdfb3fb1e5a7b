use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_kernel::settings::Settings;

/// Bookshelf catalog service
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations, then serve the HTTP API
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print every documented API route
    Routes,
}

/// Load layered settings and install logging.
fn prepare(command: &Command) -> anyhow::Result<Settings> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, ?command, "bookshelf CLI starting");
    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let settings = prepare(&cli.command)?;
            bookshelf_app::serve(&settings).await
        }
        Command::Migrate => {
            let settings = prepare(&cli.command)?;
            let applied = bookshelf_app::migrate(&settings).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Routes => {
            for line in bookshelf_app::bootstrap::route_table().await? {
                println!("{line}");
            }
            Ok(())
        }
    }
}
