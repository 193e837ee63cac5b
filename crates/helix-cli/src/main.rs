mod commands;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "helix-cli")]
#[command(about = "HelixAdvisors pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search forums and persist new candidate ideas
    Discover,
    /// Score the unscored backlog through the completion API
    Score,
    /// Aggregate and upsert today's report
    Report,
    /// Run discover, score, and report in order
    Run,
    /// Show which configuration variables are present
    Env,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Discover => commands::discover().await,
        Commands::Score => commands::score().await,
        Commands::Report => commands::report().await,
        Commands::Run => commands::run_all().await,
        Commands::Env => {
            commands::env();
            Ok(())
        }
    }
}
