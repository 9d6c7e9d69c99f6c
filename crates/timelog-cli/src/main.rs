use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Filter directives for the stderr logger, e.g. `TIMELOG_LOG=timelog_core=debug`.
const LOG_ENV: &str = "TIMELOG_LOG";

#[derive(Parser)]
#[command(name = "timelog", version, about = "Log what you are doing into Notion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interval timer for the task in progress
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Create, update and list activity records
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Suggest an activity category for a title
    Classify(commands::classify::ClassifyArgs),
    /// Print whether nothing is being timed or entered right now
    CheckRecording,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Notion credentials
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Record { action } => commands::record::run(action).await,
        Commands::Classify(args) => commands::classify::run(args).await,
        Commands::CheckRecording => commands::check::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
