use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratewatch::config::AppConfig;
use ratewatch::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a quick tour of the app
    Intro,
    /// Display interest rates and forecasts grouped by central bank
    Rates {
        /// Expand a single central bank section
        #[arg(short, long, value_name = "NAME")]
        bank: Option<String>,

        /// Refresh the view every N seconds
        #[arg(short, long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
        watch: Option<u64>,
    },
    /// Display one meeting forecast by record id
    Meeting {
        /// Probability record id
        id: String,
    },
}

impl From<Commands> for ratewatch::AppCommand {
    fn from(cmd: Commands) -> ratewatch::AppCommand {
        match cmd {
            Commands::Rates { bank, watch } => ratewatch::AppCommand::Rates { bank, watch },
            Commands::Meeting { id } => ratewatch::AppCommand::Meeting { id },
            Commands::Intro => unreachable!("Intro command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        // The tour needs no backend, so it runs before config validation.
        Some(Commands::Intro) => {
            ratewatch::intro::run();
            Ok(())
        }
        Some(cmd) => {
            // Connection settings are validated before any network call.
            let config = AppConfig::from_env()?;
            ratewatch::run_command(cmd.into(), config).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
