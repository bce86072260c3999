pub mod config;
pub mod group;
pub mod intro;
pub mod log;
pub mod meeting;
pub mod model;
pub mod overview;
pub mod store;
pub mod ui;

use crate::config::AppConfig;
use crate::store::PocketBaseClient;
use anyhow::Result;
use std::time::Duration;
use tracing::info;

pub enum AppCommand {
    Rates {
        bank: Option<String>,
        watch: Option<u64>,
    },
    Meeting {
        id: String,
    },
}

pub async fn run_command(command: AppCommand, config: AppConfig) -> Result<()> {
    info!("RateWatch starting...");

    let client = PocketBaseClient::new(&config)?;

    match command {
        AppCommand::Rates { bank, watch } => match watch {
            None => overview::run(&client, bank.as_deref()).await,
            Some(seconds) => {
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Refreshing every {seconds}s, press Ctrl-C to exit."),
                        ui::StyleType::Subtle
                    )
                );
                loop {
                    overview::run(&client, bank.as_deref()).await?;
                    tokio::time::sleep(Duration::from_secs(seconds)).await;
                    ui::print_separator();
                }
            }
        },
        AppCommand::Meeting { id } => meeting::run(&client, &id).await,
    }
}
