//! Single meeting-forecast lookup by record id.

use crate::model::RateProbability;
use crate::overview::{self, PROBABILITIES_COLLECTION};
use crate::store::RecordStore;
use crate::ui;
use anyhow::Result;

pub async fn run(store: &dyn RecordStore, id: &str) -> Result<()> {
    let spinner = ui::new_spinner("Loading meeting forecast...");
    let record = store
        .fetch_record(PROBABILITIES_COLLECTION, id, Some("central_bank"))
        .await;
    spinner.finish_and_clear();

    let probability = RateProbability::from_value(record?);

    println!(
        "Central Bank: {}",
        ui::style_text(probability.central_bank.name(), ui::StyleType::Title)
    );
    if probability.central_bank.is_placeholder() {
        println!(
            "{}",
            ui::style_text(
                "Central bank details unavailable for this record.",
                ui::StyleType::Subtle
            )
        );
    } else {
        println!("Country/Region: {}", probability.central_bank.country_region());
    }
    println!();
    println!("{}", overview::forecast_table(&probability));

    Ok(())
}
