//! The grouped rates view: one fetch-normalize-group-render cycle.

use crate::group::{self, BankGroup, GroupedRates};
use crate::model::{InterestRate, RateProbability};
use crate::store::{ListQuery, RecordStore, StoreError};
use crate::ui;
use anyhow::Result;
use comfy_table::{Cell, Color, Table};
use tracing::{debug, error};

pub const RATES_COLLECTION: &str = "interest_rates";
pub const PROBABILITIES_COLLECTION: &str = "interest_rate_probabilities";

/// Fetches both collections sequentially (rates first, then probabilities),
/// normalizes each record, and groups by central-bank name.
pub async fn load_grouped(store: &dyn RecordStore) -> Result<GroupedRates, StoreError> {
    let rate_records = store
        .fetch_collection(RATES_COLLECTION, &ListQuery::default())
        .await?;
    let rates: Vec<InterestRate> = rate_records
        .into_iter()
        .map(InterestRate::from_value)
        .collect();
    debug!("Normalized {} rate records", rates.len());

    let probability_query = ListQuery {
        expand: Some("central_bank".to_string()),
        sort: Some("-next_meeting_date".to_string()),
        ..Default::default()
    };
    let probability_records = store
        .fetch_collection(PROBABILITIES_COLLECTION, &probability_query)
        .await?;
    let probabilities: Vec<RateProbability> = probability_records
        .into_iter()
        .map(RateProbability::from_value)
        .collect();
    debug!("Normalized {} probability records", probabilities.len());

    Ok(group::group_by_central_bank(rates, probabilities))
}

/// Runs one display cycle. Fetch-path errors are logged and degrade to the
/// no-data state; they never propagate to the caller.
pub async fn run(store: &dyn RecordStore, bank: Option<&str>) -> Result<()> {
    let spinner = ui::new_spinner("Loading market data...");
    let grouped = match load_grouped(store).await {
        Ok(grouped) => {
            spinner.finish_and_clear();
            grouped
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!(error = %e, "Failed to load rate data");
            println!("{}", display_no_data());
            return Ok(());
        }
    };

    println!("{}", render(&grouped, bank));
    Ok(())
}

/// Renders the view for one loaded cycle: the no-data state, a single
/// expanded section, or the collapsed overview.
fn render(grouped: &GroupedRates, bank: Option<&str>) -> String {
    if grouped.is_empty() {
        return display_no_data();
    }

    match bank {
        Some(name) => match find_group(grouped, name) {
            Some((key, group)) => display_bank(key, group),
            None => {
                let known: Vec<&str> = grouped.keys().map(String::as_str).collect();
                format!(
                    "{}\nKnown central banks: {}",
                    ui::style_text(&format!("No central bank named '{name}'."), ui::StyleType::Error),
                    known.join(", ")
                )
            }
        },
        None => display_overview(grouped),
    }
}

fn find_group<'a>(grouped: &'a GroupedRates, name: &str) -> Option<(&'a str, &'a BankGroup)> {
    grouped
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(key, group)| (key.as_str(), group))
}

/// Collapsed view: one summary row per central bank.
fn display_overview(grouped: &GroupedRates) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Central Bank"),
        ui::header_cell("Country/Region"),
        ui::header_cell("Current Rate"),
        ui::header_cell("Next Move"),
        ui::header_cell("Records"),
    ]);

    for (name, group) in grouped {
        let first_rate = group.rates.first();
        let region = first_rate
            .map(|r| r.country_region.clone())
            .or_else(|| {
                group
                    .probabilities
                    .first()
                    .map(|p| p.central_bank.country_region().to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string());
        let current_rate =
            ui::format_optional_cell(first_rate.map(|r| r.current_rate), |r| format!("{r:.2}%"));
        let next_move = group
            .probabilities
            .first()
            .map_or(Cell::new("N/A").fg(Color::DarkGrey), |p| {
                ui::move_cell(p.next_expected_move)
            });

        table.add_row(vec![
            Cell::new(name),
            Cell::new(region),
            current_rate,
            next_move,
            Cell::new(format!(
                "{} rates, {} forecasts",
                group.rates.len(),
                group.probabilities.len()
            )),
        ]);
    }

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            "Use `ratewatch rates --bank NAME` to expand a section.",
            ui::StyleType::Subtle
        )
    ));
    output
}

/// Expanded view for a single central bank.
fn display_bank(name: &str, group: &BankGroup) -> String {
    let mut output = format!(
        "Central Bank: {}\n",
        ui::style_text(name, ui::StyleType::Title)
    );

    if group.rates.is_empty() && group.probabilities.is_empty() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text("No records on file.", ui::StyleType::Subtle)
        ));
        return output;
    }

    if !group.rates.is_empty() {
        output.push_str(&format!("\nInterest Rates\n{}", rates_table(&group.rates)));
    }

    for probability in &group.probabilities {
        output.push_str(&format!(
            "\nMeeting Forecast: {}\n{}",
            probability.next_meeting_date,
            forecast_table(probability)
        ));
    }

    output
}

fn rates_table(rates: &[InterestRate]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country/Region"),
        ui::header_cell("Current"),
        ui::header_cell("Direction"),
        ui::header_cell("Previous"),
        ui::header_cell("Date"),
    ]);
    for rate in rates {
        table.add_row(vec![
            Cell::new(&rate.country_region),
            Cell::new(format!("{:.2}%", rate.current_rate)),
            ui::direction_cell(rate.direction),
            Cell::new(format!("{:.2}%", rate.previous_rate)),
            Cell::new(&rate.change_date),
        ]);
    }
    table
}

/// Card-style table for one meeting forecast, with probability meters.
pub fn forecast_table(probability: &RateProbability) -> Table {
    let mut table = ui::new_styled_table();
    table.add_row(vec![
        ui::header_cell("Current Rate"),
        Cell::new(format!("{}%", probability.current_rate)),
    ]);
    table.add_row(vec![
        ui::header_cell("Next Meeting"),
        Cell::new(&probability.next_meeting_date),
    ]);
    table.add_row(vec![
        ui::header_cell("Expected Move"),
        ui::move_cell(probability.next_expected_move),
    ]);
    table.add_row(vec![
        ui::header_cell("Change By"),
        Cell::new(format!("{} bps", probability.change_by)),
    ]);
    table.add_row(vec![
        ui::header_cell("Change Probability"),
        ui::meter_cell(&probability.probability_of_change, Color::Green),
    ]);
    table.add_row(vec![
        ui::header_cell("No Change Probability"),
        ui::meter_cell(&probability.probability_of_no_change, Color::Magenta),
    ]);
    table
}

fn display_no_data() -> String {
    format!(
        "{}\n{}",
        ui::style_text("No data available", ui::StyleType::Error),
        ui::style_text("Run `ratewatch rates` again to refresh.", ui::StyleType::Subtle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned record store that logs every collection query it serves.
    struct MockRecordStore {
        collections: HashMap<String, Vec<Value>>,
        errors: HashMap<String, String>,
        queries: Mutex<Vec<(String, ListQuery)>>,
    }

    impl MockRecordStore {
        fn new() -> Self {
            MockRecordStore {
                collections: HashMap::new(),
                errors: HashMap::new(),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn add_collection(&mut self, name: &str, records: Vec<Value>) {
            self.collections.insert(name.to_string(), records);
        }

        fn add_error(&mut self, name: &str, reason: &str) {
            self.errors.insert(name.to_string(), reason.to_string());
        }
    }

    #[async_trait]
    impl RecordStore for MockRecordStore {
        async fn fetch_collection(
            &self,
            collection: &str,
            query: &ListQuery,
        ) -> Result<Vec<Value>, StoreError> {
            self.queries
                .lock()
                .unwrap()
                .push((collection.to_string(), query.clone()));
            if let Some(reason) = self.errors.get(collection) {
                return Err(StoreError::Collection {
                    collection: collection.to_string(),
                    reason: reason.clone(),
                });
            }
            Ok(self.collections.get(collection).cloned().unwrap_or_default())
        }

        async fn fetch_record(
            &self,
            collection: &str,
            id: &str,
            _expand: Option<&str>,
        ) -> Result<Value, StoreError> {
            self.collections
                .get(collection)
                .and_then(|records| {
                    records.iter().find(|r| r["id"] == id).cloned()
                })
                .ok_or_else(|| StoreError::Record {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    reason: "not found".to_string(),
                })
        }
    }

    fn populated_store() -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store.add_collection(
            RATES_COLLECTION,
            vec![json!({
                "id": "r1",
                "country_region": "United States",
                "central_bank": "Federal Reserve",
                "current_rate": "5.25",
                "direction": "up",
                "previous_rate": "5.00",
                "change_date": "2025-06-18 12:00:00.000Z",
            })],
        );
        store.add_collection(
            PROBABILITIES_COLLECTION,
            vec![json!({
                "id": "p1",
                "central_bank": "r1",
                "current_rate": "5.25",
                "next_meeting_date": "2025-09-17 12:00:00.000Z",
                "next_expected_move": "cut",
                "change_by": "25",
                "probability_of_change": "70",
                "probability_of_no_change": "30",
                "expand": {
                    "central_bank": {
                        "id": "r1",
                        "country_region": "United States",
                        "central_bank": "Federal Reserve",
                    },
                },
            })],
        );
        store
    }

    #[tokio::test]
    async fn test_load_grouped_joins_both_collections() {
        let store = populated_store();
        let grouped = load_grouped(&store).await.unwrap();

        assert_eq!(grouped.len(), 1);
        let fed = &grouped["Federal Reserve"];
        assert_eq!(fed.rates.len(), 1);
        assert_eq!(fed.rates[0].current_rate, 5.25);
        assert_eq!(fed.probabilities.len(), 1);
        assert_eq!(fed.probabilities[0].probability_of_change, "70");
    }

    #[tokio::test]
    async fn test_load_grouped_fetches_sequentially_with_expansion() {
        let store = populated_store();
        load_grouped(&store).await.unwrap();

        let queries = store.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].0, RATES_COLLECTION);
        assert_eq!(queries[1].0, PROBABILITIES_COLLECTION);
        assert_eq!(queries[1].1.expand.as_deref(), Some("central_bank"));
        assert_eq!(queries[1].1.sort.as_deref(), Some("-next_meeting_date"));
    }

    #[tokio::test]
    async fn test_load_grouped_empty_collections() {
        let mut store = MockRecordStore::new();
        store.add_collection(RATES_COLLECTION, vec![]);
        store.add_collection(PROBABILITIES_COLLECTION, vec![]);

        let grouped = load_grouped(&store).await.unwrap();
        assert!(grouped.is_empty());
    }

    #[tokio::test]
    async fn test_run_degrades_on_store_error() {
        let mut store = MockRecordStore::new();
        store.add_error(RATES_COLLECTION, "backend down");

        // The error is logged and the view degrades; the command succeeds.
        assert!(run(&store, None).await.is_ok());
    }

    #[test]
    fn test_no_data_view_names_the_refresh_affordance() {
        let output = render(&GroupedRates::new(), None);
        assert!(output.contains("No data available"));
        assert!(output.contains("refresh"));
    }

    #[tokio::test]
    async fn test_overview_lists_banks_with_counts_and_expand_hint() {
        let store = populated_store();
        let grouped = load_grouped(&store).await.unwrap();

        let output = render(&grouped, None);
        assert!(output.contains("Federal Reserve"));
        assert!(output.contains("United States"));
        assert!(output.contains("5.25%"));
        assert!(output.contains("CUT"));
        assert!(output.contains("1 rates, 1 forecasts"));
        assert!(output.contains("--bank"));
    }

    #[tokio::test]
    async fn test_expanded_bank_shows_rates_and_forecast_meters() {
        let store = populated_store();
        let grouped = load_grouped(&store).await.unwrap();

        // Selection is case-insensitive.
        let output = render(&grouped, Some("federal reserve"));
        assert!(output.contains("Federal Reserve"));
        assert!(output.contains("Interest Rates"));
        assert!(output.contains("Meeting Forecast: Sep 17, 2025"));
        assert!(output.contains("25 bps"));
        assert!(output.contains("70%"));
        assert!(output.contains("█"));
    }

    #[tokio::test]
    async fn test_unknown_bank_selection_lists_known_names() {
        let store = populated_store();
        let grouped = load_grouped(&store).await.unwrap();

        let output = render(&grouped, Some("Riksbank"));
        assert!(output.contains("No central bank named 'Riksbank'"));
        assert!(output.contains("Federal Reserve"));
    }
}
