use crate::model::{InterestRate, RateProbability};
use std::collections::BTreeMap;

/// Rates and forecasts bucketed under one central bank.
#[derive(Debug, Default)]
pub struct BankGroup {
    pub rates: Vec<InterestRate>,
    pub probabilities: Vec<RateProbability>,
}

pub type GroupedRates = BTreeMap<String, BankGroup>;

/// Folds both record lists into a mapping keyed by central-bank name. Each
/// record lands under the key derived from its own central-bank field;
/// within a group, input order is preserved. The two record kinds are not
/// cross-validated, so a probability can introduce a group with no rates
/// and vice versa.
pub fn group_by_central_bank(
    rates: Vec<InterestRate>,
    probabilities: Vec<RateProbability>,
) -> GroupedRates {
    let mut grouped = GroupedRates::new();

    for rate in rates {
        grouped
            .entry(rate.central_bank.clone())
            .or_default()
            .rates
            .push(rate);
    }

    for probability in probabilities {
        grouped
            .entry(probability.central_bank.name().to_string())
            .or_default()
            .probabilities
            .push(probability);
    }

    grouped
}
