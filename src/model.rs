//! Display shapes for the two record kinds, with permissive normalization
//! from the raw store records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Direction {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("up") => Direction::Up,
            Some("down") => Direction::Down,
            _ => Direction::Neutral,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpectedMove {
    Cut,
    Hike,
    #[default]
    NoChange,
}

impl ExpectedMove {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("cut") => ExpectedMove::Cut,
            Some("hike") => ExpectedMove::Hike,
            _ => ExpectedMove::NoChange,
        }
    }
}

impl fmt::Display for ExpectedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedMove::Cut => write!(f, "CUT"),
            ExpectedMove::Hike => write!(f, "HIKE"),
            ExpectedMove::NoChange => write!(f, "NO CHANGE"),
        }
    }
}

/// Raw interest-rate record as stored in the backend. Numeric fields arrive
/// as either JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRateRecord {
    pub id: String,
    pub country_region: Option<String>,
    pub central_bank: Option<String>,
    pub current_rate: Option<Value>,
    pub direction: Option<String>,
    pub previous_rate: Option<Value>,
    pub change_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterestRate {
    pub id: String,
    pub country_region: String,
    pub central_bank: String,
    pub current_rate: f64,
    pub direction: Direction,
    pub previous_rate: f64,
    /// Display-formatted calendar date, `N/A` when absent.
    pub change_date: String,
}

impl InterestRate {
    pub fn from_raw(raw: RawRateRecord) -> Self {
        InterestRate {
            id: raw.id,
            country_region: non_empty_or(raw.country_region, "Unknown"),
            central_bank: non_empty_or(raw.central_bank, "Unknown"),
            current_rate: parse_rate(raw.current_rate.as_ref()),
            direction: Direction::parse(raw.direction.as_deref()),
            previous_rate: parse_rate(raw.previous_rate.as_ref()),
            change_date: format_display_date(raw.change_date.as_deref()),
        }
    }

    pub fn from_value(value: Value) -> Self {
        let raw: RawRateRecord = serde_json::from_value(value).unwrap_or_default();
        Self::from_raw(raw)
    }
}

/// The central bank attached to a probability record. The relational
/// expansion is not guaranteed to be present; callers must handle the
/// placeholder case explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum CentralBank {
    Expanded(InterestRate),
    Placeholder { name: String },
}

impl CentralBank {
    pub fn name(&self) -> &str {
        match self {
            CentralBank::Expanded(rate) => &rate.central_bank,
            CentralBank::Placeholder { name } => name,
        }
    }

    pub fn country_region(&self) -> &str {
        match self {
            CentralBank::Expanded(rate) => &rate.country_region,
            CentralBank::Placeholder { .. } => "Unknown",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CentralBank::Placeholder { .. })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExpand {
    pub central_bank: Option<RawRateRecord>,
}

/// Raw probability record. `central_bank` holds the relation id (or, in
/// older records, a bank name); the expanded record lives under `expand`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProbabilityRecord {
    pub id: String,
    pub central_bank: Option<Value>,
    pub current_rate: Option<Value>,
    pub next_meeting_date: Option<String>,
    pub next_expected_move: Option<String>,
    pub change_by: Option<Value>,
    pub probability_of_change: Option<Value>,
    pub probability_of_no_change: Option<Value>,
    pub expand: RawExpand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateProbability {
    pub id: String,
    pub central_bank: CentralBank,
    pub current_rate: String,
    pub next_meeting_date: String,
    pub next_expected_move: ExpectedMove,
    /// Expected change magnitude in basis points.
    pub change_by: String,
    /// Percentages are trusted as delivered by the store; they are not
    /// validated to lie within [0, 100] or to sum to 100.
    pub probability_of_change: String,
    pub probability_of_no_change: String,
}

impl RateProbability {
    pub fn from_raw(raw: RawProbabilityRecord) -> Self {
        let central_bank = match raw.expand.central_bank {
            Some(bank) => CentralBank::Expanded(InterestRate::from_raw(bank)),
            None => {
                warn!(
                    "Missing expanded central_bank data for probability record {}",
                    raw.id
                );
                CentralBank::Placeholder {
                    name: text_or(raw.central_bank.as_ref(), "Unknown"),
                }
            }
        };

        RateProbability {
            id: raw.id,
            central_bank,
            current_rate: text_or(raw.current_rate.as_ref(), "N/A"),
            next_meeting_date: format_display_date(raw.next_meeting_date.as_deref()),
            next_expected_move: ExpectedMove::parse(raw.next_expected_move.as_deref()),
            change_by: text_or(raw.change_by.as_ref(), "N/A"),
            probability_of_change: text_or(raw.probability_of_change.as_ref(), "0"),
            probability_of_no_change: text_or(raw.probability_of_no_change.as_ref(), "0"),
        }
    }

    pub fn from_value(value: Value) -> Self {
        let raw: RawProbabilityRecord = serde_json::from_value(value).unwrap_or_default();
        Self::from_raw(raw)
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Decimal percentage from a JSON number or numeric string, 0 otherwise.
fn parse_rate(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String form of a scalar field that may arrive as string or number.
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Formats a store date (`2025-06-18 12:00:00.000Z`, RFC 3339, or plain
/// `YYYY-MM-DD`) as e.g. `Jun 18, 2025`. Absent or unparsable dates render
/// as `N/A`.
pub fn format_display_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.fZ").map(|dt| dt.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => "N/A".to_string(),
    }
}
