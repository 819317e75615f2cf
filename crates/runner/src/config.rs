//! Runner configuration loaded from environment variables.

use broker::{AdventureRequest, Step};
use chrono::NaiveDate;

/// Settings for one adventure run, with defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `BROKER_CODE` / `BROKER_NAME`: broker identity (default: `"BR98"`, `"Travel Light"`)
/// - `ADVENTURE_BEGIN` / `ADVENTURE_END`: `YYYY-MM-DD` (default: `2016-12-19`, `2016-12-21`)
/// - `ADVENTURE_PARTICIPANTS`: participant count (default: `20`)
/// - `ADVENTURE_IBAN`: account to charge (default: `"BK01987654321"`)
/// - `ADVENTURE_AMOUNT`: amount to charge (default: `300`)
/// - `FAIL_STEP`: `payment`, `room` or `activity`; makes that service fail (default: unset)
///
/// Values that do not parse fall back to their default.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub broker_code: String,
    pub broker_name: String,
    pub begin: NaiveDate,
    pub end: NaiveDate,
    pub participants: u32,
    pub iban: String,
    pub amount: u64,
    pub fail_step: Option<Step>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let date = |key: &str, default: NaiveDate| {
            lookup(key)
                .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())
                .unwrap_or(default)
        };

        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            broker_code: lookup("BROKER_CODE").unwrap_or(defaults.broker_code),
            broker_name: lookup("BROKER_NAME").unwrap_or(defaults.broker_name),
            begin: date("ADVENTURE_BEGIN", defaults.begin),
            end: date("ADVENTURE_END", defaults.end),
            participants: lookup("ADVENTURE_PARTICIPANTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.participants),
            iban: lookup("ADVENTURE_IBAN").unwrap_or(defaults.iban),
            amount: lookup("ADVENTURE_AMOUNT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.amount),
            fail_step: lookup("FAIL_STEP").and_then(|v| parse_step(&v)),
        }
    }

    /// Returns the adventure request described by this configuration.
    pub fn adventure_request(&self) -> AdventureRequest {
        AdventureRequest::new(
            self.begin,
            self.end,
            self.participants,
            self.iban.clone(),
            self.amount,
        )
    }
}

fn parse_step(value: &str) -> Option<Step> {
    let value = value.trim();
    Step::ALL
        .into_iter()
        .find(|step| step.as_str().eq_ignore_ascii_case(value))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            broker_code: "BR98".to_string(),
            broker_name: "Travel Light".to_string(),
            begin: NaiveDate::from_ymd_opt(2016, 12, 19).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2016, 12, 21).unwrap_or_default(),
            participants: 20,
            iban: "BK01987654321".to_string(),
            amount: 300,
            fail_step: None,
        }
    }
}
