//! Day-level weather aggregates used for prompting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's aggregated weather, derived from the provider's
/// sub-daily forecast slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    /// Calendar date this aggregate covers
    pub date: NaiveDate,
    /// Condition text of the temporally-middle slot of the day
    pub description: String,
    /// Minimum temperature in °C, rounded
    pub temp_min: i32,
    /// Maximum temperature in °C, rounded
    pub temp_max: i32,
    /// Mean relative humidity in percent, rounded
    pub humidity: i32,
    /// Any slot of the day reported rain
    pub rain: bool,
    /// Any slot of the day reported snow
    pub snow: bool,
    /// Mean wind speed in km/h, rounded
    pub wind_speed_kmh: i32,
}

/// Aggregated forecast for a trip window. Transient, request-scoped.
///
/// `summary` is derived from `days` and is not independently authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastContext {
    /// Provider-resolved location name, e.g. "Zurich, CH"
    pub location: String,
    /// Day aggregates in chronological order, dates unique
    pub days: Vec<DayForecast>,
    /// Human-readable synopsis of `days`
    pub summary: String,
}

impl ForecastContext {
    /// Whether any usable day data is present
    #[must_use]
    pub fn has_days(&self) -> bool {
        !self.days.is_empty()
    }
}
