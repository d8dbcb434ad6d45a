//! Weather retrieval and day-level aggregation
//!
//! Forecast providers deliver sub-daily slots whose granularity and horizon
//! do not line up with the requested trip window. This module groups slots
//! into calendar-day aggregates, selects the days matching the trip, and
//! derives the human-readable synopsis used for prompting.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::PackmateError;
use crate::models::{DayForecast, ForecastContext};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Mean day-level wind above this is called out in the summary
const STRONG_WIND_KMH: i32 = 30;

/// Number of leading days used when the provider horizon misses the
/// requested window entirely
const FALLBACK_DAYS: usize = 3;

/// One raw, provider-neutral forecast reading
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSlot {
    /// Reading timestamp; sub-daily, not aligned to day boundaries
    pub timestamp: NaiveDateTime,
    /// Slot minimum temperature in °C
    pub temp_min: f64,
    /// Slot maximum temperature in °C
    pub temp_max: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in m/s (provider-native unit)
    pub wind_speed_ms: f64,
    /// Rain accumulation for the slot in mm
    pub rain_mm: f64,
    /// Snow accumulation for the slot in mm
    pub snow_mm: f64,
    /// Coarse condition category, e.g. "Rain", "Clouds"
    pub condition: String,
    /// Free-text condition description, e.g. "light rain"
    pub description: String,
}

/// Raw provider output: resolved location plus its forecast slots
#[derive(Debug, Clone)]
pub struct RawForecast {
    /// Provider-resolved location name, e.g. "Zurich, CH"
    pub location: String,
    pub slots: Vec<ForecastSlot>,
}

/// A source of raw forecast slots for a free-form location query.
///
/// Implementations are injected into the pipeline so tests can substitute
/// deterministic fakes.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<RawForecast, PackmateError>;
}

/// Fetch and aggregate a forecast for the given trip window.
pub async fn fetch_forecast(
    provider: &dyn ForecastProvider,
    location: &str,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<ForecastContext, PackmateError> {
    let raw = provider.fetch(location).await?;
    debug!(
        location = %raw.location,
        slots = raw.slots.len(),
        "Aggregating forecast slots"
    );
    Ok(aggregate(&raw.slots, range_start, range_end, &raw.location))
}

/// Aggregate raw slots into day-level summaries for `[range_start, range_end]`.
///
/// Days outside the window are dropped; if the window misses the provider
/// horizon entirely, the first [`FALLBACK_DAYS`] aggregated days are used
/// instead so callers always receive usable context when raw data exists.
/// Empty input yields an empty day list with an "unavailable" summary,
/// which is a valid outcome, not an error.
#[must_use]
pub fn aggregate(
    slots: &[ForecastSlot],
    range_start: NaiveDate,
    range_end: NaiveDate,
    location: &str,
) -> ForecastContext {
    // Group by calendar date, preserving order of first appearance
    let mut groups: Vec<(NaiveDate, Vec<&ForecastSlot>)> = Vec::new();
    for slot in slots {
        let date = slot.timestamp.date();
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, group)) => group.push(slot),
            None => groups.push((date, vec![slot])),
        }
    }

    let days: Vec<DayForecast> = groups
        .into_iter()
        .map(|(date, group)| aggregate_day(date, &group))
        .collect();

    let filtered: Vec<DayForecast> = days
        .iter()
        .filter(|d| d.date >= range_start && d.date <= range_end)
        .cloned()
        .collect();

    let relevant = if filtered.is_empty() {
        days.into_iter().take(FALLBACK_DAYS).collect()
    } else {
        filtered
    };

    let summary = build_summary(&relevant, location);

    ForecastContext {
        location: location.to_string(),
        days: relevant,
        summary,
    }
}

fn aggregate_day(date: NaiveDate, group: &[&ForecastSlot]) -> DayForecast {
    let temps: Vec<f64> = group
        .iter()
        .flat_map(|s| [s.temp_min, s.temp_max])
        .collect();
    let temp_min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let temp_max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let humidity = group.iter().map(|s| s.humidity).sum::<f64>() / group.len() as f64;
    let wind_ms = group.iter().map(|s| s.wind_speed_ms).sum::<f64>() / group.len() as f64;

    let rain = group.iter().any(|s| s.rain_mm > 0.0 || s.condition == "Rain");
    let snow = group.iter().any(|s| s.snow_mm > 0.0 || s.condition == "Snow");

    // The temporally-middle slot gives a stable description; "most frequent"
    // is unstable under ties
    let description = group[group.len() / 2].description.clone();

    DayForecast {
        date,
        description,
        temp_min: temp_min.round() as i32,
        temp_max: temp_max.round() as i32,
        humidity: humidity.round() as i32,
        rain,
        snow,
        wind_speed_kmh: (wind_ms * 3.6).round() as i32,
    }
}

/// Derive the human-readable synopsis from the selected day list.
///
/// Conditions are listed in fixed precedence (rain, snow, wind); clauses
/// co-occur rather than excluding each other.
fn build_summary(days: &[DayForecast], location: &str) -> String {
    if days.is_empty() {
        return format!("Weather data unavailable for {location}.");
    }

    let overall_min = days.iter().map(|d| d.temp_min).min().unwrap_or(0);
    let overall_max = days.iter().map(|d| d.temp_max).max().unwrap_or(0);
    let has_rain = days.iter().any(|d| d.rain);
    let has_snow = days.iter().any(|d| d.snow);
    let avg_wind = (days.iter().map(|d| d.wind_speed_kmh).sum::<i32>() as f64
        / days.len() as f64)
        .round() as i32;

    let mut conditions = Vec::new();
    if has_rain {
        conditions.push("rain expected".to_string());
    }
    if has_snow {
        conditions.push("snow expected".to_string());
    }
    if avg_wind > STRONG_WIND_KMH {
        conditions.push(format!("strong winds (~{avg_wind} km/h)"));
    }
    if conditions.is_empty() {
        conditions.push("mostly clear/cloudy".to_string());
    }

    format!(
        "Forecast for {location}: temperature range {overall_min}\u{2013}{overall_max}°C. \
         Conditions: {}. {} day(s) of data available.",
        conditions.join(", "),
        days.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn slot(ts: &str, temp_min: f64, temp_max: f64) -> ForecastSlot {
        ForecastSlot {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            temp_min,
            temp_max,
            humidity: 60.0,
            wind_speed_ms: 4.0,
            rain_mm: 0.0,
            snow_mm: 0.0,
            condition: "Clouds".to_string(),
            description: "scattered clouds".to_string(),
        }
    }

    fn rainy(ts: &str) -> ForecastSlot {
        ForecastSlot {
            rain_mm: 1.2,
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
            ..slot(ts, 10.0, 14.0)
        }
    }

    #[test]
    fn test_grouping_is_exact() {
        let slots = vec![
            slot("2024-06-01 06:00:00", 10.0, 12.0),
            slot("2024-06-01 21:00:00", 8.0, 11.0),
            slot("2024-06-02 09:00:00", 12.0, 16.0),
            slot("2024-06-03 12:00:00", 14.0, 18.0),
        ];
        let ctx = aggregate(&slots, date("2024-06-01"), date("2024-06-03"), "Testville");
        assert_eq!(ctx.days.len(), 3);
        let dates: Vec<NaiveDate> = ctx.days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-06-01"), date("2024-06-02"), date("2024-06-03")]
        );
    }

    #[test]
    fn test_day_invariants_hold() {
        let slots = vec![
            slot("2024-06-01 06:00:00", 3.4, 7.9),
            slot("2024-06-01 12:00:00", 9.1, 15.6),
            slot("2024-06-01 18:00:00", 6.0, 12.2),
        ];
        let ctx = aggregate(&slots, date("2024-06-01"), date("2024-06-01"), "Testville");
        let day = &ctx.days[0];
        assert!(day.temp_min <= day.temp_max);
        assert!(day.humidity >= 0);
        assert!(day.wind_speed_kmh >= 0);
        // Pool is min AND max readings of every slot
        assert_eq!(day.temp_min, 3);
        assert_eq!(day.temp_max, 16);
    }

    #[test]
    fn test_wind_converted_from_ms() {
        let mut s = slot("2024-06-01 12:00:00", 10.0, 12.0);
        s.wind_speed_ms = 10.0;
        let ctx = aggregate(&[s], date("2024-06-01"), date("2024-06-01"), "T");
        assert_eq!(ctx.days[0].wind_speed_kmh, 36);
    }

    #[test]
    fn test_middle_slot_description_wins() {
        let mut slots = vec![
            slot("2024-06-01 00:00:00", 10.0, 12.0),
            slot("2024-06-01 09:00:00", 10.0, 12.0),
            slot("2024-06-01 12:00:00", 10.0, 12.0),
            slot("2024-06-01 18:00:00", 10.0, 12.0),
        ];
        slots[2].description = "broken clouds".to_string();
        let ctx = aggregate(&slots, date("2024-06-01"), date("2024-06-01"), "T");
        // index = floor(4 / 2) = 2
        assert_eq!(ctx.days[0].description, "broken clouds");
    }

    #[rstest]
    #[case(0.5, "Clouds", true)] // measurable rain, neutral category
    #[case(0.0, "Rain", true)] // rain category, no accumulation yet
    #[case(0.0, "Clouds", false)]
    fn test_rain_detection(#[case] rain_mm: f64, #[case] condition: &str, #[case] expect: bool) {
        let mut s = slot("2024-06-01 12:00:00", 10.0, 12.0);
        s.rain_mm = rain_mm;
        s.condition = condition.to_string();
        let ctx = aggregate(&[s], date("2024-06-01"), date("2024-06-01"), "T");
        assert_eq!(ctx.days[0].rain, expect);
    }

    #[test]
    fn test_fallback_to_first_three_days() {
        let slots = vec![
            slot("2024-06-01 12:00:00", 10.0, 12.0),
            slot("2024-06-02 12:00:00", 11.0, 13.0),
            slot("2024-06-03 12:00:00", 12.0, 14.0),
            slot("2024-06-04 12:00:00", 13.0, 15.0),
            slot("2024-06-05 12:00:00", 14.0, 16.0),
        ];
        // Requested window entirely beyond the provider horizon
        let ctx = aggregate(&slots, date("2024-07-10"), date("2024-07-12"), "T");
        assert_eq!(ctx.days.len(), 3);
        assert_eq!(ctx.days[0].date, date("2024-06-01"));
        assert_eq!(ctx.days[2].date, date("2024-06-03"));
    }

    #[test]
    fn test_empty_slots_is_valid_not_error() {
        let ctx = aggregate(&[], date("2024-06-01"), date("2024-06-03"), "Nowhere, XX");
        assert!(ctx.days.is_empty());
        assert!(ctx.summary.contains("unavailable"));
        assert!(ctx.summary.contains("Nowhere, XX"));
    }

    #[test]
    fn test_summary_mentions_range_and_day_count() {
        let slots = vec![
            slot("2024-06-01 12:00:00", 8.0, 15.0),
            slot("2024-06-02 12:00:00", 10.0, 19.0),
        ];
        let ctx = aggregate(&slots, date("2024-06-01"), date("2024-06-02"), "Testville");
        assert!(ctx.summary.contains("8\u{2013}19°C"));
        assert!(ctx.summary.contains("2 day(s)"));
        assert!(ctx.summary.contains("mostly clear/cloudy"));
    }

    #[test]
    fn test_summary_conditions_co_occur_in_order() {
        let mut windy_snow = slot("2024-06-02 12:00:00", -4.0, 1.0);
        windy_snow.snow_mm = 2.0;
        windy_snow.wind_speed_ms = 12.0; // ~43 km/h
        let mut windy_rain = rainy("2024-06-01 12:00:00");
        windy_rain.wind_speed_ms = 12.0;
        let ctx = aggregate(
            &[windy_rain, windy_snow],
            date("2024-06-01"),
            date("2024-06-02"),
            "T",
        );
        let rain_at = ctx.summary.find("rain expected").unwrap();
        let snow_at = ctx.summary.find("snow expected").unwrap();
        let wind_at = ctx.summary.find("strong winds").unwrap();
        assert!(rain_at < snow_at && snow_at < wind_at);
    }

    #[test]
    fn test_summary_rederivable_from_days() {
        let slots = vec![rainy("2024-06-01 12:00:00")];
        let ctx = aggregate(&slots, date("2024-06-01"), date("2024-06-01"), "Testville");
        assert_eq!(ctx.summary, super::build_summary(&ctx.days, &ctx.location));
    }
}
