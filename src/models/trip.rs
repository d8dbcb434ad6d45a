//! Trip request model and input validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PackmateError;

/// Where the traveller stays during the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accommodation {
    Hotel,
    Hostel,
    Airbnb,
    Tent,
    Other,
}

impl Accommodation {
    /// Human label used in the generation prompt
    #[must_use]
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Accommodation::Hotel => "Hotel (comfort, amenities provided)",
            Accommodation::Hostel => "Hostel (shared dorms, bring padlock/towel)",
            Accommodation::Airbnb => "Airbnb / apartment (self-catering)",
            Accommodation::Tent => "Camping tent (no amenities, bring everything)",
            Accommodation::Other => "Other accommodation",
        }
    }
}

/// How physically demanding the trip is expected to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    Moderate,
    Intense,
}

impl ActivityLevel {
    /// Human label used in the generation prompt
    #[must_use]
    pub fn prompt_label(&self) -> &'static str {
        match self {
            ActivityLevel::Light => "Light (sightseeing, leisure, restaurants)",
            ActivityLevel::Moderate => "Moderate (day hikes, cycling, city walks)",
            ActivityLevel::Intense => "Intense (mountaineering, multi-day trekking, water sports)",
        }
    }
}

/// A validated trip description. Immutable once validated; consumed within a
/// single pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    /// Destination, free-form (resolved by the forecast provider)
    pub location: String,
    /// First day of the trip
    pub start_date: NaiveDate,
    /// Last day of the trip, inclusive
    pub end_date: NaiveDate,
    pub accommodation: Accommodation,
    pub activity_level: ActivityLevel,
}

impl TripRequest {
    /// Check the trip invariants: a usable location name and a date range
    /// with `end_date >= start_date`.
    pub fn validate(&self) -> Result<(), PackmateError> {
        if self.location.trim().chars().count() < 2 {
            return Err(PackmateError::validation(
                "Location must be at least 2 characters.",
            ));
        }
        if self.end_date < self.start_date {
            return Err(PackmateError::validation(
                "endDate must be on or after startDate.",
            ));
        }
        Ok(())
    }

    /// Trip length in days, both endpoints inclusive
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(start: &str, end: &str) -> TripRequest {
        TripRequest {
            location: "Zurich".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            accommodation: Accommodation::Hotel,
            activity_level: ActivityLevel::Moderate,
        }
    }

    #[test]
    fn test_valid_trip() {
        assert!(trip("2024-06-01", "2024-06-03").validate().is_ok());
    }

    #[test]
    fn test_single_day_trip_is_valid() {
        let t = trip("2024-06-01", "2024-06-01");
        assert!(t.validate().is_ok());
        assert_eq!(t.duration_days(), 1);
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let err = trip("2024-06-03", "2024-06-01").validate().unwrap_err();
        assert!(matches!(err, PackmateError::Validation { .. }));
        assert!(err.to_string().contains("endDate"));
    }

    #[test]
    fn test_short_location_rejected() {
        let mut t = trip("2024-06-01", "2024-06-03");
        t.location = "Z".to_string();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_duration_days() {
        assert_eq!(trip("2024-06-01", "2024-06-03").duration_days(), 3);
        assert_eq!(trip("2024-06-28", "2024-07-02").duration_days(), 5);
    }

    #[test]
    fn test_enum_serde_lowercase() {
        let json = serde_json::to_string(&Accommodation::Airbnb).unwrap();
        assert_eq!(json, "\"airbnb\"");
        let level: ActivityLevel = serde_json::from_str("\"intense\"").unwrap();
        assert_eq!(level, ActivityLevel::Intense);
    }

    #[test]
    fn test_trip_serde_camel_case() {
        let t = trip("2024-06-01", "2024-06-03");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["startDate"], "2024-06-01");
        assert_eq!(json["activityLevel"], "moderate");
    }
}
