//! Prompt composition for the generative backend
//!
//! The payload is split into a fixed system directive and a variable trip
//! context. Keeping the directive constant makes generator output auditable
//! and lets tests pin the context independently of backend nondeterminism.

use crate::models::{ForecastContext, TripRequest};

/// Two-part payload sent to the generative backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    /// Fixed system directive
    pub instructions: String,
    /// Variable trip + weather context
    pub context: String,
}

/// Fixed system directive encoding the required output contract.
const INSTRUCTIONS: &str = "You are PackMate AI, an expert travel assistant that generates personalized packing lists.

TASK
Generate a comprehensive, context-aware packing list for the trip described by the user.

OUTPUT FORMAT — respond ONLY with a single valid JSON object, no markdown fences, no explanation.
The JSON must map category names to item arrays:
{
  \"<Category>\": [
    {
      \"name\": \"string, concise item name (1-4 words)\",
      \"quantity\": 1,
      \"packed\": false
    }
  ]
}

RULES
- Categories must be Title Case strings (e.g. \"Clothing\", \"Toiletries\", \"Electronics\").
- Include 6-12 relevant categories; each category must have 3-12 items.
- \"packed\" must always be false in generated lists.
- Adapt items to the weather (rain -> umbrella/raincoat; cold -> layers; heat -> sun protection).
- Adapt items to accommodation (tent -> sleeping bag, camp stove; hotel -> fewer bulky items).
- Adapt items to activity level (intense -> sport gear, first aid; light -> casual clothes).
- Do NOT add items irrelevant to the trip context.
- Do NOT wrap the JSON in code blocks or add any surrounding text.";

/// Compose the instruction payload for a validated trip and an optional
/// forecast context.
#[must_use]
pub fn compose(trip: &TripRequest, weather: Option<&ForecastContext>) -> PromptPayload {
    PromptPayload {
        instructions: INSTRUCTIONS.to_string(),
        context: build_context(trip, weather),
    }
}

fn build_context(trip: &TripRequest, weather: Option<&ForecastContext>) -> String {
    let duration = trip.duration_days();
    let day_word = if duration == 1 { "day" } else { "days" };

    let weather_section = match weather {
        Some(ctx) => format!(
            "WEATHER FORECAST\n{}\nDetailed days:\n{}",
            ctx.summary,
            ctx.days
                .iter()
                .map(format_day_line)
                .collect::<Vec<_>>()
                .join("\n")
        ),
        None => {
            "WEATHER FORECAST\nNot available — use destination climate knowledge.".to_string()
        }
    };

    format!(
        "TRIP DETAILS\n\
         Destination: {}\n\
         Dates: {} to {} ({duration} {day_word})\n\
         Accommodation: {}\n\
         Activity Level: {}\n\
         \n\
         {weather_section}\n\
         \n\
         Generate the packing list JSON now.",
        trip.location,
        trip.start_date,
        trip.end_date,
        trip.accommodation.prompt_label(),
        trip.activity_level.prompt_label(),
    )
}

fn format_day_line(day: &crate::models::DayForecast) -> String {
    let mut line = format!(
        "  • {}: {}, {}\u{2013}{}°C, humidity {}%, wind {} km/h",
        day.date, day.description, day.temp_min, day.temp_max, day.humidity, day.wind_speed_kmh
    );
    if day.rain {
        line.push_str(", RAIN");
    }
    if day.snow {
        line.push_str(", SNOW");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Accommodation, ActivityLevel, DayForecast};

    fn trip() -> TripRequest {
        TripRequest {
            location: "Zurich".to_string(),
            start_date: "2024-06-01".parse().unwrap(),
            end_date: "2024-06-03".parse().unwrap(),
            accommodation: Accommodation::Tent,
            activity_level: ActivityLevel::Intense,
        }
    }

    fn rainy_day(date: &str) -> DayForecast {
        DayForecast {
            date: date.parse().unwrap(),
            description: "light rain".to_string(),
            temp_min: 10,
            temp_max: 15,
            humidity: 82,
            rain: true,
            snow: false,
            wind_speed_kmh: 18,
        }
    }

    fn forecast() -> ForecastContext {
        let days = vec![
            rainy_day("2024-06-01"),
            DayForecast {
                rain: false,
                description: "clear sky".to_string(),
                ..rainy_day("2024-06-02")
            },
        ];
        ForecastContext {
            location: "Zurich, CH".to_string(),
            days,
            summary: "Forecast for Zurich, CH: temperature range 10\u{2013}15°C. \
                      Conditions: rain expected. 2 day(s) of data available."
                .to_string(),
        }
    }

    #[test]
    fn test_instructions_are_fixed() {
        let a = compose(&trip(), None);
        let b = compose(&trip(), Some(&forecast()));
        assert_eq!(a.instructions, b.instructions);
        assert!(a.instructions.contains("single valid JSON object"));
        assert!(a.instructions.contains("Title Case"));
        assert!(a.instructions.contains("6-12 relevant categories"));
    }

    #[test]
    fn test_context_embeds_trip_details() {
        let payload = compose(&trip(), None);
        assert!(payload.context.contains("Destination: Zurich"));
        assert!(payload.context.contains("2024-06-01 to 2024-06-03 (3 days)"));
        assert!(payload.context.contains("Camping tent"));
        assert!(payload.context.contains("Intense (mountaineering"));
    }

    #[test]
    fn test_single_day_trip_uses_singular() {
        let mut t = trip();
        t.end_date = t.start_date;
        let payload = compose(&t, None);
        assert!(payload.context.contains("(1 day)"));
    }

    #[test]
    fn test_rainy_day_flagged_in_context() {
        let payload = compose(&trip(), Some(&forecast()));
        assert!(payload.context.contains("2024-06-01: light rain"));
        assert!(payload.context.contains("RAIN"));
        // The clear day carries no flag
        let clear_line = payload
            .context
            .lines()
            .find(|l| l.contains("2024-06-02"))
            .unwrap();
        assert!(!clear_line.contains("RAIN"));
    }

    #[test]
    fn test_missing_weather_notice() {
        let payload = compose(&trip(), None);
        assert!(payload.context.contains("Not available"));
        assert!(payload.context.contains("climate knowledge"));
        assert!(!payload.context.contains("Detailed days"));
    }

    #[test]
    fn test_weather_summary_included() {
        let payload = compose(&trip(), Some(&forecast()));
        assert!(payload.context.contains("Forecast for Zurich, CH"));
        assert!(payload.context.contains("Detailed days:"));
    }
}
