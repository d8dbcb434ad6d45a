//! Offline stand-ins for the external collaborators
//!
//! Lets the full pipeline run without network access or API keys: the stub
//! provider fabricates a plausible 5-day forecast and the stub generator
//! answers with a fixed, trip-aware list. Stub generator output goes through
//! the real validator like any backend response.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::RngExt;

use crate::error::PackmateError;
use crate::generator::PackingListGenerator;
use crate::prompt::PromptPayload;
use crate::weather::{ForecastProvider, ForecastSlot, RawForecast};

const DESCRIPTIONS: [&str; 5] = [
    "partly cloudy",
    "sunny intervals",
    "light rain",
    "overcast",
    "clear sky",
];

/// Horizon of the fabricated forecast, matching the real provider
const STUB_DAYS: i64 = 5;

/// Fabricates randomized but plausible 3-hour forecast slots starting today
pub struct StubForecastProvider;

#[async_trait]
impl ForecastProvider for StubForecastProvider {
    async fn fetch(&self, location: &str) -> Result<RawForecast, PackmateError> {
        let mut rng = rand::rng();
        let start = Utc::now().date_naive();
        let mut slots = Vec::new();

        for day in 0..STUB_DAYS {
            let date = start + Duration::days(day);
            let base_min = rng.random_range(8..=18) as f64;
            let base_max = base_min + rng.random_range(4..=10) as f64;
            let rainy = rng.random_range(0.0..1.0) > 0.65;
            let description = DESCRIPTIONS[day as usize % DESCRIPTIONS.len()];

            for hour in (0..24u32).step_by(3) {
                slots.push(ForecastSlot {
                    timestamp: date.and_hms_opt(hour, 0, 0).unwrap(),
                    temp_min: base_min,
                    temp_max: base_max,
                    humidity: rng.random_range(45..=85) as f64,
                    wind_speed_ms: rng.random_range(3..=10) as f64,
                    rain_mm: if rainy { 0.8 } else { 0.0 },
                    snow_mm: 0.0,
                    condition: if rainy { "Rain" } else { "Clouds" }.to_string(),
                    description: description.to_string(),
                });
            }
        }

        Ok(RawForecast {
            location: format!("{location} (stub)"),
            slots,
        })
    }
}

/// Answers every prompt with a fixed packing list, adapted to the
/// accommodation and activity level it finds in the rendered context
pub struct StubGenerator;

impl StubGenerator {
    /// Trip length as rendered by the composer; defaults when unparsable
    fn parse_duration(context: &str) -> i64 {
        context
            .lines()
            .find_map(|line| {
                let rest = line.strip_prefix("Dates: ")?;
                let inside = rest.split('(').nth(1)?;
                inside.split_whitespace().next()?.parse().ok()
            })
            .unwrap_or(3)
    }
}

#[async_trait]
impl PackingListGenerator for StubGenerator {
    async fn generate(&self, prompt: &PromptPayload) -> Result<String, PackmateError> {
        let is_tent = prompt.context.contains("Camping tent");
        let is_intense = prompt.context.contains("Activity Level: Intense");
        let is_light = prompt.context.contains("Activity Level: Light");

        let days = Self::parse_duration(&prompt.context);
        let shirts = days.min(7);
        let pants = ((days + 1) / 2).min(4);

        let item = |name: &str, quantity: i64| {
            serde_json::json!({ "name": name, "quantity": quantity, "packed": false })
        };

        let mut clothing = vec![
            item("T-Shirts", shirts),
            item("Underwear", shirts),
            item("Pants / Trousers", pants),
            item("Socks", shirts),
            item("Light Jacket", 1),
        ];
        if is_intense {
            clothing.push(item("Sport Shorts", 2));
        }
        if is_tent {
            clothing.push(item("Thermal Underwear", 1));
        }

        let mut footwear = vec![item("Sneakers", 1)];
        if is_intense {
            footwear.push(item("Hiking Boots", 1));
        }
        footwear.push(item("Flip Flops", 1));

        let mut health = vec![
            item("Paracetamol", 1),
            item("Plasters / Band-Aids", 10),
            item("Hand Sanitizer", 1),
        ];
        if is_intense {
            health.push(item("Blister Prevention", 1));
            health.push(item("Knee Brace", 1));
        }

        let mut list = serde_json::Map::new();
        list.insert("Clothing".to_string(), clothing.into());
        list.insert("Footwear".to_string(), footwear.into());
        list.insert(
            "Toiletries".to_string(),
            vec![
                item("Toothbrush", 1),
                item("Toothpaste", 1),
                item("Shampoo", 1),
                item("Deodorant", 1),
                item("Sunscreen SPF 50", 1),
                item("Razor", 1),
            ]
            .into(),
        );
        list.insert(
            "Electronics".to_string(),
            vec![
                item("Phone Charger", 1),
                item("Power Bank", 1),
                item("Universal Adapter", 1),
                item("Earphones", 1),
            ]
            .into(),
        );
        list.insert(
            "Documents".to_string(),
            vec![
                item("Passport / ID", 1),
                item("Travel Insurance", 1),
                item("Booking Confirmations", 1),
                item("Credit / Debit Card", 2),
            ]
            .into(),
        );
        list.insert("Health & Safety".to_string(), health.into());
        if is_tent {
            list.insert(
                "Camping".to_string(),
                vec![
                    item("Sleeping Bag", 1),
                    item("Sleeping Mat", 1),
                    item("Headlamp", 1),
                    item("Camp Stove", 1),
                    item("Water Purification Tablets", 1),
                ]
                .into(),
            );
        }
        if !is_light {
            list.insert(
                "Backpack".to_string(),
                vec![item("Daypack 20L", 1), item("Dry Bag", 1)].into(),
            );
        }
        list.insert(
            "Miscellaneous".to_string(),
            vec![
                item("Reusable Water Bottle", 1),
                item("Umbrella / Raincoat", 1),
                item("Travel Pillow", 1),
                item("Snacks", 3),
            ]
            .into(),
        );

        serde_json::to_string(&serde_json::Value::Object(list))
            .map_err(|e| PackmateError::generation(format!("Failed to encode stub list: {e}")))
    }
}
