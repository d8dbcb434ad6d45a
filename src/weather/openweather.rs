//! `OpenWeatherMap` forecast client
//!
//! Uses the 5-day / 3-hour forecast endpoint. The provider resolves the
//! free-form location query itself and returns at most 40 slots, which may
//! not cover the full requested trip window.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ForecastProvider, ForecastSlot, RawForecast};
use crate::config::WeatherConfig;
use crate::error::PackmateError;

/// Maximum number of 3-hour slots the free endpoint serves (5 days × 8)
const MAX_SLOTS: u32 = 40;

/// HTTP client for the `OpenWeatherMap` forecast API
#[derive(Debug)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    /// Create a client from configuration. Requires an API key.
    pub fn from_config(config: &WeatherConfig) -> Result<Self, PackmateError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PackmateError::config("Weather API key is not configured"))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(|e| PackmateError::forecast(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            http,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    async fn fetch(&self, location: &str) -> Result<RawForecast, PackmateError> {
        let url = format!(
            "{}/forecast?q={}&appid={}&units=metric&cnt={}",
            self.base_url,
            urlencoding::encode(location),
            self.api_key,
            MAX_SLOTS
        );

        debug!(%location, "Fetching forecast");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PackmateError::forecast(format!("Forecast request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PackmateError::forecast(format!(
                "Forecast provider returned HTTP {} for \"{location}\"",
                response.status()
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| PackmateError::forecast(format!("Failed to parse forecast response: {e}")))?;

        let resolved = format!("{}, {}", body.city.name, body.city.country);
        let slots = body.list.into_iter().map(ForecastSlot::from).collect();

        Ok(RawForecast {
            location: resolved,
            slots,
        })
    }
}

// OpenWeatherMap API response types

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    city: City,
    list: Vec<ForecastListItem>,
}

#[derive(Debug, Deserialize)]
struct City {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ForecastListItem {
    /// Unix timestamp of the slot
    dt: i64,
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
    rain: Option<Precipitation>,
    snow: Option<Precipitation>,
    /// Timestamp as "YYYY-MM-DD HH:MM:SS"
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    /// Wind speed in m/s (metric units)
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Precipitation {
    /// Accumulation over the 3-hour slot in mm
    #[serde(rename = "3h", default)]
    volume: f64,
}

impl From<ForecastListItem> for ForecastSlot {
    fn from(item: ForecastListItem) -> Self {
        let timestamp = NaiveDateTime::parse_from_str(&item.dt_txt, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| {
                DateTime::from_timestamp(item.dt, 0)
                    .unwrap_or_default()
                    .naive_utc()
            });

        let (condition, description) = item
            .weather
            .into_iter()
            .next()
            .map(|c| (c.main, c.description))
            .unwrap_or_default();

        ForecastSlot {
            timestamp,
            temp_min: item.main.temp_min,
            temp_max: item.main.temp_max,
            humidity: item.main.humidity,
            wind_speed_ms: item.wind.speed,
            rain_mm: item.rain.map(|p| p.volume).unwrap_or_default(),
            snow_mm: item.snow.map(|p| p.volume).unwrap_or_default(),
            condition,
            description,
        }
    }
}
