//! `PackMate` - Context-aware trip packing list generation
//!
//! This library provides the packing-list generation pipeline: day-level
//! aggregation of raw forecast data, deterministic prompt composition,
//! the generative backend call, and defensive validation of its output.
//! HTTP routing, sessions, and durable storage live in the layer above and
//! plug in through the traits exposed here.

pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod stub;
pub mod validator;
pub mod weather;

// Re-export core types for public API
pub use config::{GeneratorConfig, LoggingConfig, PackmateConfig, WeatherConfig};
pub use error::PackmateError;
pub use generator::{OpenAiGenerator, PackingListGenerator};
pub use models::{
    Accommodation, ActivityLevel, DayForecast, ForecastContext, PackingItem, PackingListContent,
    TripRequest,
};
pub use pipeline::{GenerationResult, PackingPipeline, TripRecord, TripStore};
pub use prompt::PromptPayload;
pub use validator::validate_packing_list;
pub use weather::{ForecastProvider, ForecastSlot, OpenWeatherClient, RawForecast};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PackmateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
