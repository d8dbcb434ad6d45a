//! Core domain models for trips, weather, and packing lists

pub mod packing;
pub mod trip;
pub mod weather;

pub use packing::{PackingItem, PackingListContent};
pub use trip::{Accommodation, ActivityLevel, TripRequest};
pub use weather::{DayForecast, ForecastContext};
