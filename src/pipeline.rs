//! Packing-list generation pipeline
//!
//! Sequences trip validation, best-effort forecast retrieval, prompt
//! composition, the generation call, output validation, and optional
//! persistence. Each invocation is stateless; clients are injected and
//! shared behind `Arc`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PackmateError;
use crate::generator::PackingListGenerator;
use crate::models::{ForecastContext, PackingListContent, TripRequest};
use crate::prompt;
use crate::validator;
use crate::weather::{self, ForecastProvider};

/// Opaque handle to a persisted trip record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
}

/// Persistence collaborator owned by the layer above this crate.
///
/// Receives the weather context as opaque JSON; its storage layout and error
/// taxonomy are its own concern.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn save_trip(
        &self,
        owner_id: &str,
        trip: &TripRequest,
        weather: Option<&serde_json::Value>,
        packing_list: &PackingListContent,
    ) -> Result<TripRecord, PackmateError>;
}

/// Outcome of one pipeline invocation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub packing_list: PackingListContent,
    /// Aggregated forecast, or None when retrieval degraded
    pub weather: Option<ForecastContext>,
    /// Persisted-record handle when persistence was requested and performed
    pub persisted: Option<TripRecord>,
}

/// The assembled pipeline with its injected collaborators
pub struct PackingPipeline {
    forecast: Arc<dyn ForecastProvider>,
    generator: Arc<dyn PackingListGenerator>,
    store: Option<Arc<dyn TripStore>>,
}

impl PackingPipeline {
    pub fn new(
        forecast: Arc<dyn ForecastProvider>,
        generator: Arc<dyn PackingListGenerator>,
    ) -> Self {
        Self {
            forecast,
            generator,
            store: None,
        }
    }

    /// Attach a persistence collaborator
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn TripStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Run the full pipeline for one trip.
    ///
    /// Forecast retrieval is best-effort: any failure degrades to
    /// `weather = None` and never aborts the request. Everything after it is
    /// fatal on failure. Persistence happens only when `persist` is set, an
    /// `owner_id` is present, and a store is attached.
    pub async fn run(
        &self,
        trip: &TripRequest,
        persist: bool,
        owner_id: Option<&str>,
    ) -> Result<GenerationResult, PackmateError> {
        trip.validate()?;
        info!(
            location = %trip.location,
            start = %trip.start_date,
            end = %trip.end_date,
            "Generating packing list"
        );

        let weather = match weather::fetch_forecast(
            self.forecast.as_ref(),
            &trip.location,
            trip.start_date,
            trip.end_date,
        )
        .await
        {
            Ok(ctx) => {
                debug!(days = ctx.days.len(), "Forecast available");
                Some(ctx)
            }
            Err(err) => {
                warn!(error = %err, "Could not fetch forecast, proceeding without weather");
                None
            }
        };

        let payload = prompt::compose(trip, weather.as_ref());
        let raw = self.generator.generate(&payload).await?;
        let packing_list = validator::validate_packing_list(&raw)?;
        debug!(
            categories = packing_list.len(),
            items = packing_list.item_count(),
            "Validated packing list"
        );

        let persisted = match (persist, owner_id, &self.store) {
            (true, Some(owner), Some(store)) => {
                let weather_json = weather
                    .as_ref()
                    .map(serde_json::to_value)
                    .transpose()
                    .map_err(|e| {
                        PackmateError::persistence(format!("Failed to encode weather context: {e}"))
                    })?;
                let record = store
                    .save_trip(owner, trip, weather_json.as_ref(), &packing_list)
                    .await?;
                info!(record_id = %record.id, "Persisted trip");
                Some(record)
            }
            _ => None,
        };

        Ok(GenerationResult {
            packing_list,
            weather,
            persisted,
        })
    }
}
