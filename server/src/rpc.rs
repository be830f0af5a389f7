use std::sync::Arc;

use axum::{extract::State, Json};
use shared::{ItineraryEnvelope, TripRequest};
use tracing::{debug, info};

use crate::AppState;

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn itinerary(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<TripRequest>,
) -> Json<ItineraryEnvelope> {
    if request.days > state.max_days {
        debug!(
            requested = request.days,
            max_days = state.max_days,
            "clamping trip length"
        );
        request.days = state.max_days;
    }

    info!(
        destination = %request.destination,
        days = request.days,
        interests = %request.interests,
        "generating itinerary"
    );

    let generated = state.planner.plan(&request).await;

    Json(ItineraryEnvelope::success(generated))
}
