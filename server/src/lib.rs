use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use shared::api::ITINERARY_ROUTE;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use travelgpt::Planner;

mod rpc;

pub const DEFAULT_MAX_DAYS: i64 = 30;

pub struct AppState {
    pub planner: Planner,
    /// Longer requests are cut down to this many days.
    pub max_days: i64,
}

/// Builds the service. When `static_dir` is set, any path that is not an API
/// route is served from it (the trunk build of the frontend).
pub fn app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    let mut router: Router<Arc<AppState>> = Router::new()
        .route("/healthz", get(rpc::healthz))
        .route(ITINERARY_ROUTE, post(rpc::itinerary));

    if let Some(static_dir) = static_dir {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
