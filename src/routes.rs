use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    get_schedule, list_events, mutate_event, place_slot, watch_events, watch_schedule, AppState,
};
use crate::handlers::test::{health_check, sample_payloads};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Viewer and admin API routes are always available
    let api_routes = Router::new()
        .route("/schedule", get(get_schedule).post(place_slot))
        .route("/events", get(list_events).post(mutate_event))
        .route("/ws/schedule", get(watch_schedule))
        .route("/ws/events", get(watch_events));
    router = router.merge(api_routes);

    // Only expose sample payloads outside production
    if !is_production {
        let sample_routes = Router::new().route("/samples", get(sample_payloads));
        router = router.merge(sample_routes);

        info!("Sample payload routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - sample payload routes hidden");
    }

    router.with_state(app_state)
}
