//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod appliances;
#[allow(clippy::missing_errors_doc)]
pub mod homes;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod users;
#[allow(clippy::missing_errors_doc)]
pub mod zones;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::state::{AppState, Backend};

/// Build the `/api` sub-router.
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        // Homes
        .route("/homes", get(homes::list::<B>).post(homes::create::<B>))
        .route(
            "/homes/{id}",
            get(homes::get::<B>)
                .put(homes::update::<B>)
                .delete(homes::delete::<B>),
        )
        .route("/homes/{id}/security", put(homes::set_security::<B>))
        .route("/homes/{id}/occupancy", get(homes::occupancy::<B>))
        .route(
            "/homes/{id}/zones",
            get(homes::list_zones::<B>).post(homes::create_zone::<B>),
        )
        .route("/homes/{id}/layout", post(homes::import_layout::<B>))
        // Zones
        .route(
            "/zones/{id}",
            get(zones::get::<B>).delete(zones::delete::<B>),
        )
        .route(
            "/zones/{id}/appliances",
            get(zones::list_appliances::<B>).post(zones::create_appliance::<B>),
        )
        .route("/zones/{id}/openings", get(zones::list_openings::<B>))
        // Appliances
        .route(
            "/appliances/{id}/state",
            put(appliances::update_state::<B>),
        )
        .route("/appliances/{id}", delete(appliances::delete::<B>))
        // Users
        .route("/users", get(users::list::<B>).post(users::create::<B>))
        .route(
            "/users/{id}",
            get(users::get::<B>)
                .put(users::update::<B>)
                .delete(users::delete::<B>),
        )
        .route("/users/{id}/zone", put(users::move_to_zone::<B>))
        // Events
        .route("/events/stream", get(sse::stream::<B>))
}
