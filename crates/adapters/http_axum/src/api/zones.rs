//! JSON REST handlers for zones and what they contain.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smarthome_domain::appliance::{Appliance, ApplianceKind, ApplianceState};
use smarthome_domain::opening::Opening;
use smarthome_domain::zone::Zone;

use crate::error::{ApiError, parse_id};
use crate::state::{AppState, Backend};

/// Request body for installing an appliance. State defaults to off.
#[derive(Deserialize)]
pub struct CreateApplianceRequest {
    pub kind: String,
    pub state: Option<i32>,
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Zone>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the appliance endpoints of a zone.
pub enum AppliancesResponse {
    Ok(Json<Vec<Appliance>>),
    Created(Json<Appliance>),
}

impl IntoResponse for AppliancesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the openings endpoint.
pub enum OpeningsResponse {
    Ok(Json<Vec<Opening>>),
}

impl IntoResponse for OpeningsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/zones/:id`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError> {
    let zone_id = parse_id(&id, "zone")?;
    let zone = state.zone_service.get_zone(zone_id).await?;
    Ok(GetResponse::Ok(Json(zone)))
}

/// `DELETE /api/zones/:id`
///
/// Users standing in the zone end up outside.
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let zone_id = parse_id(&id, "zone")?;
    state.zone_service.delete_zone(zone_id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/zones/:id/appliances`
pub async fn list_appliances<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<AppliancesResponse, ApiError> {
    let zone_id = parse_id(&id, "zone")?;
    let appliances = state.appliance_service.list_appliances(zone_id).await?;
    Ok(AppliancesResponse::Ok(Json(appliances)))
}

/// `POST /api/zones/:id/appliances`
pub async fn create_appliance<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<CreateApplianceRequest>,
) -> Result<AppliancesResponse, ApiError> {
    let zone_id = parse_id(&id, "zone")?;
    let appliance = Appliance::new(
        zone_id,
        ApplianceKind::from(req.kind),
        req.state.map_or(ApplianceState::OFF, ApplianceState),
    );
    let created = state.appliance_service.create_appliance(appliance).await?;
    Ok(AppliancesResponse::Created(Json(created)))
}

/// `GET /api/zones/:id/openings`
pub async fn list_openings<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<OpeningsResponse, ApiError> {
    let zone_id = parse_id(&id, "zone")?;
    let openings = state.zone_service.list_openings(zone_id).await?;
    Ok(OpeningsResponse::Ok(Json(openings)))
}
