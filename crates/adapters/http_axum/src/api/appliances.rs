//! JSON REST handlers for manual appliance control.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smarthome_domain::appliance::{Appliance, ApplianceState};

use crate::error::{ApiError, parse_id};
use crate::state::{AppState, Backend};

/// Request body for updating an appliance state.
#[derive(Deserialize)]
pub struct UpdateStateRequest {
    pub state: i32,
}

/// Possible responses from the state endpoint.
pub enum UpdateStateResponse {
    Ok(Json<Appliance>),
}

impl IntoResponse for UpdateStateResponse {
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

/// `PUT /api/appliances/:id/state`
pub async fn update_state<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStateRequest>,
) -> Result<UpdateStateResponse, ApiError> {
    let appliance_id = parse_id(&id, "appliance")?;
    let updated = state
        .appliance_service
        .set_state(appliance_id, ApplianceState(req.state))
        .await?;
    Ok(UpdateStateResponse::Ok(Json(updated)))
}

/// `DELETE /api/appliances/:id`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let appliance_id = parse_id(&id, "appliance")?;
    state.appliance_service.delete_appliance(appliance_id).await?;
    Ok(DeleteResponse::NoContent)
}
