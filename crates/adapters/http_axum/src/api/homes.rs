//! JSON REST handlers for homes, their zones and their layout.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use smarthome_app::services::home_service::HomeUpdate;
use smarthome_domain::home::{Home, Occupancy, SecurityLevel};
use smarthome_domain::id::HomeId;
use smarthome_domain::layout::{ImportedLayout, parse_layout};
use smarthome_domain::time::parse_timestamp;
use smarthome_domain::zone::Zone;

use crate::error::{ApiError, OutcomeResponse, parse_id};
use crate::state::{AppState, Backend};

/// Request body for creating a home.
#[derive(Deserialize)]
pub struct CreateHomeRequest {
    pub name: String,
}

/// Request body for updating home attributes. Absent fields are untouched.
#[derive(Deserialize)]
pub struct UpdateHomeRequest {
    pub temperature: Option<i32>,
    pub date: Option<String>,
    pub security_level: Option<String>,
    pub auto_mode: Option<bool>,
}

/// Request body for changing the security level.
#[derive(Deserialize)]
pub struct SecurityRequest {
    pub level: String,
}

/// Request body for creating a zone.
#[derive(Deserialize)]
pub struct CreateZoneRequest {
    pub name: String,
}

/// Occupancy report of a home.
#[derive(Serialize)]
pub struct OccupancyBody {
    pub home_id: HomeId,
    pub occupied: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Home>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Home>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Home>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
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

/// Possible responses from the occupancy endpoint.
pub enum OccupancyResponse {
    Ok(Json<OccupancyBody>),
}

impl IntoResponse for OccupancyResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the zone endpoints of a home.
pub enum ZonesResponse {
    Ok(Json<Vec<Zone>>),
    Created(Json<Zone>),
}

impl IntoResponse for ZonesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the layout import endpoint.
pub enum LayoutResponse {
    Created(Json<ImportedLayout>),
    UnsupportedMediaType(String),
}

#[derive(Serialize)]
struct LayoutRejection {
    error: String,
}

impl IntoResponse for LayoutResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::UnsupportedMediaType(error) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(LayoutRejection { error }),
            )
                .into_response(),
        }
    }
}

/// `GET /api/homes`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ListResponse, ApiError> {
    let homes = state.home_service.list_homes().await?;
    Ok(ListResponse::Ok(Json(homes)))
}

/// `GET /api/homes/:id`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError> {
    let home_id = parse_id(&id, "home")?;
    let home = state.home_service.get_home(home_id).await?;
    Ok(GetResponse::Ok(Json(home)))
}

/// `POST /api/homes`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CreateHomeRequest>,
) -> Result<CreateResponse, ApiError> {
    let home = Home::builder().name(req.name).build()?;
    let created = state.home_service.create_home(home).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/homes/:id`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateHomeRequest>,
) -> Result<OutcomeResponse<Home>, ApiError> {
    let home_id = parse_id(&id, "home")?;
    let update = HomeUpdate {
        temperature: req.temperature,
        date: req.date.as_deref().map(parse_timestamp).transpose()?,
        security_level: req
            .security_level
            .as_deref()
            .map(str::parse::<SecurityLevel>)
            .transpose()?,
        auto_mode: req.auto_mode,
    };
    let outcome = state.home_service.update_home(home_id, update).await?;
    Ok(OutcomeResponse(outcome))
}

/// `DELETE /api/homes/:id`
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let home_id = parse_id(&id, "home")?;
    state.home_service.delete_home(home_id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/homes/:id/security`
pub async fn set_security<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<SecurityRequest>,
) -> Result<OutcomeResponse<Home>, ApiError> {
    let home_id = parse_id(&id, "home")?;
    let level: SecurityLevel = req.level.parse()?;
    let outcome = state.home_service.set_security_level(home_id, level).await?;
    Ok(OutcomeResponse(outcome))
}

/// `GET /api/homes/:id/occupancy`
pub async fn occupancy<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<OccupancyResponse, ApiError> {
    let home_id = parse_id(&id, "home")?;
    let occupancy = state.home_service.occupancy(home_id).await?;
    Ok(OccupancyResponse::Ok(Json(OccupancyBody {
        home_id,
        occupied: occupancy == Occupancy::Occupied,
    })))
}

/// `GET /api/homes/:id/zones`
pub async fn list_zones<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<ZonesResponse, ApiError> {
    let home_id = parse_id(&id, "home")?;
    let zones = state.zone_service.list_zones(home_id).await?;
    Ok(ZonesResponse::Ok(Json(zones)))
}

/// `POST /api/homes/:id/zones`
pub async fn create_zone<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<CreateZoneRequest>,
) -> Result<ZonesResponse, ApiError> {
    let home_id = parse_id(&id, "home")?;
    let zone = Zone::builder().home_id(home_id).name(req.name).build()?;
    let created = state.zone_service.create_zone(zone).await?;
    Ok(ZonesResponse::Created(Json(created)))
}

/// `POST /api/homes/:id/layout`
///
/// Takes the raw layout document. Anything not labelled as JSON is turned
/// away before parsing.
pub async fn import_layout<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<LayoutResponse, ApiError> {
    let home_id: HomeId = parse_id(&id, "home")?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("none");
    if !is_json(content_type) {
        tracing::warn!(%home_id, content_type, "layout upload refused");
        return Ok(LayoutResponse::UnsupportedMediaType(format!(
            "File supplied is not a JSON text file. File type supplied: {content_type}"
        )));
    }

    let layout = parse_layout(&body)?;
    let imported = state.zone_service.import_layout(home_id, layout).await?;
    Ok(LayoutResponse::Created(Json(imported)))
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
