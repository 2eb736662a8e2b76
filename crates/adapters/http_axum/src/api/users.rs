//! JSON REST handlers for users and their whereabouts.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smarthome_app::services::user_service::UserUpdate;
use smarthome_domain::error::ValidationError;
use smarthome_domain::id::UserId;
use smarthome_domain::user::{Role, User};
use smarthome_domain::zone::ZoneTarget;

use crate::credentials::hash_password;
use crate::error::{ApiError, OutcomeResponse, parse_id};
use crate::state::{AppState, Backend};

/// Header naming the user on whose behalf a request is made.
pub const CALLER_HEADER: &str = "x-user-id";

/// Request body for signing up.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_parent: bool,
    #[serde(default)]
    pub is_child: bool,
    /// Guests sign up as plain users.
    #[serde(default)]
    pub is_guest: bool,
}

/// Request body for profile changes. Absent fields are untouched.
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub home_id: Option<String>,
    pub zone_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for moving a user. `outside` or `0` leaves the home.
#[derive(Deserialize)]
pub struct MoveRequest {
    pub zone_id: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<User>>),
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
    Ok(Json<User>),
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
    Created(Json<User>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/users`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
) -> Result<ListResponse, ApiError> {
    let users = state.user_service.list_users().await?;
    Ok(ListResponse::Ok(Json(users)))
}

/// `GET /api/users/:id`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError> {
    let user_id = parse_id(&id, "user")?;
    let user = state.user_service.get_user(user_id).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `POST /api/users`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<CreateResponse, ApiError> {
    let user = User::builder()
        .name(req.name)
        .email(req.email)
        .credential(hash_password(&req.password)?)
        .role(Role::from_flags(req.is_parent, req.is_child))
        .build()?;
    let created = state.user_service.create_user(user).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/users/:id`
pub async fn update<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<OutcomeResponse<User>, ApiError> {
    let user_id = parse_id(&id, "user")?;
    let update = UserUpdate {
        home_id: req
            .home_id
            .as_deref()
            .map(|raw| parse_id(raw, "home"))
            .transpose()?,
        zone: req
            .zone_id
            .as_deref()
            .map(str::parse::<ZoneTarget>)
            .transpose()?,
        name: req.name,
        email: req.email,
        credential: req.password.as_deref().map(hash_password).transpose()?,
    };
    let outcome = state.user_service.update_user(user_id, update).await?;
    Ok(OutcomeResponse(outcome))
}

/// `PUT /api/users/:id/zone`
pub async fn move_to_zone<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<OutcomeResponse<User>, ApiError> {
    let user_id = parse_id(&id, "user")?;
    let target: ZoneTarget = req.zone_id.parse()?;
    let outcome = state
        .user_service
        .assign_user_to_zone(user_id, target)
        .await?;
    Ok(OutcomeResponse(outcome))
}

/// `DELETE /api/users/:id`
///
/// The caller is named by the `x-user-id` header.
pub async fn delete<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<OutcomeResponse<()>, ApiError> {
    let user_id = parse_id(&id, "user")?;
    let caller = caller(&headers)?;
    let outcome = state.user_service.delete_user(caller, user_id).await?;
    Ok(OutcomeResponse(outcome))
}

fn caller(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ValidationError::InvalidIdentifier(format!("missing {CALLER_HEADER}")))?;
    parse_id(raw, "caller")
}
