//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHomeError`] via `#[from]`. Policy refusals (occupied home,
//! triggered alarm) are not errors: they travel as
//! [`Denial`](crate::outcome::Denial)s inside an
//! [`Outcome`](crate::outcome::Outcome).

use crate::id::{ApplianceId, HomeId, ZoneId};

/// Top-level error for domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum SmartHomeError {
    /// Input violated a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A record addressed directly by the caller does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Stored records contradict each other.
    #[error("consistency violation")]
    Consistency(#[from] ConsistencyError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building or updating records.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("email address is invalid: {0}")]
    InvalidEmail(String),

    #[error("email address is already registered: {0}")]
    DuplicateEmail(String),

    #[error("timestamp is invalid: {0}")]
    InvalidTimestamp(String),

    #[error("identifier is invalid: {0}")]
    InvalidIdentifier(String),

    #[error("security level is invalid: {0}")]
    InvalidSecurityLevel(String),

    #[error("zone layout is invalid: {0}")]
    InvalidLayout(String),
}

/// A record addressed by id was not found.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Records that reference each other in a way the model forbids.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("zone {zone_id} does not belong to the user's home")]
    ZoneOutsideHome {
        zone_id: ZoneId,
        home_id: Option<HomeId>,
    },

    #[error("appliance {appliance_id} is not located in zone {zone_id}")]
    ApplianceOutsideZone {
        appliance_id: ApplianceId,
        zone_id: ZoneId,
    },

    #[error("home {0} referenced by a user does not exist")]
    DanglingHome(HomeId),
}
