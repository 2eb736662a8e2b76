//! # smarthome-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `smarthome-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Deleting a home or zone cascades to its zones, openings and appliances;
//! users referencing it are left without a home or put outside.
//!
//! ## Dependency rule
//! Depends on `smarthome-app` (for port traits) and `smarthome-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod appliance_repo;
mod error;
mod home_repo;
mod opening_repo;
mod pool;
mod user_repo;
mod zone_repo;

pub use appliance_repo::SqliteApplianceRepository;
pub use error::StorageError;
pub use home_repo::SqliteHomeRepository;
pub use opening_repo::SqliteOpeningRepository;
pub use pool::{Config, Database};
pub use user_repo::SqliteUserRepository;
pub use zone_repo::SqliteZoneRepository;

/// Map a stored value that fails to parse into a row decoding error.
fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}
