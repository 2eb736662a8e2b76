use std::sync::Arc;

use smarthome_adapter_storage_sqlite_sqlx::{
    Config, SqliteApplianceRepository, SqliteHomeRepository, SqliteOpeningRepository,
    SqliteUserRepository, SqliteZoneRepository,
};
use smarthome_app::event_bus::InProcessEventBus;

use crate::state::AppState;

pub(crate) type SqliteBackend = (
    SqliteHomeRepository,
    SqliteZoneRepository,
    SqliteOpeningRepository,
    SqliteApplianceRepository,
    SqliteUserRepository,
);

pub(crate) async fn sqlite_state() -> AppState<SqliteBackend> {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap();
    let pool = db.pool().clone();
    AppState::<SqliteBackend>::new(
        SqliteHomeRepository::new(pool.clone()),
        SqliteZoneRepository::new(pool.clone()),
        SqliteOpeningRepository::new(pool.clone()),
        SqliteApplianceRepository::new(pool.clone()),
        SqliteUserRepository::new(pool),
        Arc::new(InProcessEventBus::new(64)),
    )
}
