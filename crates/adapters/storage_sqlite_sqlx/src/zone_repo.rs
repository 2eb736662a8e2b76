//! `SQLite` implementation of [`ZoneRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthome_app::ports::ZoneRepository;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::id::{HomeId, ZoneId};
use smarthome_domain::zone::Zone;

use crate::decode_err;
use crate::error::StorageError;

struct Wrapper(Zone);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Zone> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let home_id: String = row.try_get("home_id")?;
        let name: String = row.try_get("name")?;

        let id = ZoneId::from_str(&id).map_err(decode_err)?;
        let home_id = HomeId::from_str(&home_id).map_err(decode_err)?;

        Ok(Self(Zone { id, home_id, name }))
    }
}

const INSERT: &str = "INSERT INTO zones (id, home_id, name) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM zones WHERE id = ?";
const SELECT_BY_HOME: &str = "SELECT * FROM zones WHERE home_id = ? ORDER BY rowid";
const EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM zones WHERE id = ?)";
const UPDATE: &str = "UPDATE zones SET home_id = ?, name = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM zones WHERE id = ?";

/// `SQLite`-backed zone repository.
#[derive(Clone)]
pub struct SqliteZoneRepository {
    pool: SqlitePool,
}

impl SqliteZoneRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ZoneRepository for SqliteZoneRepository {
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(zone.id.to_string())
                .bind(zone.home_id.to_string())
                .bind(&zone.name)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(zone)
        }
    }

    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_home(
        &self,
        home_id: HomeId,
    ) -> impl Future<Output = Result<Vec<Zone>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_HOME)
                .bind(home_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn exists(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let found: bool = sqlx::query_scalar(EXISTS)
                .bind(id.to_string())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(found)
        }
    }

    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(zone.home_id.to_string())
                .bind(&zone.name)
                .bind(zone.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(zone)
        }
    }

    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
