//! `SQLite` implementation of [`ApplianceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthome_app::ports::ApplianceRepository;
use smarthome_domain::appliance::{Appliance, ApplianceKind, ApplianceState};
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::id::{ApplianceId, ZoneId};

use crate::decode_err;
use crate::error::StorageError;

struct Wrapper(Appliance);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Appliance> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let zone_id: String = row.try_get("zone_id")?;
        let kind: String = row.try_get("kind")?;
        let state: i32 = row.try_get("state")?;

        Ok(Self(Appliance {
            id: ApplianceId::from_str(&id).map_err(decode_err)?,
            zone_id: ZoneId::from_str(&zone_id).map_err(decode_err)?,
            kind: ApplianceKind::from(kind),
            state: ApplianceState(state),
        }))
    }
}

const INSERT: &str = "INSERT INTO appliances (id, zone_id, kind, state) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM appliances WHERE id = ?";
const SELECT_BY_ZONE: &str = "SELECT * FROM appliances WHERE zone_id = ? ORDER BY rowid";
const UPDATE: &str = "UPDATE appliances SET zone_id = ?, kind = ?, state = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM appliances WHERE id = ?";

/// `SQLite`-backed appliance repository.
#[derive(Clone)]
pub struct SqliteApplianceRepository {
    pool: SqlitePool,
}

impl SqliteApplianceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ApplianceRepository for SqliteApplianceRepository {
    fn create(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(appliance.id.to_string())
                .bind(appliance.zone_id.to_string())
                .bind(appliance.kind.as_str())
                .bind(appliance.state.0)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(appliance)
        }
    }

    fn get_by_id(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<Option<Appliance>, SmartHomeError>> + Send {
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

    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Appliance>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ZONE)
                .bind(zone_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(appliance.zone_id.to_string())
                .bind(appliance.kind.as_str())
                .bind(appliance.state.0)
                .bind(appliance.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(appliance)
        }
    }

    fn delete(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
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
