//! `SQLite` implementation of [`OpeningRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthome_app::ports::OpeningRepository;
use smarthome_domain::error::{SmartHomeError, ValidationError};
use smarthome_domain::id::{OpeningId, ZoneId};
use smarthome_domain::opening::{Opening, OpeningKind};

use crate::decode_err;
use crate::error::StorageError;

struct Wrapper(Opening);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Opening> {
        value.map(|w| w.0)
    }
}

fn parse_kind(kind: &str) -> Result<OpeningKind, ValidationError> {
    match kind {
        "door" => Ok(OpeningKind::Door),
        "window" => Ok(OpeningKind::Window),
        other => Err(ValidationError::InvalidIdentifier(format!(
            "opening kind {other}"
        ))),
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let zone_id: String = row.try_get("zone_id")?;
        let kind: String = row.try_get("kind")?;

        Ok(Self(Opening {
            id: OpeningId::from_str(&id).map_err(decode_err)?,
            zone_id: ZoneId::from_str(&zone_id).map_err(decode_err)?,
            kind: parse_kind(&kind).map_err(decode_err)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO openings (id, zone_id, kind) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM openings WHERE id = ?";
const SELECT_BY_ZONE: &str = "SELECT * FROM openings WHERE zone_id = ? ORDER BY rowid";
const DELETE_BY_ID: &str = "DELETE FROM openings WHERE id = ?";

/// `SQLite`-backed opening repository.
#[derive(Clone)]
pub struct SqliteOpeningRepository {
    pool: SqlitePool,
}

impl SqliteOpeningRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl OpeningRepository for SqliteOpeningRepository {
    fn create(
        &self,
        opening: Opening,
    ) -> impl Future<Output = Result<Opening, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(opening.id.to_string())
                .bind(opening.zone_id.to_string())
                .bind(opening.kind.as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(opening)
        }
    }

    fn get_by_id(
        &self,
        id: OpeningId,
    ) -> impl Future<Output = Result<Option<Opening>, SmartHomeError>> + Send {
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
    ) -> impl Future<Output = Result<Vec<Opening>, SmartHomeError>> + Send {
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

    fn delete(&self, id: OpeningId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
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
