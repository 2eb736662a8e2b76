//! `SQLite` implementation of [`HomeRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthome_app::ports::HomeRepository;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::home::{Home, SecurityLevel};
use smarthome_domain::id::HomeId;

use crate::decode_err;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Home);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Home> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let outside_temp: i32 = row.try_get("outside_temp")?;
        let date: String = row.try_get("date")?;
        let security_level: String = row.try_get("security_level")?;
        let auto_mode: bool = row.try_get("auto_mode")?;

        let id = HomeId::from_str(&id).map_err(decode_err)?;
        let date = chrono::DateTime::parse_from_rfc3339(&date)
            .map_err(decode_err)?
            .to_utc();
        let security_level = SecurityLevel::from_str(&security_level).map_err(decode_err)?;

        Home::builder()
            .id(id)
            .name(name)
            .outside_temp(outside_temp)
            .date(date)
            .security_level(security_level)
            .auto_mode(auto_mode)
            .build()
            .map(Self)
            .map_err(decode_err)
    }
}

const INSERT: &str = r"
    INSERT INTO homes (id, name, outside_temp, date, security_level, auto_mode)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM homes WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM homes ORDER BY name";
const EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM homes WHERE id = ?)";

const UPDATE: &str = r"
    UPDATE homes
    SET name = ?, outside_temp = ?, date = ?, security_level = ?, auto_mode = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM homes WHERE id = ?";

/// `SQLite`-backed home repository.
#[derive(Clone)]
pub struct SqliteHomeRepository {
    pool: SqlitePool,
}

impl SqliteHomeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HomeRepository for SqliteHomeRepository {
    fn create(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(home.id.to_string())
                .bind(&home.name)
                .bind(home.outside_temp)
                .bind(home.date.to_rfc3339())
                .bind(home.security_level().as_str())
                .bind(home.auto_mode)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(home)
        }
    }

    fn get_by_id(
        &self,
        id: HomeId,
    ) -> impl Future<Output = Result<Option<Home>, SmartHomeError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<Home>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn exists(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
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

    fn update(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&home.name)
                .bind(home.outside_temp)
                .bind(home.date.to_rfc3339())
                .bind(home.security_level().as_str())
                .bind(home.auto_mode)
                .bind(home.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(home)
        }
    }

    fn delete(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
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
