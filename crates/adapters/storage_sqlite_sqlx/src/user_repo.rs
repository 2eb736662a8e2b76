//! `SQLite` implementation of [`UserRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthome_app::ports::UserRepository;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::id::{HomeId, UserId, ZoneId};
use smarthome_domain::user::{Credential, Role, User};

use crate::decode_err;
use crate::error::StorageError;

struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let email: String = row.try_get("email")?;
        let credential: String = row.try_get("credential")?;
        let role: String = row.try_get("role")?;
        let home_id: Option<String> = row.try_get("home_id")?;
        let zone_id: Option<String> = row.try_get("zone_id")?;

        Ok(Self(User {
            id: UserId::from_str(&id).map_err(decode_err)?,
            name,
            email,
            credential: Credential::from_hash(credential),
            role: Role::from_str(&role).map_err(decode_err)?,
            home_id: home_id
                .as_deref()
                .map(HomeId::from_str)
                .transpose()
                .map_err(decode_err)?,
            zone_id: zone_id
                .as_deref()
                .map(ZoneId::from_str)
                .transpose()
                .map_err(decode_err)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, name, email, credential, role, home_id, zone_id)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY rowid";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";

const UPDATE: &str = r"
    UPDATE users
    SET name = ?, email = ?, credential = ?, role = ?, home_id = ?, zone_id = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(user.id.to_string())
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.credential.as_str())
                .bind(user.role.as_str())
                .bind(user.home_id.map(|id| id.to_string()))
                .bind(user.zone_id.map(|id| id.to_string()))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(user)
        }
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        let email = email.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.credential.as_str())
                .bind(user.role.as_str())
                .bind(user.home_id.map(|id| id.to_string()))
                .bind(user.zone_id.map(|id| id.to_string()))
                .bind(user.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(user)
        }
    }

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::home_repo::SqliteHomeRepository;
    use crate::pool::Config;
    use crate::zone_repo::SqliteZoneRepository;
    use smarthome_app::ports::{HomeRepository, ZoneRepository};
    use smarthome_domain::home::Home;
    use smarthome_domain::zone::Zone;

    struct Fixture {
        homes: SqliteHomeRepository,
        zones: SqliteZoneRepository,
        users: SqliteUserRepository,
    }

    async fn setup() -> Fixture {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        Fixture {
            homes: SqliteHomeRepository::new(db.pool().clone()),
            zones: SqliteZoneRepository::new(db.pool().clone()),
            users: SqliteUserRepository::new(db.pool().clone()),
        }
    }

    fn alice() -> User {
        User::builder()
            .name("Alice")
            .email("alice@example.com")
            .credential(Credential::from_hash("$argon2id$v=19$stub"))
            .role(Role::Parent)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_user_with_credential() {
        let fx = setup().await;
        let user = alice();
        fx.users.create(user.clone()).await.unwrap();

        let fetched = fx.users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched, user);
        assert_eq!(fetched.credential.as_str(), "$argon2id$v=19$stub");
    }

    #[tokio::test]
    async fn should_find_user_by_email_ignoring_case() {
        let fx = setup().await;
        let user = alice();
        fx.users.create(user.clone()).await.unwrap();

        let found = fx.users.find_by_email("ALICE@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(fx.users.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_refuse_second_account_with_same_email() {
        let fx = setup().await;
        fx.users.create(alice()).await.unwrap();
        let result = fx.users.create(alice()).await;
        assert!(matches!(result, Err(SmartHomeError::Storage(_))));
    }

    #[tokio::test]
    async fn should_store_placement_and_clear_it_when_home_is_deleted() {
        let fx = setup().await;
        let home = fx
            .homes
            .create(Home::builder().name("H1").build().unwrap())
            .await
            .unwrap();
        let zone = fx
            .zones
            .create(Zone::builder().home_id(home.id).name("Kitchen").build().unwrap())
            .await
            .unwrap();
        let mut user = alice();
        fx.users.create(user.clone()).await.unwrap();

        user.home_id = Some(home.id);
        user.zone_id = Some(zone.id);
        fx.users.update(user.clone()).await.unwrap();
        let placed = fx.users.get_by_id(user.id).await.unwrap().unwrap();
        assert!(placed.is_present_in(home.id));

        fx.homes.delete(home.id).await.unwrap();
        let orphan = fx.users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(orphan.home_id, None);
        assert_eq!(orphan.zone_id, None);
    }

    #[tokio::test]
    async fn should_list_and_delete_users() {
        let fx = setup().await;
        let user = alice();
        fx.users.create(user.clone()).await.unwrap();

        assert_eq!(fx.users.get_all().await.unwrap().len(), 1);
        assert!(fx.users.delete(user.id).await.unwrap());
        assert!(fx.users.get_all().await.unwrap().is_empty());
    }
}
