//! Home service: use-cases for managing homes and their attributes.

use smarthome_domain::error::{NotFoundError, SmartHomeError};
use smarthome_domain::event::{Event, EventType};
use smarthome_domain::home::{Home, Occupancy, SecurityLevel};
use smarthome_domain::id::HomeId;
use smarthome_domain::outcome::Outcome;
use smarthome_domain::time::Timestamp;

use crate::alarm::AlarmStateMachine;
use crate::locks::HomeLocks;
use crate::ports::{EventPublisher, HomeRepository, UserRepository};

/// Partial update of a home. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeUpdate {
    pub temperature: Option<i32>,
    pub date: Option<Timestamp>,
    pub security_level: Option<SecurityLevel>,
    pub auto_mode: Option<bool>,
}

/// Application service for homes.
pub struct HomeService<HR, UR, P> {
    homes: HR,
    alarm: AlarmStateMachine<HR, UR, P>,
    publisher: P,
    locks: HomeLocks,
}

impl<HR, UR, P> HomeService<HR, UR, P>
where
    HR: HomeRepository + Clone,
    UR: UserRepository,
    P: EventPublisher + Clone,
{
    pub fn new(homes: HR, users: UR, publisher: P, locks: HomeLocks) -> Self {
        Self {
            alarm: AlarmStateMachine::new(homes.clone(), users, publisher.clone(), locks.clone()),
            homes,
            publisher,
            locks,
        }
    }

    /// The state machine guarding this service's security levels.
    pub fn alarm(&self) -> &AlarmStateMachine<HR, UR, P> {
        &self.alarm
    }

    /// Create a new home after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, home), fields(home_id = %home.id))]
    pub async fn create_home(&self, home: Home) -> Result<Home, SmartHomeError> {
        home.validate()?;
        let home = self.homes.create(home).await?;
        self.publisher
            .publish(Event::new(
                EventType::HomeCreated,
                Some(home.id),
                serde_json::json!({ "name": home.name }),
            ))
            .await?;
        Ok(home)
    }

    /// Look up a home by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no home with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_home(&self, id: HomeId) -> Result<Home, SmartHomeError> {
        self.homes.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Home",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all homes.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_homes(&self) -> Result<Vec<Home>, SmartHomeError> {
        self.homes.get_all().await
    }

    /// Whether anybody is inside one of the zones of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown home, or a
    /// storage error from the repositories.
    pub async fn occupancy(&self, id: HomeId) -> Result<Occupancy, SmartHomeError> {
        self.get_home(id).await?;
        self.alarm.occupancy().occupancy(id).await
    }

    /// Change the security level of a home.
    ///
    /// # Errors
    ///
    /// See [`AlarmStateMachine::set_security_level`].
    pub async fn set_security_level(
        &self,
        id: HomeId,
        level: SecurityLevel,
    ) -> Result<Outcome<Home>, SmartHomeError> {
        self.alarm.set_security_level(id, level).await
    }

    /// Apply several attribute changes at once.
    ///
    /// Temperature, date and automatic mode always apply. The security level
    /// goes through the arming gate; a refusal becomes a notice on an
    /// otherwise applied outcome. The home is written once.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown home, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn update_home(
        &self,
        id: HomeId,
        update: HomeUpdate,
    ) -> Result<Outcome<Home>, SmartHomeError> {
        let _guard = self.locks.lock(id).await;
        let mut home = self.get_home(id).await?;
        let mut notices = Vec::new();

        if let Some(temperature) = update.temperature {
            home.outside_temp = temperature;
        }
        if let Some(date) = update.date {
            home.date = date;
        }
        if let Some(auto_mode) = update.auto_mode {
            home.auto_mode = auto_mode;
        }
        let transition = match update.security_level {
            Some(requested) => match self.alarm.apply_security_level(&mut home, requested).await? {
                Ok(previous) => Some((previous, requested)),
                Err(denial) => {
                    notices.push(denial);
                    None
                }
            },
            None => None,
        };

        let home = self.homes.update(home).await?;
        if let Some((from, to)) = transition {
            self.alarm.announce_transition(id, from, to).await?;
        }
        Ok(Outcome::with_notices(home, notices))
    }

    /// Delete a home by id. Its zones, openings and appliances go with it;
    /// its users are left without a home.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no home with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_home(&self, id: HomeId) -> Result<(), SmartHomeError> {
        let _guard = self.locks.lock(id).await;
        if !self.homes.delete(id).await? {
            return Err(NotFoundError {
                entity: "Home",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
