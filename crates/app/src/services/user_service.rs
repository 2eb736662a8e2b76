//! User service: sign-up, profile changes and moves between zones.

use smarthome_domain::error::{NotFoundError, SmartHomeError, ValidationError};
use smarthome_domain::id::{HomeId, UserId};
use smarthome_domain::outcome::{Denial, Outcome};
use smarthome_domain::user::{Credential, User};
use smarthome_domain::zone::ZoneTarget;

use crate::locks::HomeLocks;
use crate::ports::{
    ApplianceRepository, EventPublisher, HomeRepository, UserRepository, ZoneRepository,
};
use crate::zone_automation::ZoneAutomationEngine;

/// Partial update of a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub home_id: Option<HomeId>,
    pub zone: Option<ZoneTarget>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub credential: Option<Credential>,
}

/// Application service for users.
pub struct UserService<HR, ZR, AR, UR, P> {
    homes: HR,
    users: UR,
    engine: ZoneAutomationEngine<HR, ZR, AR, UR, P>,
}

impl<HR, ZR, AR, UR, P> UserService<HR, ZR, AR, UR, P>
where
    HR: HomeRepository + Clone,
    ZR: ZoneRepository,
    AR: ApplianceRepository,
    UR: UserRepository + Clone,
    P: EventPublisher,
{
    pub fn new(
        homes: HR,
        zones: ZR,
        appliances: AR,
        users: UR,
        publisher: P,
        locks: HomeLocks,
    ) -> Self {
        Self {
            engine: ZoneAutomationEngine::new(
                homes.clone(),
                zones,
                appliances,
                users.clone(),
                publisher,
                locks,
            ),
            homes,
            users,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] if invariants fail or the
    /// email is already registered, or a storage error from the repository.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_user(&self, user: User) -> Result<User, SmartHomeError> {
        user.validate()?;
        self.ensure_email_free(&user.email, user.id).await?;
        self.users.create(user).await
    }

    /// Look up a user by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_user(&self, id: UserId) -> Result<User, SmartHomeError> {
        self.users.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_users(&self) -> Result<Vec<User>, SmartHomeError> {
        self.users.get_all().await
    }

    /// Move a user to a zone, or outside.
    ///
    /// # Errors
    ///
    /// See [`ZoneAutomationEngine::assign_user_to_zone`].
    pub async fn assign_user_to_zone(
        &self,
        id: UserId,
        target: ZoneTarget,
    ) -> Result<Outcome<User>, SmartHomeError> {
        self.engine.assign_user_to_zone(id, target).await
    }

    /// Apply several profile changes at once.
    ///
    /// The home is applied before the zone. Unknown home or zone ids are
    /// skipped and reported as notices. Changing home without naming a zone
    /// puts the user outside. A tripped alarm refuses the whole update.
    /// Profile fields are validated before the zone is entered so a
    /// rejected update switches no lights.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown user,
    /// [`SmartHomeError::Validation`] for an invalid or taken email,
    /// [`SmartHomeError::Consistency`] when the zone is not part of the
    /// user's home, or a storage error from the repositories.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Outcome<User>, SmartHomeError> {
        let mut notices = Vec::new();
        let mut destination = match update.home_id {
            Some(home_id) if self.homes.exists(home_id).await? => Some(home_id),
            Some(home_id) => {
                notices.push(Denial::UnknownHome(home_id));
                None
            }
            None => None,
        };
        // without a valid destination the user's current home is locked
        let (mut user, _guard) = loop {
            let (user, guard) = self.engine.lock_user(id, destination).await?;
            match destination {
                Some(home_id) if !self.homes.exists(home_id).await? => {
                    notices.push(Denial::UnknownHome(home_id));
                    destination = None;
                }
                _ => break (user, guard),
            }
        };
        let previous_zone = user.zone_id;

        if let Some(home_id) = destination
            && user.home_id != Some(home_id)
        {
            user.home_id = Some(home_id);
            user.zone_id = None;
        }

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            self.ensure_email_free(&email, user.id).await?;
            user.email = email;
        }
        if let Some(credential) = update.credential {
            user.credential = credential;
        }
        user.validate()?;

        if let Some(target) = update.zone {
            match self.engine.enter_zone(&mut user, target).await? {
                Ok(()) => {}
                Err(Denial::AlarmTriggered) => return Ok(Outcome::Denied(Denial::AlarmTriggered)),
                Err(denial) => notices.push(denial),
            }
        }

        let user = self.users.update(user).await?;
        self.engine.announce_move(&user, previous_zone).await?;
        Ok(Outcome::with_notices(user, notices))
    }

    /// Delete the account `id` on behalf of `caller`.
    ///
    /// Only the account owner or an administrator may do this.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when the caller or the target
    /// does not exist, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(
        &self,
        caller: UserId,
        id: UserId,
    ) -> Result<Outcome<()>, SmartHomeError> {
        let caller = self.get_user(caller).await?;
        if !caller.may_manage(id) {
            tracing::warn!(caller = %caller.id, target = %id, "user deletion refused");
            return Ok(Outcome::Denied(Denial::NotPermitted));
        }
        if !self.users.delete(id).await? {
            return Err(NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into());
        }
        Ok(Outcome::Applied(()))
    }

    async fn ensure_email_free(&self, email: &str, owner: UserId) -> Result<(), SmartHomeError> {
        match self.users.find_by_email(email).await? {
            Some(existing) if existing.id != owner => {
                Err(ValidationError::DuplicateEmail(email.to_string()).into())
            }
            _ => Ok(()),
        }
    }
}
