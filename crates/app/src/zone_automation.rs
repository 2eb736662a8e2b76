//! Zone automation engine: what happens when a user walks into a zone.
//!
//! Entering a zone of an armed home trips the alarm and is refused. In a
//! home running in automatic mode, entering a zone switches its lights on.
//! Only lights of the entered zone are touched, and only when they are off.

use smarthome_domain::appliance::Appliance;
use smarthome_domain::error::{ConsistencyError, NotFoundError, SmartHomeError};
use smarthome_domain::event::{Event, EventType};
use smarthome_domain::home::Home;
use smarthome_domain::id::{HomeId, UserId, ZoneId};
use smarthome_domain::outcome::{Denial, Outcome};
use smarthome_domain::user::User;
use smarthome_domain::zone::ZoneTarget;

use crate::locks::{HomeGuard, HomeLocks};
use crate::ports::{
    ApplianceRepository, EventPublisher, HomeRepository, UserRepository, ZoneRepository,
};

pub struct ZoneAutomationEngine<HR, ZR, AR, UR, P> {
    homes: HR,
    zones: ZR,
    appliances: AR,
    users: UR,
    publisher: P,
    locks: HomeLocks,
}

impl<HR, ZR, AR, UR, P> ZoneAutomationEngine<HR, ZR, AR, UR, P>
where
    HR: HomeRepository,
    ZR: ZoneRepository,
    AR: ApplianceRepository,
    UR: UserRepository,
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
            homes,
            zones,
            appliances,
            users,
            publisher,
            locks,
        }
    }

    /// Move a user to `target` and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown user,
    /// [`SmartHomeError::Consistency`] when the zone is not part of the
    /// user's home, or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn assign_user_to_zone(
        &self,
        user_id: UserId,
        target: ZoneTarget,
    ) -> Result<Outcome<User>, SmartHomeError> {
        let (mut user, _guard) = self.lock_user(user_id, None).await?;
        let previous = user.zone_id;

        if let Err(denial) = self.enter_zone(&mut user, target).await? {
            return Ok(Outcome::Denied(denial));
        }

        let user = self.users.update(user).await?;
        self.announce_move(&user, previous).await?;
        Ok(Outcome::Applied(user))
    }

    /// Load `user_id` while holding the lock of the home it will act in.
    ///
    /// With `destination` set, that home is locked. Otherwise the user's
    /// current home is, re-reading until the locked home still matches.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown user, or a
    /// storage error from the repository.
    pub async fn lock_user(
        &self,
        user_id: UserId,
        destination: Option<HomeId>,
    ) -> Result<(User, Option<HomeGuard>), SmartHomeError> {
        if destination.is_some() {
            let guard = self.locks.lock_optional(destination).await;
            return Ok((self.load_user(user_id).await?, guard));
        }

        let mut home_id = self.load_user(user_id).await?.home_id;
        loop {
            let guard = self.locks.lock_optional(home_id).await;
            let user = self.load_user(user_id).await?;
            if user.home_id == home_id {
                return Ok((user, guard));
            }
            home_id = user.home_id;
        }
    }

    /// Apply the entry rules to an already loaded user without persisting
    /// the user.
    ///
    /// Lights switched on by the automation are persisted right away. The
    /// caller must hold the lock of the user's home.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Consistency`] when the zone belongs to
    /// another home (or the user has none), when the home record is
    /// missing, or when the store hands back an appliance of another zone.
    pub async fn enter_zone(
        &self,
        user: &mut User,
        target: ZoneTarget,
    ) -> Result<Result<(), Denial>, SmartHomeError> {
        let Some(zone_id) = target.zone_id() else {
            user.zone_id = None;
            return Ok(Ok(()));
        };

        let Some(zone) = self.zones.get_by_id(zone_id).await? else {
            return Ok(Err(Denial::UnknownZone(zone_id)));
        };
        if user.home_id != Some(zone.home_id) {
            return Err(ConsistencyError::ZoneOutsideHome {
                zone_id,
                home_id: user.home_id,
            }
            .into());
        }
        let home = self.load_home(zone.home_id).await?;

        if let Err(denial) = home.admits(target) {
            tracing::warn!(home_id = %home.id, user_id = %user.id, %zone_id, "alarm triggered");
            self.publisher
                .publish(Event::new(
                    EventType::AlarmTriggered,
                    Some(home.id),
                    serde_json::json!({
                        "user_id": user.id,
                        "zone_id": zone_id,
                        "security_level": home.security_level(),
                    }),
                ))
                .await?;
            return Ok(Err(denial));
        }

        user.zone_id = Some(zone_id);
        if home.auto_mode {
            self.light_up_zone(&home, zone_id).await?;
        }
        Ok(Ok(()))
    }

    /// Publish a `UserMoved` event when the zone actually changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the publisher fails.
    pub async fn announce_move(
        &self,
        user: &User,
        previous: Option<ZoneId>,
    ) -> Result<(), SmartHomeError> {
        if user.zone_id == previous {
            return Ok(());
        }
        self.publisher
            .publish(Event::new(
                EventType::UserMoved,
                user.home_id,
                serde_json::json!({
                    "user_id": user.id,
                    "from": ZoneTarget::from(previous),
                    "to": ZoneTarget::from(user.zone_id),
                }),
            ))
            .await
    }

    async fn light_up_zone(&self, home: &Home, zone_id: ZoneId) -> Result<usize, SmartHomeError> {
        let appliances = self.appliances.find_by_zone(zone_id).await?;
        if let Some(stray) = appliances.iter().find(|a| a.zone_id != zone_id) {
            return Err(ConsistencyError::ApplianceOutsideZone {
                appliance_id: stray.id,
                zone_id,
            }
            .into());
        }

        let mut switched = 0;
        for mut appliance in appliances {
            if appliance.light_up() {
                let appliance = self.appliances.update(appliance).await?;
                self.announce_switch(home, &appliance).await?;
                switched += 1;
            }
        }
        if switched > 0 {
            tracing::info!(home_id = %home.id, %zone_id, switched, "lights switched on");
        }
        Ok(switched)
    }

    async fn announce_switch(&self, home: &Home, appliance: &Appliance) -> Result<(), SmartHomeError> {
        self.publisher
            .publish(Event::new(
                EventType::ApplianceStateChanged,
                Some(home.id),
                serde_json::json!({
                    "appliance_id": appliance.id,
                    "zone_id": appliance.zone_id,
                    "state": appliance.state,
                    "automatic": true,
                }),
            ))
            .await
    }

    async fn load_user(&self, user_id: UserId) -> Result<User, SmartHomeError> {
        self.users.get_by_id(user_id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: user_id.to_string(),
            }
            .into()
        })
    }

    async fn load_home(&self, home_id: HomeId) -> Result<Home, SmartHomeError> {
        self.homes
            .get_by_id(home_id)
            .await?
            .ok_or_else(|| ConsistencyError::DanglingHome(home_id).into())
    }
}
