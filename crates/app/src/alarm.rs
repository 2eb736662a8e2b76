//! Alarm state machine: security level transitions gated by occupancy.
//!
//! ```text
//!             arm (vacant only)
//! Disarmed ───────────────────▶ ArmedStay / ArmedAway
//!    ▲                                   │
//!    └──────────── disarm (always) ──────┘
//! ```
//!
//! A denied request leaves the level untouched. Entering a zone of an
//! armed home is refused by the
//! [`ZoneAutomationEngine`](crate::zone_automation::ZoneAutomationEngine);
//! it never changes the level.

use smarthome_domain::error::{NotFoundError, SmartHomeError};
use smarthome_domain::event::{Event, EventType};
use smarthome_domain::home::{Home, Occupancy, SecurityLevel};
use smarthome_domain::id::HomeId;
use smarthome_domain::outcome::{Denial, Outcome};

use crate::locks::HomeLocks;
use crate::occupancy::OccupancyTracker;
use crate::ports::{EventPublisher, HomeRepository, UserRepository};

pub struct AlarmStateMachine<HR, UR, P> {
    homes: HR,
    occupancy: OccupancyTracker<UR>,
    publisher: P,
    locks: HomeLocks,
}

impl<HR, UR, P> AlarmStateMachine<HR, UR, P>
where
    HR: HomeRepository,
    UR: UserRepository,
    P: EventPublisher,
{
    pub fn new(homes: HR, users: UR, publisher: P, locks: HomeLocks) -> Self {
        Self {
            homes,
            occupancy: OccupancyTracker::new(users),
            publisher,
            locks,
        }
    }

    pub fn occupancy(&self) -> &OccupancyTracker<UR> {
        &self.occupancy
    }

    /// Request a new security level for `home_id` and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown home, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn set_security_level(
        &self,
        home_id: HomeId,
        requested: SecurityLevel,
    ) -> Result<Outcome<Home>, SmartHomeError> {
        let _guard = self.locks.lock(home_id).await;

        let mut home = self.homes.get_by_id(home_id).await?.ok_or_else(|| {
            SmartHomeError::from(NotFoundError {
                entity: "Home",
                id: home_id.to_string(),
            })
        })?;

        match self.apply_security_level(&mut home, requested).await? {
            Ok(previous) => {
                let home = self.homes.update(home).await?;
                self.announce_transition(home_id, previous, requested)
                    .await?;
                Ok(Outcome::Applied(home))
            }
            Err(denial) => Ok(Outcome::Denied(denial)),
        }
    }

    /// Run the arming gate on an already loaded home without persisting it.
    ///
    /// The caller must hold the lock of `home.id` until the home is written
    /// back, then call [`announce_transition`](Self::announce_transition).
    /// Returns the previous level on success.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the occupancy scan or the publisher.
    pub async fn apply_security_level(
        &self,
        home: &mut Home,
        requested: SecurityLevel,
    ) -> Result<Result<SecurityLevel, Denial>, SmartHomeError> {
        let occupancy = if requested.is_armed() {
            self.occupancy.occupancy(home.id).await?
        } else {
            Occupancy::Vacant
        };

        match home.request_security_level(requested, occupancy) {
            Ok(previous) => Ok(Ok(previous)),
            Err(denial) => {
                tracing::warn!(home_id = %home.id, %requested, "arming refused, home is occupied");
                self.publisher
                    .publish(Event::new(
                        EventType::ArmingDenied,
                        Some(home.id),
                        serde_json::json!({
                            "requested": requested,
                            "current": home.security_level(),
                        }),
                    ))
                    .await?;
                Ok(Err(denial))
            }
        }
    }

    /// Publish a persisted level change. Does nothing when the level stayed
    /// the same.
    ///
    /// # Errors
    ///
    /// Returns an error if the publisher fails.
    pub async fn announce_transition(
        &self,
        home_id: HomeId,
        from: SecurityLevel,
        to: SecurityLevel,
    ) -> Result<(), SmartHomeError> {
        if from == to {
            return Ok(());
        }
        tracing::info!(%home_id, %from, %to, "security level changed");
        self.publisher
            .publish(Event::new(
                EventType::SecurityLevelChanged,
                Some(home_id),
                serde_json::json!({ "from": from, "to": to }),
            ))
            .await
    }
}
