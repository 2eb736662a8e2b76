//! Appliance service: manual appliance management.

use smarthome_domain::appliance::{Appliance, ApplianceState};
use smarthome_domain::error::{NotFoundError, SmartHomeError};
use smarthome_domain::event::{Event, EventType};
use smarthome_domain::id::{ApplianceId, ZoneId};

use crate::ports::{ApplianceRepository, EventPublisher, ZoneRepository};

/// Application service for appliances.
pub struct ApplianceService<ZR, AR, P> {
    zones: ZR,
    appliances: AR,
    publisher: P,
}

impl<ZR, AR, P> ApplianceService<ZR, AR, P>
where
    ZR: ZoneRepository,
    AR: ApplianceRepository,
    P: EventPublisher,
{
    pub fn new(zones: ZR, appliances: AR, publisher: P) -> Self {
        Self {
            zones,
            appliances,
            publisher,
        }
    }

    /// Install an appliance in an existing zone.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown zone, or a
    /// storage error from the repositories.
    pub async fn create_appliance(&self, appliance: Appliance) -> Result<Appliance, SmartHomeError> {
        self.ensure_zone(appliance.zone_id).await?;
        self.appliances.create(appliance).await
    }

    /// Look up an appliance by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no appliance with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_appliance(&self, id: ApplianceId) -> Result<Appliance, SmartHomeError> {
        self.appliances.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Appliance",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Appliances installed in `zone_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown zone, or a
    /// storage error from the repositories.
    pub async fn list_appliances(&self, zone_id: ZoneId) -> Result<Vec<Appliance>, SmartHomeError> {
        self.ensure_zone(zone_id).await?;
        self.appliances.find_by_zone(zone_id).await
    }

    /// Set an appliance state by hand.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown appliance, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set_state(
        &self,
        id: ApplianceId,
        state: ApplianceState,
    ) -> Result<Appliance, SmartHomeError> {
        let mut appliance = self.get_appliance(id).await?;
        if appliance.state == state {
            return Ok(appliance);
        }
        appliance.state = state;
        let appliance = self.appliances.update(appliance).await?;
        self.publisher
            .publish(Event::new(
                EventType::ApplianceStateChanged,
                None,
                serde_json::json!({
                    "appliance_id": appliance.id,
                    "zone_id": appliance.zone_id,
                    "state": appliance.state,
                    "automatic": false,
                }),
            ))
            .await?;
        Ok(appliance)
    }

    /// Remove an appliance.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no appliance with `id`
    /// exists, or a storage error from the repository.
    pub async fn delete_appliance(&self, id: ApplianceId) -> Result<(), SmartHomeError> {
        if !self.appliances.delete(id).await? {
            return Err(NotFoundError {
                entity: "Appliance",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn ensure_zone(&self, zone_id: ZoneId) -> Result<(), SmartHomeError> {
        if self.zones.exists(zone_id).await? {
            Ok(())
        } else {
            Err(NotFoundError {
                entity: "Zone",
                id: zone_id.to_string(),
            }
            .into())
        }
    }
}
