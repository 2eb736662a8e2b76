//! Zone service: zones of a home, their openings, and layout import.

use smarthome_domain::error::{NotFoundError, SmartHomeError};
use smarthome_domain::event::{Event, EventType};
use smarthome_domain::id::{HomeId, ZoneId};
use smarthome_domain::layout::{ImportedLayout, ZoneLayout};
use smarthome_domain::opening::Opening;
use smarthome_domain::zone::Zone;

use crate::ports::{EventPublisher, HomeRepository, OpeningRepository, ZoneRepository};

/// Application service for zones and openings.
pub struct ZoneService<HR, ZR, OR, P> {
    homes: HR,
    zones: ZR,
    openings: OR,
    publisher: P,
}

impl<HR, ZR, OR, P> ZoneService<HR, ZR, OR, P>
where
    HR: HomeRepository,
    ZR: ZoneRepository,
    OR: OpeningRepository,
    P: EventPublisher,
{
    pub fn new(homes: HR, zones: ZR, openings: OR, publisher: P) -> Self {
        Self {
            homes,
            zones,
            openings,
            publisher,
        }
    }

    /// Add a zone to an existing home.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown home,
    /// [`SmartHomeError::Validation`] if invariants fail, or a storage
    /// error from the repositories.
    pub async fn create_zone(&self, zone: Zone) -> Result<Zone, SmartHomeError> {
        zone.validate()?;
        self.ensure_home(zone.home_id).await?;
        self.zones.create(zone).await
    }

    /// Look up a zone by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no zone with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_zone(&self, id: ZoneId) -> Result<Zone, SmartHomeError> {
        self.zones.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Zone",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Zones of `home_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown home, or a
    /// storage error from the repositories.
    pub async fn list_zones(&self, home_id: HomeId) -> Result<Vec<Zone>, SmartHomeError> {
        self.ensure_home(home_id).await?;
        self.zones.find_by_home(home_id).await
    }

    /// Doors and windows of `zone_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown zone, or a
    /// storage error from the repositories.
    pub async fn list_openings(&self, zone_id: ZoneId) -> Result<Vec<Opening>, SmartHomeError> {
        self.get_zone(zone_id).await?;
        self.openings.find_by_zone(zone_id).await
    }

    /// Delete a zone together with its openings and appliances. Users
    /// standing in it end up outside.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] when no zone with `id` exists,
    /// or a storage error from the repository.
    pub async fn delete_zone(&self, id: ZoneId) -> Result<(), SmartHomeError> {
        if !self.zones.delete(id).await? {
            return Err(NotFoundError {
                entity: "Zone",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Create the zones and openings described by a parsed layout.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::NotFound`] for an unknown home,
    /// [`SmartHomeError::Validation`] for a zone without a name, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self, layout), fields(zones = layout.len()))]
    pub async fn import_layout(
        &self,
        home_id: HomeId,
        layout: Vec<ZoneLayout>,
    ) -> Result<ImportedLayout, SmartHomeError> {
        self.ensure_home(home_id).await?;

        let mut imported = ImportedLayout {
            home_id,
            zones: Vec::with_capacity(layout.len()),
            openings: 0,
        };
        for blueprint in layout {
            let zone = Zone::builder()
                .home_id(home_id)
                .name(blueprint.name.as_str())
                .build()?;
            let zone = self.zones.create(zone).await?;
            for opening in blueprint.openings(zone.id) {
                self.openings.create(opening).await?;
                imported.openings += 1;
            }
            imported.zones.push(zone.id);
        }

        tracing::info!(
            %home_id,
            zones = imported.zones.len(),
            openings = imported.openings,
            "layout imported"
        );
        self.publisher
            .publish(Event::new(
                EventType::LayoutImported,
                Some(home_id),
                serde_json::json!({
                    "zones": imported.zones,
                    "openings": imported.openings,
                }),
            ))
            .await?;
        Ok(imported)
    }

    async fn ensure_home(&self, home_id: HomeId) -> Result<(), SmartHomeError> {
        if self.homes.exists(home_id).await? {
            Ok(())
        } else {
            Err(NotFoundError {
                entity: "Home",
                id: home_id.to_string(),
            }
            .into())
        }
    }
}
