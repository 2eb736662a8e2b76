//! Storage port: repository traits for persistence.
//!
//! One repository per record kind. `get_by_id` answers `None` for unknown
//! ids; `delete` reports whether a record was actually removed.

use std::future::Future;
use std::sync::Arc;

use smarthome_domain::appliance::Appliance;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::home::Home;
use smarthome_domain::id::{ApplianceId, HomeId, OpeningId, UserId, ZoneId};
use smarthome_domain::opening::Opening;
use smarthome_domain::user::User;
use smarthome_domain::zone::Zone;

/// Repository for persisting and querying [`Home`]s.
pub trait HomeRepository {
    fn create(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send;

    fn get_by_id(
        &self,
        id: HomeId,
    ) -> impl Future<Output = Result<Option<Home>, SmartHomeError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Home>, SmartHomeError>> + Send;

    fn exists(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;

    fn update(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send;

    fn delete(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;
}

/// Repository for persisting and querying [`Zone`]s.
pub trait ZoneRepository {
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send;

    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartHomeError>> + Send;

    /// All zones owned by `home_id`.
    fn find_by_home(
        &self,
        home_id: HomeId,
    ) -> impl Future<Output = Result<Vec<Zone>, SmartHomeError>> + Send;

    fn exists(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;

    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send;

    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;
}

/// Repository for persisting and querying [`Opening`]s.
pub trait OpeningRepository {
    fn create(
        &self,
        opening: Opening,
    ) -> impl Future<Output = Result<Opening, SmartHomeError>> + Send;

    fn get_by_id(
        &self,
        id: OpeningId,
    ) -> impl Future<Output = Result<Option<Opening>, SmartHomeError>> + Send;

    /// All openings located in `zone_id`.
    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Opening>, SmartHomeError>> + Send;

    fn delete(&self, id: OpeningId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;
}

/// Repository for persisting and querying [`Appliance`]s.
pub trait ApplianceRepository {
    fn create(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send;

    fn get_by_id(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<Option<Appliance>, SmartHomeError>> + Send;

    /// All appliances located in `zone_id`.
    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Appliance>, SmartHomeError>> + Send;

    fn update(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send;

    fn delete(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;
}

/// Repository for persisting and querying [`User`]s.
pub trait UserRepository {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send;

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SmartHomeError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send;

    fn update(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send;

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send;
}

// Shared repositories: one adapter instance serves several services.

impl<T: HomeRepository + Send + Sync> HomeRepository for Arc<T> {
    fn create(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send {
        (**self).create(home)
    }

    fn get_by_id(
        &self,
        id: HomeId,
    ) -> impl Future<Output = Result<Option<Home>, SmartHomeError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Home>, SmartHomeError>> + Send {
        (**self).get_all()
    }

    fn exists(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).exists(id)
    }

    fn update(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send {
        (**self).update(home)
    }

    fn delete(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).delete(id)
    }
}

impl<T: ZoneRepository + Send + Sync> ZoneRepository for Arc<T> {
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send {
        (**self).create(zone)
    }

    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartHomeError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_home(
        &self,
        home_id: HomeId,
    ) -> impl Future<Output = Result<Vec<Zone>, SmartHomeError>> + Send {
        (**self).find_by_home(home_id)
    }

    fn exists(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).exists(id)
    }

    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send {
        (**self).update(zone)
    }

    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).delete(id)
    }
}

impl<T: OpeningRepository + Send + Sync> OpeningRepository for Arc<T> {
    fn create(
        &self,
        opening: Opening,
    ) -> impl Future<Output = Result<Opening, SmartHomeError>> + Send {
        (**self).create(opening)
    }

    fn get_by_id(
        &self,
        id: OpeningId,
    ) -> impl Future<Output = Result<Option<Opening>, SmartHomeError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Opening>, SmartHomeError>> + Send {
        (**self).find_by_zone(zone_id)
    }

    fn delete(&self, id: OpeningId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).delete(id)
    }
}

impl<T: ApplianceRepository + Send + Sync> ApplianceRepository for Arc<T> {
    fn create(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send {
        (**self).create(appliance)
    }

    fn get_by_id(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<Option<Appliance>, SmartHomeError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Appliance>, SmartHomeError>> + Send {
        (**self).find_by_zone(zone_id)
    }

    fn update(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send {
        (**self).update(appliance)
    }

    fn delete(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).delete(id)
    }
}

impl<T: UserRepository + Send + Sync> UserRepository for Arc<T> {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send {
        (**self).create(user)
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SmartHomeError>> + Send {
        (**self).get_all()
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send {
        (**self).find_by_email(email)
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send {
        (**self).update(user)
    }

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        (**self).delete(id)
    }
}
