//! In-memory port implementations shared by the unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use smarthome_domain::appliance::{Appliance, ApplianceKind, ApplianceState};
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::home::Home;
use smarthome_domain::id::{ApplianceId, HomeId, OpeningId, UserId, ZoneId};
use smarthome_domain::opening::Opening;
use smarthome_domain::user::User;
use smarthome_domain::zone::Zone;

use crate::event_bus::InProcessEventBus;
use crate::locks::HomeLocks;
use crate::ports::{
    ApplianceRepository, HomeRepository, OpeningRepository, UserRepository, ZoneRepository,
};

struct Table<K, V> {
    rows: Mutex<HashMap<K, V>>,
    offline: AtomicBool,
    updates: AtomicUsize,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            updates: AtomicUsize::new(0),
        }
    }
}

impl<K: Eq + Hash + Copy, V: Clone> Table<K, V> {
    fn check(&self) -> Result<(), SmartHomeError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SmartHomeError::Storage("storage offline".into()));
        }
        Ok(())
    }

    fn insert(&self, key: K, value: V) -> Result<V, SmartHomeError> {
        self.check()?;
        self.rows.lock().unwrap().insert(key, value.clone());
        Ok(value)
    }

    fn get(&self, key: K) -> Result<Option<V>, SmartHomeError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().get(&key).cloned())
    }

    fn select(&self, predicate: impl Fn(&V) -> bool) -> Result<Vec<V>, SmartHomeError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect())
    }

    fn update(&self, key: K, value: V) -> Result<V, SmartHomeError> {
        self.check()?;
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(key, value.clone());
        Ok(value)
    }

    fn remove(&self, key: K) -> Result<bool, SmartHomeError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(&key).is_some())
    }
}

macro_rules! in_memory_repo {
    ($name:ident, $key:ty, $record:ty) => {
        #[derive(Default)]
        pub struct $name(Table<$key, $record>);

        impl $name {
            pub fn with(records: Vec<$record>) -> Self {
                let repo = Self::default();
                for record in records {
                    repo.0.insert(record.id, record).unwrap();
                }
                repo
            }

            /// Make every further call fail with a storage error.
            pub fn go_offline(&self) {
                self.0.offline.store(true, Ordering::SeqCst);
            }

            /// Number of `update` calls received so far.
            pub fn update_count(&self) -> usize {
                self.0.updates.load(Ordering::SeqCst)
            }

            pub fn snapshot(&self, id: $key) -> Option<$record> {
                self.0.rows.lock().unwrap().get(&id).cloned()
            }
        }
    };
}

in_memory_repo!(InMemoryHomeRepo, HomeId, Home);
in_memory_repo!(InMemoryZoneRepo, ZoneId, Zone);
in_memory_repo!(InMemoryOpeningRepo, OpeningId, Opening);
in_memory_repo!(InMemoryApplianceRepo, ApplianceId, Appliance);
in_memory_repo!(InMemoryUserRepo, UserId, User);

impl HomeRepository for InMemoryHomeRepo {
    fn create(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send {
        let result = self.0.insert(home.id, home);
        async { result }
    }

    fn get_by_id(
        &self,
        id: HomeId,
    ) -> impl Future<Output = Result<Option<Home>, SmartHomeError>> + Send {
        let result = self.0.get(id);
        async { result }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Home>, SmartHomeError>> + Send {
        let result = self.0.select(|_| true);
        async { result }
    }

    fn exists(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.get(id).map(|home| home.is_some());
        async { result }
    }

    fn update(&self, home: Home) -> impl Future<Output = Result<Home, SmartHomeError>> + Send {
        let result = self.0.update(home.id, home);
        async { result }
    }

    fn delete(&self, id: HomeId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.remove(id);
        async { result }
    }
}

impl ZoneRepository for InMemoryZoneRepo {
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send {
        let result = self.0.insert(zone.id, zone);
        async { result }
    }

    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SmartHomeError>> + Send {
        let result = self.0.get(id);
        async { result }
    }

    fn find_by_home(
        &self,
        home_id: HomeId,
    ) -> impl Future<Output = Result<Vec<Zone>, SmartHomeError>> + Send {
        let result = self.0.select(|zone| zone.home_id == home_id);
        async { result }
    }

    fn exists(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.get(id).map(|zone| zone.is_some());
        async { result }
    }

    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SmartHomeError>> + Send {
        let result = self.0.update(zone.id, zone);
        async { result }
    }

    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.remove(id);
        async { result }
    }
}

impl OpeningRepository for InMemoryOpeningRepo {
    fn create(
        &self,
        opening: Opening,
    ) -> impl Future<Output = Result<Opening, SmartHomeError>> + Send {
        let result = self.0.insert(opening.id, opening);
        async { result }
    }

    fn get_by_id(
        &self,
        id: OpeningId,
    ) -> impl Future<Output = Result<Option<Opening>, SmartHomeError>> + Send {
        let result = self.0.get(id);
        async { result }
    }

    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Opening>, SmartHomeError>> + Send {
        let result = self.0.select(|opening| opening.zone_id == zone_id);
        async { result }
    }

    fn delete(&self, id: OpeningId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.remove(id);
        async { result }
    }
}

impl ApplianceRepository for InMemoryApplianceRepo {
    fn create(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send {
        let result = self.0.insert(appliance.id, appliance);
        async { result }
    }

    fn get_by_id(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<Option<Appliance>, SmartHomeError>> + Send {
        let result = self.0.get(id);
        async { result }
    }

    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Appliance>, SmartHomeError>> + Send {
        let result = self.0.select(|appliance| appliance.zone_id == zone_id);
        async { result }
    }

    fn update(
        &self,
        appliance: Appliance,
    ) -> impl Future<Output = Result<Appliance, SmartHomeError>> + Send {
        let result = self.0.update(appliance.id, appliance);
        async { result }
    }

    fn delete(
        &self,
        id: ApplianceId,
    ) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.remove(id);
        async { result }
    }
}

impl UserRepository for InMemoryUserRepo {
    fn create(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send {
        let result = self.0.insert(user.id, user);
        async { result }
    }

    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send {
        let result = self.0.get(id);
        async { result }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SmartHomeError>> + Send {
        let result = self.0.select(|_| true);
        async { result }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, SmartHomeError>> + Send {
        let result = self
            .0
            .select(|user| user.email.eq_ignore_ascii_case(email))
            .map(|found| found.into_iter().next());
        async { result }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, SmartHomeError>> + Send {
        let result = self.0.update(user.id, user);
        async { result }
    }

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, SmartHomeError>> + Send {
        let result = self.0.remove(id);
        async { result }
    }
}

/// A user with a unique email, placed in `home_id` / `zone_id`.
pub fn user_in(home_id: Option<HomeId>, zone_id: Option<ZoneId>) -> User {
    let id = UserId::new();
    let mut builder = User::builder()
        .id(id)
        .name("Resident")
        .email(format!("{id}@example.com"));
    if let Some(home_id) = home_id {
        builder = builder.home_id(home_id);
    }
    if let Some(zone_id) = zone_id {
        builder = builder.zone_id(zone_id);
    }
    builder.build().unwrap()
}

/// Every repository plus the bus and locks, wired the way the binary does.
pub struct World {
    pub homes: Arc<InMemoryHomeRepo>,
    pub zones: Arc<InMemoryZoneRepo>,
    pub openings: Arc<InMemoryOpeningRepo>,
    pub appliances: Arc<InMemoryApplianceRepo>,
    pub users: Arc<InMemoryUserRepo>,
    pub bus: Arc<InProcessEventBus>,
    pub locks: HomeLocks,
}

impl Default for World {
    fn default() -> Self {
        Self {
            homes: Arc::default(),
            zones: Arc::default(),
            openings: Arc::default(),
            appliances: Arc::default(),
            users: Arc::default(),
            bus: Arc::new(InProcessEventBus::new(64)),
            locks: HomeLocks::new(),
        }
    }
}

impl World {
    pub async fn home(&self, name: &str, auto_mode: bool) -> Home {
        let home = Home::builder()
            .name(name)
            .auto_mode(auto_mode)
            .build()
            .unwrap();
        self.homes.create(home).await.unwrap()
    }

    pub async fn zone(&self, home_id: HomeId, name: &str) -> Zone {
        let zone = Zone::builder().home_id(home_id).name(name).build().unwrap();
        self.zones.create(zone).await.unwrap()
    }

    pub async fn appliance(
        &self,
        zone_id: ZoneId,
        kind: ApplianceKind,
        state: ApplianceState,
    ) -> Appliance {
        self.appliances
            .create(Appliance::new(zone_id, kind, state))
            .await
            .unwrap()
    }

    pub async fn user(&self, home_id: Option<HomeId>, zone_id: Option<ZoneId>) -> User {
        self.users.create(user_in(home_id, zone_id)).await.unwrap()
    }
}
