//! Shared application state for axum handlers.

use std::sync::Arc;

use smarthome_app::event_bus::InProcessEventBus;
use smarthome_app::locks::HomeLocks;
use smarthome_app::ports::{
    ApplianceRepository, HomeRepository, OpeningRepository, UserRepository, ZoneRepository,
};
use smarthome_app::services::appliance_service::ApplianceService;
use smarthome_app::services::home_service::HomeService;
use smarthome_app::services::user_service::UserService;
use smarthome_app::services::zone_service::ZoneService;

/// The set of repositories the HTTP layer runs on.
///
/// Bundles the five repository types behind one generic parameter so
/// handlers are written `fn handler<B: Backend>` instead of repeating every
/// repository bound. Any 5-tuple of suitable repositories is a backend.
pub trait Backend: Send + Sync + 'static {
    type Homes: HomeRepository + Clone + Send + Sync + 'static;
    type Zones: ZoneRepository + Clone + Send + Sync + 'static;
    type Openings: OpeningRepository + Send + Sync + 'static;
    type Appliances: ApplianceRepository + Clone + Send + Sync + 'static;
    type Users: UserRepository + Clone + Send + Sync + 'static;
}

impl<HR, ZR, OR, AR, UR> Backend for (HR, ZR, OR, AR, UR)
where
    HR: HomeRepository + Clone + Send + Sync + 'static,
    ZR: ZoneRepository + Clone + Send + Sync + 'static,
    OR: OpeningRepository + Send + Sync + 'static,
    AR: ApplianceRepository + Clone + Send + Sync + 'static,
    UR: UserRepository + Clone + Send + Sync + 'static,
{
    type Homes = HR;
    type Zones = ZR;
    type Openings = OR;
    type Appliances = AR;
    type Users = UR;
}

type Bus = Arc<InProcessEventBus>;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<B: Backend> {
    /// Homes, security levels and attribute updates.
    pub home_service: Arc<HomeService<B::Homes, B::Users, Bus>>,
    /// Sign-up, profile changes and zone moves.
    pub user_service: Arc<UserService<B::Homes, B::Zones, B::Appliances, B::Users, Bus>>,
    /// Zones, openings and layout import.
    pub zone_service: Arc<ZoneService<B::Homes, B::Zones, B::Openings, Bus>>,
    /// Manual appliance management.
    pub appliance_service: Arc<ApplianceService<B::Zones, B::Appliances, Bus>>,
    /// Event bus for the SSE stream.
    pub event_bus: Bus,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            home_service: Arc::clone(&self.home_service),
            user_service: Arc::clone(&self.user_service),
            zone_service: Arc::clone(&self.zone_service),
            appliance_service: Arc::clone(&self.appliance_service),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Wire every service onto the given repositories.
    ///
    /// All services share `event_bus` and one set of per-home locks.
    pub fn new(
        homes: B::Homes,
        zones: B::Zones,
        openings: B::Openings,
        appliances: B::Appliances,
        users: B::Users,
        event_bus: Bus,
    ) -> Self {
        let locks = HomeLocks::new();
        Self {
            home_service: Arc::new(HomeService::new(
                homes.clone(),
                users.clone(),
                Arc::clone(&event_bus),
                locks.clone(),
            )),
            user_service: Arc::new(UserService::new(
                homes.clone(),
                zones.clone(),
                appliances.clone(),
                users,
                Arc::clone(&event_bus),
                locks,
            )),
            zone_service: Arc::new(ZoneService::new(
                homes,
                zones.clone(),
                openings,
                Arc::clone(&event_bus),
            )),
            appliance_service: Arc::new(ApplianceService::new(
                zones,
                appliances,
                Arc::clone(&event_bus),
            )),
            event_bus,
        }
    }
}
