//! Occupancy tracker: is anybody inside a given home?

use smarthome_domain::error::SmartHomeError;
use smarthome_domain::home::Occupancy;
use smarthome_domain::id::HomeId;

use crate::ports::UserRepository;

/// Derives home occupancy from user zone assignments.
///
/// Scans every known user on each query, so the cost grows with the total
/// user count. A per-home counter maintained on zone changes would replace
/// this if homes ever held more than a handful of people.
pub struct OccupancyTracker<UR> {
    users: UR,
}

impl<UR: UserRepository> OccupancyTracker<UR> {
    pub fn new(users: UR) -> Self {
        Self { users }
    }

    /// Whether some user of `home_id` is currently inside one of its zones.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn is_home_occupied(&self, home_id: HomeId) -> Result<bool, SmartHomeError> {
        let users = self.users.get_all().await?;
        Ok(users.iter().any(|user| user.is_present_in(home_id)))
    }

    /// Typed form of [`is_home_occupied`](Self::is_home_occupied).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn occupancy(&self, home_id: HomeId) -> Result<Occupancy, SmartHomeError> {
        self.is_home_occupied(home_id)
            .await
            .map(Occupancy::from_present)
    }
}
