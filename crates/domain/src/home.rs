//! Home: the top-level simulated dwelling and its security state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SmartHomeError, ValidationError};
use crate::id::HomeId;
use crate::outcome::Denial;
use crate::time::{Timestamp, now};
use crate::zone::ZoneTarget;

/// Security level of a home's alarm system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    #[default]
    Disarmed,
    ArmedStay,
    #[serde(alias = "armed")]
    ArmedAway,
}

impl SecurityLevel {
    /// Whether this level is gated by occupancy and triggers on entry.
    #[must_use]
    pub fn is_armed(self) -> bool {
        !matches!(self, Self::Disarmed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disarmed => "disarmed",
            Self::ArmedStay => "armed_stay",
            Self::ArmedAway => "armed_away",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disarmed" => Ok(Self::Disarmed),
            "armed_stay" => Ok(Self::ArmedStay),
            "armed" | "armed_away" => Ok(Self::ArmedAway),
            _ => Err(ValidationError::InvalidSecurityLevel(s.to_string())),
        }
    }
}

/// Whether anybody is currently inside one of the home's zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Vacant,
    Occupied,
}

impl Occupancy {
    #[must_use]
    pub fn from_present(present: bool) -> Self {
        if present {
            Self::Occupied
        } else {
            Self::Vacant
        }
    }
}

/// A simulated home.
///
/// The security level is only reachable through
/// [`request_security_level`](Self::request_security_level) so the
/// occupancy gate cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub name: String,
    pub outside_temp: i32,
    pub date: Timestamp,
    security_level: SecurityLevel,
    pub auto_mode: bool,
}

impl Home {
    /// Create a builder for constructing a [`Home`].
    #[must_use]
    pub fn builder() -> HomeBuilder {
        HomeBuilder::default()
    }

    #[must_use]
    pub fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.security_level.is_armed()
    }

    /// Move the alarm to `requested`, honouring the occupancy gate.
    ///
    /// Disarming always succeeds. Any armed level requires the home to be
    /// [`Occupancy::Vacant`]; otherwise the level is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Denial::UsersPresent`] when arming an occupied home.
    pub fn request_security_level(
        &mut self,
        requested: SecurityLevel,
        occupancy: Occupancy,
    ) -> Result<SecurityLevel, Denial> {
        if requested.is_armed() && occupancy == Occupancy::Occupied {
            return Err(Denial::UsersPresent);
        }
        let previous = self.security_level;
        self.security_level = requested;
        Ok(previous)
    }

    /// Decide whether somebody may walk into `target`.
    ///
    /// Going outside is always allowed. Entering any zone of an armed home
    /// trips the alarm; the security level itself does not change.
    ///
    /// # Errors
    ///
    /// Returns [`Denial::AlarmTriggered`] when the home is armed.
    pub fn admits(&self, target: ZoneTarget) -> Result<(), Denial> {
        if self.is_armed() && !target.is_outside() {
            return Err(Denial::AlarmTriggered);
        }
        Ok(())
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), SmartHomeError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Home`].
#[derive(Debug, Default)]
pub struct HomeBuilder {
    id: Option<HomeId>,
    name: Option<String>,
    outside_temp: Option<i32>,
    date: Option<Timestamp>,
    security_level: Option<SecurityLevel>,
    auto_mode: Option<bool>,
}

impl HomeBuilder {
    #[must_use]
    pub fn id(mut self, id: HomeId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn outside_temp(mut self, outside_temp: i32) -> Self {
        self.outside_temp = Some(outside_temp);
        self
    }

    #[must_use]
    pub fn date(mut self, date: Timestamp) -> Self {
        self.date = Some(date);
        self
    }

    /// Restore a stored security level. Only meant for rehydrating records
    /// from storage; live transitions go through the alarm state machine.
    #[must_use]
    pub fn security_level(mut self, security_level: SecurityLevel) -> Self {
        self.security_level = Some(security_level);
        self
    }

    #[must_use]
    pub fn auto_mode(mut self, auto_mode: bool) -> Self {
        self.auto_mode = Some(auto_mode);
        self
    }

    /// Consume the builder, validate, and return a [`Home`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Home, SmartHomeError> {
        let home = Home {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            outside_temp: self.outside_temp.unwrap_or_default(),
            date: self.date.unwrap_or_else(now),
            security_level: self.security_level.unwrap_or_default(),
            auto_mode: self.auto_mode.unwrap_or(false),
        };
        home.validate()?;
        Ok(home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Home {
        Home::builder().name("Cottage").build().unwrap()
    }

    #[test]
    fn should_build_disarmed_manual_home_by_default() {
        let home = home();
        assert_eq!(home.security_level(), SecurityLevel::Disarmed);
        assert!(!home.auto_mode);
        assert_eq!(home.outside_temp, 0);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Home::builder().name("  ").build();
        assert!(matches!(
            result,
            Err(SmartHomeError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_arm_when_vacant() {
        let mut home = home();
        let previous = home
            .request_security_level(SecurityLevel::ArmedAway, Occupancy::Vacant)
            .unwrap();
        assert_eq!(previous, SecurityLevel::Disarmed);
        assert!(home.is_armed());
    }

    #[test]
    fn should_refuse_every_armed_level_when_occupied() {
        for level in [SecurityLevel::ArmedStay, SecurityLevel::ArmedAway] {
            let mut home = home();
            let result = home.request_security_level(level, Occupancy::Occupied);
            assert_eq!(result, Err(Denial::UsersPresent));
            assert_eq!(home.security_level(), SecurityLevel::Disarmed);
        }
    }

    #[test]
    fn should_disarm_even_when_occupied() {
        let mut home = Home::builder()
            .name("Cottage")
            .security_level(SecurityLevel::ArmedStay)
            .build()
            .unwrap();
        home.request_security_level(SecurityLevel::Disarmed, Occupancy::Occupied)
            .unwrap();
        assert_eq!(home.security_level(), SecurityLevel::Disarmed);
    }

    #[test]
    fn should_trip_alarm_on_zone_entry_when_armed() {
        let mut home = home();
        home.request_security_level(SecurityLevel::ArmedStay, Occupancy::Vacant)
            .unwrap();
        assert_eq!(
            home.admits(ZoneTarget::Zone(crate::id::ZoneId::new())),
            Err(Denial::AlarmTriggered)
        );
        assert_eq!(home.admits(ZoneTarget::Outside), Ok(()));
        assert!(home.is_armed());
    }

    #[test]
    fn should_admit_anyone_when_disarmed() {
        let home = home();
        assert!(home.admits(ZoneTarget::Zone(crate::id::ZoneId::new())).is_ok());
    }

    #[test]
    fn should_parse_legacy_armed_value() {
        assert_eq!(
            "armed".parse::<SecurityLevel>().unwrap(),
            SecurityLevel::ArmedAway
        );
        let parsed: SecurityLevel = serde_json::from_str("\"armed\"").unwrap();
        assert_eq!(parsed, SecurityLevel::ArmedAway);
    }

    #[test]
    fn should_reject_unknown_security_level() {
        assert!("panic".parse::<SecurityLevel>().is_err());
    }

    #[test]
    fn should_serialize_security_level_in_snake_case() {
        let json = serde_json::to_string(&SecurityLevel::ArmedStay).unwrap();
        assert_eq!(json, "\"armed_stay\"");
    }
}
