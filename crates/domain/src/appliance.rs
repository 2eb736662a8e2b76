//! Appliance: a controllable device located in a zone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{ApplianceId, ZoneId};

/// What an appliance is. Unknown kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplianceKind {
    Light,
    Thermostat,
    Fan,
    Heater,
    Other(String),
}

impl ApplianceKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
            Self::Fan => "fan",
            Self::Heater => "heater",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for ApplianceKind {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Self::Light,
            "thermostat" => Self::Thermostat,
            "fan" => Self::Fan,
            "heater" => Self::Heater,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ApplianceKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ApplianceKind> for String {
    fn from(value: ApplianceKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ApplianceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer state of an appliance: `0` is off, `1` is on, other values are levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplianceState(pub i32);

impl ApplianceState {
    pub const OFF: Self = Self(0);
    pub const ON: Self = Self(1);

    #[must_use]
    pub fn is_on(self) -> bool {
        self == Self::ON
    }
}

impl fmt::Display for ApplianceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A device located in exactly one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: ApplianceId,
    pub zone_id: ZoneId,
    pub kind: ApplianceKind,
    pub state: ApplianceState,
}

impl Appliance {
    #[must_use]
    pub fn new(zone_id: ZoneId, kind: ApplianceKind, state: ApplianceState) -> Self {
        Self {
            id: ApplianceId::new(),
            zone_id,
            kind,
            state,
        }
    }

    #[must_use]
    pub fn is_light(&self) -> bool {
        self.kind == ApplianceKind::Light
    }

    /// Switch a light on when a user walks in.
    ///
    /// Returns `true` only when the state actually changed, so callers
    /// can skip persisting untouched appliances.
    pub fn light_up(&mut self) -> bool {
        if !self.is_light() || self.state.is_on() {
            return false;
        }
        self.state = ApplianceState::ON;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_switch_light_on_once() {
        let mut light = Appliance::new(ZoneId::new(), ApplianceKind::Light, ApplianceState::OFF);
        assert!(light.light_up());
        assert!(light.state.is_on());
        assert!(!light.light_up());
    }

    #[test]
    fn should_leave_other_kinds_untouched() {
        let mut fan = Appliance::new(ZoneId::new(), ApplianceKind::Fan, ApplianceState::OFF);
        assert!(!fan.light_up());
        assert_eq!(fan.state, ApplianceState::OFF);
    }

    #[test]
    fn should_treat_dimmed_level_as_not_on() {
        let mut light = Appliance::new(ZoneId::new(), ApplianceKind::Light, ApplianceState(3));
        assert!(light.light_up());
        assert_eq!(light.state, ApplianceState::ON);
    }

    #[test]
    fn should_keep_unknown_kind_verbatim() {
        let kind = ApplianceKind::from("Sprinkler");
        assert_eq!(kind, ApplianceKind::Other("sprinkler".to_string()));
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"sprinkler\"");
    }

    #[test]
    fn should_serialize_state_as_plain_integer() {
        let json = serde_json::to_string(&ApplianceState::ON).unwrap();
        assert_eq!(json, "1");
    }
}
