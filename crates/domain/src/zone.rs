//! Zone: a room of a home, and the "outside" sentinel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SmartHomeError, ValidationError};
use crate::id::{HomeId, ZoneId};

/// A room or area belonging to exactly one home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub home_id: HomeId,
    pub name: String,
}

impl Zone {
    /// Create a builder for constructing a [`Zone`].
    #[must_use]
    pub fn builder() -> ZoneBuilder {
        ZoneBuilder::default()
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

/// Step-by-step builder for [`Zone`].
#[derive(Debug, Default)]
pub struct ZoneBuilder {
    id: Option<ZoneId>,
    home_id: Option<HomeId>,
    name: Option<String>,
}

impl ZoneBuilder {
    #[must_use]
    pub fn id(mut self, id: ZoneId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn home_id(mut self, home_id: HomeId) -> Self {
        self.home_id = Some(home_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return a [`Zone`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHomeError::Validation`] if `name` is missing or empty,
    /// or if no owning home was given.
    pub fn build(self) -> Result<Zone, SmartHomeError> {
        let home_id = self
            .home_id
            .ok_or_else(|| ValidationError::InvalidIdentifier("zone without home".to_string()))?;
        let zone = Zone {
            id: self.id.unwrap_or_default(),
            home_id,
            name: self.name.unwrap_or_default(),
        };
        zone.validate()?;
        Ok(zone)
    }
}

/// Where a user is being sent: a real zone, or outside the home.
///
/// Textual form is a zone UUID, or `outside` / `0` for the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ZoneTarget {
    Outside,
    Zone(ZoneId),
}

impl ZoneTarget {
    #[must_use]
    pub fn zone_id(self) -> Option<ZoneId> {
        match self {
            Self::Outside => None,
            Self::Zone(id) => Some(id),
        }
    }

    #[must_use]
    pub fn is_outside(self) -> bool {
        matches!(self, Self::Outside)
    }
}

impl From<Option<ZoneId>> for ZoneTarget {
    fn from(value: Option<ZoneId>) -> Self {
        value.map_or(Self::Outside, Self::Zone)
    }
}

impl fmt::Display for ZoneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outside => f.write_str("outside"),
            Self::Zone(id) => id.fmt(f),
        }
    }
}

impl FromStr for ZoneTarget {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "outside" => Ok(Self::Outside),
            other => ZoneId::from_str(other)
                .map(Self::Zone)
                .map_err(|_| ValidationError::InvalidIdentifier(s.to_string())),
        }
    }
}

impl TryFrom<String> for ZoneTarget {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZoneTarget> for String {
    fn from(value: ZoneTarget) -> Self {
        value.to_string()
    }
}
