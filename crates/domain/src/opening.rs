//! Opening: a door or window of a zone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{OpeningId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

impl OpeningKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "door",
            Self::Window => "window",
        }
    }
}

impl fmt::Display for OpeningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A door or window located in exactly one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub id: OpeningId,
    pub zone_id: ZoneId,
    pub kind: OpeningKind,
}

impl Opening {
    #[must_use]
    pub fn new(zone_id: ZoneId, kind: OpeningKind) -> Self {
        Self {
            id: OpeningId::new(),
            zone_id,
            kind,
        }
    }
}
