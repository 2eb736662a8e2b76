//! Event: an immutable record of something the rules engine decided.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, HomeId};
use crate::time::{Timestamp, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    HomeCreated,
    SecurityLevelChanged,
    ArmingDenied,
    AlarmTriggered,
    UserMoved,
    ApplianceStateChanged,
    LayoutImported,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub home_id: Option<HomeId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, home_id: Option<HomeId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            home_id,
            data,
            timestamp: now(),
        }
    }
}
