//! Zone layout: blueprint of the zones of a home and their openings.
//!
//! A layout document is a JSON array:
//!
//! ```json
//! [{ "name": "Kitchen", "windows": 2, "doors": "1" }]
//! ```
//!
//! Counts may be JSON numbers or numeric strings.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::id::{HomeId, ZoneId};
use crate::opening::{Opening, OpeningKind};

/// One zone of a layout: `(name, window count, door count)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLayout {
    pub name: String,
    pub windows: u32,
    pub doors: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
struct RawZone {
    name: String,
    #[serde(default)]
    windows: Option<Count>,
    #[serde(default)]
    doors: Option<Count>,
}

impl Count {
    fn resolve(self, zone: &str, field: &str) -> Result<u32, ValidationError> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                ValidationError::InvalidLayout(format!(
                    "zone {zone:?}: {field} count {text:?} is not a number"
                ))
            }),
        }
    }
}

impl ZoneLayout {
    /// Openings to create for this zone once it exists as `zone_id`.
    ///
    /// Windows first, then doors.
    #[must_use]
    pub fn openings(&self, zone_id: ZoneId) -> Vec<Opening> {
        let windows = (0..self.windows).map(|_| Opening::new(zone_id, OpeningKind::Window));
        let doors = (0..self.doors).map(|_| Opening::new(zone_id, OpeningKind::Door));
        windows.chain(doors).collect()
    }
}

/// Parse a layout document.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidLayout`] if the document is not a JSON
/// array of zone objects, a zone has an empty name, or a count is not a
/// non-negative integer.
pub fn parse_layout(document: &[u8]) -> Result<Vec<ZoneLayout>, ValidationError> {
    let raw: Vec<RawZone> = serde_json::from_slice(document)
        .map_err(|err| ValidationError::InvalidLayout(err.to_string()))?;

    raw.into_iter()
        .map(|zone| {
            if zone.name.trim().is_empty() {
                return Err(ValidationError::InvalidLayout(
                    "zone name must not be empty".to_string(),
                ));
            }
            let windows = zone
                .windows
                .map(|c| c.resolve(&zone.name, "windows"))
                .transpose()?
                .unwrap_or(0);
            let doors = zone
                .doors
                .map(|c| c.resolve(&zone.name, "doors"))
                .transpose()?
                .unwrap_or(0);
            Ok(ZoneLayout {
                name: zone.name,
                windows,
                doors,
            })
        })
        .collect()
}

/// Summary of an imported layout.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImportedLayout {
    pub home_id: HomeId,
    pub zones: Vec<ZoneId>,
    pub openings: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_numeric_and_textual_counts() {
        let layout = parse_layout(
            br#"[{"name":"Kitchen","windows":2,"doors":"1"},{"name":"Hall","windows":"0","doors":3}]"#,
        )
        .unwrap();
        assert_eq!(
            layout,
            vec![
                ZoneLayout {
                    name: "Kitchen".to_string(),
                    windows: 2,
                    doors: 1,
                },
                ZoneLayout {
                    name: "Hall".to_string(),
                    windows: 0,
                    doors: 3,
                },
            ]
        );
    }

    #[test]
    fn should_default_missing_counts_to_zero() {
        let layout = parse_layout(br#"[{"name":"Attic"}]"#).unwrap();
        assert_eq!(layout[0].windows, 0);
        assert_eq!(layout[0].doors, 0);
    }

    #[test]
    fn should_reject_non_array_document() {
        let result = parse_layout(br#"{"name":"Kitchen"}"#);
        assert!(matches!(result, Err(ValidationError::InvalidLayout(_))));
    }

    #[test]
    fn should_reject_non_numeric_count() {
        let result = parse_layout(br#"[{"name":"Kitchen","windows":"many"}]"#);
        assert!(matches!(result, Err(ValidationError::InvalidLayout(msg)) if msg.contains("many")));
    }

    #[test]
    fn should_reject_negative_count() {
        let result = parse_layout(br#"[{"name":"Kitchen","doors":-1}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_expand_openings_windows_first() {
        let zone = ZoneLayout {
            name: "Den".to_string(),
            windows: 1,
            doors: 2,
        };
        let zone_id = ZoneId::new();
        let openings = zone.openings(zone_id);
        let kinds: Vec<_> = openings.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![OpeningKind::Window, OpeningKind::Door, OpeningKind::Door]
        );
        assert!(openings.iter().all(|o| o.zone_id == zone_id));
    }
}
