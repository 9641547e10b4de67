//! Caller-supplied mapping overrides and the merge that applies them.
//!
//! An override document is a typed, sparse mirror of the three channel
//! tables: every field is optional, and only the codes it names are touched.
//! Applying one to a [`Mapping`]:
//!
//! - a code already in the table gets its `Some` fields overwritten, nothing
//!   else changes (equal values are trivially no-ops);
//! - a code absent from the table becomes a new entry — the name is
//!   required, axis calibration falls back to the stock stick defaults
//!   before the override's own fields are applied, and a new dpad axis must
//!   bring its direction labels;
//! - untouched entries and untouched fields are preserved as-is.
//!
//! The merged mapping is re-validated before the apply returns, so a
//! document that would break the table invariants (a code claimed by two
//! channels, inverted bounds) is rejected as a whole.
//!
//! Documents load from TOML or JSON; table keys are decimal event codes:
//!
//! ```toml
//! [axes.2]
//! name = "rudder"
//! normalized_bounds = { min = -1.0, max = 1.0 }
//!
//! [buttons.316]
//! name = "button_mode"
//! ```

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::event::ChannelKind;
use crate::mapping::{
    AxisEntry, Bounds, ButtonEntry, DeadZone, DpadAxisDirections, DpadEntry, Mapping, MappingError,
};

/// Sparse override for one axis entry.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AxisOverride {
    pub name: Option<String>,
    pub raw_bounds: Option<Bounds>,
    pub normalized_bounds: Option<Bounds>,
    pub dead_zone: Option<DeadZone>,
}

/// Sparse override for one button entry.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonOverride {
    pub name: Option<String>,
}

/// Sparse override for one dpad entry.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DpadOverride {
    pub name: Option<String>,
    pub directions: Option<DpadAxisDirections>,
}

/// A full override document: three sparse tables keyed by event code.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingOverrides {
    #[serde(deserialize_with = "code_table")]
    pub axes: HashMap<u16, AxisOverride>,
    #[serde(deserialize_with = "code_table")]
    pub buttons: HashMap<u16, ButtonOverride>,
    #[serde(deserialize_with = "code_table")]
    pub dpad: HashMap<u16, DpadOverride>,
}

/// TOML and JSON carry table keys as strings; parse them into event codes.
fn code_table<'de, D, V>(deserializer: D) -> Result<HashMap<u16, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = HashMap::<String, V>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            key.parse::<u16>()
                .map(|code| (code, value))
                .map_err(|_| serde::de::Error::custom(format!("table key {key:?} is not an event code")))
        })
        .collect()
}

impl MappingOverrides {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.buttons.is_empty() && self.dpad.is_empty()
    }

    /// Parses an override document from TOML.
    pub fn from_toml_str(doc: &str) -> Result<Self, MappingError> {
        Ok(toml::from_str(doc)?)
    }

    /// Parses an override document from JSON.
    pub fn from_json_str(doc: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(doc)?)
    }

    /// Merges this document into `mapping` in place, then re-validates the
    /// result.
    ///
    /// On error the tables may already contain the partial merge; callers
    /// that need all-or-nothing semantics (construction does) apply onto a
    /// scratch copy first.
    pub fn apply_to(self, mapping: &mut Mapping) -> Result<(), MappingError> {
        for (code, patch) in self.axes {
            match mapping.axes.get_mut(&code) {
                Some(entry) => patch_axis(entry, patch),
                None => {
                    let name = patch.name.as_deref().ok_or(MappingError::MissingName {
                        channel: ChannelKind::Axis,
                        code,
                    })?;
                    let mut entry = AxisEntry::stick(name);
                    patch_axis(&mut entry, patch);
                    mapping.axes.insert(code, entry);
                }
            }
        }

        for (code, patch) in self.buttons {
            match mapping.buttons.get_mut(&code) {
                Some(entry) => {
                    if let Some(name) = patch.name {
                        entry.name = name;
                    }
                }
                None => {
                    let name = patch.name.ok_or(MappingError::MissingName {
                        channel: ChannelKind::Button,
                        code,
                    })?;
                    mapping.buttons.insert(code, ButtonEntry::new(&name));
                }
            }
        }

        for (code, patch) in self.dpad {
            match mapping.dpad.get_mut(&code) {
                Some(entry) => {
                    if let Some(name) = patch.name {
                        entry.name = name;
                    }
                    if let Some(directions) = patch.directions {
                        entry.directions = directions;
                    }
                }
                None => {
                    let name = patch.name.ok_or(MappingError::MissingName {
                        channel: ChannelKind::Dpad,
                        code,
                    })?;
                    let directions = patch.directions.ok_or(MappingError::MissingDirections {
                        channel: ChannelKind::Dpad,
                        code,
                    })?;
                    mapping.dpad.insert(code, DpadEntry::new(&name, directions));
                }
            }
        }

        mapping.validate()
    }
}

fn patch_axis(entry: &mut AxisEntry, patch: AxisOverride) {
    if let Some(name) = patch.name {
        entry.name = name;
    }
    if let Some(raw_bounds) = patch.raw_bounds {
        entry.raw_bounds = raw_bounds;
    }
    if let Some(normalized_bounds) = patch.normalized_bounds {
        entry.normalized_bounds = normalized_bounds;
    }
    if let Some(dead_zone) = patch.dead_zone {
        entry.dead_zone = dead_zone;
    }
}
