//! Channel tables and the stock joypad mapping.
//!
//! A [`Mapping`] holds one table per channel category — axes, buttons, dpad —
//! keyed by event code. Each entry carries its display name, per-channel
//! calibration data, and the last record it produced. The tables are only
//! restructured by the override merge ([`MappingOverrides::apply_to`]);
//! during iteration nothing but `last_event` mutates.
//!
//! [`Mapping::default`] reproduces the stock generic-pad layout: raw `0..=255`
//! sticks remapped to `-90..=90`, triggers to `0..=180`, the usual face and
//! shoulder buttons, and the two hat axes as a dpad.
//!
//! [`MappingOverrides::apply_to`]: crate::overrides::MappingOverrides::apply_to

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::event::{ChannelKind, DpadDirection, NormalizedEvent};

/// Numeric event codes used by the stock mapping.
///
/// Values are from the Linux input event-codes ABI, spelled out here so the
/// classification core stays platform-independent.
pub mod codes {
    pub const ABS_X: u16 = 0;
    pub const ABS_Y: u16 = 1;
    pub const ABS_Z: u16 = 2;
    pub const ABS_RZ: u16 = 5;
    pub const ABS_GAS: u16 = 9;
    pub const ABS_BRAKE: u16 = 10;
    pub const ABS_HAT0X: u16 = 16;
    pub const ABS_HAT0Y: u16 = 17;

    pub const KEY_BACK: u16 = 158;
    pub const BTN_A: u16 = 304;
    pub const BTN_B: u16 = 305;
    pub const BTN_X: u16 = 307;
    pub const BTN_Y: u16 = 308;
    pub const BTN_TL: u16 = 310;
    pub const BTN_TR: u16 = 311;
    pub const BTN_START: u16 = 315;
    pub const BTN_THUMBL: u16 = 317;
    pub const BTN_THUMBR: u16 = 318;
}

/// Inclusive value range, used for both raw and normalized axis bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Open band around zero inside which calibrated readings collapse to `0.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeadZone {
    pub low: f64,
    pub high: f64,
}

/// Direction labels for the two signs of one dpad axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpadAxisDirections {
    /// Label for raw value `-1`.
    pub negative: DpadDirection,
    /// Label for raw value `+1`.
    pub positive: DpadDirection,
}

impl DpadAxisDirections {
    /// Looks up the direction for a raw reading; only `-1`/`+1` map.
    pub fn for_value(&self, value: i32) -> Option<DpadDirection> {
        match value {
            -1 => Some(self.negative),
            1 => Some(self.positive),
            _ => None,
        }
    }
}

/// One analog axis (stick axis or trigger).
#[derive(Clone, Debug, PartialEq)]
pub struct AxisEntry {
    pub name: String,
    pub raw_bounds: Bounds,
    pub normalized_bounds: Bounds,
    pub dead_zone: DeadZone,
    /// Most recent record produced for this code, set by the axis classifier.
    pub last_event: Option<NormalizedEvent>,
}

impl AxisEntry {
    /// Stick axis with the stock generic-pad calibration
    /// (`0..=255` raw, `-90..=90` out, dead zone `(-10, 10)`).
    pub fn stick(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_bounds: Bounds { min: 0.0, max: 255.0 },
            normalized_bounds: Bounds { min: -90.0, max: 90.0 },
            dead_zone: DeadZone { low: -10.0, high: 10.0 },
            last_event: None,
        }
    }

    /// Trigger with the stock calibration (`0..=255` raw, `0..=180` out,
    /// dead zone `(0, 10)`).
    pub fn trigger(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_bounds: Bounds { min: 0.0, max: 255.0 },
            normalized_bounds: Bounds { min: 0.0, max: 180.0 },
            dead_zone: DeadZone { low: 0.0, high: 10.0 },
            last_event: None,
        }
    }
}

/// One discrete button.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonEntry {
    pub name: String,
    /// Most recent record produced for this code, set by the button
    /// classifier. Left untouched when a raw value fails to classify.
    pub last_event: Option<NormalizedEvent>,
}

impl ButtonEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            last_event: None,
        }
    }
}

/// One dpad (hat) axis.
#[derive(Clone, Debug, PartialEq)]
pub struct DpadEntry {
    pub name: String,
    pub directions: DpadAxisDirections,
    /// Most recent record produced for this code. Doubles as the state of
    /// the edge detector: the previous raw value is read from here.
    pub last_event: Option<NormalizedEvent>,
}

impl DpadEntry {
    pub fn new(name: &str, directions: DpadAxisDirections) -> Self {
        Self {
            name: name.to_string(),
            directions,
            last_event: None,
        }
    }
}

/// Structural problems in a mapping or an override document.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("code {code} is mapped in more than one channel table")]
    DuplicateCode { code: u16 },

    #[error("axis {code}: {which} bounds are empty or inverted")]
    InvalidBounds { code: u16, which: &'static str },

    #[error("axis {code}: dead zone is inverted")]
    InvalidDeadZone { code: u16 },

    #[error("{channel:?} override for unmapped code {code} is missing a name")]
    MissingName { channel: ChannelKind, code: u16 },

    #[error("{channel:?} override for unmapped code {code} is missing direction labels")]
    MissingDirections { channel: ChannelKind, code: u16 },

    #[error("malformed TOML override document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed JSON override document: {0}")]
    Json(#[from] serde_json::Error),
}

/// The three channel tables of one joypad.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    pub axes: HashMap<u16, AxisEntry>,
    pub buttons: HashMap<u16, ButtonEntry>,
    pub dpad: HashMap<u16, DpadEntry>,
}

impl Default for Mapping {
    fn default() -> Self {
        use codes::*;

        let axes = HashMap::from([
            (ABS_X, AxisEntry::stick("stick_left_x")),
            (ABS_Y, AxisEntry::stick("stick_left_y")),
            (ABS_Z, AxisEntry::stick("stick_right_x")),
            (ABS_RZ, AxisEntry::stick("stick_right_y")),
            (ABS_BRAKE, AxisEntry::trigger("trigger_left")),
            (ABS_GAS, AxisEntry::trigger("trigger_right")),
        ]);

        let buttons = HashMap::from([
            (BTN_A, ButtonEntry::new("button_a")),
            (BTN_B, ButtonEntry::new("button_b")),
            (BTN_X, ButtonEntry::new("button_x")),
            (BTN_Y, ButtonEntry::new("button_y")),
            (BTN_TL, ButtonEntry::new("bumper_left")),
            (BTN_TR, ButtonEntry::new("bumper_right")),
            (BTN_START, ButtonEntry::new("button_start")),
            (KEY_BACK, ButtonEntry::new("button_select")),
            (BTN_THUMBL, ButtonEntry::new("thumb_left")),
            (BTN_THUMBR, ButtonEntry::new("thumb_right")),
        ]);

        let dpad = HashMap::from([
            (
                ABS_HAT0X,
                DpadEntry::new(
                    "dpad_x",
                    DpadAxisDirections {
                        negative: DpadDirection::Left,
                        positive: DpadDirection::Right,
                    },
                ),
            ),
            (
                ABS_HAT0Y,
                DpadEntry::new(
                    "dpad_y",
                    DpadAxisDirections {
                        negative: DpadDirection::Up,
                        positive: DpadDirection::Down,
                    },
                ),
            ),
        ]);

        Self { axes, buttons, dpad }
    }
}

impl Mapping {
    /// Checks the table invariants: codes are disjoint across the three
    /// tables, every axis spans a nonzero range in both bounds, and no dead
    /// zone is inverted.
    pub fn validate(&self) -> Result<(), MappingError> {
        for &code in self.axes.keys() {
            if self.buttons.contains_key(&code) || self.dpad.contains_key(&code) {
                return Err(MappingError::DuplicateCode { code });
            }
        }
        for &code in self.buttons.keys() {
            if self.dpad.contains_key(&code) {
                return Err(MappingError::DuplicateCode { code });
            }
        }

        for (&code, axis) in &self.axes {
            if axis.raw_bounds.min >= axis.raw_bounds.max {
                return Err(MappingError::InvalidBounds { code, which: "raw" });
            }
            if axis.normalized_bounds.min >= axis.normalized_bounds.max {
                return Err(MappingError::InvalidBounds {
                    code,
                    which: "normalized",
                });
            }
            if axis.dead_zone.low > axis.dead_zone.high {
                return Err(MappingError::InvalidDeadZone { code });
            }
        }

        Ok(())
    }

    /// Channel owning `code`, if any.
    pub fn channel_of(&self, code: u16) -> Option<ChannelKind> {
        if self.buttons.contains_key(&code) {
            Some(ChannelKind::Button)
        } else if self.axes.contains_key(&code) {
            Some(ChannelKind::Axis)
        } else if self.dpad.contains_key(&code) {
            Some(ChannelKind::Dpad)
        } else {
            None
        }
    }

    /// Most recent record produced for `code`, across all three tables.
    pub fn last_event(&self, code: u16) -> Option<&NormalizedEvent> {
        if let Some(entry) = self.buttons.get(&code) {
            return entry.last_event.as_ref();
        }
        if let Some(entry) = self.axes.get(&code) {
            return entry.last_event.as_ref();
        }
        self.dpad.get(&code).and_then(|e| e.last_event.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_mapping_is_valid() {
        let mapping = Mapping::default();
        mapping.validate().expect("stock mapping");
        assert_eq!(mapping.axes.len(), 6);
        assert_eq!(mapping.buttons.len(), 10);
        assert_eq!(mapping.dpad.len(), 2);
    }

    #[test]
    fn stock_names_cover_the_generic_pad() {
        let mapping = Mapping::default();
        assert_eq!(mapping.axes[&codes::ABS_X].name, "stick_left_x");
        assert_eq!(mapping.axes[&codes::ABS_GAS].name, "trigger_right");
        assert_eq!(mapping.buttons[&codes::KEY_BACK].name, "button_select");
        assert_eq!(mapping.dpad[&codes::ABS_HAT0Y].name, "dpad_y");
    }

    #[test]
    fn duplicate_code_fails_validation() {
        let mut mapping = Mapping::default();
        mapping
            .buttons
            .insert(codes::ABS_X, ButtonEntry::new("clash"));
        assert!(matches!(
            mapping.validate(),
            Err(MappingError::DuplicateCode { code }) if code == codes::ABS_X
        ));
    }

    #[test]
    fn inverted_bounds_fail_validation() {
        let mut mapping = Mapping::default();
        mapping.axes.get_mut(&codes::ABS_X).unwrap().raw_bounds = Bounds {
            min: 255.0,
            max: 0.0,
        };
        assert!(matches!(
            mapping.validate(),
            Err(MappingError::InvalidBounds { which: "raw", .. })
        ));
    }

    #[test]
    fn dpad_directions_map_only_the_two_signs() {
        let dirs = DpadAxisDirections {
            negative: DpadDirection::Left,
            positive: DpadDirection::Right,
        };
        assert_eq!(dirs.for_value(-1), Some(DpadDirection::Left));
        assert_eq!(dirs.for_value(1), Some(DpadDirection::Right));
        assert_eq!(dirs.for_value(0), None);
        assert_eq!(dirs.for_value(2), None);
    }
}
