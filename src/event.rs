//! Raw and normalized event records.
//!
//! Joypoll represents one OS input report as a [`RawEvent`] and one
//! application-facing result as a [`NormalizedEvent`].
//!
//! ## Value conventions
//! - **Axes (sticks/triggers):** raw integer readings (typically `0..=255` on
//!   generic pads) remapped onto the configured output range, e.g. `-90..=90`
//!   for sticks and `0..=180` for triggers, with a dead zone forced to `0`.
//! - **Buttons:** raw `0`/`1`/`2` mapped to
//!   [`Released`](ButtonPhase::Released) / [`Pressed`](ButtonPhase::Pressed) /
//!   [`Held`](ButtonPhase::Held).
//! - **Dpad (hat) axes:** raw `-1`/`0`/`+1` turned into edge transitions such
//!   as `pressed-left` or `released-up`; a reading that maps to no transition
//!   (a centered axis with no remembered direction) carries no value.
//!
//! Timestamps are carried as whole seconds plus microseconds, exactly as the
//! kernel reports them; [`RawEvent::timestamp`] and
//! [`NormalizedEvent::timestamp`] derive the fractional form.
//!
//! These types are deliberately decoupled from `evdev` so the classification
//! core compiles and tests on any platform; the Linux backend converts at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a raw event, as reported by the event source.
///
/// Only key-class and absolute-axis-class events are meaningful to a joypad;
/// everything else is carried as [`Other`](EventClass::Other) and discarded
/// by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Key/button events (`EV_KEY`).
    Key,
    /// Absolute axis events (`EV_ABS`) — sticks, triggers, and hat axes.
    Absolute,
    /// Any other event category, kept as the raw type code.
    Other(u16),
}

/// One raw input report from the event source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawEvent {
    /// Event category.
    pub class: EventClass,
    /// Code of the physical control (axis/button/hat axis).
    pub code: u16,
    /// Raw reading.
    pub value: i32,
    /// Whole seconds of the report timestamp.
    pub sec: i64,
    /// Microseconds past `sec`.
    pub usec: i64,
}

impl RawEvent {
    /// Timestamp in fractional seconds (`sec + usec / 1_000_000`).
    pub fn timestamp(&self) -> f64 {
        self.sec as f64 + self.usec as f64 * 1e-6
    }
}

/// Category of an input channel on a joypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Axis,
    Button,
    Dpad,
}

/// Phase of a button reported by a key-class event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPhase {
    Released,
    Pressed,
    Held,
}

impl ButtonPhase {
    /// Maps a raw key-class value to a phase. Anything outside `0..=2` is
    /// unrecognized and yields `None`.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(ButtonPhase::Released),
            1 => Some(ButtonPhase::Pressed),
            2 => Some(ButtonPhase::Held),
            _ => None,
        }
    }
}

impl fmt::Display for ButtonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonPhase::Released => f.write_str("released"),
            ButtonPhase::Pressed => f.write_str("pressed"),
            ButtonPhase::Held => f.write_str("held"),
        }
    }
}

/// Direction label of one dpad half-axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DpadDirection {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for DpadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DpadDirection::Up => f.write_str("up"),
            DpadDirection::Down => f.write_str("down"),
            DpadDirection::Left => f.write_str("left"),
            DpadDirection::Right => f.write_str("right"),
        }
    }
}

/// Edge transition derived from successive dpad readings.
///
/// `Display` renders the wire labels, e.g. `pressed-left` / `released-left`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DpadTransition {
    Pressed(DpadDirection),
    Released(DpadDirection),
}

impl fmt::Display for DpadTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DpadTransition::Pressed(dir) => write!(f, "pressed-{dir}"),
            DpadTransition::Released(dir) => write!(f, "released-{dir}"),
        }
    }
}

/// The channel-dependent normalized payload of a [`NormalizedEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizedValue {
    /// Calibrated axis reading.
    Axis(f64),
    /// Button phase.
    Button(ButtonPhase),
    /// Dpad edge, or `None` when the reading produced no transition.
    Dpad(Option<DpadTransition>),
}

impl NormalizedValue {
    pub fn as_axis(&self) -> Option<f64> {
        match self {
            NormalizedValue::Axis(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<ButtonPhase> {
        match self {
            NormalizedValue::Button(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_dpad(&self) -> Option<DpadTransition> {
        match self {
            NormalizedValue::Dpad(t) => *t,
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Axis(v) => write!(f, "{v}"),
            NormalizedValue::Button(p) => write!(f, "{p}"),
            NormalizedValue::Dpad(Some(t)) => write!(f, "{t}"),
            NormalizedValue::Dpad(None) => f.write_str("-"),
        }
    }
}

/// One classified, application-consumable input record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedEvent {
    /// Code of the control that produced the event.
    pub code: u16,
    /// Configured display name, e.g. `"stick_left_x"`.
    pub name: String,
    /// Channel that classified the event.
    pub channel: ChannelKind,
    /// Raw reading, untouched.
    pub value: i32,
    /// Channel-dependent normalized payload.
    pub normalized: NormalizedValue,
    /// Whole seconds of the report timestamp.
    pub sec: i64,
    /// Microseconds past `sec`.
    pub usec: i64,
}

impl NormalizedEvent {
    /// Timestamp in fractional seconds (`sec + usec / 1_000_000`).
    pub fn timestamp(&self) -> f64 {
        self.sec as f64 + self.usec as f64 * 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_phase_covers_the_three_known_values() {
        assert_eq!(ButtonPhase::from_value(0), Some(ButtonPhase::Released));
        assert_eq!(ButtonPhase::from_value(1), Some(ButtonPhase::Pressed));
        assert_eq!(ButtonPhase::from_value(2), Some(ButtonPhase::Held));
        assert_eq!(ButtonPhase::from_value(3), None);
        assert_eq!(ButtonPhase::from_value(-1), None);
    }

    #[test]
    fn transition_labels_match_the_wire_format() {
        let t = DpadTransition::Pressed(DpadDirection::Left);
        assert_eq!(t.to_string(), "pressed-left");
        let t = DpadTransition::Released(DpadDirection::Up);
        assert_eq!(t.to_string(), "released-up");
    }

    #[test]
    fn timestamps_compose_seconds_and_microseconds() {
        let raw = RawEvent {
            class: EventClass::Absolute,
            code: 0,
            value: 128,
            sec: 4_267_000_555,
            usec: 211_142,
        };
        assert!((raw.timestamp() - 4_267_000_555.211_142).abs() < 1e-6);
    }
}
