//! Per-channel classifiers and the dispatcher that routes raw events.
//!
//! Each classifier is a free function over one table entry: it builds the
//! output record, stores it as the entry's `last_event`, and returns it.
//! Routing is a plain lookup of the event code across the three tables; the
//! tables are disjoint, so lookup order only affects short-circuit cost.

use log::trace;

use crate::event::{
    ButtonPhase, ChannelKind, DpadTransition, EventClass, NormalizedEvent, NormalizedValue,
    RawEvent,
};
use crate::mapping::{AxisEntry, ButtonEntry, DpadEntry, Mapping};
use crate::normalize::calibrate;

/// Steady-state classification failures.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// A key-class event carried a value outside `{0, 1, 2}`. Real pads are
    /// not known to produce this; it is surfaced instead of being folded
    /// into a half-built record.
    #[error("button {code} reported unrecognized value {value}")]
    UnrecognizedButtonValue { code: u16, value: i32 },
}

fn record(
    name: &str,
    channel: ChannelKind,
    raw: &RawEvent,
    normalized: NormalizedValue,
) -> NormalizedEvent {
    NormalizedEvent {
        code: raw.code,
        name: name.to_string(),
        channel,
        value: raw.value,
        normalized,
        sec: raw.sec,
        usec: raw.usec,
    }
}

/// Classifies an absolute-axis event: calibrates the reading against the
/// entry's bounds and dead zone.
pub fn classify_axis(entry: &mut AxisEntry, raw: &RawEvent) -> NormalizedEvent {
    let normalized = NormalizedValue::Axis(calibrate(raw.value, entry));
    let event = record(&entry.name, ChannelKind::Axis, raw, normalized);
    entry.last_event = Some(event.clone());
    event
}

/// Classifies a key-class event into a [`ButtonPhase`].
///
/// A value outside `{0, 1, 2}` is an error; the entry's `last_event` is left
/// untouched in that case.
pub fn classify_button(
    entry: &mut ButtonEntry,
    raw: &RawEvent,
) -> Result<NormalizedEvent, ClassifyError> {
    let phase =
        ButtonPhase::from_value(raw.value).ok_or(ClassifyError::UnrecognizedButtonValue {
            code: raw.code,
            value: raw.value,
        })?;
    let event = record(
        &entry.name,
        ChannelKind::Button,
        raw,
        NormalizedValue::Button(phase),
    );
    entry.last_event = Some(event.clone());
    Ok(event)
}

/// Classifies a dpad axis event into an edge transition.
///
/// Edge detection compares the incoming sign against the previously stored
/// record; the last event doubles as the state. When the incoming value maps
/// to a direction the result is a press of that direction (this covers both
/// leaving center and jumping straight to the opposite edge). When it does
/// not, but the previous value did, the result is a release of the old
/// direction. When neither maps (e.g. the first reading is already centered)
/// the record carries no transition.
pub fn classify_dpad(entry: &mut DpadEntry, raw: &RawEvent) -> NormalizedEvent {
    let transition = match entry.directions.for_value(raw.value) {
        Some(dir) => Some(DpadTransition::Pressed(dir)),
        None => entry
            .last_event
            .as_ref()
            .and_then(|last| entry.directions.for_value(last.value))
            .map(DpadTransition::Released),
    };
    let event = record(
        &entry.name,
        ChannelKind::Dpad,
        raw,
        NormalizedValue::Dpad(transition),
    );
    entry.last_event = Some(event.clone());
    event
}

/// Routes one raw event to the classifier owning its code.
///
/// Returns `Ok(None)` when the event's category is neither key-class nor
/// absolute-axis-class, or when no table claims the code — unconfigured
/// controls are a deliberate no-op, not an error.
pub fn dispatch(
    mapping: &mut Mapping,
    raw: &RawEvent,
) -> Result<Option<NormalizedEvent>, ClassifyError> {
    match raw.class {
        EventClass::Key | EventClass::Absolute => {}
        EventClass::Other(kind) => {
            trace!("ignoring event of irrelevant class {kind} (code {})", raw.code);
            return Ok(None);
        }
    }

    if let Some(entry) = mapping.buttons.get_mut(&raw.code) {
        return classify_button(entry, raw).map(Some);
    }
    if let Some(entry) = mapping.axes.get_mut(&raw.code) {
        return Ok(Some(classify_axis(entry, raw)));
    }
    if let Some(entry) = mapping.dpad.get_mut(&raw.code) {
        return Ok(Some(classify_dpad(entry, raw)));
    }

    trace!("ignoring event for unmapped code {}", raw.code);
    Ok(None)
}
