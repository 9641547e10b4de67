//! The joypad itself: channel tables bound to an event source, pulled one
//! event at a time.
//!
//! [`Joypad`] owns a [`Mapping`] and an [`EventSource`] and exposes two
//! pull surfaces:
//!
//! - [`next_event`](Joypad::next_event): one poll step with full error
//!   reporting;
//! - [`events`](Joypad::events): a lazy `Iterator<Item =
//!   Option<NormalizedEvent>>` where `Some(None)` means "no event this
//!   tick" and `None` means the source has failed for good.
//!
//! The sequence is infinite until the source reports an I/O failure. That
//! failure moves the joypad into an explicit terminal state — there is no
//! control-flow trick ending the loop, just a flag — and every later poll
//! reports [`JoypadError::Finished`]. A finished joypad cannot be revived;
//! construct a new one.
//!
//! Polling never blocks. Callers own the loop cadence and are expected to
//! sleep between ticks rather than spin.

use std::io;

use log::{debug, warn};

use crate::classify::{dispatch, ClassifyError};
use crate::event::NormalizedEvent;
use crate::mapping::{Mapping, MappingError};
use crate::overrides::MappingOverrides;
use crate::source::EventSource;

/// Construction-time failures. Fatal: no joypad is built.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[cfg(target_os = "linux")]
    #[error(transparent)]
    Open(#[from] crate::backends::evdev::OpenError),
}

/// Steady-state polling failures.
#[derive(Debug, thiserror::Error)]
pub enum JoypadError {
    /// The source handle became unusable. Terminal: the joypad is finished.
    #[error("input source failed: {0}")]
    Source(#[from] io::Error),

    /// The joypad already hit a source failure earlier.
    #[error("input source already terminated")]
    Finished,

    /// A classification failure for one event. Not terminal — polling may
    /// continue.
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// A configured joypad bound to one event source.
pub struct Joypad<S: EventSource> {
    mapping: Mapping,
    source: S,
    finished: bool,
    last_error: Option<io::Error>,
}

impl<S: EventSource> Joypad<S> {
    /// Builds a joypad over an already-open source: stock mapping, caller
    /// overrides merged on top, the result validated.
    pub fn with_source(source: S, overrides: Option<MappingOverrides>) -> Result<Self, ConfigError> {
        let mut mapping = Mapping::default();
        if let Some(overrides) = overrides {
            overrides.apply_to(&mut mapping)?;
        }
        debug!(
            "joypad over source {:?}: {} axes, {} buttons, {} dpad axes",
            source.name(),
            mapping.axes.len(),
            mapping.buttons.len(),
            mapping.dpad.len()
        );
        Ok(Self {
            mapping,
            source,
            finished: false,
            last_error: None,
        })
    }

    /// Polls the source once and classifies whatever came out.
    ///
    /// `Ok(None)` covers both "nothing pending" and events the dispatcher
    /// deliberately ignores. A [`JoypadError::Source`] is terminal; a
    /// [`JoypadError::Classify`] is a per-event diagnostic and leaves the
    /// joypad usable.
    pub fn next_event(&mut self) -> Result<Option<NormalizedEvent>, JoypadError> {
        if self.finished {
            return Err(JoypadError::Finished);
        }
        match self.source.read_one() {
            Ok(Some(raw)) => Ok(dispatch(&mut self.mapping, &raw)?),
            Ok(None) => Ok(None),
            Err(err) => {
                self.finished = true;
                warn!(
                    "input source {:?} failed, ending iteration: {err}",
                    self.source.name()
                );
                Err(JoypadError::Source(err))
            }
        }
    }

    /// The lazy event sequence.
    ///
    /// Classification errors (a button value outside `{0, 1, 2}`) are
    /// absorbed here with a warning and yielded as `Some(None)`, keeping the
    /// loop alive; use [`next_event`](Joypad::next_event) to observe them.
    pub fn events(&mut self) -> Events<'_, S> {
        Events { joypad: self }
    }

    /// Re-applies caller overrides against the live tables, between polls.
    ///
    /// All-or-nothing: the merge runs on a scratch copy and is swapped in
    /// only when it validates, so a rejected document leaves the mapping —
    /// including every `last_event` — exactly as it was.
    pub fn amend(&mut self, overrides: MappingOverrides) -> Result<(), MappingError> {
        let mut merged = self.mapping.clone();
        overrides.apply_to(&mut merged)?;
        self.mapping = merged;
        Ok(())
    }

    /// Whether the source has failed and the sequence has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The I/O error that ended iteration, when it was absorbed by the
    /// [`events`](Joypad::events) iterator.
    pub fn last_error(&self) -> Option<&io::Error> {
        self.last_error.as_ref()
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Most recent record produced for `code`.
    pub fn last_event(&self, code: u16) -> Option<&NormalizedEvent> {
        self.mapping.last_event(code)
    }
}

#[cfg(target_os = "linux")]
impl Joypad<crate::backends::evdev::EvdevSource> {
    /// Opens the device at `device_index` (in [`list_devices`] order) and
    /// builds a joypad over it.
    ///
    /// [`list_devices`]: crate::backends::evdev::list_devices
    pub fn open(
        device_index: usize,
        overrides: Option<MappingOverrides>,
    ) -> Result<Self, ConfigError> {
        let source = crate::backends::evdev::EvdevSource::open_index(device_index)?;
        Self::with_source(source, overrides)
    }
}

/// Iterator over [`Joypad::next_event`] results. See
/// [`events`](Joypad::events) for the yielded-item semantics.
pub struct Events<'a, S: EventSource> {
    joypad: &'a mut Joypad<S>,
}

impl<S: EventSource> Iterator for Events<'_, S> {
    type Item = Option<NormalizedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.joypad.next_event() {
            Ok(item) => Some(item),
            Err(JoypadError::Classify(err)) => {
                warn!("dropping event: {err}");
                Some(None)
            }
            Err(JoypadError::Source(err)) => {
                self.joypad.last_error = Some(err);
                None
            }
            Err(JoypadError::Finished) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualSource;
    use crate::event::{ButtonPhase, EventClass, RawEvent};
    use crate::mapping::codes;
    use std::collections::HashMap;

    fn scripted() -> VirtualSource {
        VirtualSource::new("scripted")
    }

    #[test]
    fn idle_source_yields_nothing_this_tick() {
        let mut joypad = Joypad::with_source(scripted(), None).expect("construct");
        assert!(matches!(joypad.next_event(), Ok(None)));
        assert!(!joypad.is_finished());
    }

    #[test]
    fn source_failure_is_terminal() {
        let mut source = scripted();
        source.feed_key(codes::BTN_A, 1);
        source.fail_after_drain();
        let mut joypad = Joypad::with_source(source, None).expect("construct");

        assert!(matches!(joypad.next_event(), Ok(Some(_))));
        assert!(matches!(joypad.next_event(), Err(JoypadError::Source(_))));
        assert!(joypad.is_finished());
        assert!(matches!(joypad.next_event(), Err(JoypadError::Finished)));
    }

    #[test]
    fn iterator_ends_cleanly_and_keeps_the_cause() {
        let mut source = scripted();
        source.feed_key(codes::BTN_A, 1);
        source.fail_after_drain();
        let mut joypad = Joypad::with_source(source, None).expect("construct");

        let yielded: Vec<_> = joypad.events().collect();
        assert_eq!(yielded.len(), 1);
        assert!(yielded[0].is_some());
        assert!(joypad.is_finished());
        assert!(joypad.last_error().is_some());

        // Once ended, the iterator stays ended.
        assert!(joypad.events().next().is_none());
    }

    #[test]
    fn iterator_absorbs_unrecognized_button_values() {
        let mut source = scripted();
        source.feed_key(codes::BTN_A, 7);
        source.feed_key(codes::BTN_A, 1);
        let mut joypad = Joypad::with_source(source, None).expect("construct");

        let mut events = joypad.events();
        // The bad value is swallowed as "no event this tick"...
        assert_eq!(events.next(), Some(None));
        // ...and the loop keeps going.
        let event = events.next().expect("tick").expect("event");
        assert_eq!(event.normalized.as_button(), Some(ButtonPhase::Pressed));
    }

    #[test]
    fn unrecognized_inputs_are_no_ops() {
        let mut source = scripted();
        source.feed(RawEvent {
            class: EventClass::Other(4),
            code: 4,
            value: 458_756,
            sec: 0,
            usec: 0,
        });
        source.feed_key(9999, 1);
        let mut joypad = Joypad::with_source(source, None).expect("construct");

        assert!(matches!(joypad.next_event(), Ok(None)));
        assert!(matches!(joypad.next_event(), Ok(None)));
        assert!(!joypad.is_finished());
    }

    #[test]
    fn construction_rejects_a_bad_override_document() {
        let overrides = MappingOverrides {
            buttons: HashMap::from([(
                codes::ABS_X,
                crate::overrides::ButtonOverride {
                    name: Some("clash".to_string()),
                },
            )]),
            ..Default::default()
        };
        assert!(matches!(
            Joypad::with_source(scripted(), Some(overrides)),
            Err(ConfigError::Mapping(MappingError::DuplicateCode { .. }))
        ));
    }

    #[test]
    fn rejected_amendment_leaves_the_mapping_untouched() {
        let mut source = scripted();
        source.feed_key(codes::BTN_A, 1);
        let mut joypad = Joypad::with_source(source, None).expect("construct");
        joypad.next_event().expect("poll");
        assert!(joypad.last_event(codes::BTN_A).is_some());

        let before = joypad.mapping().clone();
        let bad = MappingOverrides {
            buttons: HashMap::from([(codes::ABS_X, Default::default())]),
            ..Default::default()
        };
        assert!(joypad.amend(bad).is_err());
        assert_eq!(joypad.mapping(), &before);
    }

    #[test]
    fn amendment_renames_a_channel_between_polls() {
        let mut source = scripted();
        source.feed_key(codes::BTN_A, 1);
        source.feed_key(codes::BTN_A, 0);
        let mut joypad = Joypad::with_source(source, None).expect("construct");

        let first = joypad.next_event().expect("poll").expect("event");
        assert_eq!(first.name, "button_a");

        let overrides = MappingOverrides {
            buttons: HashMap::from([(
                codes::BTN_A,
                crate::overrides::ButtonOverride {
                    name: Some("button_jump".to_string()),
                },
            )]),
            ..Default::default()
        };
        joypad.amend(overrides).expect("amend");
        // History survives the amendment.
        assert_eq!(
            joypad.last_event(codes::BTN_A).map(|e| e.name.as_str()),
            Some("button_a")
        );

        let second = joypad.next_event().expect("poll").expect("event");
        assert_eq!(second.name, "button_jump");
    }
}
