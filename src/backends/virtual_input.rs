//! In-memory scripted event source for tests and demos.

use std::collections::VecDeque;
use std::io;

use crate::event::{EventClass, RawEvent};
use crate::source::EventSource;

/// An [`EventSource`] fed by hand instead of by hardware.
///
/// Events are drained in feed order. With [`fail_after_drain`] set, the
/// source reports an I/O error once its queue is empty, which lets tests
/// exercise the unplugged-device path.
///
/// [`fail_after_drain`]: VirtualSource::fail_after_drain
#[derive(Default)]
pub struct VirtualSource {
    name: String,
    queue: VecDeque<RawEvent>,
    fail_after_drain: bool,
    ticks: i64,
}

impl VirtualSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Queue a raw event verbatim.
    pub fn feed(&mut self, event: RawEvent) {
        self.queue.push_back(event);
    }

    /// Queue an absolute-axis event with a synthetic, monotonically
    /// increasing timestamp.
    pub fn feed_absolute(&mut self, code: u16, value: i32) {
        let event = self.stamped(EventClass::Absolute, code, value);
        self.feed(event);
    }

    /// Queue a key-class event with a synthetic timestamp.
    pub fn feed_key(&mut self, code: u16, value: i32) {
        let event = self.stamped(EventClass::Key, code, value);
        self.feed(event);
    }

    /// After the queue drains, report a broken-pipe error from `read_one`.
    pub fn fail_after_drain(&mut self) {
        self.fail_after_drain = true;
    }

    fn stamped(&mut self, class: EventClass, code: u16, value: i32) -> RawEvent {
        self.ticks += 1;
        RawEvent {
            class,
            code,
            value,
            sec: self.ticks / 1_000,
            usec: (self.ticks % 1_000) * 1_000,
        }
    }
}

impl EventSource for VirtualSource {
    fn read_one(&mut self) -> io::Result<Option<RawEvent>> {
        match self.queue.pop_front() {
            Some(event) => Ok(Some(event)),
            None if self.fail_after_drain => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "virtual source drained",
            )),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
