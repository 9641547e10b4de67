//! The seam between the classification core and the OS event source.

use std::io;

use crate::event::RawEvent;

/// A non-blocking supplier of raw input events.
///
/// `read_one` returns one pending event, `Ok(None)` when nothing is queued
/// right now, and an I/O error when the underlying handle has become
/// unusable (e.g. the device was unplugged). It must never block waiting
/// for input — callers drive the poll loop and choose their own cadence.
pub trait EventSource {
    fn read_one(&mut self) -> io::Result<Option<RawEvent>>;
    fn name(&self) -> &str;
}
