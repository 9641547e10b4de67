//! Event-source backends.
//!
//! Implementations of [`EventSource`](crate::source::EventSource):
//! the Linux evdev backend (compiled only on Linux) and an in-memory
//! scripted source for tests and demos.

#[cfg(target_os = "linux")]
pub mod evdev;

pub mod virtual_input;
