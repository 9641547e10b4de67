//! Joypoll — joypad event normalization over Linux evdev.
//!
//! Reads raw `(type, code, value, timestamp)` input reports from a gamepad
//! device and turns them into named, calibrated records: sticks and triggers
//! remapped onto configurable ranges with dead zones, buttons as
//! pressed/released/held phases, and the dpad as edge transitions.
//!
//! ```no_run
//! use std::{thread, time::Duration};
//! use joypoll::Joypad;
//!
//! # #[cfg(target_os = "linux")]
//! # fn run() -> Result<(), joypoll::ConfigError> {
//! let mut joypad = Joypad::open(0, None)?;
//! for event in joypad.events() {
//!     if let Some(event) = event {
//!         println!("{} -> {} -> {}", event.name, event.value, event.normalized);
//!     }
//!     thread::sleep(Duration::from_millis(1));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The default mapping covers a generic pad; callers remap names, bounds,
//! dead zones, and dpad labels through [`MappingOverrides`], programmatically
//! or from a TOML/JSON document.

pub mod backends;
pub mod classify;
pub mod event;
pub mod joypad;
pub mod mapping;
pub mod normalize;
pub mod overrides;
pub mod source;

pub use classify::ClassifyError;
pub use event::*;
pub use joypad::*;
pub use mapping::{Bounds, DeadZone, DpadAxisDirections, Mapping, MappingError};
pub use overrides::*;
pub use source::*;
