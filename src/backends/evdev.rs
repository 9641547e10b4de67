//! Linux evdev backend.
//!
//! Wraps an `evdev::Device` as a non-blocking [`EventSource`]: the file
//! descriptor is switched to `O_NONBLOCK` at open, `fetch_events` drains
//! whatever the kernel has buffered, and `WouldBlock` reads surface as
//! "nothing pending". Conversion to [`RawEvent`] happens here so the rest of
//! the crate never touches evdev types.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use evdev::{Device, EventType, InputEvent};
use log::debug;
use nix::fcntl::{FcntlArg, OFlag};

use crate::event::{EventClass, RawEvent};
use crate::source::EventSource;

/// One enumerated input device.
#[derive(Clone, Debug)]
pub struct DeviceInfo {
    /// Device node, e.g. `/dev/input/event3`.
    pub path: PathBuf,
    /// Kernel-reported device name, when available.
    pub name: Option<String>,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.path.display(),
            self.name.as_deref().unwrap_or("unnamed")
        )
    }
}

/// Enumerates the event devices this process can open, sorted by device
/// path so an index into the result is stable across calls.
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = evdev::enumerate()
        .map(|(path, device)| DeviceInfo {
            name: device.name().map(str::to_string),
            path,
        })
        .collect();
    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices
}

/// Failure to select or open a device node.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("no input device at index {index} ({available} available)")]
    NoSuchDevice { index: usize, available: usize },

    #[error("failed to open input device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Event source backed by one `/dev/input/event*` node.
///
/// Dropping the source closes the device handle.
pub struct EvdevSource {
    device: Device,
    name: String,
    pending: VecDeque<RawEvent>,
}

impl EvdevSource {
    /// Opens the device at `index` within [`list_devices`] order.
    pub fn open_index(index: usize) -> Result<Self, OpenError> {
        let devices = list_devices();
        let info = devices.get(index).ok_or(OpenError::NoSuchDevice {
            index,
            available: devices.len(),
        })?;
        Self::open_path(&info.path)
    }

    /// Opens a specific device node in non-blocking mode.
    pub fn open_path(path: &Path) -> Result<Self, OpenError> {
        let open_err = |source: io::Error| OpenError::Open {
            path: path.to_path_buf(),
            source,
        };

        let device = Device::open(path).map_err(open_err)?;
        nix::fcntl::fcntl(device.as_raw_fd(), FcntlArg::F_SETFL(OFlag::O_NONBLOCK))
            .map_err(|errno| open_err(errno.into()))?;

        let name = device.name().unwrap_or("unknown").to_string();
        debug!("opened {} at {}", name, path.display());

        Ok(Self {
            device,
            name,
            pending: VecDeque::new(),
        })
    }
}

fn convert(event: InputEvent) -> RawEvent {
    let class = match event.event_type() {
        EventType::KEY => EventClass::Key,
        EventType::ABSOLUTE => EventClass::Absolute,
        other => EventClass::Other(other.0),
    };
    // The kernel stamps events with wall-clock timeval; evdev hands it back
    // as SystemTime.
    let stamp = event
        .timestamp()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    RawEvent {
        class,
        code: event.code(),
        value: event.value(),
        sec: stamp.as_secs() as i64,
        usec: stamp.subsec_micros() as i64,
    }
}

impl EventSource for EvdevSource {
    fn read_one(&mut self) -> io::Result<Option<RawEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        match self.device.fetch_events() {
            Ok(events) => {
                self.pending.extend(events.map(convert));
                Ok(self.pending.pop_front())
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
