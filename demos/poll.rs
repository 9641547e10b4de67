//! Polls the first input device and prints every normalized event.
//!
//! Run with `RUST_LOG=debug` to watch device selection and dropped events.

#[cfg(target_os = "linux")]
fn main() {
    use std::{thread, time::Duration};

    env_logger::init();

    let devices = joypoll::backends::evdev::list_devices();
    println!("Discovered {} input device(s)", devices.len());
    for (index, info) in devices.iter().enumerate() {
        println!("  [{index}] {info}");
    }

    let mut joypad = match joypoll::Joypad::open(0, None) {
        Ok(joypad) => joypad,
        Err(err) => {
            eprintln!("failed to open joypad: {err}");
            return;
        }
    };
    println!("Reading from {:?} (ctrl-c to quit)", joypad.source_name());

    for event in joypad.events() {
        if let Some(event) = event {
            println!("{} --> {} --> {}", event.name, event.value, event.normalized);
        }
        thread::sleep(Duration::from_millis(1));
    }

    if let Some(err) = joypad.last_error() {
        eprintln!("device went away: {err}");
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("the poll demo reads Linux evdev devices; try virtual_demo instead");
}
