//! Replays a scripted input session through the full pipeline, no hardware
//! needed: a remapped stick sweep, a button tap, and a dpad press.

use joypoll::backends::virtual_input::VirtualSource;
use joypoll::mapping::codes;
use joypoll::{Joypad, MappingOverrides};

fn main() {
    env_logger::init();

    let overrides = MappingOverrides::from_toml_str(
        r#"
        [axes.0]
        name = "yaw"
        normalized_bounds = { min = -1.0, max = 1.0 }
        dead_zone = { low = -0.05, high = 0.05 }

        [buttons.304]
        name = "fire"
        "#,
    )
    .expect("override document");

    let mut source = VirtualSource::new("scripted pad");
    source.feed_absolute(codes::ABS_X, 0);
    source.feed_absolute(codes::ABS_X, 128);
    source.feed_absolute(codes::ABS_X, 255);
    source.feed_key(codes::BTN_A, 1);
    source.feed_key(codes::BTN_A, 0);
    source.feed_absolute(codes::ABS_HAT0Y, -1);
    source.feed_absolute(codes::ABS_HAT0Y, 0);

    let mut joypad = Joypad::with_source(source, Some(overrides)).expect("construct");

    loop {
        match joypad.next_event() {
            Ok(Some(event)) => {
                println!(
                    "[{:10.6}] {:12} {:>4} -> {}",
                    event.timestamp(),
                    event.name,
                    event.value,
                    event.normalized
                );
            }
            Ok(None) => break,
            Err(err) => {
                eprintln!("poll failed: {err}");
                break;
            }
        }
    }
}
